use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Native webview windows driven from Rust.
#[derive(Parser, Debug)]
#[command(name = "webview", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Native library path override (takes precedence over WEBVIEW_PATH).
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Which demo window to open.
    #[arg(value_enum, default_value_t = Demo::Basic)]
    pub demo: Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// A single page, blocking loop.
    Basic,
    /// Frameless always-on-top window with pixel transparency and
    /// click-through toggled from the page.
    Transparency,
    /// Autoplay-enabled window reporting video state back to the host.
    Flags,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_basic() {
        let args = Args::try_parse_from(["webview"]).unwrap();
        assert_eq!(args.demo, Demo::Basic);
        assert!(args.config.is_none());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "webview",
            "--library",
            "/opt/libwebview.so",
            "--log-level",
            "debug",
            "transparency",
        ])
        .unwrap();
        assert_eq!(args.demo, Demo::Transparency);
        assert_eq!(args.library, Some(PathBuf::from("/opt/libwebview.so")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_unknown_demo() {
        assert!(Args::try_parse_from(["webview", "teapot"]).is_err());
    }
}
