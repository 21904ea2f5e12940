mod cli;
mod demos;

use std::process::ExitCode;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;
use webview_common::ConfigError;
use webview_config::WebviewConfig;

const DEFAULT_DIRECTIVE: &str = "webview=info";

/// Load the config named on the command line, or the platform default.
fn load_config(args: &cli::Args) -> (WebviewConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => webview_config::toml_loader::load_from_path(path).and_then(|config| {
            webview_config::validation::validate(&config)?;
            Ok(config)
        }),
        None => webview_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (WebviewConfig::default(), Some(e)),
    }
}

fn init_logging(directive: &str) {
    let directive: Result<Directive, _> = directive
        .parse()
        .or_else(|_| DEFAULT_DIRECTIVE.parse());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    let (mut config, config_error) = load_config(&args);

    let directive = match &args.log_level {
        Some(level) => format!("webview={level}"),
        None => format!("webview={}", config.logging.level.as_directive()),
    };
    init_logging(&directive);

    tracing::info!("webview v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    if let Some(path) = &args.library {
        tracing::info!(path = %path.display(), "using library override");
        config.library.path = Some(path.clone());
    }

    match demos::run(args.demo, config) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
