use serde_json::Value;
use webview_bridge::{BrowserFlags, OptionalFeature, WebviewContext};
use webview_common::Result;
use webview_config::{WebviewConfig, WindowConfig};

const HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { margin: 0; display: flex; flex-direction: column; align-items: center;
           justify-content: center; height: 100vh; background: #121212; color: white;
           font-family: "Segoe UI", Tahoma, sans-serif; }
    video { width: 80%; max-width: 600px; border-radius: 12px; }
    .status { padding: 8px 16px; background: #4CAF50; border-radius: 20px; margin-top: 1rem; }
  </style>
</head>
<body>
  <h1>Autoplay with browser flags</h1>
  <video id="video" controls autoplay>
    <source src="https://www.w3schools.com/html/mov_bbb.mp4" type="video/mp4">
  </video>
  <div id="status" class="status">Status: waiting for play event...</div>
  <script>
    const video = document.getElementById('video');
    const status = document.getElementById('status');
    video.onplay = () => { status.innerText = 'Status: autoplaying'; };
    setTimeout(() => {
      if (video.paused) {
        status.innerText = 'Status: playback blocked by policy';
        status.style.background = '#f44336';
      }
    }, 1000);
    setInterval(() => {
      window.report({
        paused: video.paused,
        muted: video.muted,
        currentTime: video.currentTime,
        readyState: video.readyState,
        error: video.error ? video.error.code : null
      });
    }, 2000);
  </script>
</body>
</html>"#;

/// The configured flags, or autoplay with sound when none are configured.
fn browser_flags(config: &WebviewConfig) -> BrowserFlags {
    config.browser.clone().unwrap_or_else(|| BrowserFlags {
        enable_autoplay: true,
        mute_autoplay: false,
        custom_flags: vec!["--autoplay-policy=no-user-gesture-required".into()],
    })
}

fn window_config(config: &WebviewConfig) -> WindowConfig {
    WindowConfig {
        title: "Browser Flags Demo - Autoplay Enabled".into(),
        html: Some(HTML.to_string()),
        url: None,
        ..config.window.clone()
    }
}

pub fn run(config: WebviewConfig) -> Result<()> {
    let flags = browser_flags(&config);
    tracing::info!(flags = %flags.joined_flags(), "starting webview with browser flags");

    let ctx = WebviewContext::open(&config)?.with_browser_flags(flags);
    if !ctx.supports(OptionalFeature::BrowserFlags) {
        tracing::warn!("native library does not support browser flags, autoplay may be blocked");
    }

    let window = ctx.create_window(&window_config(&config))?;
    window.bind_sync("report", |args: Vec<Value>| {
        let status = args.into_iter().next().unwrap_or(Value::Null);
        tracing::info!(%status, "status report from page");
        Ok::<_, String>(Value::Null)
    })?;

    window.run()?;

    ctx.unload_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_enable_sound_autoplay() {
        let flags = browser_flags(&WebviewConfig::default());
        assert!(flags.enable_autoplay);
        assert!(!flags.mute_autoplay);
        assert_eq!(flags.joined_flags(), "--autoplay-policy=no-user-gesture-required");
    }

    #[test]
    fn configured_flags_win() {
        let mut config = WebviewConfig::default();
        config.browser = Some(BrowserFlags {
            enable_autoplay: false,
            mute_autoplay: true,
            custom_flags: vec![],
        });
        assert!(!browser_flags(&config).enable_autoplay);
    }

    #[test]
    fn page_replaces_configured_url() {
        let mut config = WebviewConfig::default();
        config.window.url = Some("https://example.com".into());
        let window = window_config(&config);
        assert!(window.url.is_none());
        assert!(window.html.is_some());
    }
}
