use webview_bridge::WebviewContext;
use webview_common::Result;
use webview_config::{WebviewConfig, WindowConfig};

const HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body { color: white; background: transparent; font-family: sans-serif; }
    </style>
</head>
<body>
    <h1>Hello from webview!</h1>
</body>
</html>"#;

/// Page content used when the config names neither a url nor html.
fn window_config(config: &WebviewConfig) -> WindowConfig {
    let mut window = config.window.clone();
    if window.url.is_none() && window.html.is_none() {
        window.html = Some(HTML.to_string());
    }
    window
}

pub fn run(config: WebviewConfig) -> Result<()> {
    let ctx = WebviewContext::open(&config)?;
    let window = ctx.create_window(&window_config(&config))?;

    window.run()?;

    ctx.unload_all()
}
