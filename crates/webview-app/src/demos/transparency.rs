use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use webview_bridge::{Window, WebviewContext};
use webview_common::{BridgeError, Result};
use webview_config::{WebviewConfig, WindowConfig};

const HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    html, body { margin: 0; height: 100%; overflow: hidden; background: transparent;
                 font-family: -apple-system, "Segoe UI", Roboto, sans-serif; }
    .circle { position: fixed; top: 50%; left: 50%; width: 300px; height: 300px;
              transform: translate(-50%, -50%); border-radius: 50%;
              background: radial-gradient(circle, rgba(80,120,255,0.95), rgba(80,120,255,0) 70%);
              display: flex; flex-direction: column; align-items: center; justify-content: center;
              color: white; }
    button { margin: 4px; padding: 6px 12px; border: none; border-radius: 4px; cursor: pointer; }
  </style>
</head>
<body>
  <div class="circle">
    <button onclick="toggleClickThrough()">Toggle click-through</button>
    <button onclick="togglePixelTransparency()">Toggle transparency</button>
    <div id="status">Click-through: OFF | Pixel Transparency: OFF</div>
  </div>
</body>
</html>"#;

fn window_config(config: &WebviewConfig) -> WindowConfig {
    WindowConfig {
        title: "Pixel Transparency".into(),
        width: 500,
        height: 500,
        frame: false,
        always_on_top: true,
        pixel_transparency: false,
        click_through: false,
        html: Some(HTML.to_string()),
        url: None,
        ..config.window.clone()
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ON"
    } else {
        "OFF"
    }
}

fn status_script(click_through: bool, transparency: bool) -> String {
    let text = format!(
        "Click-through: {} | Pixel Transparency: {}",
        on_off(click_through),
        on_off(transparency)
    );
    format!(
        "document.getElementById('status').textContent = {};",
        json!(text)
    )
}

#[derive(Default)]
struct Toggles {
    click_through: AtomicBool,
    transparency: AtomicBool,
}

impl Toggles {
    fn refresh(&self, window: &Window) -> Result<()> {
        window.eval(&status_script(
            self.click_through.load(Ordering::SeqCst),
            self.transparency.load(Ordering::SeqCst),
        ))
    }
}

fn bind_toggles(window: &Window) -> Result<()> {
    let toggles = Arc::new(Toggles::default());

    let (w, t) = (window.clone(), Arc::clone(&toggles));
    window.bind_sync("toggleClickThrough", move |_args| {
        let enabled = !t.click_through.fetch_xor(true, Ordering::SeqCst);
        w.set_click_through(enabled)?;
        t.refresh(&w)?;
        tracing::info!("Click-through {}", if enabled { "enabled" } else { "disabled" });
        Ok::<_, BridgeError>(json!({ "clickThrough": enabled }))
    })?;

    let (w, t) = (window.clone(), toggles);
    window.bind_sync("togglePixelTransparency", move |_args| {
        let enabled = !t.transparency.fetch_xor(true, Ordering::SeqCst);
        w.set_pixel_transparency(enabled)?;
        t.refresh(&w)?;
        tracing::info!("Pixel transparency {}", if enabled { "enabled" } else { "disabled" });
        Ok::<_, BridgeError>(json!({ "pixelTransparency": enabled }))
    })?;

    Ok(())
}

/// Runs on a current-thread runtime so the toggles execute on the thread
/// that owns the window, between pump steps.
pub fn run(config: WebviewConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let ctx = WebviewContext::open(&config)?;
        let window = ctx.create_window(&window_config(&config))?;
        bind_toggles(&window)?;

        let interval = Duration::from_millis(u64::from(config.bridge.pump_interval_ms.max(1)));
        window.run_pumped(interval).await?;

        ctx.unload_all()
    })
}
