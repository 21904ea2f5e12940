//! The per-window facade.
//!
//! A [`Window`] is a cheap, cloneable reference to one registered window.
//! Every method checks liveness first: once the window is destroyed, calls
//! fail with [`BridgeError::WindowDestroyed`] instead of reaching the native
//! library.
//!
//! The native engine expects most calls on the thread that created the
//! window. [`Window::run`] blocks that thread; inside an async application,
//! use [`Window::run_pumped`] so bound functions can make progress between
//! pump steps.

use std::ffi::c_void;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use webview_common::{BridgeError, NativeError, Result, SizeHint, WindowId};
use webview_config::{BrowserConfig, WindowConfig};
use webview_sys::OptionalFeature;

use crate::dispatch::{from_async, from_sync};
use crate::registry::HandleRegistry;

mod inner;

pub(crate) use inner::WindowCore;

#[derive(Clone)]
pub struct Window {
    core: Arc<WindowCore>,
    registry: Arc<HandleRegistry>,
}

impl Window {
    pub(crate) fn new(core: Arc<WindowCore>, registry: Arc<HandleRegistry>) -> Self {
        Self { core, registry }
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &Arc<WindowCore> {
        &self.core
    }

    pub fn id(&self) -> WindowId {
        self.core.id()
    }

    /// False once [`Window::destroy`] has started.
    pub fn is_alive(&self) -> bool {
        self.core.live.is_alive()
    }

    /// Apply a window configuration: appearance first, then startup scripts,
    /// then content.
    pub fn apply(&self, config: &WindowConfig) -> Result<()> {
        self.set_title(&config.title)?;
        self.set_size(config.width, config.height, config.size_hint)?;
        self.set_frame(config.frame)?;
        self.set_opacity(config.opacity)?;
        self.set_pixel_transparency(config.pixel_transparency)?;
        self.set_always_on_top(config.always_on_top)?;
        self.set_click_through(config.click_through)?;
        for script in &config.init_scripts {
            self.init(script)?;
        }
        if let Some(url) = &config.url {
            self.navigate(url)?;
        } else if let Some(html) = &config.html {
            self.set_html(html)?;
        }
        Ok(())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn set_title(&self, title: &str) -> Result<()> {
        // SAFETY (all calls below): `with` holds the handle open for the call.
        self.core
            .live
            .with(|t, h| unsafe { t.set_title(h, title) })
    }

    pub fn set_size(&self, width: u32, height: u32, hint: SizeHint) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_size(h, width, height, hint) })
    }

    /// Show or hide the native title bar and border.
    pub fn set_frame(&self, visible: bool) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_frame(h, visible) })
    }

    /// Window opacity, clamped to `0.0..=1.0`.
    pub fn set_opacity(&self, opacity: f64) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_opacity(h, opacity) })
    }

    /// Per-pixel transparency. A no-op on backends without it.
    pub fn set_pixel_transparency(&self, enabled: bool) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_pixel_transparency(h, enabled) })
    }

    pub fn set_always_on_top(&self, enabled: bool) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_always_on_top(h, enabled) })
    }

    /// Let mouse input fall through the window. A no-op on backends without it.
    pub fn set_click_through(&self, enabled: bool) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_click_through(h, enabled) })
    }

    /// Configure autoplay and raw engine switches.
    ///
    /// Returns `Ok(false)` without calling anything when the loaded library
    /// predates browser flags.
    pub fn set_browser_flags(&self, flags: &BrowserConfig) -> Result<bool> {
        let joined = flags.joined_flags();
        let applied = self.core.live.with(|t, h| unsafe {
            t.set_browser_flags(h, flags.enable_autoplay, flags.mute_autoplay, &joined)
        })?;
        match applied {
            Ok(()) => Ok(true),
            Err(NativeError::Unsupported(symbol)) => {
                debug!(window = %self.id(), symbol, "browser flags unsupported, skipped");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the loaded library exports `feature`.
    pub fn supports(&self, feature: OptionalFeature) -> Result<bool> {
        self.core.live.with(|t, _| t.supports(feature))
    }

    /// The platform window behind this webview (`HWND`, `GtkWindow*` or
    /// `NSWindow*`).
    pub fn native_window(&self) -> Result<*mut c_void> {
        self.core
            .live
            .with(|t, h| unsafe { t.get_window(h) })
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn navigate(&self, url: &str) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.navigate(h, url) })
    }

    /// Replace the page with `html`.
    pub fn set_html(&self, html: &str) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.set_html(h, html) })
    }

    /// Inject `js` before every future page load.
    pub fn init(&self, js: &str) -> Result<()> {
        self.core.live.with(|t, h| unsafe { t.init(h, js) })
    }

    /// Evaluate `js` in the current page. The result is discarded.
    pub fn eval(&self, js: &str) -> Result<()> {
        self.core.live.with(|t, h| unsafe { t.eval(h, js) })
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Expose an async host function to the page as `window.<name>(...)`.
    ///
    /// The page receives a promise that resolves with the serialized `Ok`
    /// value or rejects with the `Err` message. Binding an existing name
    /// replaces its function.
    pub fn bind<F, Fut, T, E>(&self, name: &str, f: F) -> Result<()>
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Serialize + 'static,
        E: std::fmt::Display + 'static,
    {
        self.core
            .dispatch
            .bind(&self.core.live, name, from_async(f))
    }

    /// Like [`Window::bind`] for functions that return immediately. They run
    /// on the dispatcher task, so keep them short.
    pub fn bind_sync<F, T, E>(&self, name: &str, f: F) -> Result<()>
    where
        F: Fn(Vec<Value>) -> std::result::Result<T, E> + Send + Sync + 'static,
        T: Serialize + 'static,
        E: std::fmt::Display + 'static,
    {
        self.core
            .dispatch
            .bind(&self.core.live, name, from_sync(f))
    }

    /// Returns whether `name` was bound.
    pub fn unbind(&self, name: &str) -> Result<bool> {
        self.core.dispatch.unbind(&self.core.live, name)
    }

    pub fn bound_names(&self) -> Vec<String> {
        self.core.dispatch.bound_names()
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Run the native loop until [`Window::terminate`] is called.
    pub fn run(&self) -> Result<()> {
        self.core.live.run()
    }

    /// One iteration of the native loop. Returns whether the loop should
    /// keep going.
    pub fn run_step(&self, wait_for_event: bool) -> Result<bool> {
        self.core
            .live
            .with(|t, h| unsafe { t.pump(h, wait_for_event) })
    }

    /// Drive the native loop from the tokio timer, one non-blocking step per
    /// `interval`, until it reports it should stop or the window is destroyed.
    pub async fn run_pumped(&self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.run_step(false) {
                Ok(true) => {}
                Ok(false) => break,
                Err(BridgeError::WindowDestroyed(_)) => break,
                Err(e) => return Err(e),
            }
        }
        debug!(window = %self.id(), "pumped loop finished");
        Ok(())
    }

    /// Ask the running loop to return.
    pub fn terminate(&self) -> Result<()> {
        self.core
            .live
            .with(|t, h| unsafe { t.terminate(h) })
    }

    /// Destroy the window and unregister it.
    ///
    /// A running loop is terminated first. Returns `true` for the call that
    /// destroyed the window and `false` for every later call. A call racing
    /// with the destroying one blocks until the native handle is gone.
    pub fn destroy(&self) -> bool {
        let destroyed = self.core.destroy();
        self.registry.unregister(self.id());
        destroyed
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id())
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests;
