//! The process-wide bridge context.
//!
//! Initialization and teardown order is explicit: open the library, create
//! windows, destroy windows, unload. A [`WebviewContext`] is created once and
//! passed by reference; nothing about it is global.
//!
//! Windows keep the entry-point table alive through an `Arc`, so the library
//! is only closed once the context has been unloaded and the last window
//! facade has been dropped. A stray facade can therefore never call into an
//! unloaded library; it only sees [`BridgeError::WindowDestroyed`].

use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::{Handle, Runtime};
use tracing::{debug, info, warn};
use webview_common::{BridgeError, NativeError, Result, ShutdownError, WindowId};
use webview_config::{BridgeConfig, BrowserConfig, WebviewConfig, WindowConfig};
use webview_sys::{locate, EntryPoints, LibrarySearch, OptionalFeature, SymbolSource};

use crate::registry::HandleRegistry;
use crate::window::{Window, WindowCore};

/// Where bound functions run.
struct DispatchRuntime {
    handle: Handle,
    /// Present when no runtime was current at construction.
    owned: Mutex<Option<Runtime>>,
}

impl DispatchRuntime {
    fn new(config: &BridgeConfig) -> Result<Self> {
        if let Ok(handle) = Handle::try_current() {
            debug!("dispatching on the caller's tokio runtime");
            return Ok(Self {
                handle,
                owned: Mutex::new(None),
            });
        }

        let workers = config.worker_threads.max(1) as usize;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("webview-dispatch")
            .enable_all()
            .build()?;
        debug!(workers, "started dispatch runtime");
        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Mutex::new(Some(runtime)),
        })
    }

    fn shutdown(&self) {
        let owned = self.owned.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(runtime) = owned {
            runtime.shutdown_background();
            debug!("dispatch runtime shut down");
        }
    }
}

struct ContextInner {
    table: Mutex<Option<Arc<EntryPoints>>>,
    registry: Arc<HandleRegistry>,
    runtime: DispatchRuntime,
    browser: Mutex<Option<BrowserConfig>>,
    unloaded: AtomicBool,
}

impl ContextInner {
    fn table(&self) -> MutexGuard<'_, Option<Arc<EntryPoints>>> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        if !self.unloaded.load(Ordering::Acquire) {
            let remaining = self.registry.len();
            if remaining > 0 {
                warn!(remaining, "context dropped with live windows, destroying them");
                self.registry.destroy_all();
            }
        }
        self.runtime.shutdown();
    }
}

/// Owner of the loaded library, the window registry and the dispatch runtime.
#[derive(Clone)]
pub struct WebviewContext {
    inner: Arc<ContextInner>,
}

impl WebviewContext {
    /// Locate and open the native library described by `config`.
    pub fn open(config: &WebviewConfig) -> Result<Self> {
        let search = LibrarySearch {
            explicit: config.library.path.clone(),
            use_env_override: config.library.use_env_override,
            search_dirs: config.library.search_dirs.clone(),
        };
        let path = locate(&search);
        let table = EntryPoints::open(&path)?;
        Self::with_table(table, &config.bridge, config.browser.clone())
    }

    /// Build a context over an already opened symbol source.
    pub fn from_source(source: Arc<dyn SymbolSource>, bridge: &BridgeConfig) -> Result<Self> {
        let table = EntryPoints::resolve(source)?;
        Self::with_table(table, bridge, None)
    }

    fn with_table(
        table: EntryPoints,
        bridge: &BridgeConfig,
        browser: Option<BrowserConfig>,
    ) -> Result<Self> {
        let runtime = DispatchRuntime::new(bridge)?;
        info!(library = %table.describe(), "webview context ready");
        Ok(Self {
            inner: Arc::new(ContextInner {
                table: Mutex::new(Some(Arc::new(table))),
                registry: Arc::new(HandleRegistry::new()),
                runtime,
                browser: Mutex::new(browser),
                unloaded: AtomicBool::new(false),
            }),
        })
    }

    /// Browser flags applied to every new window.
    pub fn with_browser_flags(self, browser: BrowserConfig) -> Self {
        self.set_browser_flags(Some(browser));
        self
    }

    /// Replace the browser flags for windows created from now on, across
    /// every clone of this context. `None` leaves engine defaults alone.
    pub fn set_browser_flags(&self, browser: Option<BrowserConfig>) {
        *self.inner.browser.lock().unwrap_or_else(|e| e.into_inner()) = browser;
    }

    /// Create a window and apply `config` to it.
    pub fn create_window(&self, config: &WindowConfig) -> Result<Window> {
        // Held until the window is registered so `unload` cannot slip in between.
        let guard = self.inner.table();
        let table = guard.clone().ok_or(BridgeError::Unloaded)?;

        // SAFETY: a null parent asks the engine to create its own window.
        let native =
            unsafe { table.create(config.debug, ptr::null_mut()) }.ok_or(NativeError::CreateFailed)?;

        let registry = &self.inner.registry;
        let id = registry.allocate_id();
        let core = Arc::new(WindowCore::new(id, native, table, &self.inner.runtime.handle));
        registry.register(Arc::clone(&core));
        drop(guard);
        let window = Window::new(core, Arc::clone(registry));

        let configured = self.configure(&window, config);
        if let Err(e) = configured {
            warn!(window = %id, error = %e, "window configuration failed, destroying");
            window.destroy();
            return Err(e);
        }

        info!(window = %id, title = %config.title, "window created");
        Ok(window)
    }

    fn configure(&self, window: &Window, config: &WindowConfig) -> Result<()> {
        let browser = self
            .inner
            .browser
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(browser) = &browser {
            window.set_browser_flags(browser)?;
        }
        window.apply(config)
    }

    /// The window registered under `id`, if it is still alive.
    pub fn window(&self, id: WindowId) -> Option<Window> {
        let core = self.inner.registry.get(id)?;
        Some(Window::new(core, Arc::clone(&self.inner.registry)))
    }

    /// Every live window of this context.
    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.inner.registry
    }

    pub fn window_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Whether the loaded library exports `feature`. `false` after unload.
    pub fn supports(&self, feature: OptionalFeature) -> bool {
        self.inner
            .table()
            .as_ref()
            .is_some_and(|table| table.supports(feature))
    }

    pub fn is_unloaded(&self) -> bool {
        self.inner.unloaded.load(Ordering::Acquire)
    }

    /// Release the library.
    ///
    /// Fails with [`ShutdownError`] and changes nothing while any window is
    /// still registered, and with [`BridgeError::Unloaded`] when called twice.
    pub fn unload(&self) -> Result<()> {
        let mut table = self.inner.table();
        if table.is_none() {
            return Err(BridgeError::Unloaded);
        }
        let remaining = self.inner.registry.len();
        if remaining > 0 {
            return Err(ShutdownError { remaining }.into());
        }
        table.take();
        drop(table);

        self.inner.unloaded.store(true, Ordering::Release);
        self.inner.runtime.shutdown();
        info!("webview context unloaded");
        Ok(())
    }

    /// Destroy every outstanding window, then release the library.
    pub fn unload_all(&self) -> Result<()> {
        if self.is_unloaded() {
            return Err(BridgeError::Unloaded);
        }
        let destroyed = self.inner.registry.destroy_all();
        debug!(destroyed, "windows destroyed before unload");
        self.unload()
    }
}
