use std::sync::Arc;

use tokio::runtime::Handle;
use webview_common::WindowId;
use webview_sys::{EntryPoints, NativeHandle};

use crate::dispatch::Dispatcher;
use crate::registry::LiveHandle;

/// Everything the registry owns for one window.
pub(crate) struct WindowCore {
    pub(crate) live: Arc<LiveHandle>,
    pub(crate) dispatch: Dispatcher,
}

impl WindowCore {
    pub(crate) fn new(
        id: WindowId,
        native: NativeHandle,
        table: Arc<EntryPoints>,
        runtime: &Handle,
    ) -> Self {
        let live = Arc::new(LiveHandle::new(id, native, table));
        let dispatch = Dispatcher::start(Arc::clone(&live), runtime);
        Self { live, dispatch }
    }

    pub(crate) fn id(&self) -> WindowId {
        self.live.id()
    }

    /// Destroy the native handle, then release the bindings.
    pub(crate) fn destroy(&self) -> bool {
        let destroyed = self.live.destroy();
        if destroyed {
            self.dispatch.close();
        }
        destroyed
    }
}
