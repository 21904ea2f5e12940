//! Tracking of every live window.
//!
//! A window is registered from the moment its native handle is created until
//! its destruction completes. Destroying through the registry is idempotent:
//! an id that is no longer registered is a no-op.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};
use webview_common::WindowId;

use crate::window::WindowCore;

mod live;

pub(crate) use live::LiveHandle;

pub struct HandleRegistry {
    next_id: AtomicU32,
    windows: Mutex<HashMap<WindowId, Arc<WindowCore>>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WindowId, Arc<WindowCore>>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reserve the id for a window about to be created.
    pub fn allocate_id(&self) -> WindowId {
        WindowId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn register(&self, core: Arc<WindowCore>) {
        let id = core.id();
        self.lock().insert(id, core);
        debug!(window = %id, "window registered");
    }

    /// Remove `id` without destroying it. Returns the entry if it was present.
    pub(crate) fn unregister(&self, id: WindowId) -> Option<Arc<WindowCore>> {
        let removed = self.lock().remove(&id);
        if removed.is_some() {
            debug!(window = %id, "window unregistered");
        }
        removed
    }

    pub(crate) fn get(&self, id: WindowId) -> Option<Arc<WindowCore>> {
        self.lock().get(&id).cloned()
    }

    /// Destroy and unregister `id`.
    ///
    /// Returns `false` if the window was already gone.
    pub fn destroy(&self, id: WindowId) -> bool {
        // The entry stays registered until the native destroy has returned.
        let Some(core) = self.get(id) else {
            return false;
        };
        // Returns once the native handle is gone, even for the losing caller.
        let destroyed = core.destroy();
        self.unregister(id);
        destroyed
    }

    /// Destroy every registered window. Returns how many were destroyed.
    pub fn destroy_all(&self) -> usize {
        let ids = self.ids();
        if ids.is_empty() {
            return 0;
        }
        info!(count = ids.len(), "destroying all windows");
        ids.into_iter().filter(|id| self.destroy(*id)).count()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.lock().keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
