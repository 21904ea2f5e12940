use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, info};
use webview_common::{BridgeError, Result, WindowId};
use webview_sys::{EntryPoints, NativeHandle};

#[derive(Debug, Default)]
struct LiveState {
    alive: bool,
    /// Native calls currently in progress.
    busy: usize,
    /// A blocking `webview_run` is among them.
    running: bool,
    /// `webview_destroy` has returned.
    destroyed: bool,
}

/// Exclusive owner of one native handle.
///
/// Every native call is bracketed by a liveness check: once [`destroy`]
/// starts, new calls fail with [`BridgeError::WindowDestroyed`], calls already
/// in progress are waited for, and `webview_destroy` runs exactly once.
/// Every `destroy` call returns only after the native handle is gone.
///
/// [`destroy`]: LiveHandle::destroy
pub(crate) struct LiveHandle {
    id: WindowId,
    native: NativeHandle,
    table: Arc<EntryPoints>,
    state: Mutex<LiveState>,
    idle: Condvar,
}

/// Decrements the busy count when a native call returns.
struct Busy<'a> {
    live: &'a LiveHandle,
    running: bool,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = self.live.lock();
        state.busy -= 1;
        if self.running {
            state.running = false;
        }
        drop(state);
        self.live.idle.notify_all();
    }
}

impl LiveHandle {
    pub(crate) fn new(id: WindowId, native: NativeHandle, table: Arc<EntryPoints>) -> Self {
        Self {
            id,
            native,
            table,
            state: Mutex::new(LiveState {
                alive: true,
                ..Default::default()
            }),
            idle: Condvar::new(),
        }
    }

    pub(crate) fn id(&self) -> WindowId {
        self.id
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.lock().alive
    }

    fn lock(&self) -> MutexGuard<'_, LiveState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, running: bool) -> Result<Busy<'_>> {
        let mut state = self.lock();
        if !state.alive {
            return Err(BridgeError::WindowDestroyed(self.id));
        }
        state.busy += 1;
        if running {
            state.running = true;
        }
        Ok(Busy {
            live: self,
            running,
        })
    }

    /// Run `f` against the native handle if it is still alive.
    ///
    /// `f` must not call back into this handle's `destroy`.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&EntryPoints, &NativeHandle) -> R) -> Result<R> {
        let _busy = self.enter(false)?;
        Ok(f(&self.table, &self.native))
    }

    /// The blocking native loop. Returns once the loop is terminated.
    pub(crate) fn run(&self) -> Result<()> {
        let _busy = self.enter(true)?;
        debug!(window = %self.id, "entering native loop");
        // SAFETY: the busy guard keeps the handle alive for the whole loop.
        unsafe { self.table.run(&self.native) };
        debug!(window = %self.id, "native loop returned");
        Ok(())
    }

    /// Tear down the native handle.
    ///
    /// Returns `true` for the call that actually destroyed it. Every later
    /// call, and any call racing with it, returns `false` without touching
    /// the native side, once the native destroy has completed.
    pub(crate) fn destroy(&self) -> bool {
        let mut state = self.lock();
        if !state.alive {
            while !state.destroyed {
                state = self.wait(state);
            }
            return false;
        }
        state.alive = false;

        if state.running {
            drop(state);
            debug!(window = %self.id, "terminating running loop before destroy");
            // SAFETY: `alive` is false, so no new call can start, and the
            // running loop holds the handle open until it returns.
            unsafe { self.table.terminate(&self.native) };
            state = self.lock();
        }

        while state.busy > 0 {
            state = self.wait(state);
        }
        drop(state);

        // SAFETY: no call is in progress and none can start again.
        unsafe { self.table.destroy(&self.native) };
        self.lock().destroyed = true;
        self.idle.notify_all();
        info!(window = %self.id, "window destroyed");
        true
    }

    fn wait<'a>(&self, state: MutexGuard<'a, LiveState>) -> MutexGuard<'a, LiveState> {
        self.idle.wait(state).unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for LiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveHandle")
            .field("id", &self.id)
            .field("native", &self.native)
            .finish_non_exhaustive()
    }
}
