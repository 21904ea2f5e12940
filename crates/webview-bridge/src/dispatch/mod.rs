//! Page-to-host function calls.
//!
//! The native engine reports an invocation of a bound name by calling
//! [`trampoline`] on its own thread with a request id, the JSON argument array
//! and the user-data pointer given at bind time. The trampoline never runs
//! host code: it resolves the name, decodes the arguments and enqueues the
//! request for the window's dispatcher task, which starts host functions in
//! arrival order on the tokio runtime. Each completion is delivered back
//! through `webview_return` independently, so results may settle out of order;
//! the page correlates them by request id.
//!
//! Each bound name gets one heap-pinned [`BindingSlot`] that serves as the
//! bind user data. Slots outlive `unbind` and are only released after the
//! native handle is destroyed, since the engine may still fire a callback for
//! a name it has just been told to forget.

use std::collections::{HashMap, HashSet};
use std::ffi::{c_char, c_void};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use webview_common::{BridgeError, InvocationError, Result, WindowId};
use webview_sys::{decode_args, decode_text};

use crate::registry::LiveHandle;

mod deliver;
mod host;

pub(crate) use deliver::deliver_result;
pub use host::HostFuture;
pub(crate) use host::{from_async, from_sync, HostFn};

/// One invocation waiting for the dispatcher.
struct Request {
    id: String,
    name: String,
    call: std::result::Result<(HostFn, Vec<Value>), InvocationError>,
}

/// State reachable from the native callback.
struct Shared {
    window: WindowId,
    functions: Mutex<HashMap<String, HostFn>>,
    queue: Mutex<Option<mpsc::UnboundedSender<Request>>>,
}

impl Shared {
    fn functions(&self) -> MutexGuard<'_, HashMap<String, HostFn>> {
        self.functions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enqueue(&self, request: Request) {
        let queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        match queue.as_ref() {
            Some(tx) => {
                if tx.send(request).is_err() {
                    warn!(window = %self.window, "dispatcher stopped, dropping request");
                }
            }
            None => debug!(
                window = %self.window,
                request_id = %request.id,
                "window closing, dropping request"
            ),
        }
    }
}

/// Bind user data for one name.
pub(crate) struct BindingSlot {
    name: String,
    shared: Arc<Shared>,
}

impl BindingSlot {
    fn receive(&self, id: String, req: &str) {
        let host = self.shared.functions().get(&self.name).cloned();
        let call = host
            .ok_or_else(|| InvocationError::UnknownFunction(self.name.clone()))
            .and_then(|host| decode_args(req).map(|args| (host, args)));
        debug!(
            window = %self.shared.window,
            request_id = %id,
            name = %self.name,
            "invocation received"
        );
        self.shared.enqueue(Request {
            id,
            name: self.name.clone(),
            call,
        });
    }
}

/// The single native callback installed for every bound name.
///
/// # Safety
/// `arg` must be null or a pointer to a [`BindingSlot`] that is still alive.
pub(crate) unsafe extern "C" fn trampoline(id: *const c_char, req: *const c_char, arg: *mut c_void) {
    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
        if arg.is_null() {
            warn!("native callback fired without binding data");
            return;
        }
        let slot = &*(arg as *const BindingSlot);
        let Some(id) = decode_text(id) else {
            warn!(name = %slot.name, "native callback fired without a request id");
            return;
        };
        let req = decode_text(req).unwrap_or_default();
        slot.receive(id, &req);
    }));
    if outcome.is_err() {
        error!("panic inside native callback suppressed");
    }
}

#[derive(Default)]
struct Slots {
    by_name: HashMap<String, Box<BindingSlot>>,
    /// Names the native side currently knows about.
    native_bound: HashSet<String>,
}

/// Per-window binding table and ordered request queue.
pub(crate) struct Dispatcher {
    shared: Arc<Shared>,
    slots: Mutex<Slots>,
}

impl Dispatcher {
    /// Create the dispatcher and start its task on `runtime`.
    pub(crate) fn start(live: Arc<LiveHandle>, runtime: &Handle) -> Self {
        let window = live.id();
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_queue(live, rx));
        Self {
            shared: Arc::new(Shared {
                window,
                functions: Mutex::new(HashMap::new()),
                queue: Mutex::new(Some(tx)),
            }),
            slots: Mutex::new(Slots::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `host` under `name`, replacing any earlier function.
    ///
    /// The native side is only told about the name when it does not already
    /// know it, so rebinding a live name never touches the engine.
    pub(crate) fn bind(&self, live: &LiveHandle, name: &str, host: HostFn) -> Result<()> {
        let mut slots = self.slots();
        if !live.is_alive() {
            return Err(BridgeError::WindowDestroyed(live.id()));
        }

        let replaced = self
            .shared
            .functions()
            .insert(name.to_string(), host)
            .is_some();

        if !slots.native_bound.contains(name) {
            let shared = Arc::clone(&self.shared);
            let slot = slots
                .by_name
                .entry(name.to_string())
                .or_insert_with(|| {
                    Box::new(BindingSlot {
                        name: name.to_string(),
                        shared,
                    })
                });
            let arg = &**slot as *const BindingSlot as *mut c_void;
            let bound = live.with(|table, handle| {
                // SAFETY: the slot is boxed and kept in `slots` until after the
                // handle is destroyed.
                unsafe { table.bind(handle, name, trampoline, arg) }
            });
            if let Err(e) = bound {
                self.shared.functions().remove(name);
                return Err(e);
            }
            slots.native_bound.insert(name.to_string());
        }

        debug!(window = %live.id(), name, replaced, "function bound");
        Ok(())
    }

    /// Remove `name`. Returns whether it was bound.
    ///
    /// Requests already received for `name` still complete.
    pub(crate) fn unbind(&self, live: &LiveHandle, name: &str) -> Result<bool> {
        let mut slots = self.slots();
        let removed = self.shared.functions().remove(name).is_some();
        if slots.native_bound.remove(name) {
            live.with(|table, handle| {
                // SAFETY: `with` holds the handle open for the duration of the call.
                unsafe { table.unbind(handle, name) }
            })?;
        }
        if removed {
            debug!(window = %live.id(), name, "function unbound");
        }
        Ok(removed)
    }

    /// Currently bound names, sorted.
    pub(crate) fn bound_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shared.functions().keys().cloned().collect();
        names.sort();
        names
    }

    /// A slot for `name` that was never handed to the native side.
    #[cfg(test)]
    pub(crate) fn detached_slot(&self, name: &str) -> Box<BindingSlot> {
        Box::new(BindingSlot {
            name: name.to_string(),
            shared: Arc::clone(&self.shared),
        })
    }

    /// Stop accepting requests and release every binding.
    ///
    /// Only called once the native handle is destroyed, so no callback can
    /// reach a released slot.
    pub(crate) fn close(&self) {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.shared.functions().clear();
        let mut slots = self.slots();
        slots.native_bound.clear();
        slots.by_name.clear();
    }
}

/// Drain the window's queue in arrival order until the window closes.
async fn run_queue(live: Arc<LiveHandle>, mut rx: mpsc::UnboundedReceiver<Request>) {
    while let Some(request) = rx.recv().await {
        let Request { id, name, call } = request;
        match call {
            Ok((host, args)) => {
                debug!(window = %live.id(), request_id = %id, name = %name, "dispatching");
                let pending = host::invoke(&host, args);
                let live = Arc::clone(&live);
                tokio::spawn(async move {
                    let outcome = pending.await;
                    deliver_result(&live, &id, outcome);
                });
            }
            Err(err) => deliver_result(&live, &id, Err(err)),
        }
    }
    debug!(window = %live.id(), "dispatcher stopped");
}
