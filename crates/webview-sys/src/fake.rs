//! An in-process stand-in for the native library.
//!
//! [`FakeLibrary`] resolves every entry point to a Rust `extern "C"` function
//! that records what it was asked to do on a [`FakeWebview`]. Tests drive the
//! page side through [`FakeWebview::simulate_invoke`] and observe results
//! through [`FakeWebview::wait_for_returns`].

use std::collections::{HashMap, HashSet};
use std::ffi::{c_char, c_int, c_void, CString};
use std::ptr::NonNull;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::codec::decode_text;
use crate::ffi::{self, BindCallback, RawHandle};
use crate::handle::NativeHandle;
use crate::library::SymbolSource;

/// A recorded native call.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    SetTitle(String),
    SetSize { width: i32, height: i32, hint: i32 },
    Navigate(String),
    SetHtml(String),
    Init(String),
    Eval(String),
    SetFrame(bool),
    SetOpacity(f64),
    SetPixelTransparency(bool),
    SetAlwaysOnTop(bool),
    SetClickThrough(bool),
    Bind(String),
    Unbind(String),
    BrowserFlags {
        enable_autoplay: bool,
        mute_autoplay: bool,
        custom_flags: String,
    },
    Run,
    Terminate,
}

/// One `webview_return` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeReturn {
    pub id: String,
    pub status: c_int,
    pub result: String,
}

impl FakeReturn {
    pub fn is_success(&self) -> bool {
        self.status == ffi::RETURN_SUCCESS
    }
}

#[derive(Clone, Copy)]
struct Binding {
    callback: BindCallback,
    arg: usize,
}

#[derive(Default)]
struct State {
    calls: Vec<FakeCall>,
    returns: Vec<FakeReturn>,
    bindings: HashMap<String, Binding>,
    stale: HashMap<String, Binding>,
    running: bool,
    terminated: bool,
    pumps: usize,
    destroyed: usize,
}

/// One fake engine instance. Its address is the native handle.
pub struct FakeWebview {
    debug: bool,
    state: Mutex<State>,
    changed: Condvar,
}

impl FakeWebview {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The instance behind `handle`.
    pub fn from_handle(handle: &NativeHandle) -> Arc<Self> {
        // SAFETY: fake handles come from `Arc::into_raw` in `fake_create` and
        // are never released, so bumping the count and re-wrapping is sound.
        unsafe { Self::from_raw(handle.as_raw()) }
    }

    /// The instance behind a pointer returned by `webview_get_window`.
    pub fn from_window(window: *mut c_void) -> Option<Arc<Self>> {
        if window.is_null() {
            return None;
        }
        // SAFETY: the fake's native window is its own handle address.
        Some(unsafe { Self::from_raw(window) })
    }

    unsafe fn from_raw(raw: RawHandle) -> Arc<Self> {
        let ptr = raw as *const FakeWebview;
        Arc::increment_strong_count(ptr);
        Arc::from_raw(ptr)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn returns(&self) -> Vec<FakeReturn> {
        self.lock().returns.clone()
    }

    /// Names currently bound.
    pub fn bound_names(&self) -> HashSet<String> {
        self.lock().bindings.keys().cloned().collect()
    }

    pub fn destroy_count(&self) -> usize {
        self.lock().destroyed
    }

    pub fn is_terminated(&self) -> bool {
        self.lock().terminated
    }

    pub fn pump_count(&self) -> usize {
        self.lock().pumps
    }

    /// Fire the callback bound to `name` as the page would.
    ///
    /// Returns `false` when nothing is bound under that name.
    pub fn simulate_invoke(&self, name: &str, id: &str, req: &str) -> bool {
        let binding = self.lock().bindings.get(name).copied();
        Self::fire(binding, id, req)
    }

    /// Fire the callback `name` had before it was unbound, as a late call
    /// already in flight inside the engine would.
    pub fn simulate_stale_invoke(&self, name: &str, id: &str, req: &str) -> bool {
        let binding = self.lock().stale.get(name).copied();
        Self::fire(binding, id, req)
    }

    fn fire(binding: Option<Binding>, id: &str, req: &str) -> bool {
        let Some(binding) = binding else {
            return false;
        };
        let (Ok(id), Ok(req)) = (CString::new(id), CString::new(req)) else {
            return false;
        };
        // SAFETY: the callback and its argument were handed to `webview_bind`
        // by the code under test, which keeps the argument alive until destroy.
        unsafe { (binding.callback)(id.as_ptr(), req.as_ptr(), binding.arg as *mut c_void) };
        true
    }

    /// Block until at least `count` results were returned or `timeout` passes.
    pub fn wait_for_returns(&self, count: usize, timeout: Duration) -> Vec<FakeReturn> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.returns.len() < count {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            state = match self.changed.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
        state.returns.clone()
    }

    /// Block until `webview_run` has been entered or `timeout` passes.
    pub fn wait_until_running(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while !state.running {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = match self.changed.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
        true
    }

    fn record(&self, call: FakeCall) {
        self.lock().calls.push(call);
        self.changed.notify_all();
    }
}

unsafe fn fake<'a>(handle: RawHandle) -> &'a FakeWebview {
    &*(handle as *const FakeWebview)
}

unsafe fn text(ptr: *const c_char) -> String {
    decode_text(ptr).unwrap_or_default()
}

unsafe extern "C" fn fake_create(debug: c_int, _window: *mut c_void) -> RawHandle {
    let webview = Arc::new(FakeWebview {
        debug: debug != 0,
        state: Mutex::new(State::default()),
        changed: Condvar::new(),
    });
    Arc::into_raw(webview) as RawHandle
}

unsafe extern "C" fn fake_destroy(h: RawHandle) {
    let fake = fake(h);
    fake.lock().destroyed += 1;
    fake.changed.notify_all();
}

unsafe extern "C" fn fake_run(h: RawHandle) {
    let fake = fake(h);
    let mut state = fake.lock();
    state.calls.push(FakeCall::Run);
    state.running = true;
    fake.changed.notify_all();
    while !state.terminated {
        state = match fake.changed.wait(state) {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        };
    }
    state.running = false;
}

unsafe extern "C" fn fake_terminate(h: RawHandle) {
    let fake = fake(h);
    let mut state = fake.lock();
    state.calls.push(FakeCall::Terminate);
    state.terminated = true;
    drop(state);
    fake.changed.notify_all();
}

unsafe extern "C" fn fake_get_window(h: RawHandle) -> *mut c_void {
    h
}

unsafe extern "C" fn fake_set_title(h: RawHandle, title: *const c_char) {
    fake(h).record(FakeCall::SetTitle(text(title)));
}

unsafe extern "C" fn fake_set_size(h: RawHandle, width: c_int, height: c_int, hint: c_int) {
    fake(h).record(FakeCall::SetSize {
        width,
        height,
        hint,
    });
}

unsafe extern "C" fn fake_navigate(h: RawHandle, url: *const c_char) {
    fake(h).record(FakeCall::Navigate(text(url)));
}

unsafe extern "C" fn fake_set_html(h: RawHandle, html: *const c_char) {
    fake(h).record(FakeCall::SetHtml(text(html)));
}

unsafe extern "C" fn fake_init(h: RawHandle, js: *const c_char) {
    fake(h).record(FakeCall::Init(text(js)));
}

unsafe extern "C" fn fake_eval(h: RawHandle, js: *const c_char) {
    fake(h).record(FakeCall::Eval(text(js)));
}

unsafe extern "C" fn fake_set_frame(h: RawHandle, enabled: c_int) {
    fake(h).record(FakeCall::SetFrame(enabled != 0));
}

unsafe extern "C" fn fake_set_opacity(h: RawHandle, opacity: f64) {
    fake(h).record(FakeCall::SetOpacity(opacity));
}

unsafe extern "C" fn fake_set_pixel_transparency(h: RawHandle, enabled: c_int) {
    fake(h).record(FakeCall::SetPixelTransparency(enabled != 0));
}

unsafe extern "C" fn fake_set_always_on_top(h: RawHandle, enabled: c_int) {
    fake(h).record(FakeCall::SetAlwaysOnTop(enabled != 0));
}

unsafe extern "C" fn fake_set_click_through(h: RawHandle, enabled: c_int) {
    fake(h).record(FakeCall::SetClickThrough(enabled != 0));
}

unsafe extern "C" fn fake_bind(
    h: RawHandle,
    name: *const c_char,
    callback: BindCallback,
    arg: *mut c_void,
) {
    let fake = fake(h);
    let name = text(name);
    let mut state = fake.lock();
    state.stale.remove(&name);
    state.bindings.insert(
        name.clone(),
        Binding {
            callback,
            arg: arg as usize,
        },
    );
    state.calls.push(FakeCall::Bind(name));
}

unsafe extern "C" fn fake_unbind(h: RawHandle, name: *const c_char) {
    let fake = fake(h);
    let name = text(name);
    let mut state = fake.lock();
    if let Some(binding) = state.bindings.remove(&name) {
        state.stale.insert(name.clone(), binding);
    }
    state.calls.push(FakeCall::Unbind(name));
}

unsafe extern "C" fn fake_return(h: RawHandle, id: *const c_char, status: c_int, result: *const c_char) {
    let fake = fake(h);
    fake.lock().returns.push(FakeReturn {
        id: text(id),
        status,
        result: text(result),
    });
    fake.changed.notify_all();
}

unsafe extern "C" fn fake_pump(h: RawHandle, _blocking: c_int) -> c_int {
    let fake = fake(h);
    let mut state = fake.lock();
    state.pumps += 1;
    c_int::from(!state.terminated)
}

unsafe extern "C" fn fake_set_browser_flags(
    h: RawHandle,
    enable_autoplay: c_int,
    mute_autoplay: c_int,
    custom_flags: *const c_char,
) {
    fake(h).record(FakeCall::BrowserFlags {
        enable_autoplay: enable_autoplay != 0,
        mute_autoplay: mute_autoplay != 0,
        custom_flags: text(custom_flags),
    });
}

fn entry_points() -> Vec<(&'static str, *mut c_void)> {
    vec![
        (ffi::WEBVIEW_CREATE, fake_create as ffi::CreateFn as *mut c_void),
        (ffi::WEBVIEW_DESTROY, fake_destroy as ffi::DestroyFn as *mut c_void),
        (ffi::WEBVIEW_RUN, fake_run as ffi::RunFn as *mut c_void),
        (ffi::WEBVIEW_TERMINATE, fake_terminate as ffi::TerminateFn as *mut c_void),
        (ffi::WEBVIEW_GET_WINDOW, fake_get_window as ffi::GetWindowFn as *mut c_void),
        (ffi::WEBVIEW_SET_TITLE, fake_set_title as ffi::SetTitleFn as *mut c_void),
        (ffi::WEBVIEW_SET_SIZE, fake_set_size as ffi::SetSizeFn as *mut c_void),
        (ffi::WEBVIEW_NAVIGATE, fake_navigate as ffi::NavigateFn as *mut c_void),
        (ffi::WEBVIEW_SET_HTML, fake_set_html as ffi::SetHtmlFn as *mut c_void),
        (ffi::WEBVIEW_INIT, fake_init as ffi::InitFn as *mut c_void),
        (ffi::WEBVIEW_EVAL, fake_eval as ffi::EvalFn as *mut c_void),
        (ffi::WEBVIEW_SET_FRAME, fake_set_frame as ffi::SetFlagFn as *mut c_void),
        (ffi::WEBVIEW_SET_OPACITY, fake_set_opacity as ffi::SetOpacityFn as *mut c_void),
        (
            ffi::WEBVIEW_SET_PIXEL_TRANSPARENCY,
            fake_set_pixel_transparency as ffi::SetFlagFn as *mut c_void,
        ),
        (
            ffi::WEBVIEW_SET_ALWAYS_ON_TOP,
            fake_set_always_on_top as ffi::SetFlagFn as *mut c_void,
        ),
        (
            ffi::WEBVIEW_SET_CLICK_THROUGH,
            fake_set_click_through as ffi::SetFlagFn as *mut c_void,
        ),
        (ffi::WEBVIEW_BIND, fake_bind as ffi::BindFn as *mut c_void),
        (ffi::WEBVIEW_UNBIND, fake_unbind as ffi::UnbindFn as *mut c_void),
        (ffi::WEBVIEW_RETURN, fake_return as ffi::ReturnFn as *mut c_void),
        (ffi::WEBVIEW_PUMP_MSGLOOP, fake_pump as ffi::PumpFn as *mut c_void),
        (
            ffi::WEBVIEW_SET_BROWSER_FLAGS,
            fake_set_browser_flags as ffi::SetBrowserFlagsFn as *mut c_void,
        ),
    ]
}

/// A symbol table backed by the fake engine.
pub struct FakeLibrary {
    symbols: HashMap<&'static str, usize>,
    lookups: Mutex<HashMap<String, usize>>,
}

impl Default for FakeLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLibrary {
    /// A library exporting every required and optional entry point.
    pub fn new() -> Self {
        Self {
            symbols: entry_points()
                .into_iter()
                .map(|(name, ptr)| (name, ptr as usize))
                .collect(),
            lookups: Mutex::new(HashMap::new()),
        }
    }

    /// Drop `name` from the export table.
    pub fn without(mut self, name: &str) -> Self {
        self.symbols.remove(name);
        self
    }

    /// How many times `name` has been resolved.
    pub fn lookups(&self, name: &str) -> usize {
        self.lookups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

impl SymbolSource for FakeLibrary {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        *self
            .lookups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(name.to_string())
            .or_insert(0) += 1;
        self.symbols
            .get(name)
            .and_then(|addr| NonNull::new(*addr as *mut c_void))
    }

    fn describe(&self) -> String {
        "fake webview library".to_string()
    }
}
