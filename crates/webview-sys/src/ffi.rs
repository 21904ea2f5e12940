//! Raw entry-point signatures of the native webview library.
//!
//! A dynamically loaded symbol carries no type information, so these
//! signatures cannot be checked when the library is opened. They are a frozen
//! contract with the C side: every string is a NUL-terminated UTF-8 pointer
//! that the native side copies before returning, every flag is a C `int`
//! (0 or 1), and every handle is the opaque pointer returned by
//! `webview_create`.

use std::ffi::{c_char, c_int, c_void};

/// Opaque native engine instance.
pub type RawHandle = *mut c_void;

/// Callback installed by `webview_bind`. Fires on the engine's thread with
/// the request id, the JSON-encoded argument array and the user data pointer
/// given at bind time.
pub type BindCallback = unsafe extern "C" fn(id: *const c_char, req: *const c_char, arg: *mut c_void);

pub type CreateFn = unsafe extern "C" fn(debug: c_int, window: *mut c_void) -> RawHandle;
pub type DestroyFn = unsafe extern "C" fn(handle: RawHandle);
pub type RunFn = unsafe extern "C" fn(handle: RawHandle);
pub type TerminateFn = unsafe extern "C" fn(handle: RawHandle);
pub type GetWindowFn = unsafe extern "C" fn(handle: RawHandle) -> *mut c_void;
pub type SetTitleFn = unsafe extern "C" fn(handle: RawHandle, title: *const c_char);
pub type SetSizeFn = unsafe extern "C" fn(handle: RawHandle, width: c_int, height: c_int, hint: c_int);
pub type NavigateFn = unsafe extern "C" fn(handle: RawHandle, url: *const c_char);
pub type SetHtmlFn = unsafe extern "C" fn(handle: RawHandle, html: *const c_char);
pub type InitFn = unsafe extern "C" fn(handle: RawHandle, js: *const c_char);
pub type EvalFn = unsafe extern "C" fn(handle: RawHandle, js: *const c_char);
pub type SetFlagFn = unsafe extern "C" fn(handle: RawHandle, enabled: c_int);
pub type SetOpacityFn = unsafe extern "C" fn(handle: RawHandle, opacity: f64);
pub type BindFn =
    unsafe extern "C" fn(handle: RawHandle, name: *const c_char, callback: BindCallback, arg: *mut c_void);
pub type UnbindFn = unsafe extern "C" fn(handle: RawHandle, name: *const c_char);
pub type ReturnFn =
    unsafe extern "C" fn(handle: RawHandle, id: *const c_char, status: c_int, result: *const c_char);
pub type PumpFn = unsafe extern "C" fn(handle: RawHandle, blocking: c_int) -> c_int;
pub type SetBrowserFlagsFn = unsafe extern "C" fn(
    handle: RawHandle,
    enable_autoplay: c_int,
    mute_autoplay: c_int,
    custom_flags: *const c_char,
);

pub const WEBVIEW_CREATE: &str = "webview_create";
pub const WEBVIEW_DESTROY: &str = "webview_destroy";
pub const WEBVIEW_RUN: &str = "webview_run";
pub const WEBVIEW_TERMINATE: &str = "webview_terminate";
pub const WEBVIEW_GET_WINDOW: &str = "webview_get_window";
pub const WEBVIEW_SET_TITLE: &str = "webview_set_title";
pub const WEBVIEW_SET_SIZE: &str = "webview_set_size";
pub const WEBVIEW_NAVIGATE: &str = "webview_navigate";
pub const WEBVIEW_SET_HTML: &str = "webview_set_html";
pub const WEBVIEW_INIT: &str = "webview_init";
pub const WEBVIEW_EVAL: &str = "webview_eval";
pub const WEBVIEW_SET_FRAME: &str = "webview_set_frame";
pub const WEBVIEW_SET_OPACITY: &str = "webview_set_opacity";
pub const WEBVIEW_SET_PIXEL_TRANSPARENCY: &str = "webview_set_pixel_transparency";
pub const WEBVIEW_SET_ALWAYS_ON_TOP: &str = "webview_set_always_on_top";
pub const WEBVIEW_SET_CLICK_THROUGH: &str = "webview_set_click_through";
pub const WEBVIEW_BIND: &str = "webview_bind";
pub const WEBVIEW_UNBIND: &str = "webview_unbind";
pub const WEBVIEW_RETURN: &str = "webview_return";
pub const WEBVIEW_PUMP_MSGLOOP: &str = "webview_pump_msgloop";

/// Optional: absent from older library builds.
pub const WEBVIEW_SET_BROWSER_FLAGS: &str = "webview_set_browser_flags";

/// `webview_return` status for a resolved promise.
pub const RETURN_SUCCESS: c_int = 0;
/// `webview_return` status for a rejected promise.
pub const RETURN_FAILURE: c_int = 1;
