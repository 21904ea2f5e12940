//! The resolved entry-point table.
//!
//! Required entry points are resolved all at once when the table is built:
//! either every one of them is present or construction fails with the full
//! list of missing names. Optional entry points are probed on first use.

use std::ffi::{c_int, c_void};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use tracing::{debug, info};
use webview_common::{NativeError, SizeHint};

use crate::capability::{cast_symbol, OptionalEntry, OptionalFeature};
use crate::codec::encode_text;
use crate::ffi;
use crate::handle::NativeHandle;
use crate::library::{NativeLibrary, SymbolSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Create,
    Destroy,
    Run,
    Terminate,
    GetWindow,
    SetTitle,
    SetSize,
    Navigate,
    SetHtml,
    Init,
    Eval,
    SetFrame,
    SetOpacity,
    SetPixelTransparency,
    SetAlwaysOnTop,
    SetClickThrough,
    Bind,
    Unbind,
    Return,
    PumpMsgloop,
}

const REQUIRED_COUNT: usize = 20;

const REQUIRED: [Entry; REQUIRED_COUNT] = [
    Entry::Create,
    Entry::Destroy,
    Entry::Run,
    Entry::Terminate,
    Entry::GetWindow,
    Entry::SetTitle,
    Entry::SetSize,
    Entry::Navigate,
    Entry::SetHtml,
    Entry::Init,
    Entry::Eval,
    Entry::SetFrame,
    Entry::SetOpacity,
    Entry::SetPixelTransparency,
    Entry::SetAlwaysOnTop,
    Entry::SetClickThrough,
    Entry::Bind,
    Entry::Unbind,
    Entry::Return,
    Entry::PumpMsgloop,
];

impl Entry {
    fn symbol_name(self) -> &'static str {
        match self {
            Entry::Create => ffi::WEBVIEW_CREATE,
            Entry::Destroy => ffi::WEBVIEW_DESTROY,
            Entry::Run => ffi::WEBVIEW_RUN,
            Entry::Terminate => ffi::WEBVIEW_TERMINATE,
            Entry::GetWindow => ffi::WEBVIEW_GET_WINDOW,
            Entry::SetTitle => ffi::WEBVIEW_SET_TITLE,
            Entry::SetSize => ffi::WEBVIEW_SET_SIZE,
            Entry::Navigate => ffi::WEBVIEW_NAVIGATE,
            Entry::SetHtml => ffi::WEBVIEW_SET_HTML,
            Entry::Init => ffi::WEBVIEW_INIT,
            Entry::Eval => ffi::WEBVIEW_EVAL,
            Entry::SetFrame => ffi::WEBVIEW_SET_FRAME,
            Entry::SetOpacity => ffi::WEBVIEW_SET_OPACITY,
            Entry::SetPixelTransparency => ffi::WEBVIEW_SET_PIXEL_TRANSPARENCY,
            Entry::SetAlwaysOnTop => ffi::WEBVIEW_SET_ALWAYS_ON_TOP,
            Entry::SetClickThrough => ffi::WEBVIEW_SET_CLICK_THROUGH,
            Entry::Bind => ffi::WEBVIEW_BIND,
            Entry::Unbind => ffi::WEBVIEW_UNBIND,
            Entry::Return => ffi::WEBVIEW_RETURN,
            Entry::PumpMsgloop => ffi::WEBVIEW_PUMP_MSGLOOP,
        }
    }
}

/// Names of every entry point that must be present.
pub fn required_symbols() -> impl Iterator<Item = &'static str> {
    REQUIRED.iter().map(|e| e.symbol_name())
}

fn flag(enabled: bool) -> c_int {
    c_int::from(enabled)
}

/// Typed access to the native library.
///
/// Holds the symbol source alive for as long as the table exists: the library
/// is unloaded when the last `Arc<EntryPoints>` is dropped.
///
/// Every method taking a [`NativeHandle`] is `unsafe`: the caller guarantees
/// the handle has not been destroyed and that the call is made from a thread
/// the native engine accepts it on.
pub struct EntryPoints {
    source: Arc<dyn SymbolSource>,
    ptrs: [NonNull<c_void>; REQUIRED_COUNT],
    browser_flags: OptionalEntry<ffi::SetBrowserFlagsFn>,
}

// SAFETY: the table only stores code addresses of a library that stays loaded
// while the table lives; reading them from any thread is sound.
unsafe impl Send for EntryPoints {}
unsafe impl Sync for EntryPoints {}

impl EntryPoints {
    /// Resolve every required entry point from `source`.
    pub fn resolve(source: Arc<dyn SymbolSource>) -> Result<Self, NativeError> {
        let mut ptrs = [NonNull::<c_void>::dangling(); REQUIRED_COUNT];
        let mut missing = Vec::new();

        for (slot, entry) in ptrs.iter_mut().zip(REQUIRED.iter()) {
            match source.symbol(entry.symbol_name()) {
                Some(ptr) => *slot = ptr,
                None => missing.push(entry.symbol_name().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(NativeError::Symbol { missing });
        }

        info!(
            source = %source.describe(),
            required = REQUIRED_COUNT,
            "entry-point table resolved"
        );
        Ok(Self {
            source,
            ptrs,
            browser_flags: OptionalEntry::new(OptionalFeature::BrowserFlags),
        })
    }

    /// Open the library at `path` and resolve it.
    pub fn open(path: &Path) -> Result<Self, NativeError> {
        let library = NativeLibrary::open(path)?;
        Self::resolve(Arc::new(library))
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Whether the library exports `feature`. Probes on first call.
    pub fn supports(&self, feature: OptionalFeature) -> bool {
        match feature {
            OptionalFeature::BrowserFlags => self.browser_flags.probe(&*self.source).is_some(),
        }
    }

    fn get<F: Copy>(&self, entry: Entry) -> F {
        // REQUIRED lists the variants in declaration order.
        let ptr = self.ptrs[entry as usize];
        // SAFETY: every required slot was filled by `resolve`, and `F` is the
        // signature declared for that entry in `ffi` at each call site below.
        unsafe { cast_symbol::<F>(ptr) }
    }

    /// `webview_create`. Returns `None` when the engine hands back null.
    ///
    /// # Safety
    /// `window` must be null or a valid platform window of the calling thread.
    pub unsafe fn create(&self, debug_mode: bool, window: *mut c_void) -> Option<NativeHandle> {
        let f: ffi::CreateFn = self.get(Entry::Create);
        let handle = NativeHandle::from_raw(f(flag(debug_mode), window));
        debug!(?handle, debug_mode, "webview_create");
        handle
    }

    /// # Safety
    /// See the type-level contract. The handle must not be used afterwards.
    pub unsafe fn destroy(&self, handle: &NativeHandle) {
        let f: ffi::DestroyFn = self.get(Entry::Destroy);
        f(handle.as_raw());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn run(&self, handle: &NativeHandle) {
        let f: ffi::RunFn = self.get(Entry::Run);
        f(handle.as_raw());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn terminate(&self, handle: &NativeHandle) {
        let f: ffi::TerminateFn = self.get(Entry::Terminate);
        f(handle.as_raw());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn get_window(&self, handle: &NativeHandle) -> *mut c_void {
        let f: ffi::GetWindowFn = self.get(Entry::GetWindow);
        f(handle.as_raw())
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_title(&self, handle: &NativeHandle, title: &str) {
        let f: ffi::SetTitleFn = self.get(Entry::SetTitle);
        let title = encode_text(title);
        f(handle.as_raw(), title.as_ptr());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_size(&self, handle: &NativeHandle, width: u32, height: u32, hint: SizeHint) {
        let f: ffi::SetSizeFn = self.get(Entry::SetSize);
        let width = c_int::try_from(width).unwrap_or(c_int::MAX);
        let height = c_int::try_from(height).unwrap_or(c_int::MAX);
        f(handle.as_raw(), width, height, hint.as_raw());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn navigate(&self, handle: &NativeHandle, url: &str) {
        let f: ffi::NavigateFn = self.get(Entry::Navigate);
        let url = encode_text(url);
        f(handle.as_raw(), url.as_ptr());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_html(&self, handle: &NativeHandle, html: &str) {
        let f: ffi::SetHtmlFn = self.get(Entry::SetHtml);
        let html = encode_text(html);
        f(handle.as_raw(), html.as_ptr());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn init(&self, handle: &NativeHandle, js: &str) {
        let f: ffi::InitFn = self.get(Entry::Init);
        let js = encode_text(js);
        f(handle.as_raw(), js.as_ptr());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn eval(&self, handle: &NativeHandle, js: &str) {
        let f: ffi::EvalFn = self.get(Entry::Eval);
        let js = encode_text(js);
        f(handle.as_raw(), js.as_ptr());
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_frame(&self, handle: &NativeHandle, visible: bool) {
        let f: ffi::SetFlagFn = self.get(Entry::SetFrame);
        f(handle.as_raw(), flag(visible));
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_opacity(&self, handle: &NativeHandle, opacity: f64) {
        let f: ffi::SetOpacityFn = self.get(Entry::SetOpacity);
        f(handle.as_raw(), opacity.clamp(0.0, 1.0));
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_pixel_transparency(&self, handle: &NativeHandle, enabled: bool) {
        let f: ffi::SetFlagFn = self.get(Entry::SetPixelTransparency);
        f(handle.as_raw(), flag(enabled));
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_always_on_top(&self, handle: &NativeHandle, enabled: bool) {
        let f: ffi::SetFlagFn = self.get(Entry::SetAlwaysOnTop);
        f(handle.as_raw(), flag(enabled));
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_click_through(&self, handle: &NativeHandle, enabled: bool) {
        let f: ffi::SetFlagFn = self.get(Entry::SetClickThrough);
        f(handle.as_raw(), flag(enabled));
    }

    /// # Safety
    /// See the type-level contract. `arg` must stay valid until the handle is
    /// destroyed, since the engine may invoke `callback` with it until then.
    pub unsafe fn bind(
        &self,
        handle: &NativeHandle,
        name: &str,
        callback: ffi::BindCallback,
        arg: *mut c_void,
    ) {
        let f: ffi::BindFn = self.get(Entry::Bind);
        let name = encode_text(name);
        f(handle.as_raw(), name.as_ptr(), callback, arg);
    }

    /// # Safety
    /// See the type-level contract.
    pub unsafe fn unbind(&self, handle: &NativeHandle, name: &str) {
        let f: ffi::UnbindFn = self.get(Entry::Unbind);
        let name = encode_text(name);
        f(handle.as_raw(), name.as_ptr());
    }

    /// `webview_return`: settle the page-side promise for request `id`.
    ///
    /// # Safety
    /// See the type-level contract.
    pub unsafe fn return_result(&self, handle: &NativeHandle, id: &str, success: bool, json: &str) {
        let f: ffi::ReturnFn = self.get(Entry::Return);
        let status = if success {
            ffi::RETURN_SUCCESS
        } else {
            ffi::RETURN_FAILURE
        };
        let id = encode_text(id);
        let json = encode_text(json);
        f(handle.as_raw(), id.as_ptr(), status, json.as_ptr());
    }

    /// One iteration of the native message loop. Returns whether the loop
    /// should keep going.
    ///
    /// # Safety
    /// See the type-level contract.
    pub unsafe fn pump(&self, handle: &NativeHandle, blocking: bool) -> bool {
        let f: ffi::PumpFn = self.get(Entry::PumpMsgloop);
        f(handle.as_raw(), flag(blocking)) != 0
    }

    /// `webview_set_browser_flags`, or [`NativeError::Unsupported`] when the
    /// library predates it. Nothing is called in that case.
    ///
    /// # Safety
    /// See the type-level contract.
    pub unsafe fn set_browser_flags(
        &self,
        handle: &NativeHandle,
        enable_autoplay: bool,
        mute_autoplay: bool,
        custom_flags: &str,
    ) -> Result<(), NativeError> {
        let f = self
            .browser_flags
            .probe(&*self.source)
            .ok_or(NativeError::Unsupported(ffi::WEBVIEW_SET_BROWSER_FLAGS))?;
        let flags = encode_text(custom_flags);
        f(
            handle.as_raw(),
            flag(enable_autoplay),
            flag(mute_autoplay),
            flags.as_ptr(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeCall, FakeLibrary, FakeWebview};

    fn table(lib: FakeLibrary) -> Result<EntryPoints, NativeError> {
        EntryPoints::resolve(Arc::new(lib))
    }

    #[test]
    fn resolves_complete_library() {
        assert!(table(FakeLibrary::new()).is_ok());
    }

    #[test]
    fn twenty_required_symbols() {
        assert_eq!(required_symbols().count(), 20);
        assert!(required_symbols().all(|s| s.starts_with("webview_")));
        assert!(!required_symbols().any(|s| s == ffi::WEBVIEW_SET_BROWSER_FLAGS));
    }

    #[test]
    fn each_missing_required_symbol_fails_resolution() {
        for name in required_symbols() {
            let err = table(FakeLibrary::new().without(name)).err().unwrap();
            match err {
                NativeError::Symbol { missing } => assert_eq!(missing, vec![name.to_string()]),
                other => panic!("expected symbol error for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn symbol_error_reports_all_missing() {
        let lib = FakeLibrary::new()
            .without(ffi::WEBVIEW_RUN)
            .without(ffi::WEBVIEW_RETURN);
        match table(lib).err().unwrap() {
            NativeError::Symbol { missing } => {
                assert_eq!(missing, vec!["webview_run", "webview_return"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_optional_symbol_does_not_fail_resolution() {
        let lib = FakeLibrary::new().without(ffi::WEBVIEW_SET_BROWSER_FLAGS);
        let table = table(lib).unwrap();
        assert!(!table.supports(OptionalFeature::BrowserFlags));
    }

    #[test]
    fn optional_symbol_not_probed_at_resolution() {
        let lib = Arc::new(FakeLibrary::new());
        let table = EntryPoints::resolve(lib.clone()).unwrap();
        assert_eq!(lib.lookups(ffi::WEBVIEW_SET_BROWSER_FLAGS), 0);
        assert!(table.supports(OptionalFeature::BrowserFlags));
        assert!(table.supports(OptionalFeature::BrowserFlags));
        assert_eq!(lib.lookups(ffi::WEBVIEW_SET_BROWSER_FLAGS), 1);
    }

    #[test]
    fn calls_reach_the_native_side() {
        let table = table(FakeLibrary::new()).unwrap();
        let handle = unsafe { table.create(true, std::ptr::null_mut()) }.unwrap();
        let fake = FakeWebview::from_handle(&handle);

        unsafe {
            table.set_title(&handle, "Bun App");
            table.set_size(&handle, 500, 400, SizeHint::Fixed);
            table.set_opacity(&handle, 0.5);
            table.set_frame(&handle, false);
        }

        assert!(fake.debug());
        assert_eq!(
            fake.calls(),
            vec![
                FakeCall::SetTitle("Bun App".into()),
                FakeCall::SetSize {
                    width: 500,
                    height: 400,
                    hint: 3
                },
                FakeCall::SetOpacity(0.5),
                FakeCall::SetFrame(false),
            ]
        );
    }

    #[test]
    fn opacity_is_clamped() {
        let table = table(FakeLibrary::new()).unwrap();
        let handle = unsafe { table.create(false, std::ptr::null_mut()) }.unwrap();
        unsafe { table.set_opacity(&handle, 4.0) };
        assert_eq!(
            FakeWebview::from_handle(&handle).calls(),
            vec![FakeCall::SetOpacity(1.0)]
        );
    }

    #[test]
    fn browser_flags_unsupported_makes_no_call() {
        let table = table(FakeLibrary::new().without(ffi::WEBVIEW_SET_BROWSER_FLAGS)).unwrap();
        let handle = unsafe { table.create(false, std::ptr::null_mut()) }.unwrap();
        let result = unsafe { table.set_browser_flags(&handle, true, false, "--x") };
        assert!(matches!(result, Err(NativeError::Unsupported(_))));
        assert!(FakeWebview::from_handle(&handle).calls().is_empty());
    }

    #[test]
    fn browser_flags_supported() {
        let table = table(FakeLibrary::new()).unwrap();
        let handle = unsafe { table.create(false, std::ptr::null_mut()) }.unwrap();
        unsafe { table.set_browser_flags(&handle, true, false, "--a --b") }.unwrap();
        assert_eq!(
            FakeWebview::from_handle(&handle).calls(),
            vec![FakeCall::BrowserFlags {
                enable_autoplay: true,
                mute_autoplay: false,
                custom_flags: "--a --b".into()
            }]
        );
    }

    #[test]
    fn return_result_status_codes() {
        let table = table(FakeLibrary::new()).unwrap();
        let handle = unsafe { table.create(false, std::ptr::null_mut()) }.unwrap();
        unsafe {
            table.return_result(&handle, "r1", true, "{\"ok\":true}");
            table.return_result(&handle, "r2", false, "\"boom\"");
        }
        let returns = FakeWebview::from_handle(&handle).returns();
        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].id, "r1");
        assert_eq!(returns[0].status, ffi::RETURN_SUCCESS);
        assert_eq!(returns[0].result, "{\"ok\":true}");
        assert_eq!(returns[1].status, ffi::RETURN_FAILURE);
    }

    #[test]
    fn pump_reports_continue_until_terminated() {
        let table = table(FakeLibrary::new()).unwrap();
        let handle = unsafe { table.create(false, std::ptr::null_mut()) }.unwrap();
        assert!(unsafe { table.pump(&handle, false) });
        unsafe { table.terminate(&handle) };
        assert!(!unsafe { table.pump(&handle, false) });
    }
}
