//! Lazily probed optional entry points.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::OnceLock;

use tracing::debug;

use crate::ffi;
use crate::library::SymbolSource;

/// Optional operations a library build may or may not export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalFeature {
    /// `webview_set_browser_flags`: autoplay policy and raw engine switches.
    BrowserFlags,
}

impl OptionalFeature {
    pub fn symbol_name(self) -> &'static str {
        match self {
            OptionalFeature::BrowserFlags => ffi::WEBVIEW_SET_BROWSER_FLAGS,
        }
    }
}

/// One optional entry point and its cached probe outcome.
///
/// The first call to [`OptionalEntry::probe`] resolves the symbol; every
/// later call returns the cached result without touching the library again.
pub struct OptionalEntry<F> {
    feature: OptionalFeature,
    slot: OnceLock<Option<F>>,
}

impl<F: Copy> OptionalEntry<F> {
    pub const fn new(feature: OptionalFeature) -> Self {
        Self {
            feature,
            slot: OnceLock::new(),
        }
    }

    /// Resolve once, then answer from the cache.
    pub fn probe(&self, source: &dyn SymbolSource) -> Option<F> {
        *self.slot.get_or_init(|| {
            let name = self.feature.symbol_name();
            let resolved = source.symbol(name).map(|ptr| {
                // SAFETY: F is the frozen signature declared for this symbol in `ffi`.
                unsafe { cast_symbol::<F>(ptr) }
            });
            debug!(
                symbol = name,
                supported = resolved.is_some(),
                "probed optional entry point"
            );
            resolved
        })
    }

    /// Whether the probe has already run.
    pub fn is_probed(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// Reinterpret a resolved symbol address as a function pointer.
///
/// # Safety
/// `F` must be a function pointer type matching the symbol's real signature.
pub(crate) unsafe fn cast_symbol<F: Copy>(ptr: NonNull<c_void>) -> F {
    debug_assert_eq!(
        std::mem::size_of::<F>(),
        std::mem::size_of::<*mut c_void>(),
        "entry point types must be pointer-sized"
    );
    let raw = ptr.as_ptr();
    std::mem::transmute_copy::<*mut c_void, F>(&raw)
}
