use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::ffi::RawHandle;

/// Opaque pointer to one native engine instance.
///
/// Deliberately neither `Clone` nor `Copy`: exactly one owner holds it from
/// `webview_create` until `webview_destroy`.
pub struct NativeHandle(NonNull<c_void>);

// SAFETY: the handle is an address the native library hands back to us; it is
// only dereferenced by the library. Which calls are legal from which thread is
// governed by the owner of the handle, not by the address itself.
unsafe impl Send for NativeHandle {}
unsafe impl Sync for NativeHandle {}

impl NativeHandle {
    pub(crate) fn from_raw(raw: RawHandle) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub fn as_raw(&self) -> RawHandle {
        self.0.as_ptr()
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:p})", self.0.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected() {
        assert!(NativeHandle::from_raw(std::ptr::null_mut()).is_none());
    }

    #[test]
    fn debug_shows_address() {
        let mut slot = 0u8;
        let handle = NativeHandle::from_raw((&mut slot as *mut u8).cast()).unwrap();
        assert!(format!("{handle:?}").starts_with("NativeHandle(0x"));
    }
}
