//! Binding layer over the native webview shared library.
//!
//! [`EntryPoints`] is the only way to call into the library: it is built by
//! resolving every required entry point up front and exposes each one as a
//! typed `unsafe` method. Optional entry points are probed lazily.

pub mod capability;
pub mod codec;
pub mod ffi;
pub mod handle;
pub mod library;
pub mod table;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use capability::OptionalFeature;
pub use codec::{decode_args, decode_json, decode_text, encode_failure, encode_json, encode_text, ScopedBuffer};
pub use handle::NativeHandle;
pub use library::{default_library_name, locate, LibrarySearch, NativeLibrary, SymbolSource, PATH_ENV};
pub use table::{required_symbols, EntryPoints};
