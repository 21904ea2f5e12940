//! Host side of the native webview bridge.
//!
//! Provides:
//! - [`WebviewContext`]: library lifetime and window creation
//! - [`HandleRegistry`]: exactly-once destruction of native handles
//! - Page-to-host calls dispatched on tokio, results returned by request id
//! - [`Window`]: property setters, content, bindings and event-loop control

pub mod context;
pub mod dispatch;
pub mod registry;
pub mod window;

pub use context::WebviewContext;
pub use dispatch::HostFuture;
pub use registry::HandleRegistry;
pub use window::Window;

pub use webview_common::{
    BridgeError, InvocationError, NativeError, Result, ShutdownError, SizeHint, WindowId,
};
pub use webview_config::BrowserConfig as BrowserFlags;
pub use webview_sys::OptionalFeature;

#[cfg(test)]
mod test_support;
