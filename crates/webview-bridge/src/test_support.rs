//! Helpers shared by the unit tests: contexts over the fake engine.

use std::sync::Arc;
use std::time::Duration;

use webview_config::{BridgeConfig, WindowConfig};
use webview_sys::fake::{FakeCall, FakeLibrary, FakeWebview};

use crate::{WebviewContext, Window};

/// Upper bound for anything a test waits on.
pub(crate) const WAIT: Duration = Duration::from_secs(5);

pub(crate) fn context_with(lib: FakeLibrary) -> WebviewContext {
    WebviewContext::from_source(Arc::new(lib), &BridgeConfig::default()).unwrap()
}

pub(crate) fn fake_context() -> WebviewContext {
    context_with(FakeLibrary::new())
}

pub(crate) fn open_window(ctx: &WebviewContext) -> Window {
    ctx.create_window(&WindowConfig::default()).unwrap()
}

pub(crate) fn fake_of(window: &Window) -> Arc<FakeWebview> {
    FakeWebview::from_window(window.native_window().unwrap()).unwrap()
}

/// Only the bind and unbind calls, in order.
pub(crate) fn binding_calls(fake: &FakeWebview) -> Vec<FakeCall> {
    fake.calls()
        .into_iter()
        .filter(|c| matches!(c, FakeCall::Bind(_) | FakeCall::Unbind(_)))
        .collect()
}
