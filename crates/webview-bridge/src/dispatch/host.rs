//! Host functions: the Rust side of a bound name.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use webview_common::InvocationError;

/// The eventual outcome of one invocation.
pub type HostFuture = Pin<Box<dyn Future<Output = Result<Value, InvocationError>> + Send>>;

/// A bound function, type-erased. Receives the decoded argument array.
pub(crate) type HostFn = Arc<dyn Fn(Vec<Value>) -> HostFuture + Send + Sync>;

fn into_outcome<T: Serialize, E: Display>(result: Result<T, E>) -> Result<Value, InvocationError> {
    match result {
        Ok(value) => serde_json::to_value(value).map_err(|e| {
            InvocationError::HostFunction(format!("result is not representable as JSON: {e}"))
        }),
        Err(e) => Err(InvocationError::HostFunction(e.to_string())),
    }
}

pub(crate) fn from_async<F, Fut, T, E>(f: F) -> HostFn
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Display + 'static,
{
    Arc::new(move |args| {
        let fut = f(args);
        Box::pin(async move { into_outcome(fut.await) })
    })
}

pub(crate) fn from_sync<F, T, E>(f: F) -> HostFn
where
    F: Fn(Vec<Value>) -> Result<T, E> + Send + Sync + 'static,
    T: Serialize + 'static,
    E: Display + 'static,
{
    Arc::new(move |args| {
        let outcome = into_outcome(f(args));
        Box::pin(std::future::ready(outcome))
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("host function panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("host function panicked: {s}")
    } else {
        "host function panicked".to_string()
    }
}

/// Start `host` with `args`, turning a panic at call time or while the
/// future is polled into a [`InvocationError::HostFunction`].
pub(crate) fn invoke(host: &HostFn, args: Vec<Value>) -> HostFuture {
    match std::panic::catch_unwind(AssertUnwindSafe(|| host(args))) {
        Ok(fut) => Box::pin(AssertUnwindSafe(fut).catch_unwind().map(|r| match r {
            Ok(outcome) => outcome,
            Err(payload) => Err(InvocationError::HostFunction(panic_message(&*payload))),
        })),
        Err(payload) => {
            let err = InvocationError::HostFunction(panic_message(&*payload));
            Box::pin(std::future::ready(Err(err)))
        }
    }
}
