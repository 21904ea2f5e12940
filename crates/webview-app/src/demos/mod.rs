//! The demo windows.
//!
//! Each demo opens the library, builds one window, runs it to completion and
//! then tears everything down with `unload_all`.

mod basic;
mod flags;
mod transparency;

use webview_common::Result;
use webview_config::WebviewConfig;

use crate::cli::Demo;

pub fn run(demo: Demo, config: WebviewConfig) -> Result<()> {
    tracing::info!(?demo, "starting demo");
    match demo {
        Demo::Basic => basic::run(config),
        Demo::Transparency => transparency::run(config),
        Demo::Flags => flags::run(config),
    }
}
