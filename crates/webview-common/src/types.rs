use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one window owned by the handle registry.
///
/// Facades hold this instead of the native handle, so a destroyed window can
/// be detected before any native call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// How the native engine interprets a `set_size` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SizeHint {
    /// Width and height are the default size.
    #[default]
    None,
    /// Width and height are the minimum bounds.
    Min,
    /// Width and height are the maximum bounds.
    Max,
    /// The window cannot be resized by the user.
    Fixed,
}

impl SizeHint {
    /// The integer the native `set_size` entry point expects.
    pub fn as_raw(self) -> i32 {
        match self {
            SizeHint::None => 0,
            SizeHint::Min => 1,
            SizeHint::Max => 2,
            SizeHint::Fixed => 3,
        }
    }
}
