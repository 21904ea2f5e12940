pub mod errors;
pub mod types;

pub use errors::{
    BridgeError, ConfigError, InvocationError, NativeError, ShutdownError,
};
pub use types::{SizeHint, WindowId};

pub type Result<T> = std::result::Result<T, BridgeError>;
