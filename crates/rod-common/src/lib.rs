pub mod errors;
pub mod id;
pub mod types;

pub use errors::{BridgeError, ConfigError, RodError};
pub use id::{IdAllocator, ResourceId};
pub use types::{Position, ProgressBar, ProgressState, ResourceKind, Size};

pub type Result<T> = std::result::Result<T, BridgeError>;
