//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod event_loop;
mod logging;
mod playground;

pub use event_loop::*;
pub use logging::*;
pub use playground::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RodConfig {
    pub event_loop: EventLoopConfig,
    pub logging: LoggingConfig,
    pub playground: PlaygroundConfig,
}
