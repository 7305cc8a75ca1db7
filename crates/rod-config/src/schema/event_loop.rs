use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest poll cadence, matching the minimum recurring-timer tick.
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Largest accepted poll cadence. Anything slower makes windows feel hung.
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

/// Native event loop polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLoopConfig {
    /// Delay between two native poll calls (valid range: 1-1000).
    pub poll_interval_ms: u64,
}

impl EventLoopConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: MIN_POLL_INTERVAL_MS,
        }
    }
}
