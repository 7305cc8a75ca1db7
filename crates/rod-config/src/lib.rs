//! Rod configuration.
//!
//! TOML-based settings for the native bridge and the playground binary.
//! Every section uses serde defaults, so an empty or partial file is valid.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rod_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("polling every {}ms", config.event_loop.poll_interval_ms);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{EventLoopConfig, LoggingConfig, PlaygroundConfig, RodConfig};
pub use toml_loader::{default_config_path, load_default, load_from_path};

use rod_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<RodConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &RodConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&RodConfig::default());
        assert!(json.contains("\"event_loop\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"playground\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&RodConfig::default());
        let parsed: RodConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_loop.poll_interval_ms, 1);
        assert_eq!(parsed.logging.level, "rod=info");
        assert_eq!(parsed.playground.width, 400);
    }
}
