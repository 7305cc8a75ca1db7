//! Configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects the errors into a single `ConfigError`.

mod sections;

#[cfg(test)]
mod tests;

use crate::schema::RodConfig;
use rod_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RodConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_event_loop(&mut errors, config);
    sections::validate_logging(&mut errors, config);
    sections::validate_playground(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
