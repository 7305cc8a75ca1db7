use crate::schema::{RodConfig, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};

pub(super) fn validate_event_loop(errors: &mut Vec<String>, config: &RodConfig) {
    let interval = config.event_loop.poll_interval_ms;
    if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&interval) {
        errors.push(format!(
            "event_loop.poll_interval_ms must be {MIN_POLL_INTERVAL_MS}-{MAX_POLL_INTERVAL_MS}, got {interval}"
        ));
    }
}

pub(super) fn validate_logging(errors: &mut Vec<String>, config: &RodConfig) {
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }
}

pub(super) fn validate_playground(errors: &mut Vec<String>, config: &RodConfig) {
    let playground = &config.playground;
    if playground.width == 0 || playground.height == 0 {
        errors.push(format!(
            "playground size must be non-zero, got {}x{}",
            playground.width, playground.height
        ));
    }
    if playground.title.contains('\0') {
        errors.push("playground.title must not contain nul bytes".into());
    }
}
