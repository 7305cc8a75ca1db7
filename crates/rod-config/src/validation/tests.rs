use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&RodConfig::default()).is_ok());
}

#[test]
fn poll_interval_out_of_range() {
    let mut config = RodConfig::default();
    config.event_loop.poll_interval_ms = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("poll_interval_ms"));

    config.event_loop.poll_interval_ms = 1001;
    assert!(validate(&config).is_err());

    config.event_loop.poll_interval_ms = 1000;
    assert!(validate(&config).is_ok());
}

#[test]
fn empty_log_level_rejected() {
    let mut config = RodConfig::default();
    config.logging.level = "  ".into();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("logging.level"));
}

#[test]
fn zero_playground_size_rejected() {
    let mut config = RodConfig::default();
    config.playground.height = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("400x0"));
}

#[test]
fn multiple_errors_are_joined() {
    let mut config = RodConfig::default();
    config.event_loop.poll_interval_ms = 0;
    config.logging.level = String::new();
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("poll_interval_ms"));
    assert!(msg.contains("logging.level"));
    assert!(msg.contains("; "));
}
