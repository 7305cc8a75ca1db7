use std::path::PathBuf;

use crate::id::ResourceId;
use crate::types::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures surfaced by the native bridge.
///
/// Malformed native events and repeated `destroy()` calls are not errors and
/// never show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to create event loop")]
    Initialization,

    #[error("failed to create {kind}")]
    ResourceCreation { kind: ResourceKind },

    #[error("{kind} {id} has been destroyed")]
    Destroyed { kind: ResourceKind, id: ResourceId },

    #[error("string contains an interior nul byte")]
    InvalidString,

    #[error("failed to encode value for native call: {0}")]
    Encode(String),

    #[error("failed to decode native value: {0}")]
    Decode(String),

    #[error("resource ids exhausted")]
    IdsExhausted,

    #[error("event loop is not running")]
    EventLoopNotRunning,
}

#[derive(Debug, thiserror::Error)]
pub enum RodError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("poll_interval_ms must be 1-1000".into());
        assert_eq!(
            err.to_string(),
            "config validation error: poll_interval_ms must be 1-1000"
        );
    }

    #[test]
    fn bridge_error_display() {
        assert_eq!(
            BridgeError::Initialization.to_string(),
            "failed to create event loop"
        );

        let err = BridgeError::ResourceCreation {
            kind: ResourceKind::WebView,
        };
        assert_eq!(err.to_string(), "failed to create webview");

        let err = BridgeError::Destroyed {
            kind: ResourceKind::Tray,
            id: ResourceId(7),
        };
        assert_eq!(err.to_string(), "tray #7 has been destroyed");

        let err = BridgeError::Decode("bad json".into());
        assert_eq!(err.to_string(), "failed to decode native value: bad json");
    }

    #[test]
    fn rod_error_from_bridge() {
        let err: RodError = BridgeError::Initialization.into();
        assert!(matches!(err, RodError::Bridge(BridgeError::Initialization)));
        assert_eq!(err.to_string(), "failed to create event loop");
    }

    #[test]
    fn rod_error_from_config() {
        let err: RodError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, RodError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn rod_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RodError = io_err.into();
        assert!(matches!(err, RodError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
