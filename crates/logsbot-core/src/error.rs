use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by logsbot.
#[derive(Error, Debug)]
pub enum LogsbotError {
    /// Delivering a message to one recipient failed.
    #[error("Failed to deliver to {recipient}: {reason}")]
    Transport { recipient: String, reason: String },

    /// A thread metadata source could not answer.
    #[error("Thread lookup failed: {0}")]
    Lookup(String),

    /// The user directory has no name for this identity.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// A configuration file could not be opened or read from disk.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the logsbot crates.
pub type Result<T> = std::result::Result<T, LogsbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_transport() {
        let err = LogsbotError::Transport {
            recipient: "1000".to_string(),
            reason: "blocked".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to deliver to 1000: blocked");
    }

    #[test]
    fn test_error_display_lookup() {
        let err = LogsbotError::Lookup("thread 42 not found".to_string());
        assert_eq!(err.to_string(), "Thread lookup failed: thread 42 not found");
    }

    #[test]
    fn test_error_display_unknown_user() {
        let err = LogsbotError::UnknownUser("77".to_string());
        assert_eq!(err.to_string(), "Unknown user: 77");
    }

    #[test]
    fn test_error_display_config_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LogsbotError::ConfigRead {
            path: PathBuf::from("/etc/logsbot.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read config"));
        assert!(msg.contains("/etc/logsbot.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_config() {
        let err = LogsbotError::Config("no recipients".to_string());
        assert_eq!(err.to_string(), "Configuration error: no recipients");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: LogsbotError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_anyhow_is_transparent() {
        let err: LogsbotError = anyhow::anyhow!("socket closed").into();
        assert_eq!(err.to_string(), "socket closed");
    }
}
