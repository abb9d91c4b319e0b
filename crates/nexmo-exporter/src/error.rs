use std::path::PathBuf;

use thiserror::Error;

/// Startup failures. Any of these stops the process before it binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read API credentials from {}: {source}", .path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse API credentials in {}: {source}", .path.display())]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API credentials in {}: {source}", .path.display())]
    CredentialsInvalid {
        path: PathBuf,
        #[source]
        source: nexmo_model::ModelError,
    },

    #[error("invalid value for --{flag}: {reason}")]
    InvalidFlag { flag: &'static str, reason: String },

    #[error("invalid duration: {0} (expected e.g. 500ms, 5s, 1m30s)")]
    InvalidDuration(String),
}

impl ConfigError {
    pub fn flag(flag: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidFlag {
            flag,
            reason: reason.into(),
        }
    }
}
