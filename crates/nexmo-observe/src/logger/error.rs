use thiserror::Error;

/// Where a rejected filter came from.
pub const LEVEL_FLAG: &str = "--log.level";
pub const LEVEL_ENV: &str = "RUST_LOG";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (expected text or json)")]
    InvalidFormat(String),

    #[error("invalid {origin} '{directives}': {reason}")]
    InvalidLogLevel {
        origin: &'static str,
        directives: String,
        reason: String,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("failed to install tracing subscriber: {0}")]
    InitializationFailed(String),
}
