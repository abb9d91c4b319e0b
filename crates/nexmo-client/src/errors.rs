use std::error::Error as StdError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("balance request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP status {code}")]
    UpstreamStatus { code: u16 },

    #[error("failed to decode balance response: {0}")]
    Decode(String),
}

impl BalanceError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BalanceError::Client(_) => "client",
            BalanceError::Transport(_) => "transport",
            BalanceError::UpstreamStatus { .. } => "upstream_status",
            BalanceError::Decode(_) => "decode",
        }
    }

    /// Message plus every underlying cause, e.g. the OS error behind a failed connect.
    pub fn detail(&self) -> String {
        chain(self)
    }
}

/// Joins an error and its sources with `: `, skipping causes already quoted by their parent.
pub(crate) fn chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let msg = e.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        cause = e.source();
    }
    out
}
