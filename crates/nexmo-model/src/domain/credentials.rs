use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// API key / secret pair for the balance endpoint.
///
/// Serialized with the field names used by the mounted credential file:
/// `{"APIKey": "...", "APISecret": "..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(rename = "APISecret")]
    pub api_secret: String,
}

impl Credentials {
    pub fn new<K, S>(api_key: K, api_secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reject credentials with a blank key or secret.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::EmptyField("APIKey"));
        }
        if self.api_secret.trim().is_empty() {
            return Err(ModelError::EmptyField("APISecret"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
