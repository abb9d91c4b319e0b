use std::fs;
use std::path::{Path, PathBuf};

use nexmo_model::Credentials;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_CREDENTIALS_PATH: &str = "/app/credentials/nexmo.json";

/// Supplies the API key / secret once at startup.
pub trait CredentialProvider {
    fn load(&self) -> Result<Credentials, ConfigError>;
}

/// Reads `{"APIKey": ..., "APISecret": ...}` from a file, usually a mounted secret.
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CredentialProvider for FileCredentials {
    fn load(&self) -> Result<Credentials, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| ConfigError::CredentialsRead {
            path: self.path.clone(),
            source,
        })?;

        let credentials: Credentials =
            serde_json::from_str(&raw).map_err(|source| ConfigError::CredentialsParse {
                path: self.path.clone(),
                source,
            })?;

        credentials
            .validate()
            .map_err(|source| ConfigError::CredentialsInvalid {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), "API credentials loaded");
        Ok(credentials)
    }
}
