use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://rest.nexmo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the balance API, without the `/account/...` path.
    pub base_url: String,
    /// Upper bound for connecting and reading the whole response.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
