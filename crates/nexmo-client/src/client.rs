use async_trait::async_trait;
use nexmo_model::{BalanceSample, Credentials};
use reqwest::{StatusCode, header::ACCEPT};
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::{BalanceError, chain};
use crate::source::BalanceSource;

const BALANCE_PATH: &str = "/account/get-balance";

/// HTTP client for the account balance endpoint.
pub struct BalanceClient {
    http: reqwest::Client,
    base_url: String,
    uri: String,
}

impl BalanceClient {
    pub fn new(config: ClientConfig, credentials: &Credentials) -> Result<Self, BalanceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(BalanceError::Client)?;

        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();
        let uri = balance_uri(&base_url, credentials);

        Ok(Self {
            http,
            base_url,
            uri,
        })
    }

    /// Base URL the client talks to. The full request URI carries the secret and is not exposed.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn get_balance(&self) -> Result<BalanceSample, BalanceError> {
        let response = self
            .http
            .get(&self.uri)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BalanceError::Transport(e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BalanceError::UpstreamStatus {
                code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                BalanceError::Decode(format!("failed to read body: {}", chain(&e.without_url())))
            })?;
        let sample: BalanceSample = serde_json::from_str(&body)
            .map_err(|e| BalanceError::Decode(e.to_string()))?;

        debug!(value = sample.value, auto_reload = sample.auto_reload, "balance fetched");
        Ok(sample)
    }
}

#[async_trait]
impl BalanceSource for BalanceClient {
    async fn fetch_balance(&self) -> Result<BalanceSample, BalanceError> {
        self.get_balance().await
    }
}

fn balance_uri(base_url: &str, credentials: &Credentials) -> String {
    format!(
        "{}{}/{}/{}",
        base_url, BALANCE_PATH, credentials.api_key, credentials.api_secret
    )
}
