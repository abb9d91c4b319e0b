use std::sync::Arc;

use async_trait::async_trait;
use nexmo_client::BalanceSource;
use nexmo_prometheus::BalanceExporter;

use crate::error::ApiError;
use crate::handler::ScrapeHandler;

/// Adapter that bridges `BalanceExporter` to `ScrapeHandler`.
pub struct ExporterAdapter<S> {
    exporter: Arc<BalanceExporter<S>>,
}

impl<S> ExporterAdapter<S> {
    pub fn new(exporter: Arc<BalanceExporter<S>>) -> Self {
        Self { exporter }
    }
}

#[async_trait]
impl<S> ScrapeHandler for ExporterAdapter<S>
where
    S: BalanceSource,
{
    async fn scrape(&self) -> Result<String, ApiError> {
        self.exporter.render().await.map_err(ApiError::from)
    }
}
