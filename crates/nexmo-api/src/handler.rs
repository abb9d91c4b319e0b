use async_trait::async_trait;

use crate::error::ApiError;

/// Produces one text exposition body per call.
///
/// Implemented by [`ExporterAdapter`](crate::ExporterAdapter); custom handlers can wrap it
/// to add their own metrics or checks.
#[async_trait]
pub trait ScrapeHandler: Send + Sync + 'static {
    async fn scrape(&self) -> Result<String, ApiError>;
}
