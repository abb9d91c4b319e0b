use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("metric registration failed: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to encode metrics: {0}")]
    Encode(String),
}
