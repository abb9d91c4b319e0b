use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nexmo_prometheus::ExporterError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid metrics path: {0}")]
    InvalidPath(String),

    #[error("scrape failed: {0}")]
    Scrape(#[from] ExporterError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "metrics request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
