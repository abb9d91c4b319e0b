mod error;
pub use error::ApiError;

mod handler;
pub use handler::ScrapeHandler;

mod adapter;
pub use adapter::ExporterAdapter;

mod http;
pub use http::{DEFAULT_METRICS_PATH, HttpApi, validate_metrics_path};

pub use axum;
