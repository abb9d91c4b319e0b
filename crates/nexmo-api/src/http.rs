use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use nexmo_prometheus::TEXT_FORMAT;
use tracing::debug;

use crate::{error::ApiError, handler::ScrapeHandler};

pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// HTTP surface of the exporter.
pub struct HttpApi<H> {
    handler: Arc<H>,
    metrics_path: String,
}

struct ApiState<H> {
    handler: Arc<H>,
    landing: Arc<str>,
}

impl<H> Clone for ApiState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            landing: Arc::clone(&self.landing),
        }
    }
}

impl<H> HttpApi<H>
where
    H: ScrapeHandler,
{
    /// Fails unless `metrics_path` passes [`validate_metrics_path`].
    pub fn new(handler: Arc<H>, metrics_path: impl Into<String>) -> Result<Self, ApiError> {
        let metrics_path = metrics_path.into();
        validate_metrics_path(&metrics_path)?;
        Ok(Self {
            handler,
            metrics_path,
        })
    }

    /// Build axum router.
    ///
    /// Routes:
    /// - GET <metrics_path> - Scrape upstream and return metrics
    /// - anything else - Landing page linking to the metrics path
    pub fn router(self) -> Router {
        let state = ApiState {
            handler: self.handler,
            landing: landing_page(&self.metrics_path).into(),
        };

        Router::new()
            .route(&self.metrics_path, get(metrics::<H>))
            .route("/", get(landing::<H>))
            .fallback(landing::<H>)
            .with_state(state)
    }
}

/// A metrics path must be absolute, must not be `/` (taken by the landing page) and must be a
/// literal route: axum treats `:`, `*`, `{` and `}` as capture syntax.
pub fn validate_metrics_path(path: &str) -> Result<(), ApiError> {
    let literal = !path.contains([':', '*', '{', '}']);
    if path.starts_with('/') && path != "/" && literal {
        Ok(())
    } else {
        Err(ApiError::InvalidPath(path.to_string()))
    }
}

/// GET <metrics_path>
async fn metrics<H>(State(state): State<ApiState<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ScrapeHandler,
{
    debug!("scrape requested");
    let body = state.handler.scrape().await?;
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}

async fn landing<H>(State(state): State<ApiState<H>>) -> Html<String> {
    Html(state.landing.to_string())
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>
             <head><title>Nexmo Exporter</title></head>
             <body>
             <h1>Nexmo Exporter</h1>
             <p><a href='{metrics_path}'>Metrics</a></p>
             </body>
             </html>"
    )
}
