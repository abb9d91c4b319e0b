//! Prometheus collector for the nexmo account balance.
//!
//! [`BalanceExporter`] refreshes its metrics from a [`nexmo_client::BalanceSource`] every time it
//! is collected. There is no background polling: one collection is one upstream request.
//!
//! ## Example
//! ```rust,no_run
//! use nexmo_client::{BalanceClient, ClientConfig};
//! use nexmo_model::Credentials;
//! use nexmo_prometheus::{BalanceExporter, ExporterOpts};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BalanceClient::new(ClientConfig::default(), &Credentials::new("key", "secret"))?;
//! let exporter = BalanceExporter::new(client, ExporterOpts::default())?;
//!
//! let body = exporter.render().await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `<ns>_up` - Gauge, 1 when the last upstream fetch succeeded
//! - `<ns>_exporter_total_scrapes` - Counter, one per collection
//! - `<ns>_balance` - Gauge, last successfully fetched balance
//! - `<ns>_exporter_build_info{version}` - Gauge, always 1
//!
//! `<ns>` defaults to `nexmo` and is set per instance through [`ExporterOpts`].
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; see `nexmo-api` for the axum router.

mod errors;
pub use errors::ExporterError;

mod exporter;
pub use exporter::{BalanceExporter, DEFAULT_NAMESPACE, ExporterOpts};

pub use prometheus::proto::MetricFamily;
pub use prometheus::TEXT_FORMAT;
