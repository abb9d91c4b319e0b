//! Data types shared by the nexmo exporter crates.
//!
//! - [`BalanceSample`]: a single reading returned by the account balance API.
//! - [`Credentials`]: API key / secret pair used to address the balance endpoint.
//! - [`ExporterState`]: last-known outcome of a scrape, as published to Prometheus.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;
