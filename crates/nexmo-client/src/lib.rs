//! Client for the nexmo account balance API.
//!
//! A single `GET {base_url}/account/get-balance/{key}/{secret}` per call, no retries.
//! Failures are returned to the caller as [`BalanceError`]; deciding what a failed
//! reading means is left to the collector.

mod client;
pub use client::BalanceClient;

mod config;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

mod errors;
pub use errors::BalanceError;

mod source;
pub use source::BalanceSource;
