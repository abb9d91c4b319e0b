//! Command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use nexmo_api::DEFAULT_METRICS_PATH;
use nexmo_client::DEFAULT_BASE_URL;
use nexmo_observe::LoggerFormat;
use nexmo_prometheus::DEFAULT_NAMESPACE;

use crate::config::parse_duration;
use crate::credentials::DEFAULT_CREDENTIALS_PATH;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nexmo-exporter",
    about = "Prometheus exporter for the nexmo account balance",
    version
)]
pub struct Args {
    /// Address to listen on for web interface and telemetry (`host:port` or `:port`)
    #[arg(
        long = "web.listen-address",
        env = "NEXMO_EXPORTER_LISTEN_ADDRESS",
        default_value = ":9100"
    )]
    pub listen_address: String,

    /// Path under which to expose metrics
    #[arg(
        long = "web.telemetry-path",
        env = "NEXMO_EXPORTER_TELEMETRY_PATH",
        default_value = DEFAULT_METRICS_PATH
    )]
    pub telemetry_path: String,

    /// Nexmo API URL
    #[arg(long = "nexmo.url", env = "NEXMO_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Timeout for trying to get stats from Nexmo
    #[arg(
        long = "nexmo.timeout",
        env = "NEXMO_TIMEOUT",
        default_value = "5s",
        value_parser = parse_duration
    )]
    pub timeout: Duration,

    /// Prometheus namespace for Nexmo metrics
    #[arg(long = "nexmo.namespace", env = "NEXMO_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// JSON file holding `APIKey` and `APISecret`
    #[arg(
        long = "nexmo.credentials-file",
        env = "NEXMO_CREDENTIALS_FILE",
        default_value = DEFAULT_CREDENTIALS_PATH
    )]
    pub credentials_file: PathBuf,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long = "log.level", env = "NEXMO_EXPORTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (text, json)
    #[arg(long = "log.format", env = "NEXMO_EXPORTER_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,
}
