use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use nexmo_api::validate_metrics_path;
use nexmo_client::ClientConfig;
use nexmo_prometheus::ExporterOpts;

use crate::cli::Args;
use crate::error::ConfigError;

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen: SocketAddr,
    pub metrics_path: String,
    pub credentials_file: PathBuf,
    pub client: ClientConfig,
    pub exporter: ExporterOpts,
}

impl ExporterConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let listen = parse_listen_address(&args.listen_address)?;

        if validate_metrics_path(&args.telemetry_path).is_err() {
            return Err(ConfigError::flag(
                "web.telemetry-path",
                format!(
                    "'{}' must be a literal absolute path other than '/' (no ':', '*', '{{' or '}}')",
                    args.telemetry_path
                ),
            ));
        }
        if !(args.url.starts_with("http://") || args.url.starts_with("https://")) {
            return Err(ConfigError::flag(
                "nexmo.url",
                format!("'{}' is not an http(s) URL", args.url),
            ));
        }
        if !is_valid_namespace(&args.namespace) {
            return Err(ConfigError::flag(
                "nexmo.namespace",
                format!("'{}' is not a valid metric name prefix", args.namespace),
            ));
        }

        Ok(Self {
            listen,
            metrics_path: args.telemetry_path.clone(),
            credentials_file: args.credentials_file.clone(),
            client: ClientConfig {
                base_url: args.url.clone(),
                timeout: args.timeout,
            },
            exporter: ExporterOpts {
                namespace: args.namespace.clone(),
            },
        })
    }
}

/// Accepts `host:port`, `[v6]:port` or `:port` (all interfaces).
pub fn parse_listen_address(s: &str) -> Result<SocketAddr, ConfigError> {
    let s = s.trim();
    let candidate = match s.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => s.to_string(),
    };

    candidate
        .to_socket_addrs()
        .map_err(|e| ConfigError::flag("web.listen-address", format!("'{s}': {e}")))?
        .next()
        .ok_or_else(|| ConfigError::flag("web.listen-address", format!("'{s}' did not resolve")))
}

/// Parses `500ms`, `5s`, `2m`, `1h` and concatenations such as `1m30s`. Zero is rejected.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    let mut rest = s.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(invalid)?),
            "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];
        total = total.checked_add(part).ok_or_else(invalid)?;
    }

    if total.is_zero() {
        return Err(invalid());
    }
    Ok(total)
}

/// Prometheus metric names: `[a-zA-Z_:][a-zA-Z0-9_:]*`. An empty namespace leaves names unprefixed.
fn is_valid_namespace(ns: &str) -> bool {
    let mut chars = ns.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        Some(_) => false,
    }
}
