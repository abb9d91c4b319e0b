use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::config::LoggerConfig;
use crate::logger::error::{LEVEL_ENV, LEVEL_FLAG, LoggerError};
use crate::logger::format::LoggerFormat;

/// Build the filter, the stdout layer for `cfg.format` and install them globally.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = build_filter(&cfg.level, std::env::var(LEVEL_ENV).ok())?;
    let timer = local_timer();

    let (text, json) = match cfg.format {
        LoggerFormat::Text => (
            Some(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(timer),
            ),
            None,
        ),
        LoggerFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(timer),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|e| classify(&e.to_string()))
}

/// A non-empty `RUST_LOG` replaces the `--log.level` value.
fn build_filter(level: &str, env: Option<String>) -> Result<EnvFilter, LoggerError> {
    let (origin, directives) = match env {
        Some(env) if !env.trim().is_empty() => (LEVEL_ENV, env),
        _ => (LEVEL_FLAG, level.to_string()),
    };

    EnvFilter::try_new(&directives).map_err(|e| LoggerError::InvalidLogLevel {
        origin,
        reason: e.to_string(),
        directives,
    })
}

fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn classify(msg: &str) -> LoggerError {
    if msg.contains("already") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(msg.to_string())
    }
}
