mod cli;
mod config;
mod credentials;
mod error;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nexmo_api::{ExporterAdapter, HttpApi};
use nexmo_client::BalanceClient;
use nexmo_observe::{LoggerConfig, logger_init};
use nexmo_prometheus::BalanceExporter;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::cli::Args;
use crate::config::ExporterConfig;
use crate::credentials::{CredentialProvider, FileCredentials};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Logger
    logger_init(&LoggerConfig::new(args.log_format, args.log_level.clone()))?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting nexmo exporter");

    let result = run(args).await;
    if let Err(ref e) = result {
        error!("exporter failed: {:#}", e);
    }
    result
}

async fn run(args: Args) -> Result<()> {
    // 2) Flags + credentials; nothing is bound until both are valid
    let config = ExporterConfig::from_args(&args)?;
    let credentials = FileCredentials::new(&config.credentials_file).load()?;

    // 3) Upstream client + collector
    let client = BalanceClient::new(config.client.clone(), &credentials)?;
    info!(
        endpoint = client.endpoint(),
        timeout = ?config.client.timeout,
        "balance client configured"
    );
    let exporter = Arc::new(BalanceExporter::new(client, config.exporter.clone())?);
    info!(namespace = exporter.namespace(), "exporter ready");

    // 4) HTTP
    let handler = Arc::new(ExporterAdapter::new(exporter));
    let router = HttpApi::new(handler, config.metrics_path.clone())?.router();

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!(
        "Listening on {} (metrics at {})",
        config.listen, config.metrics_path
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down...");
}
