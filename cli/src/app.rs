use std::sync::Arc;

use runwatch_core::config::{load_default, AppConfig};
use runwatch_core::refresh::RefreshCoordinator;
use runwatch_plugins::factory::build_executions_api;

use crate::commands::cli::Args;
use crate::error::CliError;
use crate::sink::TableSink;

fn load_config(args: &Args) -> Result<AppConfig, CliError> {
    let mut cfg = load_default().map_err(CliError::Config)?;
    if let Some(url) = &args.base_url {
        cfg.server.base_url = url.clone();
    }
    if let Some(key) = &args.api_key {
        cfg.server.api_key = key.clone();
    }
    if let Some(timeout) = args.timeout_ms {
        cfg.server.timeout_ms = timeout;
    }
    Ok(cfg)
}

fn build_coordinator(args: &Args) -> Result<RefreshCoordinator, CliError> {
    let cfg = load_config(args)?;
    let api = build_executions_api(&cfg).map_err(CliError::Client)?;
    let sink = Arc::new(TableSink::new());
    Ok(RefreshCoordinator::new(api, sink, &cfg.refresh))
}

/// One full pass: script list, batched last-run resolution, stats summary.
pub async fn run_status(args: &Args) -> Result<(), CliError> {
    let coord = build_coordinator(args)?;
    coord.refresh_all().await?;
    coord.refresh_stats().await;
    Ok(())
}

/// Full pass, then keep the table fresh on the periodic tick until ctrl-c.
pub async fn run_watch(args: &Args) -> Result<(), CliError> {
    let coord = build_coordinator(args)?;
    coord.refresh_all().await?;
    coord.start();

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| CliError::Client(anyhow::Error::new(e)))?;
    coord.stop();
    tracing::info!(target: "runwatch.cli", "shutting down");
    Ok(())
}
