use clap::Parser;
mod app;
mod commands;
mod error;
mod sink;

use commands::cli;
use error::CliError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();
    match args.command.clone().unwrap_or(cli::Commands::Status) {
        cli::Commands::Status => app::run_status(&args).await,
        cli::Commands::Watch => app::run_watch(&args).await,
    }
}
