use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "runwatch", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config.toml and RUNWATCH_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API key sent as X-API-Key (overrides config and env).
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// One-shot: list scripts and print their last-run status.
    Status,
    /// Keep the table fresh on the background refresh tick until ctrl-c.
    Watch,
}
