use thiserror::Error;

use runwatch_core::errors::FetchError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[source] anyhow::Error),

    #[error("backend client error: {0}")]
    Client(#[source] anyhow::Error),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}
