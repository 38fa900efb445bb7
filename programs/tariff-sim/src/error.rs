//! Runner error codes

use std::path::PathBuf;

use tariff_game::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, CliError>;
