//! Error types for the fin-app service layer.

use std::path::PathBuf;

/// Application error type shared by the CLI and any other front-end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Results error: {0}")]
    Results(#[from] fin_results::ResultsError),

    #[error("Failed to start solver thread")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Solve failed: {0}")]
    SolveFailed(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("No solve is pending")]
    NothingPending,
}

/// Result type for fin-app operations.
pub type AppResult<T> = Result<T, AppError>;
