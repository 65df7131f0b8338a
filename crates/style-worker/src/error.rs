//! Worker error types

use style_features::FeatureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),

    #[error("Feature extraction error: {0}")]
    Features(#[from] FeatureError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
