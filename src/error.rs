//! Error types for loading, configuring and writing tracking runs.
//!
//! The association pass and the summarizer are total; only the boundary
//! around them can fail.

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, TrackError>;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Unknown score aggregation {0:?}, expected \"max\" or \"mean\"")]
    UnknownAggregation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
