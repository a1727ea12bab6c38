//! Error types for ClassPilot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
