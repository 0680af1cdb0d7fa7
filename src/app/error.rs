use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::driver::DriverError;

#[derive(Error, Debug)]
pub enum ClippingError {
    #[error("Page driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("{label} failed after {attempts} attempts: {source}")]
    RetryExhausted {
        label: String,
        attempts: u32,
        source: DriverError,
    },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to write {path}: {source}")]
    Store {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl aborted: {0}")]
    Aborted(String),
}

impl ClippingError {
    /// True when the error came out of the retry governor after using up every attempt
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, ClippingError::RetryExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClippingError>;
