//! Error handling for the application

use thiserror::Error;

/// Page fetch errors. Caught per product by the run loop.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Fetcher setup failed: {0}")]
    Setup(String),
}

/// Observation log / price history errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Messaging provider errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Missing environment variable: {0}")]
    MissingCredential(String),

    #[error("Messaging provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Messaging provider rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),

    #[error("Fetch error: {0}")]
    FetchError(#[from] FetchError),

    #[error("Notification error: {0}")]
    NotifyError(NotifyError),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::MissingCredential(var) => {
                AppError::ConfigError(format!("environment variable {} is not set", var))
            }
            other => AppError::NotifyError(other),
        }
    }
}
