use thiserror::Error;

/// Errors raised by storage, backends and import.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Network(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage key {0}")]
    InvalidKey(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Network(error.to_string())
    }
}

impl StoreError {
    pub fn status(url: &str, status: reqwest::StatusCode) -> Self {
        StoreError::Network(format!("{url} returned {status}"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
