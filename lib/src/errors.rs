// lib/src/errors.rs

use thiserror::Error;

use bincode::error::{DecodeError, EncodeError};
use models::errors::ValidationError;
use serde_json::Error as SerdeJsonError;

#[derive(Debug, Error)]
pub enum MediAlertError {
    #[error("Database operation failed: {0}")]
    StorageError(String),

    #[error("Invalid input or data: {0}")]
    InvalidData(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Already Exists: {0}")]
    AlreadyExists(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Bincode decode error: {0}")]
    BincodeDecode(#[from] DecodeError),
    #[error("Bincode encode error: {0}")]
    BincodeEncode(#[from] EncodeError),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] SerdeJsonError),
}

pub type Result<T> = std::result::Result<T, MediAlertError>;

impl From<sled::Error> for MediAlertError {
    fn from(err: sled::Error) -> Self {
        MediAlertError::StorageError(err.to_string())
    }
}

impl From<reqwest::Error> for MediAlertError {
    fn from(err: reqwest::Error) -> Self {
        MediAlertError::NetworkError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for MediAlertError {
    fn from(err: tokio::task::JoinError) -> Self {
        MediAlertError::InternalError(format!("Async task join error: {}", err))
    }
}
