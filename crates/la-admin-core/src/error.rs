//! Error types for the la-admin core library.

use thiserror::Error;

use crate::http::RequestError;
use crate::session::StorageError;
use crate::validation::ValidationErrors;

/// Core error type for the administration client.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid payment: {0}")]
    InvalidPayment(String),
}

impl AdminError {
    /// Returns the request error if this failure came from the backend call.
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            AdminError::Request(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for la-admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
