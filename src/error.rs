// Error handling module
// Defines the error taxonomy returned to embedding applications

use reqwest::Method;
use thiserror::Error;

/// Errors that can occur while talking to the Health CRM
#[derive(Error, Debug)]
pub enum HealthCrmError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login or token refresh failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport only speaks GET, POST and PATCH
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),

    /// Network failure, timeout or malformed request
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// CRM answered with a status other than the expected one
    #[error("Health CRM error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Arguments rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HealthCrmError {
    /// Status code of a `Status` error
    pub fn status(&self) -> Option<u16> {
        match self {
            HealthCrmError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        HealthCrmError::Validation(msg.into())
    }
}

/// Result type alias for Health CRM operations
pub type Result<T> = std::result::Result<T, HealthCrmError>;
