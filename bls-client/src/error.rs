//! Gateway client error types

use thiserror::Error;

/// Errors from talking to the appointment Gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request never produced a usable response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Push channel could not be established
    #[error("Push channel error: {0}")]
    Channel(String),

    /// Gateway wants credentials this client did not send
    #[error("Gateway requires authentication")]
    Unauthorized,

    /// Gateway refused the operation
    #[error("Gateway denied the request: {0}")]
    Forbidden(String),

    /// Entity does not exist on the Gateway
    #[error("Gateway has no such resource: {0}")]
    NotFound(String),

    /// Gateway rejected the payload as invalid
    #[error("Gateway rejected the request: {0}")]
    Validation(String),

    /// Gateway-side failure
    #[error("Gateway failed: {0}")]
    Internal(String),

    /// Response body did not match the expected shape
    #[error("Malformed Gateway response: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
