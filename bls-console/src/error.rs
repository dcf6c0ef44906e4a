//! Console error types

use thiserror::Error;

use bls_client::GatewayError;

/// Console error type
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Gateway call failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Catalog served by the Gateway is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Location is not part of the catalog
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Category exists but is not offered at the draft's location
    #[error("Category '{category}' is not offered at {location}")]
    CategoryOutsideLocation { category: String, location: String },

    /// A booking submission is already in flight
    #[error("A booking submission is already in flight")]
    SubmitInFlight,
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
