//! Gateway client configuration

use std::time::Duration;

use crate::{GatewayClient, GatewayError};

/// Reconnect backoff policy for the push channel
///
/// The delay doubles after every failed attempt and saturates at
/// `max_delay`. A successful connection resets it to `initial_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    /// Next delay after a failed attempt.
    pub fn next_delay(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_delay)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(120),
        }
    }
}

/// Configuration for connecting to the appointment Gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Push channel reconnect policy
    pub reconnect: ReconnectPolicy,
}

impl GatewayConfig {
    /// Create a new configuration with default timeout and backoff.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the push channel reconnect policy
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Create a Gateway client from this configuration
    pub fn build_client(&self) -> Result<GatewayClient, GatewayError> {
        GatewayClient::new(self)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
