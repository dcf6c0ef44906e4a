//! BLS Client - HTTP client for the appointment Gateway
//!
//! Provides the REST calls the console issues against the Gateway API,
//! plus the WebSocket push channel used for live updates.

pub mod config;
pub mod error;
pub mod http;
pub mod push;

pub use config::{GatewayConfig, ReconnectPolicy};
pub use error::{GatewayError, GatewayResult};
pub use http::GatewayClient;
pub use push::PushStream;
