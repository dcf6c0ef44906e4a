//! Push channel transport
//!
//! The Gateway exposes its push channel at `/ws` on the same host as
//! the REST API. Frame handling lives with the consumer; this module
//! only opens the stream.

use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::{GatewayClient, GatewayError};

/// Connected WebSocket stream for the Gateway push channel
pub type PushStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

impl GatewayClient {
    /// WebSocket URL derived from the base URL.
    pub fn push_url(&self) -> String {
        // Convert http(s):// to ws(s)://
        let ws_base = self
            .base_url()
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        format!("{ws_base}/ws")
    }

    /// Open the Gateway push channel.
    pub async fn connect_push(&self) -> Result<PushStream, GatewayError> {
        let url = self.push_url();
        tracing::debug!(url = %url, "connecting to push channel");

        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| GatewayError::Channel(e.to_string()))?;

        Ok(stream)
    }
}
