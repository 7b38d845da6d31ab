//! WebSocket client for the ComfyUI job-status stream.

use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Configuration handle for the WebSocket side of a ComfyUI instance.
pub struct ComfyUIClient {
    ws_url: String,
}

/// A live WebSocket connection scoped to one client id.
///
/// ComfyUI addresses job-status events to the client id given in the
/// handshake, so the id here must match the one used when the workflow
/// was submitted over HTTP.
pub struct ComfyUIConnection {
    pub client_id: String,
    pub ws_stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl ComfyUIClient {
    /// Create a client targeting a WebSocket base URL,
    /// e.g. `ws://host:8188`.
    pub fn new(ws_url: String) -> Self {
        Self { ws_url }
    }

    /// WebSocket base URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the status stream as the given client id.
    pub async fn connect(&self, client_id: &str) -> Result<ComfyUIConnection, ComfyUIClientError> {
        let url = format!("{}/ws?clientId={}", self.ws_url, client_id);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            ComfyUIClientError::Connection(format!(
                "failed to connect to ComfyUI at {}: {e}",
                self.ws_url
            ))
        })?;

        tracing::info!(client_id = %client_id, "Connected to ComfyUI at {}", self.ws_url);

        Ok(ComfyUIConnection {
            client_id: client_id.to_string(),
            ws_stream,
        })
    }
}

/// Errors from the WebSocket client.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIClientError {
    /// Failed to establish the initial WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}
