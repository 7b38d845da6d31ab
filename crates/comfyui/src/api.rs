//! REST client for the ComfyUI HTTP endpoints.

use std::time::Duration;

use serde::Deserialize;

/// How long the connectivity probe waits before declaring the
/// instance unreachable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by `POST /prompt` after queuing a workflow.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued prompt.
    pub prompt_id: String,
}

/// Errors from the ComfyUI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ComfyUIApi {
    /// Create an API client for the given base HTTP URL,
    /// e.g. `http://host:8188`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Base HTTP URL of this instance.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Liveness probe: `GET /system_stats` with a short timeout.
    ///
    /// Any failure (timeout, refused connection, non-2xx) reads as
    /// unreachable; the gateway then falls back to the mock path
    /// without surfacing an error.
    pub async fn is_reachable(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/system_stats", self.api_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "ComfyUI connectivity probe failed");
                false
            }
        }
    }

    /// Submit a workflow for execution: `POST /prompt`.
    ///
    /// The `client_id` correlates the submission with the WebSocket
    /// connection that will observe its status events.
    pub async fn submit_workflow(
        &self,
        workflow: &serde_json::Value,
        client_id: &str,
    ) -> Result<SubmitResponse, ComfyUIApiError> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": client_id,
        });

        let response = self
            .client
            .post(format!("{}/prompt", self.api_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve execution history for a prompt: `GET /history/{id}`.
    pub async fn get_history(
        &self,
        prompt_id: &str,
    ) -> Result<serde_json::Value, ComfyUIApiError> {
        let response = self
            .client
            .get(format!("{}/history/{}", self.api_url, prompt_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Build the URL that serves a rendered image from the instance's
    /// output directory.
    pub fn view_url(&self, filename: &str, subfolder: &str, kind: &str) -> String {
        format!(
            "{}/view?filename={filename}&subfolder={subfolder}&type={kind}",
            self.api_url
        )
    }

    // ---- private helpers ----

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ComfyUIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ComfyUIApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
