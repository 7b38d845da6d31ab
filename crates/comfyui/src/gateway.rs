//! The generation gateway: prompt in, image URL out.
//!
//! In mock mode (or when the connectivity probe fails) the gateway
//! resolves to a deterministic placeholder URL keyed by the seed after
//! a fixed artificial delay. In real mode it submits a workflow over
//! HTTP, waits on a single WebSocket connection for the completion
//! event matching the job's prompt id, then resolves the rendered
//! image from the history endpoint. There is no timeout on the socket
//! wait, no reconnect, and no retry: failures propagate to the caller.

use std::time::Duration;

use futures::StreamExt;
use rand::Rng;
use tokio_tungstenite::tungstenite::Message;

use director_core::prompt::{self, AssetReference};

use crate::api::{ComfyUIApi, ComfyUIApiError};
use crate::client::{ComfyUIClient, ComfyUIClientError, ComfyUIConnection};
use crate::messages::{parse_message, ComfyUIMessage};
use crate::workflow::{text_to_image_workflow, IMG2IMG_DENOISE, OUTPUT_NODE, TXT2IMG_DENOISE};

/// Number of candidate images generated per asset batch.
pub const CANDIDATE_FAN_OUT: usize = 4;

/// Artificial latency of the mock path.
const MOCK_DELAY: Duration = Duration::from_millis(1500);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which generation backend a gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// A ComfyUI instance on this machine.
    ComfyLocal,
    /// A remote ComfyUI instance.
    ComfyRemote,
    /// No backend: deterministic placeholder images.
    CloudMock,
}

impl std::str::FromStr for EngineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comfy_local" => Ok(EngineMode::ComfyLocal),
            "comfy_remote" => Ok(EngineMode::ComfyRemote),
            "cloud_mock" => Ok(EngineMode::CloudMock),
            other => Err(format!("unknown generation engine '{other}'")),
        }
    }
}

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base HTTP URL of the ComfyUI instance (no trailing slash).
    pub base_url: String,
    pub mode: EngineMode,
}

impl GenerationConfig {
    /// Load from the environment with local-development defaults.
    ///
    /// | Env Var             | Default                 |
    /// |---------------------|-------------------------|
    /// | `COMFYUI_URL`       | `http://127.0.0.1:8188` |
    /// | `GENERATION_ENGINE` | `cloud_mock`            |
    pub fn from_env() -> Self {
        let base_url = std::env::var("COMFYUI_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8188".into())
            .trim_end_matches('/')
            .to_string();

        let mode = std::env::var("GENERATION_ENGINE")
            .unwrap_or_else(|_| "cloud_mock".into())
            .parse()
            .expect("GENERATION_ENGINE must be comfy_local, comfy_remote, or cloud_mock");

        Self { base_url, mode }
    }
}

// ---------------------------------------------------------------------------
// Request / errors
// ---------------------------------------------------------------------------

/// One image-generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    /// Fixed seed; a random one is drawn when absent.
    pub seed: Option<i64>,
    /// Locked reference assets whose prompt fragments are prepended.
    pub references: Vec<AssetReference>,
    /// Start-frame URL when generating an end frame (image-to-image).
    pub input_image: Option<String>,
}

/// Errors surfaced by the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Api(#[from] ComfyUIApiError),

    #[error(transparent)]
    Connection(#[from] ComfyUIClientError),

    /// The status socket failed or closed before completion.
    #[error("WebSocket error: {0}")]
    Socket(String),

    /// ComfyUI reported an execution error for the job.
    #[error("Generation failed: {0}")]
    Execution(String),

    /// The history entry carried no rendered image.
    #[error("no image output found for prompt {0}")]
    NoOutput(String),
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Resolves prompts to image URLs against one configured backend.
pub struct GenerationGateway {
    api: ComfyUIApi,
    client: ComfyUIClient,
    client_id: String,
    mode: EngineMode,
}

impl GenerationGateway {
    pub fn new(config: GenerationConfig) -> Self {
        let ws_url = derive_ws_url(&config.base_url);
        Self {
            api: ComfyUIApi::new(config.base_url),
            client: ComfyUIClient::new(ws_url),
            client_id: format!("director-{}", uuid::Uuid::new_v4()),
            mode: config.mode,
        }
    }

    /// The deterministic placeholder URL for a seed.
    pub fn placeholder_url(seed: i64) -> String {
        format!("https://picsum.photos/seed/{seed}/800/450")
    }

    /// Generate one image and resolve its URL.
    pub async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let effective_prompt = prompt::with_references(&request.prompt, &request.references);
        let seed = request
            .seed
            .unwrap_or_else(|| rand::rng().random_range(0..1_000_000_000));

        if self.mode == EngineMode::CloudMock || !self.api.is_reachable().await {
            tracing::debug!(
                seed,
                img2img = request.input_image.is_some(),
                prompt = %truncate(&effective_prompt, 50),
                "Resolving mock placeholder image",
            );
            tokio::time::sleep(MOCK_DELAY).await;
            return Ok(Self::placeholder_url(seed));
        }

        let denoise = if request.input_image.is_some() {
            IMG2IMG_DENOISE
        } else {
            TXT2IMG_DENOISE
        };
        let workflow =
            text_to_image_workflow(&effective_prompt, &request.negative_prompt, seed, denoise);

        let submitted = self.api.submit_workflow(&workflow, &self.client_id).await?;
        tracing::info!(prompt_id = %submitted.prompt_id, seed, "Queued generation job");

        let mut connection = self.client.connect(&self.client_id).await?;
        self.await_completion(&mut connection, &submitted.prompt_id)
            .await?;

        let history = self.api.get_history(&submitted.prompt_id).await?;
        self.resolve_output(&history, &submitted.prompt_id)
    }

    /// Generate a candidate batch for an asset: a fixed fan-out of
    /// concurrent calls with consecutive seeds, joined all-or-nothing.
    /// Returns the URLs and the base seed of the batch.
    pub async fn generate_candidates(
        &self,
        prompt: &str,
        negative_prompt: &str,
    ) -> Result<(Vec<String>, i64), GenerationError> {
        let base_seed: i64 = rand::rng().random_range(0..100_000);
        let calls = (0..CANDIDATE_FAN_OUT).map(|i| {
            let request = GenerationRequest {
                prompt: prompt.to_string(),
                negative_prompt: negative_prompt.to_string(),
                seed: Some(base_seed + i as i64),
                references: Vec::new(),
                input_image: None,
            };
            async move { self.generate_image(&request).await }
        });

        let urls = futures::future::try_join_all(calls).await?;
        Ok((urls, base_seed))
    }

    // ---- private helpers ----

    /// Read status messages until the prompt completes.
    ///
    /// Completion is the `executing` event with an empty node and a
    /// matching prompt id. Events for other prompts and unknown message
    /// types are skipped. The wait is unbounded.
    async fn await_completion(
        &self,
        connection: &mut ComfyUIConnection,
        prompt_id: &str,
    ) -> Result<(), GenerationError> {
        while let Some(frame) = connection.ws_stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match parse_message(&text) {
                    Ok(ComfyUIMessage::Executing(data)) => {
                        if data.prompt_id == prompt_id && data.node.is_none() {
                            tracing::info!(prompt_id = %prompt_id, "Generation completed");
                            return Ok(());
                        }
                    }
                    Ok(ComfyUIMessage::ExecutionError(data)) => {
                        if data.prompt_id == prompt_id {
                            return Err(GenerationError::Execution(format!(
                                "{}: {}",
                                data.exception_type, data.exception_message
                            )));
                        }
                    }
                    Ok(ComfyUIMessage::Progress(data)) => {
                        tracing::debug!(
                            prompt_id = %prompt_id,
                            value = data.value,
                            max = data.max,
                            "Generation progress",
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping unparseable ComfyUI message");
                    }
                },
                // Binary frames are preview images; not consumed here.
                Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Close(frame)) => {
                    return Err(GenerationError::Socket(format!(
                        "connection closed before completion: {frame:?}"
                    )));
                }
                Err(e) => {
                    return Err(GenerationError::Socket(e.to_string()));
                }
            }
        }
        Err(GenerationError::Socket(
            "status stream ended before completion".to_string(),
        ))
    }

    /// Pull the first rendered image of the output node out of a
    /// history entry and build its view URL.
    fn resolve_output(
        &self,
        history: &serde_json::Value,
        prompt_id: &str,
    ) -> Result<String, GenerationError> {
        let image = history[prompt_id]["outputs"][OUTPUT_NODE]["images"]
            .get(0)
            .ok_or_else(|| GenerationError::NoOutput(prompt_id.to_string()))?;

        let field = |name: &str| {
            image[name]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| GenerationError::NoOutput(prompt_id.to_string()))
        };
        let filename = field("filename")?;
        let subfolder = field("subfolder")?;
        let kind = field("type")?;
        Ok(self.api.view_url(&filename, &subfolder, &kind))
    }
}

fn derive_ws_url(base_url: &str) -> String {
    if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{base_url}")
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_gateway() -> GenerationGateway {
        GenerationGateway::new(GenerationConfig {
            base_url: "http://127.0.0.1:8188".to_string(),
            mode: EngineMode::CloudMock,
        })
    }

    #[test]
    fn placeholder_url_is_deterministic_per_seed() {
        assert_eq!(
            GenerationGateway::placeholder_url(42),
            "https://picsum.photos/seed/42/800/450"
        );
        assert_eq!(
            GenerationGateway::placeholder_url(42),
            GenerationGateway::placeholder_url(42)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn mock_mode_resolves_placeholder_for_seed() {
        let gateway = mock_gateway();
        let request = GenerationRequest {
            prompt: "a detective".to_string(),
            seed: Some(42),
            ..Default::default()
        };
        let url = gateway.generate_image(&request).await.unwrap();
        assert_eq!(url, GenerationGateway::placeholder_url(42));

        // Same seed, same URL, every time.
        let again = gateway.generate_image(&request).await.unwrap();
        assert_eq!(again, url);
    }

    #[tokio::test(start_paused = true)]
    async fn candidate_batch_has_fixed_fan_out_with_consecutive_seeds() {
        let gateway = mock_gateway();
        let (urls, base_seed) = gateway
            .generate_candidates("a street", "blurry")
            .await
            .unwrap();

        assert_eq!(urls.len(), CANDIDATE_FAN_OUT);
        for (i, url) in urls.iter().enumerate() {
            assert_eq!(
                *url,
                GenerationGateway::placeholder_url(base_seed + i as i64)
            );
        }
    }

    #[test]
    fn ws_url_derivation() {
        assert_eq!(derive_ws_url("http://host:8188"), "ws://host:8188");
        assert_eq!(derive_ws_url("https://comfy.example.com"), "wss://comfy.example.com");
    }

    #[test]
    fn resolve_output_builds_view_url() {
        let gateway = mock_gateway();
        let history = serde_json::json!({
            "p-1": {
                "outputs": {
                    "9": {
                        "images": [
                            {"filename": "DirectorAI_00001_.png", "subfolder": "", "type": "output"}
                        ]
                    }
                }
            }
        });
        let url = gateway.resolve_output(&history, "p-1").unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:8188/view?filename=DirectorAI_00001_.png&subfolder=&type=output"
        );
    }

    #[test]
    fn resolve_output_without_images_is_an_error() {
        let gateway = mock_gateway();
        let history = serde_json::json!({ "p-1": { "outputs": {} } });
        assert!(matches!(
            gateway.resolve_output(&history, "p-1"),
            Err(GenerationError::NoOutput(_))
        ));
    }

    #[test]
    fn engine_mode_parses_from_env_strings() {
        assert_eq!("cloud_mock".parse::<EngineMode>().unwrap(), EngineMode::CloudMock);
        assert_eq!("comfy_local".parse::<EngineMode>().unwrap(), EngineMode::ComfyLocal);
        assert!("midjourney".parse::<EngineMode>().is_err());
    }
}
