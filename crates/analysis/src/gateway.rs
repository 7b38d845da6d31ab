//! REST client for the hosted language model.
//!
//! One blocking request per analysis: the script text rides as content,
//! the parsing-rule instruction as the system instruction, and the
//! fixed schema as the structured-output constraint. The response text
//! is decoded and validated before any domain object is built; there is
//! no retry on schema mismatch.

use director_core::error::CoreError;
use director_core::parsing_rule::DEFAULT_SYSTEM_INSTRUCTION;
use director_core::script_analysis::{self, ScriptAnalysis};
use serde_json::{json, Value};

use crate::schema;

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the model API (no trailing slash).
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// API key; analysis calls fail with a configuration error when absent.
    pub api_key: Option<String>,
}

impl AnalysisConfig {
    /// Load from the environment with hosted defaults.
    ///
    /// | Env Var          | Default                                      |
    /// |------------------|----------------------------------------------|
    /// | `GEMINI_API_URL` | `https://generativelanguage.googleapis.com`  |
    /// | `GEMINI_MODEL`   | `gemini-2.5-flash`                           |
    /// | `GEMINI_API_KEY` | unset                                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into())
            .trim_end_matches('/')
            .to_string();
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        Self {
            base_url,
            model,
            api_key,
        }
    }
}

/// Errors surfaced by the analysis gateway.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The gateway is not configured with an API key.
    #[error("analysis gateway is not configured: {0}")]
    Configuration(String),

    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no text to decode.
    #[error("model response contained no text")]
    EmptyResponse,

    /// The response text failed schema validation.
    #[error("invalid analysis response: {0}")]
    Schema(#[source] CoreError),
}

/// Turns raw script text into a typed production plan.
pub struct ScriptAnalysisGateway {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl ScriptAnalysisGateway {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Analyze a script.
    ///
    /// `instruction_override` replaces the default system instruction;
    /// callers pass a parsing rule's instruction here.
    pub async fn parse(
        &self,
        script_text: &str,
        instruction_override: Option<&str>,
    ) -> Result<ScriptAnalysis, AnalysisError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AnalysisError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        };
        let instruction = instruction_override.unwrap_or(DEFAULT_SYSTEM_INSTRUCTION);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(script_text, instruction))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), body = %body, "Model API error");
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        let text = extract_text(&value).ok_or(AnalysisError::EmptyResponse)?;

        script_analysis::decode_text(text).map_err(AnalysisError::Schema)
    }
}

/// Build the `generateContent` request body.
fn request_body(script_text: &str, instruction: &str) -> Value {
    json!({
        "system_instruction": {
            "parts": [{ "text": instruction }]
        },
        "contents": [{
            "parts": [{ "text": script_text }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema::response_schema(),
        }
    })
}

/// Pull the generated text out of a `generateContent` response.
fn extract_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"].as_str()
}
