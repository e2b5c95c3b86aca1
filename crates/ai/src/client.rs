//! HTTP client for the chat-completions endpoint.

use serde::Deserialize;
use visabuddy_core::checklist::ChecklistItem;
use visabuddy_core::profile::ApplicantProfile;

use crate::parser;
use crate::prompt;

/// Sampling temperature: low, the output must follow a JSON template.
const TEMPERATURE: f64 = 0.3;

/// Upper bound on the completion size; a full checklist fits comfortably.
const MAX_TOKENS: u32 = 2000;

/// Configuration for the AI collaborator.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl AiClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Required | Default                     |
    /// |-------------------|----------|-----------------------------|
    /// | `AI_API_KEY`      | **yes**  | --                          |
    /// | `AI_BASE_URL`     | no       | `https://api.openai.com/v1` |
    /// | `AI_MODEL`        | no       | `gpt-4o-mini`               |
    /// | `AI_TIMEOUT_SECS` | no       | `30`                        |
    ///
    /// Returns `None` when `AI_API_KEY` is unset: the collaborator is
    /// optional and the engine degrades to failing checklists for keys
    /// without approved rules.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("AI_API_KEY").ok().filter(|k| !k.is_empty())?;
        let base_url = std::env::var("AI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let timeout_secs: u64 = std::env::var("AI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("AI_TIMEOUT_SECS must be a valid u64");
        Some(Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        })
    }
}

/// Errors from the AI collaborator layer.
#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("AI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not contain a parseable checklist.
    #[error("Malformed AI response: {0}")]
    Malformed(String),

    /// The response parsed but contained no usable items.
    #[error("AI returned an empty checklist")]
    EmptyChecklist,
}

/// Minimal view of a chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for one OpenAI-compatible endpoint.
pub struct AiClient {
    client: reqwest::Client,
    config: AiClientConfig,
}

impl AiClient {
    /// Create a client from configuration.
    pub fn new(config: AiClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Model identifier this client requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask the collaborator to draft a checklist for the given canonical
    /// key and applicant profile.
    ///
    /// Sends a `POST {base_url}/chat/completions` request and runs the
    /// response through extraction, parsing, and the empty-output check.
    /// Callers own retry policy and the minimum-size/critical-document
    /// invariants.
    pub async fn generate_checklist(
        &self,
        country_code: &str,
        visa_type: &str,
        profile: &ApplicantProfile,
    ) -> Result<Vec<ChecklistItem>, AiClientError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "messages": [
                {
                    "role": "system",
                    "content": prompt::system_prompt(country_code, visa_type),
                },
                {
                    "role": "user",
                    "content": prompt::user_message(country_code, visa_type, profile),
                },
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AiClientError::Malformed("response has no choices".to_string()))?;

        let items = parser::parse_checklist_response(content)
            .map_err(AiClientError::Malformed)?;

        if items.is_empty() {
            return Err(AiClientError::EmptyChecklist);
        }

        tracing::debug!(
            country_code,
            visa_type,
            item_count = items.len(),
            "AI collaborator returned a checklist"
        );
        Ok(items)
    }
}
