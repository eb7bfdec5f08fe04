//! OpenAI-compatible HTTP implementation of the completion service.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::DigestError;

use super::completion::{CompletionRequest, CompletionService};

/// Default chat-completions API base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`OpenAiCompletionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base API URL (e.g., `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model identifier sent in chat-completions requests.
    pub model: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OpenAiConfig {
    /// Constructs configuration with required API settings.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout,
        }
    }
}

/// OpenAI-compatible completion service.
///
/// The HTTP client is built once and reused for every request in a run.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionService {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiCompletionService {
    /// Creates a service from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Configuration`] when the API key is missing or
    /// the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, DigestError> {
        if config.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            return Err(missing_api_key());
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| DigestError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })?;
        Ok(Self { config, client })
    }

    /// Model identifier used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl CompletionService for OpenAiCompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<String, DigestError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(missing_api_key)?;
        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages: [
                ChatCompletionsMessage {
                    role: "system",
                    content: request.system(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: request.user(),
                },
            ],
            max_tokens: request.max_tokens(),
            temperature: request.temperature(),
        };

        tracing::debug!(
            model = payload.model,
            max_tokens = payload.max_tokens,
            "sending chat completion request"
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .map_err(|error| DigestError::Network {
                message: format!("AI request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), 160),
            );
            return Err(DigestError::Api {
                message: format!("AI request failed with status {}: {body}", status.as_u16()),
            });
        }

        let response_payload: ChatCompletionsResponse =
            response.json().map_err(|error| DigestError::Api {
                message: format!("AI response JSON decoding failed: {error}"),
            })?;

        response_payload
            .choices
            .first()
            .and_then(|choice| parse_content_value(&choice.message.content))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| DigestError::Api {
                message: "AI response did not contain assistant text".to_owned(),
            })
    }
}

fn missing_api_key() -> DigestError {
    DigestError::Configuration {
        message: concat!(
            "AI API key is required (use --ai-api-key, ",
            "PRDIGEST_AI_API_KEY, or OPENAI_API_KEY)"
        )
        .to_owned(),
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: [ChatCompletionsMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut chars = message.chars();
    let mut output: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        output.push_str("...");
    }
    output
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
