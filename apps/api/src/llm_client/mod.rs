//! LLM Client — the single point of entry for all completion-service calls.
//!
//! No other module talks to Azure OpenAI directly. Callers depend on the
//! `CompletionService` trait so handlers can run against a stub in tests.
//!
//! There is no retry or backoff here: a failed call is reported once and the
//! caller decides how to surface it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CompletionConfig;

pub mod error;
pub mod prompts;
#[cfg(test)]
pub mod testing;

pub use error::{LlmError, UpstreamFailure};

/// One chat completion call: a fixed system instruction plus a task prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: &'static str,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that can turn a `CompletionRequest` into generated text.
///
/// `Ok(None)` means the service answered but produced no completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AzureError {
    error: AzureErrorBody,
}

#[derive(Debug, Deserialize)]
struct AzureErrorBody {
    code: Option<serde_json::Value>,
    message: Option<String>,
}

/// Azure OpenAI chat completions client bound to one deployment.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig) -> Result<Self, LlmError> {
        for (name, value) in [
            ("endpoint", &config.endpoint),
            ("API key", &config.api_key),
            ("deployment name", &config.deployment),
        ] {
            if value.trim().is_empty() {
                return Err(LlmError::Configuration(format!(
                    "Azure OpenAI {name} must be defined"
                )));
            }
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        let url = config.chat_completions_url();

        info!(
            endpoint = %config.endpoint,
            deployment = %config.deployment,
            api_version = %config.api_version,
            model = %config.model,
            "Completion client targeting {url}"
        );

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, LlmError> {
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion.text().map(String::from))
    }
}

/// Builds a typed error from a non-2xx response, keeping the upstream code when present.
fn api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<AzureError>(body) {
        Ok(parsed) => LlmError::Api {
            status,
            code: parsed.error.code.map(|c| match c {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            message: parsed.error.message.unwrap_or_else(|| body.to_string()),
        },
        Err(_) => LlmError::Api {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
