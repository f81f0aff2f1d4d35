//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` for any server that speaks the
//! `/chat/completions` protocol.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base URL including the API version path, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Bearer token, if the endpoint wants one
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 120,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// `Ok(None)` when `LLM_BASE_URL` is unset
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let Some(base_url) = lookup("LLM_BASE_URL").filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        let api_key = lookup("LLM_API_KEY").filter(|v| !v.trim().is_empty());
        let timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| AgentError::Config(format!("LLM_TIMEOUT_SECS '{raw}': {e}")))?,
            None => 120,
        };

        Ok(Some(Self {
            base_url,
            api_key,
            timeout_secs,
        }))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Provider for OpenAI-compatible chat-completion endpoints
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiCompatProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_request<'a>(messages: &'a [Message], options: &'a GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
            response_format: options
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        }
    }

    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::MalformedReply("response has no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

fn status_error(status: reqwest::StatusCode, body: String) -> AgentError {
    match status.as_u16() {
        401 | 403 => AgentError::Auth(body),
        429 => AgentError::RateLimited(body),
        code => AgentError::Status { status: code, body },
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn health_check(&self) -> Result<bool> {
        let request = self.authorize(self.client.get(self.config.endpoint("models")));
        match request.send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("text-generation health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
        let body = Self::build_request(messages, options);
        let request = self
            .authorize(self.client.post(self.config.endpoint("chat/completions")))
            .json(&body);

        tracing::debug!(model = %options.model, messages = messages.len(), "sending chat completion");

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::MalformedReply(e.to_string()))?;

        Self::convert_completion(parsed, &options.model)
    }
}
