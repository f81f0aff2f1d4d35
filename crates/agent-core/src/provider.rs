//! Text-Generation Providers
//!
//! Agents hold an `Arc<dyn LlmProvider>` and never see which backend
//! answers. Completions are single, non-streaming requests.
//!
//! ```rust,ignore
//! let options = GenerationOptions::default().json();
//! let reply = provider.complete(&Message::prompt(INSTRUCTIONS, request), &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Sampling settings sent with every request
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
    pub model: String,

    pub temperature: f32,

    pub top_p: f32,

    /// Upper bound on reply length
    pub max_tokens: u32,

    /// Request a JSON object reply from providers that can enforce it
    pub json_response: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 1024,
            json_response: false,
        }
    }
}

impl GenerationOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Why the provider stopped generating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn parse(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A finished reply
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,

    /// Model that actually answered, which may differ from the one requested
    pub model: String,

    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Plain reply that ran to completion
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        }
    }

    /// Cut off by `max_tokens`
    pub fn truncated(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(false)` when reachable but not serving; errors are for misconfiguration
    async fn health_check(&self) -> Result<bool>;

    async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion>;
}
