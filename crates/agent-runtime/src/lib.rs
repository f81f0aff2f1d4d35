//! # agent-runtime
//!
//! Runtime providers for the wallet analysis agents.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (default): any `/v1/chat/completions` endpoint,
//!   hosted or self-served (vLLM, Ollama, RunPod serverless, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{OpenAiCompatProvider, OpenAiConfig};
//!
//! if let Some(config) = OpenAiConfig::from_env()? {
//!     let provider = Arc::new(OpenAiCompatProvider::new(config)?);
//! }
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiCompatProvider, OpenAiConfig};

// Re-export core types for convenience
pub use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};
