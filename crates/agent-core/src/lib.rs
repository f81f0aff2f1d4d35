//! # agent-core
//!
//! Provider-agnostic access to a text-generation service.
//!
//! ```text
//! ┌──────────────────┐   messages    ┌─────────────────────┐
//! │  Wallet agents   │──────────────▶│   LlmProvider       │
//! │  (age, trends)   │◀──────────────│   (Strategy)        │
//! └──────────────────┘   completion  └─────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets agents run against any OpenAI-compatible
//! endpoint, a local model server, or a scripted stand-in in tests.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
