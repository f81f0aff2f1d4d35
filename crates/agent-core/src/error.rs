//! Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Failures talking to a text-generation provider
#[derive(Error, Debug)]
pub enum AgentError {
    /// Connection refused, DNS failure, timeout
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// Any non-success status not covered below
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("provider rejected credentials: {0}")]
    Auth(String),

    /// The reply arrived but did not have the expected shape
    #[error("malformed provider reply: {0}")]
    MalformedReply(String),

    #[error("provider misconfigured: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Worth another attempt later: transport trouble, throttling, server-side failures
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::Unreachable(_) | AgentError::RateLimited(_) => true,
            AgentError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
