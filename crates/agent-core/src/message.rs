//! Chat Messages
//!
//! The `{role, content}` pairs chat-completion endpoints take as input.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Instruction plus a single request, the shape every wallet agent sends
    pub fn prompt(instructions: impl Into<String>, request: impl Into<String>) -> [Self; 2] {
        [Self::system(instructions), Self::user(request)]
    }
}
