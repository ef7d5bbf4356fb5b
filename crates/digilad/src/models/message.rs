use serde::{Deserialize, Serialize};

use super::role::Role;

/// A single message in a chat request. Immutable once constructed; ordering
/// within a request is meaningful and the relay forwards the sequence as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system<S: Into<String>>(content: S) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The body posted to the relay: an ordered conversation slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        ChatRequest { messages }
    }

    /// Build the request the assistant widget actually sends: the fixed
    /// system instruction plus the single latest user message. Prior turns
    /// are never replayed to the model, which keeps token usage bounded no
    /// matter how long the visible transcript grows.
    pub fn stateless<S: Into<String>, U: Into<String>>(system: S, user: U) -> Self {
        ChatRequest {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        }
    }
}
