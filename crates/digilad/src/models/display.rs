use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// A message as shown in the assistant window. Created when a turn starts;
/// `content` is mutated in place while the reply streams and left alone once
/// the exchange completes or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Unix timestamp in milliseconds.
    pub created: i64,
}

impl DisplayMessage {
    fn new(role: Role, content: String) -> Self {
        DisplayMessage {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            created: Utc::now().timestamp_millis(),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content.into())
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content.into())
    }

    /// The empty placeholder shown while the assistant's reply streams in.
    pub fn pending_assistant() -> Self {
        Self::new(Role::Assistant, String::new())
    }

    /// Replace the content with the full accumulator value. Each stream
    /// increment overwrites the whole text rather than patching a diff.
    pub fn set_content(&mut self, content: &str) {
        self.content.clear();
        self.content.push_str(content);
    }
}
