//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// Represents the role of a turn in a conversation.
///
/// Serialized lowercase to match the chat-completion wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Turn from the user.
    User,
    /// Turn from the AI assistant.
    Assistant,
    /// System-generated turn (instructions).
    System,
}

impl TurnRole {
    /// Returns the wire-format name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single turn in a conversation history.
///
/// Turns are immutable once appended to a session; ordering is
/// chronological by append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the speaker.
    pub role: TurnRole,
    /// The content of the turn.
    pub content: String,
    /// Timestamp when the turn was created (RFC 3339).
    pub timestamp: String,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }
}
