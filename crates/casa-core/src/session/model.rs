//! Session domain model.
//!
//! The `Session` is the bounded conversation state (turns + context) for
//! one ongoing interaction. It lives in memory only and is discarded with
//! the owning process.

use super::context::ConversationContext;
use super::turn::Turn;
use serde::{Deserialize, Serialize};

/// Maximum number of turns kept in the sliding window.
pub const MAX_TURNS: usize = 10;

/// The bounded conversation state for one ongoing interaction.
///
/// Owned exclusively by one conversation; mutation goes through the
/// conversation manager's cycle steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format).
    pub id: String,
    /// Turn history, oldest first, bounded to [`MAX_TURNS`].
    pub turns: Vec<Turn>,
    /// Context accumulated across cycles.
    pub context: ConversationContext,
    /// Timestamp when the session was created (RFC 3339).
    pub created_at: String,
    /// Timestamp when the session was last updated (RFC 3339).
    pub updated_at: String,
}

impl Session {
    /// Creates a fresh session with an empty history.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            turns: Vec::new(),
            context: ConversationContext::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Appends a turn, evicting the oldest turns beyond the window bound.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        if self.turns.len() > MAX_TURNS {
            let overflow = self.turns.len() - MAX_TURNS;
            self.turns.drain(..overflow);
        }
        self.touch();
    }

    /// Merges a context update into the accumulated context.
    pub fn merge_context(&mut self, update: ConversationContext) {
        self.context.merge(update);
        self.touch();
    }

    /// Discards all turns and context, starting a fresh conversation.
    ///
    /// The session id is kept; only the conversational state resets.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.context = ConversationContext::default();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_turn_keeps_window_bounded() {
        let mut session = Session::new();
        for i in 0..25 {
            session.push_turn(Turn::user(format!("message {i}")));
            assert!(session.turns.len() <= MAX_TURNS);
        }
        assert_eq!(session.turns.len(), MAX_TURNS);
        // Oldest turns were evicted first
        assert_eq!(session.turns[0].content, "message 15");
        assert_eq!(session.turns[MAX_TURNS - 1].content, "message 24");
    }

    #[test]
    fn test_turns_stay_in_chronological_order() {
        let mut session = Session::new();
        for i in 0..12 {
            session.push_turn(Turn::user(format!("m{i}")));
        }
        let stamps: Vec<&str> = session
            .turns
            .iter()
            .map(|t| t.timestamp.as_str())
            .collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
    }

    #[test]
    fn test_clear_resets_state_but_keeps_id() {
        let mut session = Session::new();
        let id = session.id.clone();
        session.push_turn(Turn::user("hello"));
        session.merge_context(ConversationContext {
            remembered_items: Some(vec!["tv".to_string()]),
            ..Default::default()
        });

        session.clear();

        assert_eq!(session.id, id);
        assert!(session.turns.is_empty());
        assert!(session.context.is_empty());
    }
}
