//! Session domain module.
//!
//! This module contains the conversation session state: the bounded turn
//! history and the accumulated conversation context.
//!
//! # Module Structure
//!
//! - `turn`: conversation turn types (`TurnRole`, `Turn`)
//! - `context`: accumulated conversation context (`ConversationContext`)
//! - `model`: the session entity (`Session`)

mod context;
mod model;
mod turn;

// Re-export public API
pub use context::ConversationContext;
pub use model::{Session, MAX_TURNS};
pub use turn::{Turn, TurnRole};
