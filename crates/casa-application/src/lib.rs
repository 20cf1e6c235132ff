//! CASA application layer.
//!
//! Orchestrates the conversation/action pipeline: the `ActionDispatcher`
//! registry with its built-in executors, and the `ConversationManager`
//! that drives one classification cycle per user input.

pub mod conversation;
pub mod dispatcher;
pub mod executors;

pub use conversation::{ConversationManager, CyclePhase};
pub use dispatcher::{ActionDispatcher, ActionExecutor};
pub use executors::default_dispatcher;
