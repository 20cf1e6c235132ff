//! Classification domain module.
//!
//! Types for the structured interpretation the classification backend
//! produces from a transcript, and the trait the backend is consumed
//! through.
//!
//! # Module Structure
//!
//! - `model`: classification payload types (`Intent`, `Action`,
//!   `ImmediateResponse`, `ClassifierResponse`, ...)
//! - `classifier`: the `IntentClassifier` trait

mod classifier;
mod model;

// Re-export public API
pub use classifier::IntentClassifier;
pub use model::{
    Action, ActionKind, ClassifierResponse, ImmediateResponse, Intent, IntentKind, ResponseTone,
    FALLBACK_MESSAGE,
};
