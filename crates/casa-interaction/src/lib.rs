//! CASA interaction layer.
//!
//! The classification round-trip: an OpenAI-backed implementation of the
//! [`casa_core::classify::IntentClassifier`] trait, environment-based
//! configuration, and the [`ClassificationClient`] that wraps any
//! classifier with the retry/fallback policy.

pub mod client;
pub mod config;
pub mod openai;

pub use client::{ClassificationClient, MAX_ATTEMPTS, RATE_LIMIT_RETRY_DELAY};
pub use config::ClassifierConfig;
pub use openai::OpenAiClassifier;
