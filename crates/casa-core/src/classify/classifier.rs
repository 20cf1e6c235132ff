//! Classification backend interface.

use super::model::ClassifierResponse;
use crate::error::Result;
use crate::session::Turn;
use async_trait::async_trait;

/// Interface to the classification backend.
///
/// Implementations send the bounded transcript to a language-model backend
/// and parse the structured result. They are stateless across invocations
/// and must not mutate the input; retry and fallback policy live in the
/// wrapping classification client, not here.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classifies the given transcript into a structured response.
    ///
    /// # Errors
    ///
    /// Returns a `Backend` error on transport failures or non-success
    /// statuses (with `rate_limited` set when the backend signals rate
    /// limiting), and `MalformedPayload` when the structured result is
    /// absent or unparsable.
    async fn classify(&self, turns: &[Turn]) -> Result<ClassifierResponse>;
}
