//! Classification client with retry and fallback policy.

use casa_core::classify::{ClassifierResponse, IntentClassifier};
use casa_core::session::Turn;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Maximum attempts for one classification request.
pub const MAX_ATTEMPTS: u32 = 3;

/// Flat pause between rate-limited attempts.
///
/// No exponential growth, no jitter: a flat back-off is sufficient for the
/// target request volume.
pub const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Wraps an [`IntentClassifier`] with the failure policy of the pipeline.
///
/// Rate-limited errors are retried up to [`MAX_ATTEMPTS`] times with a
/// flat [`RATE_LIMIT_RETRY_DELAY`] pause in between. Any other failure,
/// and exhaustion of the retry budget, degrades to
/// [`ClassifierResponse::fallback`] — the conversation manager always
/// receives a well-formed response and the user never sees a raw failure.
#[derive(Clone)]
pub struct ClassificationClient {
    classifier: Arc<dyn IntentClassifier>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl ClassificationClient {
    /// Creates a client with the production retry policy.
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            classifier,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RATE_LIMIT_RETRY_DELAY,
        }
    }

    /// Overrides the pause between rate-limited attempts.
    ///
    /// Intended for tests; the attempt count stays fixed.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Classifies the transcript, degrading to the fallback response on
    /// failure.
    pub async fn classify(&self, turns: &[Turn]) -> ClassifierResponse {
        for attempt in 1..=self.max_attempts {
            match self.classifier.classify(turns).await {
                Ok(response) => return response,
                Err(err) if err.is_rate_limited() && attempt < self.max_attempts => {
                    tracing::warn!(
                        target: "classify",
                        "Rate limit hit, attempt {}/{}. Waiting {}s before retry",
                        attempt,
                        self.max_attempts,
                        self.retry_delay.as_secs()
                    );
                    sleep(self.retry_delay).await;
                }
                Err(err) => {
                    tracing::error!(
                        target: "classify",
                        "Classification failed on attempt {}/{}: {}",
                        attempt,
                        self.max_attempts,
                        err
                    );
                    return ClassifierResponse::fallback();
                }
            }
        }
        ClassifierResponse::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use casa_core::classify::IntentKind;
    use casa_core::{CasaError, Result};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Classifier that fails a configurable number of times before
    /// succeeding, recording every attempt.
    struct FlakyClassifier {
        calls: AtomicU32,
        failures: u32,
        error: fn() -> CasaError,
    }

    impl FlakyClassifier {
        fn rate_limited(failures: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                error: || CasaError::rate_limited("Rate limit exceeded"),
            }
        }

        fn transport(failures: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                error: || CasaError::transport("connection refused"),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IntentClassifier for FlakyClassifier {
        async fn classify(&self, _turns: &[Turn]) -> Result<ClassifierResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err((self.error)())
            } else {
                let mut response = ClassifierResponse::fallback();
                response.intent.kind = IntentKind::Greeting;
                response.intent.confidence = 1.0;
                Ok(response)
            }
        }
    }

    fn fast_client(classifier: Arc<FlakyClassifier>) -> ClassificationClient {
        ClassificationClient::new(classifier).with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let classifier = Arc::new(FlakyClassifier::rate_limited(0));
        let client = fast_client(classifier.clone());

        let response = client.classify(&[Turn::user("hi")]).await;

        assert_eq!(response.intent.kind, IntentKind::Greeting);
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_retries_then_succeeds() {
        let classifier = Arc::new(FlakyClassifier::rate_limited(2));
        let client = fast_client(classifier.clone());

        let response = client.classify(&[Turn::user("hi")]).await;

        assert_eq!(response.intent.kind, IntentKind::Greeting);
        assert_eq!(classifier.calls(), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion_degrades_to_fallback() {
        let classifier = Arc::new(FlakyClassifier::rate_limited(10));
        let client = fast_client(classifier.clone());

        let response = client.classify(&[Turn::user("hi")]).await;

        assert_eq!(classifier.calls(), MAX_ATTEMPTS);
        assert_eq!(response.intent.kind, IntentKind::Unknown);
        assert_eq!(response.intent.confidence, 0.0);
        assert!(response.actions.is_empty());
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_falls_back_without_retry() {
        let classifier = Arc::new(FlakyClassifier::transport(10));
        let client = fast_client(classifier.clone());

        let response = client.classify(&[Turn::user("hi")]).await;

        assert_eq!(classifier.calls(), 1);
        assert_eq!(response, ClassifierResponse::fallback());
    }
}
