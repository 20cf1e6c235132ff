//! Error types for the CASA pipeline.

use crate::classify::ActionKind;
use thiserror::Error;

/// A shared error type for the entire CASA workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum CasaError {
    /// Transport or backend fault from the classification backend.
    ///
    /// `rate_limited` marks errors that the retry policy is allowed to
    /// wait out (HTTP 429 and friends).
    #[error("Classification backend error{}: {message}", status_label(.status_code))]
    Backend {
        status_code: Option<u16>,
        message: String,
        rate_limited: bool,
    },

    /// The backend answered, but the structured payload was absent or
    /// unparsable.
    #[error("Malformed classification payload: {0}")]
    MalformedPayload(String),

    /// No executor is registered for an action kind.
    ///
    /// This is a configuration fault, not a transient condition.
    #[error("No executor registered for action kind {kind}")]
    UnregisteredAction { kind: ActionKind },

    /// An action executor failed while running.
    #[error("Action {kind} failed: {message}")]
    ActionFailed { kind: ActionKind, message: String },

    /// Catalog collaborator fault (product lookup/listing failed).
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Entity not found error with type information.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error (missing API key, bad base URL, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

impl CasaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a backend error without a status code (transport-level).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Backend {
            status_code: None,
            message: message.into(),
            rate_limited: false,
        }
    }

    /// Creates a backend error from an HTTP status.
    pub fn backend_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status_code: Some(status_code),
            message: message.into(),
            rate_limited: status_code == 429,
        }
    }

    /// Creates a rate-limited backend error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::Backend {
            status_code: Some(429),
            message: message.into(),
            rate_limited: true,
        }
    }

    /// Creates a MalformedPayload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    /// Creates an ActionFailed error.
    pub fn action_failed(kind: ActionKind, message: impl Into<String>) -> Self {
        Self::ActionFailed {
            kind,
            message: message.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the retry policy may wait this error out.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Backend {
                rate_limited: true,
                ..
            }
        )
    }

    /// Check if this is a classification failure (transport, status, or
    /// payload) that degrades to the fallback response.
    pub fn is_classification_fault(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::MalformedPayload(_))
    }

    /// Check if this is a dispatcher configuration fault.
    pub fn is_config_fault(&self) -> bool {
        matches!(self, Self::UnregisteredAction { .. })
    }

    /// Check if this is an action execution fault.
    pub fn is_execution_fault(&self) -> bool {
        matches!(self, Self::ActionFailed { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CasaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CasaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CasaError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::backend_status(status.as_u16(), err.to_string()),
            None => Self::transport(err.to_string()),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for CasaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, CasaError>`.
pub type Result<T> = std::result::Result<T, CasaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_detection() {
        assert!(CasaError::rate_limited("slow down").is_rate_limited());
        assert!(CasaError::backend_status(429, "too many requests").is_rate_limited());
        assert!(!CasaError::backend_status(500, "boom").is_rate_limited());
        assert!(!CasaError::transport("connection refused").is_rate_limited());
    }

    #[test]
    fn test_fault_categories_are_distinct() {
        let config = CasaError::UnregisteredAction {
            kind: ActionKind::ShowComparison,
        };
        let execution = CasaError::action_failed(ActionKind::UpdateCart, "cart unavailable");

        assert!(config.is_config_fault());
        assert!(!config.is_execution_fault());
        assert!(execution.is_execution_fault());
        assert!(!execution.is_config_fault());
    }

    #[test]
    fn test_backend_error_message_includes_status() {
        let err = CasaError::backend_status(503, "unavailable");
        assert_eq!(
            err.to_string(),
            "Classification backend error (status 503): unavailable"
        );
    }
}
