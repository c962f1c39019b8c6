//! Error taxonomy for the orchestration core.
//!
//! Every caller-visible failure is one of the `ChatError` variants; the
//! API layer maps them onto HTTP status codes. Provider failures carry a
//! retryability classification via [`GenerationError::is_transient`].

use thiserror::Error;

/// Errors from the generation provider.
///
/// Transient variants are retried by the orchestrator within a bounded
/// budget; permanent variants surface immediately.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider call timed out after {0}ms")]
    Timeout(u64),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("content blocked by provider: {0}")]
    ContentBlocked(String),

    #[error("malformed provider response: {0}")]
    Deserialization(String),
}

impl GenerationError {
    /// Whether the orchestrator may retry this failure.
    ///
    /// Timeouts, rate limits, overload, and transport errors are transient;
    /// auth failures, invalid parameters, content rejection, and malformed
    /// responses are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout(_)
                | GenerationError::RateLimited { .. }
                | GenerationError::Overloaded(_)
                | GenerationError::Network(_)
        )
    }
}

/// Errors from the durable conversation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Errors building the persona catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid persona definition: {0}")]
    InvalidPersona(String),

    #[error("duplicate persona key: '{0}'")]
    DuplicateKey(String),

    #[error("catalog is empty")]
    Empty,
}

/// Caller-visible errors from orchestrator operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("persona '{0}' not found")]
    PersonaNotFound(String),

    #[error("session '{0}' not found")]
    SessionNotFound(uuid::Uuid),

    #[error("record '{0}' not found")]
    RecordNotFound(uuid::Uuid),

    #[error("session '{0}' has a send in flight")]
    SessionBusy(uuid::Uuid),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("storage failed: {0}")]
    Storage(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GenerationError::Timeout(30_000).is_transient());
        assert!(
            GenerationError::RateLimited {
                retry_after_ms: Some(500)
            }
            .is_transient()
        );
        assert!(GenerationError::Overloaded("503".to_string()).is_transient());
        assert!(GenerationError::Network("reset".to_string()).is_transient());
    }

    #[test]
    fn test_permanent_classification() {
        assert!(!GenerationError::AuthenticationFailed.is_transient());
        assert!(!GenerationError::InvalidRequest("bad temp".to_string()).is_transient());
        assert!(!GenerationError::ContentBlocked("safety".to_string()).is_transient());
        assert!(!GenerationError::Deserialization("bad json".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ChatError::PersonaNotFound("poet".to_string());
        assert_eq!(err.to_string(), "persona 'poet' not found");
    }
}
