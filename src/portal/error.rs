//! Portal client errors
//!
//! Every fallible operation in the client runtime returns `PortalError`.
//! Callers turn it into an inline message or a silent no-op; nothing here
//! is allowed to bring the UI down.

use thiserror::Error;

use crate::shared::{ConfigError, SharedError, TierTransition};

/// Result alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Transport failure (connection refused, timeout, TLS, body decode)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status other than 401
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered 401; the session has already been cleared
    #[error("Session expired or invalid")]
    Unauthorized,

    /// Operation needs a session but none is present
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Operation needs an admin session
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Backend returned a body that does not satisfy the contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Requested tier change refused before any request was sent
    #[error("{}", .0.message())]
    TierRejected(TierTransition),

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PortalError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Validation failures are shown inline next to the field
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Shared(SharedError::ValidationError { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::MembershipTier;

    #[test]
    fn test_tier_rejected_display_uses_transition_message() {
        let err = PortalError::TierRejected(TierTransition::check(
            MembershipTier::Corporate,
            MembershipTier::Student,
        ));
        assert!(err.to_string().contains("cannot downgrade"));
    }

    #[test]
    fn test_validation_detection() {
        let err: PortalError = SharedError::validation("email", "bad").into();
        assert!(err.is_validation());
        assert!(!PortalError::Unauthorized.is_validation());
        assert!(PortalError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn test_status_display() {
        let err = PortalError::status(500, "boom");
        assert_eq!(err.to_string(), "Request failed with status 500: boom");
    }
}
