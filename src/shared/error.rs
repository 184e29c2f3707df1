//! Shared Error Types
//!
//! Errors that can be raised by the platform-agnostic types before any
//! network or storage work happens.
//!
//! JSON failures are not represented here; they surface as
//! `PortalError::Serialization` from the runtime that did the I/O.
//!
//! # Usage
//!
//! ```rust
//! use society_portal::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Please enter a valid email address");
//! assert!(error.to_string().contains("email"));
//! ```
use thiserror::Error;

/// Shared error types that can occur before a request leaves the client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Form field validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the field that failed
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
        }
    }
}
