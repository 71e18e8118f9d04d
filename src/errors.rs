//! Unified error types for `finance-sync`.
//!
//! Every fallible operation in the crate returns [`Result`]. Form-level problems are reported
//! through [`ValidationErrors`] and stay with the caller; fetch and write failures surface as the
//! network, timeout, API, or auth variants and end up in the store's error field.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or unreadable configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// One or more form fields failed validation.
    #[error("Validation failed: {0}")]
    InvalidForm(ValidationErrors),

    /// Credentials were rejected or no session is available.
    #[error("Authentication error: {message}")]
    Auth {
        /// Detail returned by the backend, if any
        message: String,
    },

    /// The access token expired and could not be refreshed; the session has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Underlying transport error
        message: String,
    },

    /// A request did not complete within the configured bound.
    #[error("Request timed out after {after:?}")]
    Timeout {
        /// Configured bound
        after: Duration,
    },

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The `detail` field of the body, or the raw body
        message: String,
    },

    /// The backend answered successfully but the body was unusable.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// What was missing or malformed
        message: String,
    },

    /// Session file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file or request body could not be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UnexpectedResponse {
                message: err.to_string(),
            }
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidForm(errors)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name
    pub field: &'static str,
    /// User-facing message
    pub message: String,
}

/// All validation failures found on one form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records a failure for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterates over the recorded failures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl Error {
    /// True for failures that mean the user has to log in again.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collects_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("amount", "Amount is required");
        errors.add("category", "Category is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for("category"), Some("Category is required"));
        assert_eq!(
            errors.to_string(),
            "amount: Amount is required; category: Category is required"
        );
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_empty_validation_errors_is_ok() {
        let result = ValidationErrors::new().into_result(42);
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_is_auth() {
        assert!(Error::SessionExpired.is_auth());
        assert!(
            Error::Auth {
                message: "bad".to_string()
            }
            .is_auth()
        );
        assert!(!Error::Timeout { after: Duration::from_secs(5) }.is_auth());
    }
}
