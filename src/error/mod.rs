//! Error types for the API call tracker.
//!
//! This module defines:
//! - [`TrackedError`]: errors surfaced by the tracking wrapper
//! - [`ConfigError`]: configuration loading and validation errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Error returned by the tracking wrapper.
///
/// The wrapper never replaces or rewords the wrapped operation's error:
/// a failed operation comes back as [`TrackedError::Operation`] holding the
/// original value, so callers can match on the error type they already know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackedError<E> {
    /// The endpoint is over its request budget; the operation was never
    /// invoked.
    #[error("Rate limit exceeded for endpoint: {endpoint}")]
    RateLimited {
        /// The endpoint key that was rejected.
        endpoint: String,
    },

    /// The wrapped operation failed. Carries the original error unchanged.
    #[error(transparent)]
    Operation(E),
}

impl<E> TrackedError<E> {
    /// Returns true if this error is a rate-limit rejection.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Extract the original operation error, if any.
    #[must_use]
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::RateLimited { .. } => None,
            Self::Operation(e) => Some(e),
        }
    }
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    #[error("boom: {message}")]
    struct FakeApiError {
        message: String,
    }

    // Type assertions - verify errors implement required traits
    assert_impl_all!(TrackedError<FakeApiError>: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ConfigError: Send, Sync, std::error::Error, Clone);

    #[test]
    fn test_rate_limited_display() {
        let err: TrackedError<FakeApiError> = TrackedError::RateLimited {
            endpoint: "chat.create".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for endpoint: chat.create"
        );
    }

    #[test]
    fn test_operation_display_is_transparent() {
        let original = FakeApiError {
            message: "connection reset".to_string(),
        };
        let err = TrackedError::Operation(original.clone());
        // The wrapper must not alter the original message
        assert_eq!(err.to_string(), original.to_string());
    }

    #[test]
    fn test_is_rate_limited() {
        let limited: TrackedError<FakeApiError> = TrackedError::RateLimited {
            endpoint: "e".to_string(),
        };
        let failed = TrackedError::Operation(FakeApiError {
            message: "x".to_string(),
        });
        assert!(limited.is_rate_limited());
        assert!(!failed.is_rate_limited());
    }

    #[test]
    fn test_into_operation() {
        let original = FakeApiError {
            message: "timeout".to_string(),
        };
        let err = TrackedError::Operation(original.clone());
        assert_eq!(err.into_operation(), Some(original));

        let limited: TrackedError<FakeApiError> = TrackedError::RateLimited {
            endpoint: "e".to_string(),
        };
        assert_eq!(limited.into_operation(), None);
    }

    #[test]
    fn test_config_error_display_missing_required() {
        let err = ConfigError::MissingRequired {
            var: "TRACKER_WINDOW_MS".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required: TRACKER_WINDOW_MS");
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            var: "TRACKER_MAX_REQUESTS".to_string(),
            reason: "must be a positive integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for TRACKER_MAX_REQUESTS: must be a positive integer"
        );
    }

    #[test]
    fn test_config_error_clone_eq() {
        let err = ConfigError::MissingRequired {
            var: "TEST".to_string(),
        };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
