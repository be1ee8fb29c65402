//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::TrackerConfig;
use crate::error::ConfigError;

/// Minimum allowed rate window in milliseconds (1 second).
pub const MIN_WINDOW_MS: u64 = 1000;

/// Maximum allowed rate window in milliseconds (1 hour).
pub const MAX_WINDOW_MS: u64 = 3_600_000;

/// Maximum allowed request budget per window.
pub const MAX_REQUESTS_CEILING: usize = 100_000;

/// Maximum allowed detail ring capacity.
pub const MAX_DETAIL_CAPACITY: usize = 100_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `TRACKER_WINDOW_MS` must be between 1000 and 3600000
/// - `TRACKER_MAX_REQUESTS` must be between 1 and 100000
/// - `TRACKER_DETAIL_CAPACITY` must be between 1 and 100000
/// - `TRACKER_ERROR_CAP`, if set, must be at least 1
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &TrackerConfig) -> Result<(), ConfigError> {
    // Window must be reasonable (1s to 1h)
    if config.rate_limit.window_ms < MIN_WINDOW_MS || config.rate_limit.window_ms > MAX_WINDOW_MS {
        return Err(ConfigError::InvalidValue {
            var: "TRACKER_WINDOW_MS".into(),
            reason: format!("must be between {MIN_WINDOW_MS} and {MAX_WINDOW_MS} ms"),
        });
    }

    // A zero budget would reject every call before it starts
    if config.rate_limit.max_requests == 0 || config.rate_limit.max_requests > MAX_REQUESTS_CEILING
    {
        return Err(ConfigError::InvalidValue {
            var: "TRACKER_MAX_REQUESTS".into(),
            reason: format!("must be between 1 and {MAX_REQUESTS_CEILING}"),
        });
    }

    if config.detail_capacity == 0 || config.detail_capacity > MAX_DETAIL_CAPACITY {
        return Err(ConfigError::InvalidValue {
            var: "TRACKER_DETAIL_CAPACITY".into(),
            reason: format!("must be between 1 and {MAX_DETAIL_CAPACITY}"),
        });
    }

    if config.error_cap == Some(0) {
        return Err(ConfigError::InvalidValue {
            var: "TRACKER_ERROR_CAP".into(),
            reason: "must be at least 1 when set".into(),
        });
    }

    Ok(())
}
