//! Configuration management.
//!
//! This module handles:
//! - Rate-limit window and budget settings
//! - Detail-ring capacity and the optional error-list cap
//! - Environment variable loading
//! - Configuration validation
//!
//! # Example
//!
//! ```
//! use api_tracker::config::TrackerConfig;
//!
//! // Defaults: 60s window, 50 requests, 100-entry detail ring,
//! // unbounded error lists.
//! let config = TrackerConfig::default();
//! assert_eq!(config.rate_limit.window_ms, 60_000);
//! assert_eq!(config.rate_limit.max_requests, 50);
//! assert_eq!(config.detail_capacity, 100);
//! assert!(config.error_cap.is_none());
//! ```

mod validation;

pub use validation::{
    validate_config, MAX_DETAIL_CAPACITY, MAX_REQUESTS_CEILING, MAX_WINDOW_MS, MIN_WINDOW_MS,
};

use crate::error::ConfigError;

/// Default rate window in milliseconds (60 seconds).
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Default request budget per window.
pub const DEFAULT_MAX_REQUESTS: usize = 50;

/// Default detail ring capacity per endpoint.
pub const DEFAULT_DETAIL_CAPACITY: usize = 100;

/// Sliding-window rate limit settings.
///
/// Applied globally by default; individual endpoints can be given their own
/// settings via [`ApiTracker::set_endpoint_limit`](crate::tracker::ApiTracker::set_endpoint_limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Trailing window length in milliseconds.
    pub window_ms: u64,
    /// Maximum admitted requests per window.
    pub max_requests: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Tracker configuration.
///
/// Use [`TrackerConfig::from_env`] to load settings from environment
/// variables, or build the struct directly for embedded use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Global rate limit applied to every endpoint without an override.
    pub rate_limit: RateLimitConfig,
    /// Per-endpoint detail ring capacity (oldest entries evicted first).
    pub detail_capacity: usize,
    /// Optional cap on per-endpoint error lists.
    ///
    /// `None` keeps the lists unbounded, which matches the historical
    /// behavior; set a cap for long-lived processes.
    pub error_cap: Option<usize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            detail_capacity: DEFAULT_DETAIL_CAPACITY,
            error_cap: None,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `TRACKER_WINDOW_MS`: rate window length (default: `60000`)
    /// - `TRACKER_MAX_REQUESTS`: request budget per window (default: `50`)
    /// - `TRACKER_DETAIL_CAPACITY`: detail ring size (default: `100`)
    /// - `TRACKER_ERROR_CAP`: error list cap (default: unset, unbounded)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - any set variable is not a valid positive integer
    /// - any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let window_ms = parse_env_u64("TRACKER_WINDOW_MS", DEFAULT_WINDOW_MS)?;
        let max_requests = parse_env_usize("TRACKER_MAX_REQUESTS", DEFAULT_MAX_REQUESTS)?;
        let detail_capacity = parse_env_usize("TRACKER_DETAIL_CAPACITY", DEFAULT_DETAIL_CAPACITY)?;
        let error_cap = parse_env_optional_usize("TRACKER_ERROR_CAP")?;

        let config = Self {
            rate_limit: RateLimitConfig {
                window_ms,
                max_requests,
            },
            detail_capacity,
            error_cap,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as usize, using a default if not set.
fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an optional environment variable as usize; unset means `None`.
fn parse_env_optional_usize(name: &str) -> Result<Option<usize>, ConfigError> {
    std::env::var(name).map_or(Ok(None), |val| {
        val.parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: name.into(),
                reason: "must be a positive integer".into(),
            })
    })
}
