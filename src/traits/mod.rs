//! Trait definitions for mockable dependencies.
//!
//! The tracker's only external collaborator is a wall-clock time source.
//! [`TimeProvider`] abstracts it so tests can drive the rate window and
//! latency math deterministically.
//!
//! # Mocking
//!
//! The trait is annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates a mock implementation automatically for testing.
//!
//! # Example
//!
//! ```
//! use api_tracker::traits::{RealTimeProvider, TimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use chrono::{DateTime, Utc};

/// Time provider trait for deterministic testing.
///
/// All tracker timestamps are derived from this trait, so substituting a
/// fixed or steppable implementation makes window pruning and duration
/// computation fully deterministic.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using the system clock.
///
/// This is the production implementation that returns the actual current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
