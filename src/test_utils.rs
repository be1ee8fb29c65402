//! Test utilities and fixtures.
//!
//! This module provides shared testing infrastructure:
//! - A manual, steppable time provider for deterministic window tests
//! - Factory helpers for trackers wired to a manual clock
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::tracker::ApiTracker;
use crate::traits::TimeProvider;

/// A time provider whose clock only moves when a test advances it.
#[derive(Debug)]
pub struct ManualTimeProvider {
    now_ms: AtomicI64,
}

impl ManualTimeProvider {
    /// Create a provider frozen at the given epoch milliseconds.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute time.
    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// A default-config tracker driven by a manual clock starting at `start_ms`.
pub fn manual_tracker(start_ms: i64) -> (ApiTracker, Arc<ManualTimeProvider>) {
    let clock = Arc::new(ManualTimeProvider::new(start_ms));
    let tracker = ApiTracker::with_time_provider(TrackerConfig::default(), clock.clone());
    (tracker, clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen_until_advanced() {
        let clock = ManualTimeProvider::new(1_000);
        assert_eq!(clock.now().timestamp_millis(), 1_000);
        assert_eq!(clock.now().timestamp_millis(), 1_000);

        clock.advance_ms(500);
        assert_eq!(clock.now().timestamp_millis(), 1_500);

        clock.set_ms(42);
        assert_eq!(clock.now().timestamp_millis(), 42);
    }
}
