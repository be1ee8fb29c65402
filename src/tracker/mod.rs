//! Call tracking and rate accounting.
//!
//! This module provides:
//! - Per-endpoint call counts, latency aggregates and error records
//! - Sliding-window request-rate tracking with advisory admission checks
//! - Bounded detail rings for time-series display
//! - Snapshot queries for dashboards
//!
//! Endpoint keys are plain strings (e.g. `"chat.create"`); distinct keys are
//! never merged, and a key created on first use persists for the lifetime of
//! the tracker.
//!
//! # Example
//!
//! ```
//! use api_tracker::config::TrackerConfig;
//! use api_tracker::tracker::snapshot::CallStatus;
//! use api_tracker::tracker::ApiTracker;
//!
//! let tracker = ApiTracker::new(TrackerConfig::default());
//!
//! let start = tracker.start_tracking("chat.create");
//! tracker.end_tracking("chat.create", start, CallStatus::Success);
//!
//! assert!(tracker.check_rate_limit("chat.create"));
//! assert_eq!(tracker.summary().total_calls, 1);
//! ```

pub mod snapshot;
mod window;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::{RateLimitConfig, TrackerConfig};
use crate::traits::{RealTimeProvider, TimeProvider};

use snapshot::{
    CallStatus, DetailEntry, DetailPoint, EndpointEntry, EndpointSnapshot, ErrorEntry,
    LatencyStats, MetricDetail, RateLimitInfo, TrackerSummary,
};
use window::RateWindow;

/// Running latency aggregate for one endpoint.
///
/// `min_ms` starts at the u64 maximum as the "no observation yet" sentinel;
/// snapshots surface it as 0 while `count == 0`.
#[derive(Debug)]
struct LatencyAccumulator {
    total_ms: u64,
    count: u64,
    min_ms: u64,
    max_ms: u64,
}

impl Default for LatencyAccumulator {
    fn default() -> Self {
        Self {
            total_ms: 0,
            count: 0,
            min_ms: u64::MAX,
            max_ms: 0,
        }
    }
}

impl LatencyAccumulator {
    fn record(&mut self, duration_ms: u64) {
        self.total_ms = self.total_ms.saturating_add(duration_ms);
        self.count += 1;
        self.min_ms = self.min_ms.min(duration_ms);
        self.max_ms = self.max_ms.max(duration_ms);
    }

    #[allow(clippy::cast_precision_loss)]
    fn stats(&self) -> LatencyStats {
        if self.count == 0 {
            return LatencyStats::default();
        }
        LatencyStats {
            total_ms: self.total_ms,
            count: self.count,
            min_ms: self.min_ms,
            max_ms: self.max_ms,
            avg_ms: self.total_ms as f64 / self.count as f64,
        }
    }
}

/// Counters, latency, errors and rate windows, all keyed by endpoint.
///
/// Kept as parallel maps so [`ApiTracker::reset`] can clear exactly these
/// and nothing else; detail rings and cached provider headers live outside
/// this struct and survive a reset.
#[derive(Debug, Default)]
struct TrackerState {
    total_calls: u64,
    calls: HashMap<String, u64>,
    latency: HashMap<String, LatencyAccumulator>,
    errors: HashMap<String, Vec<ErrorEntry>>,
    last_used: HashMap<String, i64>,
    windows: HashMap<String, RateWindow>,
}

/// In-memory call tracker.
///
/// An explicit context object: construct one per client (or per tenant) and
/// share it via [`Arc`]. All methods take `&self`; internal maps are guarded
/// by locks, and no lock is held across an `.await`.
pub struct ApiTracker {
    config: TrackerConfig,
    time: Arc<dyn TimeProvider>,
    state: RwLock<TrackerState>,
    details: RwLock<HashMap<String, VecDeque<DetailEntry>>>,
    provider_limits: RwLock<HashMap<String, RateLimitInfo>>,
    endpoint_limits: RwLock<HashMap<String, RateLimitConfig>>,
}

impl std::fmt::Debug for ApiTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTracker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiTracker {
    /// Create a tracker using the system clock.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_time_provider(config, Arc::new(RealTimeProvider))
    }

    /// Create a tracker with a custom time source.
    #[must_use]
    pub fn with_time_provider(config: TrackerConfig, time: Arc<dyn TimeProvider>) -> Self {
        Self {
            config,
            time,
            state: RwLock::new(TrackerState::default()),
            details: RwLock::new(HashMap::new()),
            provider_limits: RwLock::new(HashMap::new()),
            endpoint_limits: RwLock::new(HashMap::new()),
        }
    }

    /// Get the tracker configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Record a call start for `endpoint` and return the start timestamp
    /// (epoch ms).
    ///
    /// Increments the endpoint call count and the global total, and
    /// registers the start in the endpoint's rate window (pruning expired
    /// entries first). Never fails.
    pub fn start_tracking(&self, endpoint: &str) -> i64 {
        let now = self.now_ms();
        let limit = self.limit_for(endpoint);

        if let Some(mut state) = write_lock(&self.state, "state") {
            state.total_calls += 1;
            *state.calls.entry(endpoint.to_string()).or_insert(0) += 1;
            state
                .windows
                .entry(endpoint.to_string())
                .or_default()
                .register(now, limit.window_ms);
        }

        tracing::debug!(endpoint, start_ms = now, "call started");
        now
    }

    /// Record a call completion and return its duration in milliseconds.
    ///
    /// Folds the duration into the latency aggregate, updates `last_used`,
    /// and appends an error entry when `status` is not success. `start_ms`
    /// is trusted to come from [`start_tracking`](Self::start_tracking) for
    /// the same endpoint; this is a caller contract, not enforced.
    pub fn end_tracking(&self, endpoint: &str, start_ms: i64, status: CallStatus) -> u64 {
        let now = self.now_ms();
        let duration_ms = u64::try_from(now.saturating_sub(start_ms)).unwrap_or(0);

        if let Some(mut state) = write_lock(&self.state, "state") {
            state
                .latency
                .entry(endpoint.to_string())
                .or_default()
                .record(duration_ms);
            state.last_used.insert(endpoint.to_string(), now);

            if status != CallStatus::Success {
                let errors = state.errors.entry(endpoint.to_string()).or_default();
                errors.push(ErrorEntry {
                    timestamp: now,
                    status,
                    duration_ms,
                });
                if let Some(cap) = self.config.error_cap {
                    if errors.len() > cap {
                        let excess = errors.len() - cap;
                        errors.drain(..excess);
                    }
                }
            }
        }

        tracing::debug!(endpoint, duration_ms, ?status, "call completed");
        duration_ms
    }

    /// Number of call starts for `endpoint` inside the current window.
    ///
    /// Pure read: counts in-window timestamps without persisting the prune
    /// (the write path prunes at registration time).
    #[must_use]
    pub fn current_rate(&self, endpoint: &str) -> usize {
        let now = self.now_ms();
        let limit = self.limit_for(endpoint);
        let state = read_lock(&self.state, "state");
        state
            .windows
            .get(endpoint)
            .map_or(0, |w| w.count_within(now, limit.window_ms))
    }

    /// Whether `endpoint` is under its request budget.
    ///
    /// Advisory only: nothing here blocks a call from proceeding. The
    /// tracking wrapper checks this before invoking an operation; direct
    /// callers of [`start_tracking`](Self::start_tracking) are expected to
    /// do the same.
    #[must_use]
    pub fn check_rate_limit(&self, endpoint: &str) -> bool {
        let limit = self.limit_for(endpoint);
        self.current_rate(endpoint) < limit.max_requests
    }

    /// Override the rate limit for a single endpoint.
    ///
    /// Endpoints without an override use the global
    /// [`TrackerConfig::rate_limit`]. Overrides survive [`reset`](Self::reset).
    pub fn set_endpoint_limit(&self, endpoint: impl Into<String>, limit: RateLimitConfig) {
        if let Some(mut limits) = write_lock(&self.endpoint_limits, "endpoint_limits") {
            limits.insert(endpoint.into(), limit);
        }
    }

    /// Append a detail payload to the endpoint's ring, stamped with the
    /// current time.
    ///
    /// The ring holds at most [`TrackerConfig::detail_capacity`] entries;
    /// the oldest are evicted first.
    pub fn store_metric_details(&self, endpoint: &str, detail: MetricDetail) {
        let now = self.now_ms();
        if let Some(mut details) = write_lock(&self.details, "details") {
            let ring = details.entry(endpoint.to_string()).or_default();
            ring.push_back(DetailEntry {
                timestamp: now,
                detail,
            });
            while ring.len() > self.config.detail_capacity {
                ring.pop_front();
            }
        }
    }

    /// Cache provider-reported rate-limit headers for an endpoint.
    ///
    /// This cache is informational and survives [`reset`](Self::reset).
    pub fn record_rate_limit_info(&self, endpoint: impl Into<String>, info: RateLimitInfo) {
        if let Some(mut limits) = write_lock(&self.provider_limits, "provider_limits") {
            limits.insert(endpoint.into(), info);
        }
    }

    /// Last cached provider rate-limit headers for an endpoint.
    #[must_use]
    pub fn rate_limit_info(&self, endpoint: &str) -> Option<RateLimitInfo> {
        let limits = read_lock(&self.provider_limits, "provider_limits");
        limits.get(endpoint).copied()
    }

    /// Snapshot one endpoint's accounting.
    ///
    /// Unknown endpoints return the all-zero/empty default.
    #[must_use]
    pub fn endpoint_metrics(&self, endpoint: &str) -> EndpointSnapshot {
        let now = self.now_ms();
        let limit = self.limit_for(endpoint);
        let state = read_lock(&self.state, "state");
        build_snapshot(&state, endpoint, now, limit)
    }

    /// Snapshot every endpoint seen since the last reset, plus the global
    /// call count. O(E) in the number of distinct endpoint keys.
    #[must_use]
    pub fn summary(&self) -> TrackerSummary {
        let now = self.now_ms();
        let state = read_lock(&self.state, "state");

        let mut keys: Vec<&String> = state.calls.keys().collect();
        keys.sort();

        let endpoints = keys
            .into_iter()
            .map(|endpoint| EndpointEntry {
                endpoint: endpoint.clone(),
                metrics: build_snapshot(&state, endpoint, now, self.limit_for(endpoint)),
            })
            .collect();

        TrackerSummary {
            total_calls: state.total_calls,
            endpoints,
        }
    }

    /// The endpoint's detail ring, oldest first.
    #[must_use]
    pub fn details(&self, endpoint: &str) -> Vec<DetailEntry> {
        let details = read_lock(&self.details, "details");
        details
            .get(endpoint)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The detail ring projected to `{ timestamp, duration_ms }` points in
    /// insertion order, for latency-over-time charts.
    #[must_use]
    pub fn detail_series(&self, endpoint: &str) -> Vec<DetailPoint> {
        let details = read_lock(&self.details, "details");
        details
            .get(endpoint)
            .map(|ring| {
                ring.iter()
                    .map(|entry| DetailPoint {
                        timestamp: entry.timestamp,
                        duration_ms: entry.detail.duration_ms,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Clear call counts, latency aggregates, error lists, last-used marks,
    /// the global total and all rate-window timestamps.
    ///
    /// Detail rings, cached provider headers and per-endpoint limit
    /// overrides are intentionally NOT cleared; they outlive a metrics
    /// reset. This asymmetry matches the long-standing observed behavior.
    pub fn reset(&self) {
        if let Some(mut state) = write_lock(&self.state, "state") {
            state.total_calls = 0;
            state.calls.clear();
            state.latency.clear();
            state.errors.clear();
            state.last_used.clear();
            state.windows.clear();
        }
        tracing::debug!("tracker metrics reset");
    }

    /// Effective rate limit for an endpoint (override or global).
    fn limit_for(&self, endpoint: &str) -> RateLimitConfig {
        let limits = read_lock(&self.endpoint_limits, "endpoint_limits");
        limits
            .get(endpoint)
            .copied()
            .unwrap_or(self.config.rate_limit)
    }

    /// Current epoch milliseconds from the configured time source.
    fn now_ms(&self) -> i64 {
        self.time.now().timestamp_millis().max(0)
    }
}

/// Build a snapshot from locked state. `now` and `limit` are resolved by the
/// caller so the state lock is taken once per query.
fn build_snapshot(
    state: &TrackerState,
    endpoint: &str,
    now_ms: i64,
    limit: RateLimitConfig,
) -> EndpointSnapshot {
    EndpointSnapshot {
        calls: state.calls.get(endpoint).copied().unwrap_or(0),
        latency: state
            .latency
            .get(endpoint)
            .map_or_else(LatencyStats::default, LatencyAccumulator::stats),
        errors: state.errors.get(endpoint).cloned().unwrap_or_default(),
        last_used: state.last_used.get(endpoint).copied(),
        current_rate: state
            .windows
            .get(endpoint)
            .map_or(0, |w| w.count_within(now_ms, limit.window_ms)),
    }
}

/// Acquire a write guard, logging and skipping the update on poisoning.
fn write_lock<'a, T>(lock: &'a RwLock<T>, what: &str) -> Option<RwLockWriteGuard<'a, T>> {
    match lock.write() {
        Ok(guard) => Some(guard),
        Err(poison_error) => {
            tracing::error!(
                lock = what,
                error = %poison_error,
                "Failed to acquire tracker lock: RwLock poisoned, dropping update"
            );
            None
        }
    }
}

/// Acquire a read guard, recovering the inner data on poisoning.
fn read_lock<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poison_error| {
        tracing::warn!(
            lock = what,
            "Reading from poisoned lock, using recovered data"
        );
        poison_error.into_inner()
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::test_utils::{manual_tracker, ManualTimeProvider};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const EPOCH: i64 = 1_700_000_000_000;

    #[test]
    fn test_start_tracking_returns_current_time() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        assert_eq!(tracker.start_tracking("chat.create"), EPOCH);
    }

    #[test]
    fn test_monotonic_counters() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        for _ in 0..7 {
            tracker.start_tracking("chat.create");
        }
        assert_eq!(tracker.endpoint_metrics("chat.create").calls, 7);
        assert_eq!(tracker.summary().total_calls, 7);
    }

    #[test]
    fn test_distinct_endpoints_never_merge() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        tracker.start_tracking("chat.create");
        tracker.start_tracking("assistants.get.abc");
        tracker.start_tracking("assistants.get.def");

        assert_eq!(tracker.endpoint_metrics("chat.create").calls, 1);
        assert_eq!(tracker.endpoint_metrics("assistants.get.abc").calls, 1);
        assert_eq!(tracker.endpoint_metrics("assistants.get.def").calls, 1);
        assert_eq!(tracker.summary().endpoints.len(), 3);
    }

    #[test]
    fn test_latency_bounds() {
        let (tracker, clock) = manual_tracker(EPOCH);
        for duration in [120_u64, 30, 450] {
            let start = tracker.start_tracking("chat.create");
            clock.advance_ms(i64::try_from(duration).unwrap());
            let recorded = tracker.end_tracking("chat.create", start, CallStatus::Success);
            assert_eq!(recorded, duration);
        }

        let latency = tracker.endpoint_metrics("chat.create").latency;
        assert_eq!(latency.count, 3);
        assert_eq!(latency.min_ms, 30);
        assert_eq!(latency.max_ms, 450);
        assert_eq!(latency.total_ms, 600);
        assert_eq!(latency.avg_ms, 200.0);
        assert!(latency.min_ms as f64 <= latency.avg_ms);
        assert!(latency.avg_ms <= latency.max_ms as f64);
    }

    #[test]
    fn test_latency_zero_before_any_completion() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        tracker.start_tracking("chat.create");
        let latency = tracker.endpoint_metrics("chat.create").latency;
        assert_eq!(latency, LatencyStats::default());
    }

    #[test]
    fn test_error_recording_does_not_touch_calls() {
        let (tracker, clock) = manual_tracker(EPOCH);
        let start = tracker.start_tracking("chat.create");
        clock.advance_ms(50);
        tracker.end_tracking("chat.create", start, CallStatus::Error);

        let snapshot = tracker.endpoint_metrics("chat.create");
        assert_eq!(snapshot.calls, 1);
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(
            snapshot.errors[0],
            ErrorEntry {
                timestamp: EPOCH + 50,
                status: CallStatus::Error,
                duration_ms: 50,
            }
        );
    }

    #[test]
    fn test_success_records_no_error_entry() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        let start = tracker.start_tracking("chat.create");
        tracker.end_tracking("chat.create", start, CallStatus::Success);
        assert!(tracker.endpoint_metrics("chat.create").errors.is_empty());
    }

    #[test]
    fn test_error_list_unbounded_by_default() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        for _ in 0..300 {
            let start = tracker.start_tracking("chat.create");
            tracker.end_tracking("chat.create", start, CallStatus::Error);
        }
        assert_eq!(tracker.endpoint_metrics("chat.create").errors.len(), 300);
    }

    #[test]
    fn test_error_cap_drops_oldest() {
        let config = TrackerConfig {
            error_cap: Some(10),
            ..TrackerConfig::default()
        };
        let clock = Arc::new(ManualTimeProvider::new(EPOCH));
        let tracker = ApiTracker::with_time_provider(config, clock.clone());

        for _ in 0..25 {
            let start = tracker.start_tracking("chat.create");
            clock.advance_ms(1);
            tracker.end_tracking("chat.create", start, CallStatus::Error);
        }

        let errors = tracker.endpoint_metrics("chat.create").errors;
        assert_eq!(errors.len(), 10);
        // The oldest 15 were dropped; timestamps are the most recent ones
        assert_eq!(errors[0].timestamp, EPOCH + 16);
        assert_eq!(errors[9].timestamp, EPOCH + 25);
    }

    #[test]
    fn test_end_tracking_with_stale_start_saturates_to_zero() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        // Caller contract violation: start timestamp in the future
        let duration = tracker.end_tracking("chat.create", EPOCH + 10_000, CallStatus::Success);
        assert_eq!(duration, 0);
    }

    #[test]
    fn test_last_used_updated_on_completion() {
        let (tracker, clock) = manual_tracker(EPOCH);
        assert_eq!(tracker.endpoint_metrics("chat.create").last_used, None);

        let start = tracker.start_tracking("chat.create");
        clock.advance_ms(42);
        tracker.end_tracking("chat.create", start, CallStatus::Success);
        assert_eq!(
            tracker.endpoint_metrics("chat.create").last_used,
            Some(EPOCH + 42)
        );
    }

    #[test]
    fn test_rate_window_exhaustion_and_recovery() {
        let (tracker, clock) = manual_tracker(EPOCH);

        // 50 registrations within the same millisecond hit the budget
        for _ in 0..50 {
            tracker.start_tracking("chat.create");
        }
        assert_eq!(tracker.current_rate("chat.create"), 50);
        assert!(!tracker.check_rate_limit("chat.create"));

        // One past the window, the budget is free again
        clock.advance_ms(60_001);
        assert_eq!(tracker.current_rate("chat.create"), 0);
        assert!(tracker.check_rate_limit("chat.create"));
    }

    #[test]
    fn test_unknown_endpoint_defaults() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        assert_eq!(tracker.current_rate("never.seen"), 0);
        assert!(tracker.check_rate_limit("never.seen"));
        assert_eq!(
            tracker.endpoint_metrics("never.seen"),
            EndpointSnapshot::default()
        );
    }

    #[test]
    fn test_current_rate_is_pure_read() {
        let (tracker, clock) = manual_tracker(EPOCH);
        tracker.start_tracking("chat.create");
        tracker.start_tracking("chat.create");

        clock.advance_ms(120_000);
        assert_eq!(tracker.current_rate("chat.create"), 0);

        // The stored list was not pruned by the read
        {
            let state = tracker.state.read().unwrap();
            assert_eq!(state.windows.get("chat.create").unwrap().stored_len(), 2);
        }

        // The next registration prunes for storage
        tracker.start_tracking("chat.create");
        let state = tracker.state.read().unwrap();
        assert_eq!(state.windows.get("chat.create").unwrap().stored_len(), 1);
    }

    #[test]
    fn test_per_endpoint_limit_override() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        tracker.set_endpoint_limit(
            "images.generate",
            RateLimitConfig {
                window_ms: 60_000,
                max_requests: 2,
            },
        );

        tracker.start_tracking("images.generate");
        tracker.start_tracking("images.generate");
        assert!(!tracker.check_rate_limit("images.generate"));

        // Other endpoints keep the global budget
        tracker.start_tracking("chat.create");
        tracker.start_tracking("chat.create");
        assert!(tracker.check_rate_limit("chat.create"));
    }

    #[test]
    fn test_detail_ring_bound() {
        let (tracker, clock) = manual_tracker(EPOCH);
        for i in 1..=150_u64 {
            clock.advance_ms(1);
            tracker.store_metric_details("chat.create", MetricDetail::new().with_duration_ms(i));
        }

        let series = tracker.detail_series("chat.create");
        assert_eq!(series.len(), 100);
        // Retained entries are 51..=150 in insertion order
        assert_eq!(series[0].duration_ms, Some(51));
        assert_eq!(series[99].duration_ms, Some(150));
        assert!(series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_details_stamped_with_insertion_time() {
        let (tracker, clock) = manual_tracker(EPOCH);
        clock.advance_ms(5);
        tracker.store_metric_details("chat.create", MetricDetail::new().with_model("gpt-4o"));

        let details = tracker.details("chat.create");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].timestamp, EPOCH + 5);
        assert_eq!(details[0].detail.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_rate_limit_info_cache() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        assert_eq!(tracker.rate_limit_info("chat.create"), None);

        let info = RateLimitInfo {
            limit_requests: Some(500),
            remaining_requests: Some(499),
            reset_at_ms: Some(EPOCH + 60_000),
        };
        tracker.record_rate_limit_info("chat.create", info);
        assert_eq!(tracker.rate_limit_info("chat.create"), Some(info));
    }

    #[test]
    fn test_reset_clears_metrics_but_not_details() {
        let (tracker, clock) = manual_tracker(EPOCH);

        let start = tracker.start_tracking("chat.create");
        clock.advance_ms(10);
        tracker.end_tracking("chat.create", start, CallStatus::Error);
        tracker.store_metric_details("chat.create", MetricDetail::new().with_duration_ms(10));
        tracker.record_rate_limit_info("chat.create", RateLimitInfo::default());

        tracker.reset();

        let summary = tracker.summary();
        assert_eq!(summary.total_calls, 0);
        assert!(summary.endpoints.is_empty());
        assert_eq!(tracker.current_rate("chat.create"), 0);

        // The asymmetry: detail rings and cached provider headers survive
        assert_eq!(tracker.detail_series("chat.create").len(), 1);
        assert!(tracker.rate_limit_info("chat.create").is_some());
    }

    #[test]
    fn test_summary_sorted_by_endpoint() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        tracker.start_tracking("images.generate");
        tracker.start_tracking("audio.transcribe");
        tracker.start_tracking("chat.create");

        let summary = tracker.summary();
        let keys: Vec<&str> = summary
            .endpoints
            .iter()
            .map(|e| e.endpoint.as_str())
            .collect();
        assert_eq!(keys, ["audio.transcribe", "chat.create", "images.generate"]);
    }

    #[test]
    fn test_tracker_debug_omits_internals() {
        let (tracker, _clock) = manual_tracker(EPOCH);
        let debug = format!("{tracker:?}");
        assert!(debug.contains("ApiTracker"));
        assert!(debug.contains("config"));
    }

    proptest! {
        #[test]
        fn prop_latency_invariants(durations in proptest::collection::vec(0_u64..10_000, 1..50)) {
            let (tracker, clock) = manual_tracker(EPOCH);
            for &duration in &durations {
                let start = tracker.start_tracking("chat.create");
                clock.advance_ms(i64::try_from(duration).unwrap());
                tracker.end_tracking("chat.create", start, CallStatus::Success);
            }

            let latency = tracker.endpoint_metrics("chat.create").latency;
            let min = *durations.iter().min().unwrap();
            let max = *durations.iter().max().unwrap();
            let total: u64 = durations.iter().sum();

            prop_assert_eq!(latency.count, durations.len() as u64);
            prop_assert_eq!(latency.min_ms, min);
            prop_assert_eq!(latency.max_ms, max);
            prop_assert_eq!(latency.total_ms, total);
            prop_assert!((latency.avg_ms - total as f64 / durations.len() as f64).abs() < f64::EPSILON);
            prop_assert!(latency.min_ms as f64 <= latency.avg_ms);
            prop_assert!(latency.avg_ms <= latency.max_ms as f64);
        }
    }
}
