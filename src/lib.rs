//! API Call Tracker
//!
//! An in-process library for instrumenting asynchronous API clients with
//! per-endpoint call accounting:
//!
//! - Call counts, latency aggregates and error records per endpoint key
//! - Sliding-window request-rate tracking with advisory admission checks
//! - A tracking wrapper that times an arbitrary async operation and
//!   records its outcome without altering the result
//! - Read-side snapshots for dashboards (error rates, detail series)
//!
//! All state is process-local and in-memory; nothing is persisted.
//!
//! # Quick Start
//!
//! ```
//! use api_tracker::config::TrackerConfig;
//! use api_tracker::tracker::snapshot::CallStatus;
//! use api_tracker::tracker::ApiTracker;
//!
//! let tracker = ApiTracker::new(TrackerConfig::default());
//!
//! let start = tracker.start_tracking("chat.create");
//! // ... perform the call ...
//! let duration = tracker.end_tracking("chat.create", start, CallStatus::Success);
//!
//! let snapshot = tracker.endpoint_metrics("chat.create");
//! assert_eq!(snapshot.calls, 1);
//! assert_eq!(snapshot.latency.max_ms, duration);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   with_tracking    ┌────────────┐
//! │ API client │───────────────────▶│ ApiTracker │──▶ rate windows
//! │  (caller)  │◀───────────────────│            │──▶ latency / errors
//! └────────────┘   result unchanged └─────┬──────┘──▶ detail rings
//!                                         │
//!                                         ▼
//!                                  summary snapshots
//!                                  (dashboard reads)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod tracker;
pub mod traits;

#[cfg(test)]
mod test_utils;
