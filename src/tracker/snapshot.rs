//! Read-side metric types.
//!
//! Everything a dashboard needs is serializable: per-endpoint snapshots,
//! the global summary, error entries and the detail series. These types
//! carry no behavior beyond derived rates; the tracker owns all mutation.

use serde::{Deserialize, Serialize};

/// Outcome of a completed call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// The call completed normally.
    Success,
    /// The call failed (the operation returned an error).
    Error,
}

/// Aggregate latency statistics for one endpoint.
///
/// Once `count > 0`, `min_ms <= avg_ms <= max_ms` holds. Before any
/// completion all fields are zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct LatencyStats {
    /// Sum of all observed durations in milliseconds.
    pub total_ms: u64,
    /// Number of completed calls.
    pub count: u64,
    /// Shortest observed duration.
    pub min_ms: u64,
    /// Longest observed duration.
    pub max_ms: u64,
    /// Mean duration (`total_ms / count`).
    pub avg_ms: f64,
}

/// A recorded failure for one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Completion time (epoch ms).
    pub timestamp: i64,
    /// Status the call completed with.
    pub status: CallStatus,
    /// How long the failed call took, in milliseconds.
    pub duration_ms: u64,
}

/// Per-call metric payload stored in the detail ring.
///
/// A closed set of optional fields rather than an open property bag; unset
/// fields are skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MetricDetail {
    /// Call duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Model the call targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prompt/input token count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    /// Completion/output token count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    /// Estimated cost in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    /// Call outcome, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
}

impl MetricDetail {
    /// Create an empty detail payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the call duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set token counts.
    #[must_use]
    pub const fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.input_tokens = Some(input);
        self.output_tokens = Some(output);
        self
    }

    /// Set the estimated cost.
    #[must_use]
    pub const fn with_cost_usd(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }

    /// Set the call outcome.
    #[must_use]
    pub const fn with_status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A timestamped entry in an endpoint's detail ring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailEntry {
    /// Insertion time (epoch ms), stamped by the tracker.
    pub timestamp: i64,
    /// The caller-supplied payload.
    #[serde(flatten)]
    pub detail: MetricDetail,
}

/// One point of the latency-over-time series projected from the detail ring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailPoint {
    /// Insertion time (epoch ms).
    pub timestamp: i64,
    /// Duration recorded with the entry, if any.
    pub duration_ms: Option<u64>,
}

/// Rate-limit headers reported by the upstream provider, cached per endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Provider-reported request ceiling.
    pub limit_requests: Option<u64>,
    /// Provider-reported remaining budget.
    pub remaining_requests: Option<u64>,
    /// When the provider budget resets (epoch ms).
    pub reset_at_ms: Option<i64>,
}

/// Point-in-time view of one endpoint's accounting.
///
/// Unknown endpoints produce the all-zero/empty default.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EndpointSnapshot {
    /// Calls started (monotonic until reset).
    pub calls: u64,
    /// Latency aggregates over completed calls.
    pub latency: LatencyStats,
    /// Recorded failures, oldest first.
    pub errors: Vec<ErrorEntry>,
    /// Last completion time (epoch ms).
    pub last_used: Option<i64>,
    /// Call starts within the current rate window.
    pub current_rate: usize,
}

impl EndpointSnapshot {
    /// Fraction of started calls that recorded an error.
    ///
    /// `None` when no calls have been started, rather than a NaN ratio.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> Option<f64> {
        if self.calls == 0 {
            None
        } else {
            Some(self.errors.len() as f64 / self.calls as f64)
        }
    }
}

/// One endpoint's entry in the global summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointEntry {
    /// The endpoint key.
    pub endpoint: String,
    /// Snapshot for that endpoint.
    pub metrics: EndpointSnapshot,
}

/// Global view across every endpoint key seen since the last reset.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrackerSummary {
    /// Calls started across all endpoints.
    pub total_calls: u64,
    /// Per-endpoint snapshots, sorted by endpoint key.
    pub endpoints: Vec<EndpointEntry>,
}

impl TrackerSummary {
    /// Global error fraction across all endpoints.
    ///
    /// `None` when no calls have been started.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> Option<f64> {
        if self.total_calls == 0 {
            return None;
        }
        let errors: usize = self.endpoints.iter().map(|e| e.metrics.errors.len()).sum();
        Some(errors as f64 / self.total_calls as f64)
    }
}
