//! Instrumenting an API client through the tracking wrapper.
//!
//! A hand-written decorator delegates each client method through
//! `with_tracking` under a dotted endpoint key, the way a real instrumented
//! SDK surface would be wired.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api_tracker::config::{RateLimitConfig, TrackerConfig};
use api_tracker::error::TrackedError;
use api_tracker::instrument::Scope;
use api_tracker::tracker::snapshot::{CallStatus, MetricDetail};
use api_tracker::tracker::ApiTracker;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
enum FakeApiError {
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("Network error: {message}")]
    Network { message: String },
}

/// A stand-in for an SDK client: counts invocations, optionally fails.
#[derive(Default)]
struct FakeChatApi {
    invocations: AtomicUsize,
}

impl FakeChatApi {
    async fn create(&self, prompt: &str) -> Result<String, FakeApiError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if prompt == "timeout" {
            return Err(FakeApiError::Timeout { timeout_ms: 30_000 });
        }
        Ok(format!("echo: {prompt}"))
    }
}

/// Explicit decoration of the fake client: one wrapping struct per API
/// surface, each method delegating through the scope.
struct TrackedChatApi {
    inner: FakeChatApi,
    scope: Scope,
}

impl TrackedChatApi {
    fn new(tracker: Arc<ApiTracker>) -> Self {
        Self {
            inner: FakeChatApi::default(),
            scope: Scope::new(tracker, "chat"),
        }
    }

    async fn create(&self, prompt: &str) -> Result<String, TrackedError<FakeApiError>> {
        self.scope.call("create", || self.inner.create(prompt)).await
    }
}

#[tokio::test]
async fn test_decorated_client_records_successes() {
    let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));
    let client = TrackedChatApi::new(tracker.clone());

    let reply = client.create("hello").await.expect("call should succeed");
    assert_eq!(reply, "echo: hello");

    let snapshot = tracker.endpoint_metrics("chat.create");
    assert_eq!(snapshot.calls, 1);
    assert_eq!(snapshot.latency.count, 1);
    assert!(snapshot.errors.is_empty());
    assert!(snapshot.last_used.is_some());
}

#[tokio::test]
async fn test_decorated_client_propagates_original_error() {
    let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));
    let client = TrackedChatApi::new(tracker.clone());

    let err = client.create("timeout").await.expect_err("should fail");
    // The original SDK error survives with its exact message
    assert_eq!(err.to_string(), "Request timeout after 30000ms");
    assert_eq!(
        err.into_operation(),
        Some(FakeApiError::Timeout { timeout_ms: 30_000 })
    );

    assert_eq!(tracker.endpoint_metrics("chat.create").errors.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_rejects_without_reaching_the_client() {
    let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));
    tracker.set_endpoint_limit(
        "chat.create",
        RateLimitConfig {
            window_ms: 60_000,
            max_requests: 2,
        },
    );
    let client = TrackedChatApi::new(tracker.clone());

    assert!(client.create("a").await.is_ok());
    assert!(client.create("b").await.is_ok());

    let err = client.create("c").await.expect_err("should be rejected");
    assert!(err.is_rate_limited());
    assert_eq!(
        err.to_string(),
        "Rate limit exceeded for endpoint: chat.create"
    );
    // The underlying client never saw the third call
    assert_eq!(client.inner.invocations.load(Ordering::SeqCst), 2);
    assert_eq!(tracker.endpoint_metrics("chat.create").calls, 2);
}

#[tokio::test]
async fn test_wrapper_feeds_detail_ring_for_charting() {
    let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));
    let client = TrackedChatApi::new(tracker.clone());

    let reply = client.create("hello").await.expect("call should succeed");
    let duration = tracker.endpoint_metrics("chat.create").latency.max_ms;
    tracker.store_metric_details(
        "chat.create",
        MetricDetail::new()
            .with_duration_ms(duration)
            .with_model("gpt-4o")
            .with_tokens(12, u64::try_from(reply.len()).unwrap_or(0))
            .with_status(CallStatus::Success),
    );

    let series = tracker.detail_series("chat.create");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].duration_ms, Some(duration));
}

#[tokio::test]
async fn test_concurrent_tracked_calls_all_accounted() {
    let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));

    let mut handles = Vec::new();
    for i in 0..20_u32 {
        let tracker = tracker.clone();
        handles.push(tokio::spawn(async move {
            tracker
                .with_tracking("chat.create", || async move {
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                    if i % 5 == 0 {
                        Err(FakeApiError::Network {
                            message: format!("reset {i}"),
                        })
                    } else {
                        Ok(i)
                    }
                })
                .await
        }));
    }

    let mut failures = 0;
    for handle in handles {
        if handle.await.expect("task should not panic").is_err() {
            failures += 1;
        }
    }

    let snapshot = tracker.endpoint_metrics("chat.create");
    assert_eq!(snapshot.calls, 20);
    assert_eq!(snapshot.latency.count, 20);
    assert_eq!(snapshot.errors.len(), failures);
    assert_eq!(failures, 4);
}
