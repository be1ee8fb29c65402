//! Call-tracking wrapper and explicit client decoration.
//!
//! This module provides:
//! - [`ApiTracker::with_tracking`]: time an arbitrary async operation,
//!   record its outcome, and pass the result through unchanged
//! - [`Scope`]: dotted-path endpoint naming for instrumenting a whole API
//!   client surface without wrapping each call site by hand
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use api_tracker::config::TrackerConfig;
//! use api_tracker::instrument::Scope;
//! use api_tracker::tracker::ApiTracker;
//!
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("api error")]
//! # struct ApiError;
//! # async fn run() {
//! let tracker = Arc::new(ApiTracker::new(TrackerConfig::default()));
//! let threads = Scope::new(tracker.clone(), "threads");
//! let runs = threads.child("runs");
//!
//! // Tracked under the endpoint key "threads.runs.create"
//! let result: Result<String, _> = runs
//!     .call("create", || async { Ok::<_, ApiError>("run_123".to_string()) })
//!     .await;
//! assert!(result.is_ok());
//! assert_eq!(tracker.endpoint_metrics("threads.runs.create").calls, 1);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::TrackedError;
use crate::tracker::snapshot::CallStatus;
use crate::tracker::ApiTracker;

impl ApiTracker {
    /// Run `operation` with start/end accounting under `endpoint`.
    ///
    /// 1. If the endpoint is over its request budget, returns
    ///    [`TrackedError::RateLimited`] without invoking the operation.
    /// 2. Records the start, awaits the operation, records the completion.
    /// 3. On success the value is returned unchanged; on failure the
    ///    original error comes back inside [`TrackedError::Operation`],
    ///    identity and message intact.
    ///
    /// Bookkeeping is synchronous on both sides of the single `.await`, so
    /// for one endpoint the start is always recorded before the operation
    /// begins and the completion after it settles.
    ///
    /// # Errors
    ///
    /// Returns [`TrackedError::RateLimited`] on admission failure, or
    /// [`TrackedError::Operation`] carrying the operation's own error.
    pub async fn with_tracking<T, E, F, Fut>(
        &self,
        endpoint: &str,
        operation: F,
    ) -> Result<T, TrackedError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.check_rate_limit(endpoint) {
            tracing::warn!(endpoint, "rate limit exceeded, call rejected");
            return Err(TrackedError::RateLimited {
                endpoint: endpoint.to_string(),
            });
        }

        let start = self.start_tracking(endpoint);
        match operation().await {
            Ok(value) => {
                self.end_tracking(endpoint, start, CallStatus::Success);
                Ok(value)
            }
            Err(error) => {
                self.end_tracking(endpoint, start, CallStatus::Error);
                Err(TrackedError::Operation(error))
            }
        }
    }
}

/// A dotted-path handle over a shared tracker.
///
/// Scopes replace dynamic deep-wrapping: each nested API surface gets a
/// child scope, and every call made through it is tracked under the full
/// dotted endpoint key (`threads.runs.create`). Scopes are cheap to clone
/// and hold no state of their own beyond the path.
#[derive(Debug, Clone)]
pub struct Scope {
    tracker: Arc<ApiTracker>,
    path: String,
}

impl Scope {
    /// Create a scope rooted at `root` (e.g. `"chat"` or `"threads"`).
    pub fn new(tracker: Arc<ApiTracker>, root: impl Into<String>) -> Self {
        Self {
            tracker,
            path: root.into(),
        }
    }

    /// Descend into a nested surface: `threads` → `threads.runs`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
            path: format!("{}.{segment}", self.path),
        }
    }

    /// The full endpoint key for a method in this scope.
    #[must_use]
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}.{method}", self.path)
    }

    /// The shared tracker behind this scope.
    #[must_use]
    pub const fn tracker(&self) -> &Arc<ApiTracker> {
        &self.tracker
    }

    /// Run `operation` tracked under this scope's dotted key for `method`.
    ///
    /// # Errors
    ///
    /// Same contract as [`ApiTracker::with_tracking`].
    pub async fn call<T, E, F, Fut>(&self, method: &str, operation: F) -> Result<T, TrackedError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.tracker
            .with_tracking(&self.endpoint(method), operation)
            .await
    }
}
