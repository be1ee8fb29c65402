//! Sliding-window timestamp accounting for a single endpoint.

use std::collections::VecDeque;

/// Ordered timestamps (epoch ms) of recent call starts.
///
/// Pruning happens on the write path ([`RateWindow::register`]); reads count
/// in-window entries without persisting the prune, so the stored list may
/// lag behind until the next registration.
#[derive(Debug, Default)]
pub(super) struct RateWindow {
    timestamps: VecDeque<i64>,
}

impl RateWindow {
    /// Record a call start, pruning expired entries first.
    ///
    /// Timestamps need not be unique; concurrent calls in the same
    /// millisecond are all counted.
    pub(super) fn register(&mut self, now_ms: i64, window_ms: u64) {
        self.prune(now_ms, window_ms);
        self.timestamps.push_back(now_ms);
    }

    /// Count entries with `now - t <= window_ms`. Pure read.
    pub(super) fn count_within(&self, now_ms: i64, window_ms: u64) -> usize {
        let cutoff = now_ms - window_as_i64(window_ms);
        self.timestamps.iter().filter(|&&t| t >= cutoff).count()
    }

    /// Drop all recorded timestamps.
    pub(super) fn clear(&mut self) {
        self.timestamps.clear();
    }

    /// Number of stored entries, pruned or not.
    #[cfg(test)]
    pub(super) fn stored_len(&self) -> usize {
        self.timestamps.len()
    }

    /// Remove timestamps older than the window.
    fn prune(&mut self, now_ms: i64, window_ms: u64) {
        let cutoff = now_ms - window_as_i64(window_ms);
        while let Some(&front) = self.timestamps.front() {
            if front < cutoff {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Window lengths are validated to at most one hour, so this never saturates
/// in practice.
fn window_as_i64(window_ms: u64) -> i64 {
    i64::try_from(window_ms).unwrap_or(i64::MAX)
}
