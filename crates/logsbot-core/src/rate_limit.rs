//! Per-thread cooldown gate.
//!
//! A thread may produce at most one announcement per cooldown window. The
//! table lives only as long as the process; nothing is persisted.
//!
//! Admission is a single read-modify-write under one lock, so two racing
//! callers for the same key within the window can never both be admitted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default cooldown between two announcements for the same thread.
pub const DEFAULT_COOLDOWN_MS: u64 = 3_000;

/// Table size above which expired entries are pruned.
pub const DEFAULT_MAX_TRACKED: usize = 10_000;

// ── RateLimiter ───────────────────────────────────────────────────────────────

/// Cooldown gate keyed by thread identity.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use logsbot_core::rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::new();
/// let now = Utc::now();
/// assert!(limiter.admit("thread-1", now, 3_000));
/// assert!(!limiter.admit("thread-1", now + Duration::milliseconds(10), 3_000));
/// ```
pub struct RateLimiter {
    /// Last accepted timestamp per key.
    last_accepted: Mutex<HashMap<String, DateTime<Utc>>>,
    /// Pruning threshold for `last_accepted`.
    max_tracked: usize,
}

impl RateLimiter {
    /// Create a limiter with the default pruning threshold.
    pub fn new() -> Self {
        Self::with_max_tracked(DEFAULT_MAX_TRACKED)
    }

    /// Create a limiter that prunes expired entries once more than
    /// `max_tracked` keys are held.
    pub fn with_max_tracked(max_tracked: usize) -> Self {
        Self {
            last_accepted: Mutex::new(HashMap::new()),
            max_tracked: max_tracked.max(1),
        }
    }

    /// Admit or reject an event for `key` observed at `now`.
    ///
    /// Rejects when a previously accepted timestamp exists and fewer than
    /// `window_ms` milliseconds have elapsed since it. Otherwise records
    /// `now` as the new accepted timestamp and returns `true`.
    pub fn admit(&self, key: &str, now: DateTime<Utc>, window_ms: u64) -> bool {
        let window = i64::try_from(window_ms).unwrap_or(i64::MAX);
        let mut table = self.last_accepted.lock();

        if let Some(last) = table.get(key) {
            let elapsed_ms = (now - *last).num_milliseconds();
            if elapsed_ms < window {
                return false;
            }
        }

        table.insert(key.to_string(), now);

        if table.len() > self.max_tracked {
            let before = table.len();
            table.retain(|_, last| (now - *last).num_milliseconds() < window);
            tracing::debug!(
                pruned = before - table.len(),
                remaining = table.len(),
                "pruned expired rate-limit entries"
            );
        }

        true
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.last_accepted.lock().len()
    }

    /// Last accepted timestamp for `key`, if any.
    pub fn last_accepted(&self, key: &str) -> Option<DateTime<Utc>> {
        self.last_accepted.lock().get(key).copied()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
