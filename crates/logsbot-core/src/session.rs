//! Process lifecycle tracking.
//!
//! [`SessionTracker`] owns the process start time and whether startup has
//! already been announced. It decides *whether* a lifecycle notice is due and
//! hands back a [`LifecycleIntent`]; composing and sending it is left to the
//! caller.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::formatting::format_uptime_delta;

// ── Public types ──────────────────────────────────────────────────────────────

/// Which lifecycle transition is being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Startup,
    Restart,
}

/// A lifecycle notice that should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleIntent {
    pub kind: LifecycleKind,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Formatted uptime of the session that just ended (restart only).
    /// `None` when no start time was known.
    pub previous_uptime: Option<String>,
}

/// Snapshot of the tracker state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub process_start_time: Option<DateTime<Utc>>,
    pub has_announced_startup: bool,
}

// ── SessionTracker ────────────────────────────────────────────────────────────

/// Tracks the current session start time across startup and restart.
#[derive(Debug, Default)]
pub struct SessionTracker {
    state: Mutex<SessionState>,
}

impl SessionTracker {
    /// Create a tracker with no recorded start time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record process startup.
    ///
    /// Returns an intent only the first time it is called and only while no
    /// start time has been recorded; every later call returns `None`.
    pub fn on_startup(&self, now: DateTime<Utc>) -> Option<LifecycleIntent> {
        let mut state = self.state.lock();
        if state.has_announced_startup || state.process_start_time.is_some() {
            return None;
        }

        state.process_start_time = Some(now);
        state.has_announced_startup = true;
        tracing::info!(start = %now, "session started");

        Some(LifecycleIntent {
            kind: LifecycleKind::Startup,
            at: now,
            previous_uptime: None,
        })
    }

    /// Record a restart: report the uptime of the ending session and start a
    /// new one at `now`.
    pub fn on_restart(&self, now: DateTime<Utc>) -> LifecycleIntent {
        let mut state = self.state.lock();
        let previous_uptime = state
            .process_start_time
            .map(|start| format_uptime_delta(now - start));
        state.process_start_time = Some(now);

        tracing::info!(
            previous_uptime = previous_uptime.as_deref().unwrap_or("unknown"),
            "session restarted"
        );

        LifecycleIntent {
            kind: LifecycleKind::Restart,
            at: now,
            previous_uptime,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Uptime of the current session at `now`, if a session has started.
    pub fn uptime(&self, now: DateTime<Utc>) -> Option<chrono::TimeDelta> {
        self.state.lock().process_start_time.map(|start| now - start)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
