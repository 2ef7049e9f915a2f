//! Wall-clock session timeout tracking.

use chrono::{DateTime, Duration, Utc};

/// Default number of seconds a backgrounded session stays valid.
pub const DEFAULT_INVALIDATION_TIMEOUT_SECS: u64 = 10;

/// Tracks when the app was last backgrounded and how long a session may
/// survive in the background before a fresh authentication is required.
///
/// Purely computational; the timeout is evaluated lazily at check time, never
/// via a background timer. [`AuthGate`](crate::gate::AuthGate) owns mutation.
#[derive(Debug, Clone)]
pub struct AuthClock {
    last_backgrounded_at: Option<DateTime<Utc>>,
    invalidate_after: Duration,
}

impl Default for AuthClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthClock {
    /// Create a clock with the default 10-second timeout and no recorded
    /// backgrounding.
    pub fn new() -> Self {
        Self {
            last_backgrounded_at: None,
            invalidate_after: Duration::seconds(DEFAULT_INVALIDATION_TIMEOUT_SECS as i64),
        }
    }

    /// Change the invalidation timeout. Zero means any backgrounding
    /// immediately invalidates the session; values past chrono's range
    /// saturate to a timeout that never expires.
    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.invalidate_after = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
    }

    /// Record that the app went to the background at `at`.
    pub fn note_backgrounded(&mut self, at: DateTime<Utc>) {
        self.last_backgrounded_at = Some(at);
    }

    /// Forget the recorded backgrounding timestamp.
    pub fn clear(&mut self) {
        self.last_backgrounded_at = None;
    }

    /// Whether the session timeout has elapsed since the last backgrounding.
    ///
    /// False when no backgrounding has been recorded.
    pub fn exceeded_timeout(&self, now: DateTime<Utc>) -> bool {
        match self.last_backgrounded_at {
            Some(at) => now - at >= self.invalidate_after,
            None => false,
        }
    }
}
