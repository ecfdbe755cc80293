//! How path changes reach the router.
//!
//! Whatever the source, a trigger only ever asks the router to
//! [`tick`](crate::Spa::tick); the router itself ignores ticks whose path did
//! not change. Hosts that notify hash changes tick on each notification,
//! others are polled on a fixed interval.

use std::time::Duration;

/// Trigger source chosen when an application starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Tick on every hash-change notification.
    HashChange,
    /// Tick on a fixed interval.
    Polling(Duration),
}

impl TriggerMode {
    /// Pick the trigger for a host.
    pub fn select(supports_hash_change: bool, polling_interval: Duration) -> Self {
        if supports_hash_change {
            Self::HashChange
        } else {
            Self::Polling(polling_interval)
        }
    }

    /// Return `true` for the polling fallback.
    pub fn is_polling(&self) -> bool {
        matches!(self, Self::Polling(_))
    }

    /// Polling interval, if polling.
    pub fn polling_interval(&self) -> Option<Duration> {
        match self {
            Self::Polling(interval) => Some(*interval),
            Self::HashChange => None,
        }
    }
}
