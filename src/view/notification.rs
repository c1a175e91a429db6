//! Transient notifications shown in the status bar
//!
//! A notification is raised with the current instant of the panel's
//! `TimeSource` and expires once its time-to-live has elapsed. Only one is
//! shown at a time; a newer one replaces the older.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    raised_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, raised_at: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at,
        }
    }

    pub fn raised_at(&self) -> Instant {
        self.raised_at
    }

    /// True once `ttl` has elapsed since the notification was raised
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) >= ttl
    }
}
