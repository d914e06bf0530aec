//! Auto-dismissing toast notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::search::Notification;

/// Most toasts kept on screen at once; the oldest is dropped first.
const MAX_TOASTS: usize = 4;

/// A notification with its expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Notification to display.
    pub notification: Notification,
    /// When the toast disappears.
    pub expires_at: Instant,
}

/// Queue of visible toasts, oldest first.
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Toasts {
    /// Creates an empty queue whose toasts live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    /// Shows a notification starting now.
    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    /// Shows a notification starting at `now`.
    pub fn push_at(&mut self, notification: Notification, now: Instant) {
        if self.items.len() >= MAX_TOASTS {
            self.items.pop_front();
        }
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        self.items.push_back(Toast {
            notification,
            expires_at,
        });
    }

    /// Drops every toast that has expired at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    /// Iterates visible toasts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    /// Returns `true` if no toast is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
