//! Short-lived notifications ("Added to Cart").

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How long a toast stays on screen.
pub const TOAST_TTL_MS: i64 = 2000;

/// Most toasts kept for one visitor; older ones are dropped first.
pub const MAX_PENDING_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + TimeDelta::milliseconds(TOAST_TTL_MS)
    }

    /// Milliseconds left before the toast should disappear, zero if expired.
    #[must_use]
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        self.expires_at()
            .signed_duration_since(now)
            .num_milliseconds()
            .max(0)
    }
}

/// Pending toasts for one visitor, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast, dropping expired ones and the oldest beyond
    /// [`MAX_PENDING_TOASTS`].
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: DateTime<Utc>) -> u64 {
        self.expire(now);
        if self.toasts.len() >= MAX_PENDING_TOASTS {
            let excess = self.toasts.len() + 1 - MAX_PENDING_TOASTS;
            self.toasts.drain(..excess);
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            created_at: now,
        });
        id
    }

    /// Drop toasts whose time is up.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|toast| toast.expires_at() > now);
    }

    /// Remove and return the toasts still worth showing.
    ///
    /// Once rendered, the page owns the toast and dismisses it itself.
    pub fn take_active(&mut self, now: DateTime<Utc>) -> Vec<Toast> {
        self.expire(now);
        std::mem::take(&mut self.toasts)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_ttl() {
        let now = Utc::now();
        let mut queue = ToastQueue::new();
        queue.push("Added to Cart", ToastKind::Success, now);

        queue.expire(now + TimeDelta::milliseconds(1_999));
        assert_eq!(queue.len(), 1);

        queue.expire(now + TimeDelta::milliseconds(2_000));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_take_active_drains_live_toasts() {
        let now = Utc::now();
        let mut queue = ToastQueue::new();
        queue.push("old", ToastKind::Success, now - TimeDelta::seconds(5));
        let id = queue.push("Added to Cart", ToastKind::Success, now);

        let active = queue.take_active(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(active[0].remaining_ms(now), 2000);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_drops_stale_toasts() {
        let now = Utc::now();
        let mut queue = ToastQueue::new();
        for _ in 0..1_000 {
            queue.push("Added to Cart", ToastKind::Success, now);
        }

        queue.push("Added to Cart", ToastKind::Success, now + TimeDelta::days(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_push_keeps_only_newest_toasts() {
        let now = Utc::now();
        let mut queue = ToastQueue::new();
        let ids: Vec<u64> = (0..8)
            .map(|_| queue.push("Added to Cart", ToastKind::Success, now))
            .collect();

        assert_eq!(queue.len(), MAX_PENDING_TOASTS);
        let kept: Vec<u64> = queue.take_active(now).iter().map(|t| t.id).collect();
        assert_eq!(kept, ids[ids.len() - MAX_PENDING_TOASTS..]);
    }

    #[test]
    fn test_ids_are_distinct() {
        let now = Utc::now();
        let mut queue = ToastQueue::new();
        let a = queue.push("a", ToastKind::Success, now);
        let b = queue.push("b", ToastKind::Error, now);
        assert_ne!(a, b);
    }
}
