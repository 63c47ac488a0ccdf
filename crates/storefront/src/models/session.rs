//! Session-related types.
//!
//! Everything one visitor owns lives in a single `ShopSession` value stored
//! under one session key, so a request reads and writes it as a unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nfxseller_core::ticker::{Toast, ToastKind, ToastQueue};
use nfxseller_core::{Cart, CheckoutHandoff, Navigator};

/// Per-visitor storefront state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSession {
    pub cart: Cart,
    pub navigator: Navigator,
    /// Set between placing the order and dismissing the confirmation.
    #[serde(default)]
    pub confirmation: Option<CheckoutHandoff>,
    #[serde(default)]
    pub toasts: ToastQueue,
}

impl ShopSession {
    pub fn notify(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.toasts.push(message, ToastKind::Success, now);
    }

    pub fn warn(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.toasts.push(message, ToastKind::Error, now);
    }

    /// Toasts to render on the next page, removed from the queue.
    pub fn take_toasts(&mut self, now: DateTime<Utc>) -> Vec<Toast> {
        self.toasts.take_active(now)
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's `ShopSession`.
    pub const SHOP: &str = "shop";
}
