//! Tick-driven models for the storefront's cosmetic timers.
//!
//! Nothing here sleeps or spawns. Each model maps a step counter (or the
//! current time) to the frame to show and the delay before the next one, so
//! whoever owns the on-screen element also owns the timer and drops it with
//! the element.

pub mod banner;
pub mod countdown;
pub mod toast;
pub mod typewriter;

use std::time::Duration;

pub use banner::{Banner, BannerRotation};
pub use countdown::{Countdown, CountdownParts};
pub use toast::{Toast, ToastKind, ToastQueue};
pub use typewriter::Typewriter;

/// One rendered frame of a stepped animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T> {
    pub value: T,
    /// How long to show this frame before requesting `next_step`.
    pub delay: Duration,
    pub next_step: u64,
}

impl<T> Frame<T> {
    /// Delay in whole milliseconds, for `hx-trigger="load delay:..ms"`.
    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX)
    }
}
