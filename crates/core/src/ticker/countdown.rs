//! Offer countdown.

use chrono::{DateTime, Utc};

/// Counts down to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    ends_at: DateTime<Utc>,
}

/// Remaining time split into display fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownParts {
    /// Fields as zero-padded two-digit strings: days, hours, minutes, seconds.
    #[must_use]
    pub fn padded(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|n| format!("{n:02}"))
    }
}

impl Countdown {
    #[must_use]
    pub const fn new(ends_at: DateTime<Utc>) -> Self {
        Self { ends_at }
    }

    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Time left at `now`, or `None` once the end has passed.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<CountdownParts> {
        let left = self.ends_at.signed_duration_since(now);
        if left < chrono::TimeDelta::zero() {
            return None;
        }

        let total = left.num_seconds();
        Some(CountdownParts {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        })
    }

    /// Display fields at `now`; all zeros once expired.
    #[must_use]
    pub fn display(&self, now: DateTime<Utc>) -> [String; 4] {
        self.remaining(now).unwrap_or_default().padded()
    }
}
