//! Promotional banner rotation.

use std::time::Duration;

use super::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner {
    pub text: &'static str,
    /// Background utility class.
    pub class: &'static str,
}

/// The banners shown above the product grid.
pub const BANNERS: [Banner; 3] = [
    Banner {
        text: "PREMIUM ACCOUNTS ARE BACK IN STOCK",
        class: "bg-purple-700",
    },
    Banner {
        text: "NEW ARRIVALS EVERY WEEK",
        class: "bg-orange-600",
    },
    Banner {
        text: "LIMITED TIME OFFERS",
        class: "bg-green-600",
    },
];

const BANNER_INTERVAL: Duration = Duration::from_millis(3000);

/// Cycles through a fixed list of banners at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct BannerRotation {
    banners: &'static [Banner],
    interval: Duration,
}

impl Default for BannerRotation {
    fn default() -> Self {
        Self {
            banners: &BANNERS,
            interval: BANNER_INTERVAL,
        }
    }
}

impl BannerRotation {
    #[must_use]
    pub const fn new(banners: &'static [Banner], interval: Duration) -> Self {
        Self { banners, interval }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.banners.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    /// The banner at `step`, wrapping around. `None` only for an empty list.
    #[must_use]
    pub fn frame(&self, step: u64) -> Option<Frame<(usize, Banner)>> {
        let len = u64::try_from(self.banners.len()).ok().filter(|&n| n > 0)?;
        let index = step % len;
        let position = usize::try_from(index).ok()?;
        let banner = *self.banners.get(position)?;

        Some(Frame {
            value: (position, banner),
            delay: self.interval,
            next_step: (index + 1) % len,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps_around() {
        let rotation = BannerRotation::default();
        let texts: Vec<_> = (0..4)
            .map(|step| rotation.frame(step).unwrap().value.1.text)
            .collect();
        assert_eq!(
            texts,
            [
                "PREMIUM ACCOUNTS ARE BACK IN STOCK",
                "NEW ARRIVALS EVERY WEEK",
                "LIMITED TIME OFFERS",
                "PREMIUM ACCOUNTS ARE BACK IN STOCK",
            ]
        );
    }

    #[test]
    fn test_every_frame_waits_three_seconds() {
        let rotation = BannerRotation::default();
        let frame = rotation.frame(2).unwrap();
        assert_eq!(frame.delay_ms(), 3000);
        assert_eq!(frame.next_step, 0);
        assert_eq!(frame.value.1.class, "bg-green-600");
    }

    #[test]
    fn test_empty_rotation_has_no_frames() {
        let rotation = BannerRotation::new(&[], BANNER_INTERVAL);
        assert!(rotation.is_empty());
        assert!(rotation.frame(0).is_none());
    }
}
