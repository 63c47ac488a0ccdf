//! htmx fragment handlers.
//!
//! Each timer fragment renders one frame and schedules its own replacement,
//! so the whole animation state lives in the `step` query parameter.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use nfxseller_core::ticker::{BannerRotation, Countdown, Typewriter};

use super::CartBadge;
use crate::error::Result;
use crate::middleware::Shop;
use crate::state::AppState;

/// Position in a timer sequence.
#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<u64>,
}

/// One rendered banner frame.
pub struct BannerView {
    pub text: &'static str,
    pub class: &'static str,
    pub next_step: u64,
    pub delay_ms: u64,
}

impl BannerView {
    /// `None` when no banners are configured.
    #[must_use]
    pub fn at(rotation: &BannerRotation, step: u64) -> Option<Self> {
        rotation.frame(step).map(|frame| {
            let delay_ms = frame.delay_ms();
            let (_, banner) = frame.value;
            Self {
                text: banner.text,
                class: banner.class,
                next_step: frame.next_step,
                delay_ms,
            }
        })
    }
}

/// One rendered search placeholder frame.
pub struct TypewriterView {
    pub text: String,
    pub next_step: u64,
    pub delay_ms: u64,
}

impl TypewriterView {
    #[must_use]
    pub fn at(typewriter: &Typewriter, step: u64) -> Self {
        let frame = typewriter.frame(step);
        Self {
            delay_ms: frame.delay_ms(),
            next_step: frame.next_step,
            text: frame.value,
        }
    }
}

/// Days, hours, minutes and seconds, zero padded.
pub struct CountdownView {
    /// False once the offer has ended; the fragment stops polling.
    pub running: bool,
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl CountdownView {
    #[must_use]
    pub fn at(countdown: &Countdown, now: DateTime<Utc>) -> Self {
        let [days, hours, minutes, seconds] = countdown.display(now);
        Self {
            running: countdown.remaining(now).is_some(),
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "partials/banner.html")]
pub struct BannerFragment {
    pub banner: Option<BannerView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "partials/typewriter.html")]
pub struct TypewriterFragment {
    pub typewriter: TypewriterView,
}

#[derive(Template, WebTemplate)]
#[template(path = "partials/countdown.html")]
pub struct CountdownFragment {
    pub countdown: CountdownView,
}

#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountFragment {
    pub badge: CartBadge,
}

/// Next banner frame.
#[instrument(skip(state))]
pub async fn banner(State(state): State<AppState>, Query(query): Query<StepQuery>) -> BannerFragment {
    BannerFragment {
        banner: BannerView::at(state.banners(), query.step.unwrap_or(0)),
    }
}

/// Next search placeholder frame.
#[instrument(skip(state))]
pub async fn typewriter(
    State(state): State<AppState>,
    Query(query): Query<StepQuery>,
) -> TypewriterFragment {
    TypewriterFragment {
        typewriter: TypewriterView::at(state.typewriter(), query.step.unwrap_or(0)),
    }
}

/// Offer countdown as of now.
#[instrument(skip(state))]
pub async fn countdown(State(state): State<AppState>) -> CountdownFragment {
    CountdownFragment {
        countdown: CountdownView::at(state.countdown(), Utc::now()),
    }
}

/// Navbar cart badge.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
#[instrument(skip(shop))]
pub async fn cart_count(shop: Shop) -> Result<CartCountFragment> {
    Ok(CartCountFragment {
        badge: CartBadge {
            count: shop.state.cart.item_count(),
        },
    })
}

/// Empty body, swapped in to dismiss a toast.
pub async fn empty() -> &'static str {
    ""
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_banner_view_schedules_next_step() {
        let view = BannerView::at(&BannerRotation::default(), 0).unwrap();
        assert_eq!(view.next_step, 1);
        assert_eq!(view.delay_ms, 3000);
        assert!(!view.text.is_empty());
    }

    #[test]
    fn test_typewriter_view_first_frame() {
        let view = TypewriterView::at(&Typewriter::default(), 0);
        assert_eq!(view.text, "S");
        assert_eq!(view.next_step, 1);
    }

    #[test]
    fn test_countdown_view_after_end_is_zero() {
        let ends_at = Utc.with_ymd_and_hms(2025, 7, 26, 23, 59, 59).unwrap();
        let view = CountdownView::at(&Countdown::new(ends_at), ends_at + chrono::Duration::days(1));
        assert!(!view.running);
        assert_eq!(view.days, "00");
        assert_eq!(view.seconds, "00");
    }

    #[test]
    fn test_cart_count_fragment_renders_number() {
        let html = CartCountFragment {
            badge: CartBadge { count: 3 },
        }
        .render()
        .unwrap();
        assert!(html.contains(">3<"));
        assert!(!html.contains("is-empty"));
    }
}
