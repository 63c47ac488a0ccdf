//! Navigation state machine.
//!
//! The storefront has four views. The selected product only exists inside the
//! `ProductDetail` variant, so a product reference without the detail view (or
//! the other way round) cannot be represented.
//!
//! ```text
//!            Home ──SelectProduct──▶ ProductDetail(id) ──SelectProduct──┐
//!             ▲  ◀──BackToProducts──        │          ◀────────────────┘
//!             │                             │
//!   (any) ──OpenCart──▶ Cart ──ProceedToCheckout──▶ Checkout
//!                        ▲ ◀────────BackToCart────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// A storefront view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "view", content = "product", rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Cart,
    Checkout,
    ProductDetail(ProductId),
}

impl View {
    /// Selected product, present exactly on the detail view.
    #[must_use]
    pub const fn selected_product(&self) -> Option<&ProductId> {
        match self {
            Self::ProductDetail(id) => Some(id),
            Self::Home | Self::Cart | Self::Checkout => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Cart => f.write_str("cart"),
            Self::Checkout => f.write_str("checkout"),
            Self::ProductDetail(id) => write!(f, "product-detail({id})"),
        }
    }
}

/// A navigation request from the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIntent {
    Home,
    OpenCart,
    ProceedToCheckout,
    BackToCart,
    SelectProduct(ProductId),
    BackToProducts,
}

impl fmt::Display for NavIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::OpenCart => f.write_str("open-cart"),
            Self::ProceedToCheckout => f.write_str("proceed-to-checkout"),
            Self::BackToCart => f.write_str("back-to-cart"),
            Self::SelectProduct(id) => write!(f, "select-product({id})"),
            Self::BackToProducts => f.write_str("back-to-products"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot {intent} from {from}")]
    InvalidTransition { from: View, intent: NavIntent },
}

/// Pure transition function. `None` means the intent is not valid from `from`.
#[must_use]
pub fn next_view(from: &View, intent: &NavIntent) -> Option<View> {
    match (from, intent) {
        (_, NavIntent::Home) => Some(View::Home),
        (_, NavIntent::OpenCart) => Some(View::Cart),
        (View::Cart, NavIntent::ProceedToCheckout) => Some(View::Checkout),
        (View::Checkout, NavIntent::BackToCart) => Some(View::Cart),
        (View::Home | View::ProductDetail(_), NavIntent::SelectProduct(id)) => {
            Some(View::ProductDetail(id.clone()))
        }
        (View::ProductDetail(_), NavIntent::BackToProducts) => Some(View::Home),
        _ => None,
    }
}

/// Holds the current view of one visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    current: View,
}

impl Navigator {
    /// Start at the home view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> &View {
        &self.current
    }

    /// Apply an in-page intent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the intent is not valid from the
    /// current view. The view is left unchanged in that case.
    pub fn dispatch(&mut self, intent: NavIntent) -> Result<&View, NavigationError> {
        let Some(next) = next_view(&self.current, &intent) else {
            return Err(NavigationError::InvalidTransition {
                from: self.current.clone(),
                intent,
            });
        };

        tracing::debug!(from = %self.current, to = %next, "navigate");
        self.current = next;
        Ok(&self.current)
    }

    /// Apply an intent arriving from outside the page (a typed URL, a
    /// bookmark, the browser's back button).
    ///
    /// If the intent is not reachable from the current view the machine
    /// re-roots at `Home` and tries again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the intent is not reachable from `Home`
    /// either. The view is left unchanged in that case.
    pub fn enter(&mut self, intent: NavIntent) -> Result<&View, NavigationError> {
        if next_view(&self.current, &intent).is_none() {
            if next_view(&View::Home, &intent).is_none() {
                return Err(NavigationError::InvalidTransition {
                    from: self.current.clone(),
                    intent,
                });
            }
            tracing::debug!(from = %self.current, %intent, "re-rooting navigation at home");
            self.current = View::Home;
        }
        self.dispatch(intent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn detail(id: &str) -> View {
        View::ProductDetail(ProductId::new(id))
    }

    fn all_views() -> Vec<View> {
        vec![View::Home, View::Cart, View::Checkout, detail("s1")]
    }

    #[test]
    fn test_starts_at_home() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), &View::Home);
        assert!(nav.current().selected_product().is_none());
    }

    #[test]
    fn test_transition_table() {
        let select = NavIntent::SelectProduct(ProductId::new("d3"));
        let cases = [
            (View::Home, select.clone(), Some(detail("d3"))),
            (detail("s1"), select.clone(), Some(detail("d3"))),
            (View::Cart, select.clone(), None),
            (View::Checkout, select, None),
            (View::Cart, NavIntent::ProceedToCheckout, Some(View::Checkout)),
            (View::Home, NavIntent::ProceedToCheckout, None),
            (detail("s1"), NavIntent::ProceedToCheckout, None),
            (View::Checkout, NavIntent::BackToCart, Some(View::Cart)),
            (View::Cart, NavIntent::BackToCart, None),
            (detail("s1"), NavIntent::BackToProducts, Some(View::Home)),
            (View::Home, NavIntent::BackToProducts, None),
        ];
        for (from, intent, expected) in cases {
            assert_eq!(next_view(&from, &intent), expected, "{intent} from {from}");
        }
    }

    #[test]
    fn test_home_and_cart_reachable_from_every_view() {
        for view in all_views() {
            assert_eq!(next_view(&view, &NavIntent::Home), Some(View::Home));
            assert_eq!(next_view(&view, &NavIntent::OpenCart), Some(View::Cart));
        }
    }

    #[test]
    fn test_detail_then_back_restores_home() {
        let mut nav = Navigator::new();
        nav.dispatch(NavIntent::SelectProduct(ProductId::new("s1")))
            .unwrap();
        assert_eq!(
            nav.current().selected_product(),
            Some(&ProductId::new("s1"))
        );

        nav.dispatch(NavIntent::BackToProducts).unwrap();
        assert_eq!(nav.current(), &View::Home);
        assert!(nav.current().selected_product().is_none());
    }

    #[test]
    fn test_invalid_dispatch_leaves_view_unchanged() {
        let mut nav = Navigator::new();
        let err = nav.dispatch(NavIntent::ProceedToCheckout).unwrap_err();
        assert_eq!(
            err,
            NavigationError::InvalidTransition {
                from: View::Home,
                intent: NavIntent::ProceedToCheckout,
            }
        );
        assert_eq!(nav.current(), &View::Home);
    }

    #[test]
    fn test_enter_reroots_at_home() {
        let mut nav = Navigator::new();
        nav.dispatch(NavIntent::OpenCart).unwrap();

        // A product link opened while the cart is showing
        nav.enter(NavIntent::SelectProduct(ProductId::new("t1")))
            .unwrap();
        assert_eq!(nav.current(), &detail("t1"));
    }

    #[test]
    fn test_enter_still_fails_when_unreachable_from_home() {
        let mut nav = Navigator::new();
        nav.dispatch(NavIntent::SelectProduct(ProductId::new("t1")))
            .unwrap();

        assert!(nav.enter(NavIntent::ProceedToCheckout).is_err());
        assert!(nav.enter(NavIntent::BackToCart).is_err());
        assert_eq!(nav.current(), &detail("t1"));
    }

    #[test]
    fn test_view_serializes_with_product_payload() {
        let json = serde_json::to_value(detail("s1")).unwrap();
        assert_eq!(json, serde_json::json!({"view": "product_detail", "product": "s1"}));

        let home: View = serde_json::from_value(serde_json::json!({"view": "home"})).unwrap();
        assert_eq!(home, View::Home);
    }
}
