//! HTTP route handlers for storefront.
//!
//! Pages are server-rendered and every state change is a form POST that
//! redirects back to a GET (post/redirect/get). htmx only drives the cosmetic
//! timers and the navbar badge.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Home page (optional ?q= search)
//! GET  /health                         - Health check
//!
//! # Products
//! GET  /products/{id}                  - Product detail
//! POST /products/{id}/back             - Back to the product list
//!
//! # Cart
//! GET  /cart                           - Cart page
//! POST /cart/add                       - Add a (product, validity) line
//! POST /cart/increase                  - +1 on a line
//! POST /cart/decrease                  - -1 on a line (removes at zero)
//! POST /cart/remove                    - Remove a line
//! POST /cart/clear                     - Empty the cart
//!
//! # Checkout
//! GET  /checkout                       - Order summary and UPI details
//! POST /checkout                       - Place order, show confirmation
//! POST /checkout/back                  - Back to the cart
//! GET  /checkout/confirmation          - Order confirmation with WhatsApp link
//! POST /checkout/confirmation/close    - Clear cart and go home
//!
//! # Pages
//! GET  /pages/refund-policy            - Refund policy
//!
//! # Fragments (htmx)
//! GET  /fragments/banner?step=         - Rotating banner
//! GET  /fragments/typewriter?step=     - Search placeholder
//! GET  /fragments/countdown            - Offer countdown
//! GET  /fragments/cart-count           - Navbar badge
//! GET  /fragments/empty                - Empty body (toast dismissal)
//! ```

pub mod cart;
pub mod checkout;
pub mod fragments;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};

use crate::models::ShopSession;
use crate::state::AppState;

/// Data every full page needs: navbar, footer, toasts, CSP nonce.
pub struct Layout {
    pub nonce: String,
    pub brand_head: String,
    pub brand_tail: String,
    pub store_name: String,
    pub badge: CartBadge,
    pub telegram_url: String,
    pub whatsapp_group_url: String,
    pub instagram_url: String,
    pub toasts: Vec<ToastView>,
}

/// The navbar cart badge.
#[derive(Clone, Copy)]
pub struct CartBadge {
    pub count: u32,
}

impl CartBadge {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A toast ready to render, with the time it has left on screen.
pub struct ToastView {
    pub message: String,
    pub kind: &'static str,
    pub remaining_ms: i64,
}

impl Layout {
    /// Build the layout, draining the visitor's pending toasts.
    ///
    /// The caller must save the session afterwards or the toasts reappear.
    pub fn new(state: &AppState, shop: &mut ShopSession, nonce: String, now: DateTime<Utc>) -> Self {
        let store = &state.config().store;
        let name = store.name.as_str();
        let split = name.char_indices().nth(3).map_or(name.len(), |(i, _)| i);
        let (brand_head, brand_tail) = name.split_at(split);

        let toasts = shop
            .take_toasts(now)
            .into_iter()
            .map(|toast| ToastView {
                remaining_ms: toast.remaining_ms(now),
                kind: toast.kind.as_str(),
                message: toast.message,
            })
            .collect();

        Self {
            nonce,
            brand_head: brand_head.to_string(),
            brand_tail: brand_tail.to_string(),
            store_name: store.name.clone(),
            badge: CartBadge {
                count: shop.cart.item_count(),
            },
            telegram_url: store.social.telegram.to_string(),
            whatsapp_group_url: store.social.whatsapp_group.to_string(),
            instagram_url: store.social.instagram.to_string(),
            toasts,
        }
    }
}

/// Only same-site absolute paths are followed after a form POST.
fn local_path(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|path| {
        path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
    })
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/back", post(products::back))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/back", post(checkout::back))
        .route("/confirmation", get(checkout::confirmation))
        .route("/confirmation/close", post(checkout::close_confirmation))
}

/// Create the htmx fragment routes router.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .route("/banner", get(fragments::banner))
        .route("/typewriter", get(fragments::typewriter))
        .route("/countdown", get(fragments::countdown))
        .route("/cart-count", get(fragments::cart_count))
        .route("/empty", get(fragments::empty))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/pages/refund-policy", get(pages::refund_policy))
        .nest("/fragments", fragment_routes())
}
