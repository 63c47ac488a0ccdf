//! Checkout route handlers.
//!
//! Payment happens outside the site: the visitor pays by UPI and then sends
//! the pre-filled WhatsApp message. Placing an order only builds that message;
//! the cart is cleared when the visitor closes the confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use nfxseller_core::{CheckoutError, NavIntent, View};

use super::Layout;
use super::cart::CartView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shop};
use crate::state::AppState;

/// UPI payment details shown next to the order summary.
pub struct PaymentView {
    pub upi_id: String,
    pub payee_name: String,
    pub qr_url: String,
    pub whatsapp_number: String,
}

impl PaymentView {
    fn from_state(state: &AppState) -> Self {
        let store = &state.config().store;
        Self {
            upi_id: store.upi_id.clone(),
            payee_name: store.upi_payee_name.clone(),
            qr_url: store.upi_qr_url.to_string(),
            whatsapp_number: store.whatsapp_number.clone(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub payment: PaymentView,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub layout: Layout,
    pub order_reference: String,
    pub deep_link: String,
}

/// Display the checkout page.
///
/// Reachable from the cart; a direct visit from anywhere else is sent to the
/// cart first.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn show(
    State(state): State<AppState>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let entered = if shop.state.navigator.current() == &View::Checkout {
        Ok(())
    } else {
        shop.state
            .navigator
            .enter(NavIntent::ProceedToCheckout)
            .map(|_| ())
    };

    if let Err(e) = entered {
        tracing::debug!(error = %e, "checkout opened outside the cart");
        shop.state
            .navigator
            .enter(NavIntent::OpenCart)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        shop.save().await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let snapshot = shop.state.cart.snapshot(state.catalog());
    let layout = Layout::new(&state, &mut shop.state, nonce, Utc::now());
    shop.save().await?;

    Ok(CheckoutShowTemplate {
        layout,
        cart: CartView::from(&snapshot),
        payment: PaymentView::from_state(&state),
    }
    .into_response())
}

/// Place the order: build the WhatsApp hand-off and show the confirmation.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop))]
pub async fn place_order(State(state): State<AppState>, mut shop: Shop) -> Result<Redirect> {
    let now = Utc::now();
    let snapshot = shop.state.cart.snapshot(state.catalog());
    let handoff = state.checkout().initiate(&snapshot, &mut rand::rng());

    match handoff {
        Ok(handoff) => {
            add_breadcrumb(
                "checkout",
                "Order initiated",
                Some(&[("order", &handoff.order_id.reference())]),
            );
            shop.state.confirmation = Some(handoff);
            shop.save().await?;
            Ok(Redirect::to("/checkout/confirmation"))
        }
        Err(CheckoutError::EmptyCart) => {
            tracing::info!("checkout attempted with an empty cart");
            shop.state.warn("Your cart is empty.", now);
            shop.state.navigator.enter(NavIntent::OpenCart).ok();
            shop.save().await?;
            Ok(Redirect::to("/cart"))
        }
    }
}

/// Go back from checkout to the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn back(mut shop: Shop) -> Result<Redirect> {
    if let Err(e) = shop.state.navigator.dispatch(NavIntent::BackToCart) {
        tracing::debug!(error = %e, "back to cart from outside checkout");
        shop.state.navigator.enter(NavIntent::OpenCart).ok();
    }
    shop.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Display the order confirmation.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn confirmation(
    State(state): State<AppState>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let Some(handoff) = shop.state.confirmation.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    let layout = Layout::new(&state, &mut shop.state, nonce, Utc::now());
    shop.save().await?;

    Ok(ConfirmationTemplate {
        layout,
        order_reference: handoff.order_id.reference(),
        deep_link: handoff.deep_link,
    }
    .into_response())
}

/// Dismiss the confirmation: empty the cart and return home.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn close_confirmation(mut shop: Shop) -> Result<Redirect> {
    if let Some(handoff) = shop.state.confirmation.take() {
        tracing::info!(order = %handoff.order_id, "confirmation closed, cart cleared");
        shop.state.cart.clear();
    }
    shop.state
        .navigator
        .enter(NavIntent::Home)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    shop.save().await?;
    Ok(Redirect::to("/"))
}
