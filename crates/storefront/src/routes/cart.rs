//! Cart route handlers.
//!
//! Every mutation is a form POST that redirects back to a page, so the cart
//! works without JavaScript. Unit prices always come from the catalog, never
//! from the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use nfxseller_core::{CartKey, CartSnapshot, NavIntent, Price, ProductId, SnapshotLine, Validity};

use super::{Layout, local_path};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shop};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    /// Empty for one-time products.
    pub validity: String,
    pub validity_label: String,
    pub name: String,
    pub image_url: String,
    pub fallback_image_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&SnapshotLine> for CartLineView {
    fn from(line: &SnapshotLine) -> Self {
        Self {
            product_id: line.key.product_id.to_string(),
            validity: line
                .key
                .validity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            validity_label: line.validity_label().to_string(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            fallback_image_url: line.fallback_image_url.clone(),
            quantity: line.quantity,
            unit_price: Price::inr(line.unit_price).display(),
            line_total: Price::inr(line.line_total()).display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            lines: snapshot.lines.iter().map(CartLineView::from).collect(),
            total: Price::inr(snapshot.total).display(),
            item_count: snapshot.item_count,
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Form data for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub validity: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    /// Page to return to afterwards; same-site paths only.
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Form data identifying one cart line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub product_id: String,
    #[serde(default)]
    pub validity: Option<String>,
}

impl LineForm {
    fn key(&self) -> CartKey {
        CartKey::new(
            ProductId::new(self.product_id.as_str()),
            parse_validity(self.validity.as_deref()),
        )
    }
}

/// A blank validity field means the one-time option.
fn parse_validity(raw: Option<&str>) -> Option<Validity> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Validity::new)
}

/// Read a quantity field the lenient way a number input is read in the
/// browser: leading digits only, anything unreadable or below one becomes 1.
fn parse_quantity(raw: Option<&str>) -> u32 {
    let raw = raw.map(str::trim).unwrap_or_default();
    let (negative, digits) = raw
        .strip_prefix('-')
        .map_or((false, raw.strip_prefix('+').unwrap_or(raw)), |rest| {
            (true, rest)
        });
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    let (leading, _) = digits.split_at(end);

    if negative || leading.is_empty() {
        return 1;
    }
    leading.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

/// Display cart page.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn show(
    State(state): State<AppState>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<CartShowTemplate> {
    shop.state
        .navigator
        .enter(NavIntent::OpenCart)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let snapshot = shop.state.cart.snapshot(state.catalog());
    let layout = Layout::new(&state, &mut shop.state, nonce, Utc::now());
    shop.save().await?;

    Ok(CartShowTemplate {
        layout,
        cart: CartView::from(&snapshot),
    })
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop))]
pub async fn add(
    State(state): State<AppState>,
    mut shop: Shop,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let now = Utc::now();
    let product_id = ProductId::new(form.product_id.as_str());
    let validity = parse_validity(form.validity.as_deref());
    let quantity = parse_quantity(form.quantity.as_deref());

    let added = state
        .catalog()
        .quote(&product_id, validity.as_ref())
        .map_err(|e| e.to_string())
        .and_then(|quote| {
            shop.state
                .cart
                .add(quote.product, quote.validity, quote.unit_price, quantity)
                .map(|line| line.quantity)
                .map_err(|e| e.to_string())
        });

    match added {
        Ok(line_quantity) => {
            tracing::info!(quantity, line_quantity, "added to cart");
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("product_id", product_id.as_str())]),
            );
            shop.state.notify("Added to Cart", now);
        }
        Err(e) => {
            tracing::warn!(error = %e, "add to cart rejected");
            shop.state.warn("Could not add this item to the cart.", now);
        }
    }

    shop.save().await?;

    let fallback = format!("/products/{product_id}");
    let target = local_path(form.return_to.as_deref()).unwrap_or(&fallback);
    Ok(Redirect::to(target))
}

/// Add one to a cart line.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn increase(mut shop: Shop, Form(form): Form<LineForm>) -> Result<Redirect> {
    let key = form.key();
    if let Err(e) = shop.state.cart.increase(&key) {
        tracing::warn!(error = %e, "increase on a missing cart line");
    }
    shop.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Take one from a cart line, removing it at zero.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn decrease(mut shop: Shop, Form(form): Form<LineForm>) -> Result<Redirect> {
    let key = form.key();
    match shop.state.cart.decrease(&key) {
        Ok(Some(quantity)) => tracing::debug!(quantity, "cart line decreased"),
        Ok(None) => tracing::debug!(line = %key, "cart line removed at zero"),
        Err(e) => tracing::warn!(error = %e, "decrease on a missing cart line"),
    }
    shop.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn remove(mut shop: Shop, Form(form): Form<LineForm>) -> Result<Redirect> {
    let key = form.key();
    if shop.state.cart.remove(&key).is_some() {
        add_breadcrumb("cart", "Removed from cart", Some(&[("line", &key.to_string())]));
    }
    shop.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn clear(mut shop: Shop) -> Result<Redirect> {
    shop.state.cart.clear();
    add_breadcrumb("cart", "Cleared cart", None);
    shop.save().await?;
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_is_lenient() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 2 ")), 2);
        assert_eq!(parse_quantity(Some("4abc")), 4);
        assert_eq!(parse_quantity(Some("+5")), 5);
    }

    #[test]
    fn test_parse_quantity_falls_back_to_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-3")), 1);
    }

    #[test]
    fn test_parse_quantity_saturates() {
        assert_eq!(parse_quantity(Some("99999999999999")), u32::MAX);
    }

    #[test]
    fn test_blank_validity_is_one_time() {
        assert_eq!(parse_validity(Some("")), None);
        assert_eq!(parse_validity(Some("  ")), None);
        assert_eq!(parse_validity(None), None);
        assert_eq!(
            parse_validity(Some("1-month")),
            Some(Validity::new("1-month"))
        );
    }

    #[test]
    fn test_cart_view_formats_lines() {
        let snapshot = CartSnapshot::new(vec![SnapshotLine {
            key: CartKey::new(ProductId::new("t1"), None),
            name: "Amazon Refund Trick".to_string(),
            image_url: "https://placehold.co/300x200".to_string(),
            fallback_image_url: "https://placehold.co/64x64".to_string(),
            unit_price: rust_decimal::Decimal::from(399),
            quantity: 2,
        }]);

        let view = CartView::from(&snapshot);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "₹798");
        let line = view.lines.first().unwrap();
        assert_eq!(line.validity, "");
        assert_eq!(line.validity_label, "one-time");
        assert_eq!(line.unit_price, "₹399");
    }
}
