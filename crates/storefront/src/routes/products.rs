//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use nfxseller_core::{NavIntent, Offer, Price, Product, ProductId};

use super::Layout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shop};
use crate::state::AppState;

/// Card image size, also used for the fallback placeholder.
const CARD_IMAGE: (u32, u32) = (300, 200);

/// Products whose card hides the description.
const CARD_DESCRIPTION_HIDDEN: &[&str] = &["a1"];

/// What a product card shows in its price slot.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Priced,
    ContactForPrice,
    Unavailable,
}

/// Product display data for cards and the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub show_card_description: bool,
    pub image_url: String,
    pub fallback_image_url: String,
    pub price: String,
    pub availability: Availability,
}

impl ProductView {
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        matches!(self.availability, Availability::Priced)
    }

    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.availability, Availability::Unavailable)
    }

    #[must_use]
    pub const fn is_contact_for_price(&self) -> bool {
        matches!(self.availability, Availability::ContactForPrice)
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let (price, availability) = match &product.offer {
            Offer::Standard { base_price, .. } => {
                (Price::inr(*base_price).display(), Availability::Priced)
            }
            Offer::ContactForPrice => (String::new(), Availability::ContactForPrice),
            Offer::Unavailable => (String::new(), Availability::Unavailable),
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            show_card_description: !CARD_DESCRIPTION_HIDDEN.contains(&product.id.as_str()),
            image_url: product.image_url.clone(),
            fallback_image_url: product.placeholder_image_url(CARD_IMAGE.0, CARD_IMAGE.1),
            price,
            availability,
        }
    }
}

/// One entry in the validity select.
pub struct OptionView {
    pub validity: String,
    pub label: String,
    /// Plain unit price for the client-side quantity preview.
    pub amount: String,
    pub selected: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub options: Vec<OptionView>,
    /// Price of the preselected option.
    pub selected_price: String,
    pub others: Vec<ProductView>,
}

/// Unknown product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub layout: Layout,
    pub product_id: String,
}

/// Display product detail page.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let now = Utc::now();
    let id = ProductId::new(id);

    let Some(product) = state.catalog().get(&id) else {
        tracing::info!(product = %id, "unknown product requested");
        let layout = Layout::new(&state, &mut shop.state, nonce, now);
        shop.save().await?;
        return Ok((
            StatusCode::NOT_FOUND,
            ProductNotFoundTemplate {
                layout,
                product_id: id.to_string(),
            },
        )
            .into_response());
    };

    shop.state
        .navigator
        .enter(NavIntent::SelectProduct(id.clone()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    add_breadcrumb("navigation", "Viewed product", Some(&[("product_id", id.as_str())]));

    let default_validity = product.default_validity();
    let options = product
        .options()
        .iter()
        .map(|option| OptionView {
            validity: option.validity.to_string(),
            label: format!("{} - {}", option.validity, Price::inr(option.price).display()),
            amount: option.price.normalize().to_string(),
            selected: Some(&option.validity) == default_validity,
        })
        .collect();
    let selected_price = product
        .price_for(default_validity)
        .map(|price| Price::inr(price).display())
        .unwrap_or_default();

    let layout = Layout::new(&state, &mut shop.state, nonce, now);
    shop.save().await?;

    Ok(ProductShowTemplate {
        layout,
        product: ProductView::from(product),
        options,
        selected_price,
        others: state.catalog().others(&id).map(ProductView::from).collect(),
    }
    .into_response())
}

/// Leave the product detail view.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(shop))]
pub async fn back(mut shop: Shop) -> Result<Redirect> {
    if let Err(e) = shop.state.navigator.dispatch(NavIntent::BackToProducts) {
        // Stale page; still land on home
        tracing::debug!(error = %e, "back to products from outside product detail");
        shop.state.navigator.enter(NavIntent::Home).ok();
    }
    shop.save().await?;
    Ok(Redirect::to("/"))
}
