//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use nfxseller_core::{NavIntent, Price, ProductId};

use super::Layout;
use super::fragments::{BannerView, CountdownView, TypewriterView};
use super::products::ProductView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shop};
use crate::state::AppState;

/// Search query on the product grid.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub q: Option<String>,
}

/// A Gemini promo plan with its add-to-cart form.
pub struct PlanView {
    pub product_id: String,
    pub name: &'static str,
    pub tagline: &'static str,
    pub validity: String,
    pub price: String,
}

/// Promo plans: (product id, card title, tagline).
const PLANS: [(&str, &str, &str); 2] = [
    ("g_individual", "Individual", "Perfect for a single user."),
    ("g_family", "Family", "Share with up to 5 family members."),
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub query: String,
    pub products: Vec<ProductView>,
    pub banner: Option<BannerView>,
    pub typewriter: TypewriterView,
    pub countdown: CountdownView,
    pub plans: Vec<PlanView>,
}

/// Display home page.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<HomeTemplate> {
    let now = Utc::now();

    shop.state
        .navigator
        .enter(NavIntent::Home)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let query = query.q.unwrap_or_default();
    let products: Vec<ProductView> = state
        .catalog()
        .search(&query)
        .into_iter()
        .map(ProductView::from)
        .collect();
    tracing::debug!(query = %query, results = products.len(), "product search");

    let layout = Layout::new(&state, &mut shop.state, nonce, now);
    shop.save().await?;

    Ok(HomeTemplate {
        layout,
        query,
        products,
        banner: BannerView::at(state.banners(), 0),
        typewriter: TypewriterView::at(state.typewriter(), 0),
        countdown: CountdownView::at(state.countdown(), now),
        plans: plan_views(&state),
    })
}

/// Promo plans that exist in the catalog with a monthly option.
fn plan_views(state: &AppState) -> Vec<PlanView> {
    PLANS
        .iter()
        .filter_map(|&(id, name, tagline)| {
            let product = state.catalog().get(&ProductId::new(id))?;
            let validity = product.default_validity()?;
            let price = product.price_for(Some(validity))?;
            Some(PlanView {
                product_id: product.id.to_string(),
                name,
                tagline,
                validity: validity.to_string(),
                price: Price::inr(price).display(),
            })
        })
        .collect()
}
