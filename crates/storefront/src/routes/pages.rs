//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;

use super::Layout;
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, Shop};
use crate::state::AppState;

/// Refund policy page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/refund_policy.html")]
pub struct RefundPolicyTemplate {
    pub layout: Layout,
    pub whatsapp_number: String,
}

/// Display the refund policy page.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(state, shop, nonce))]
pub async fn refund_policy(
    State(state): State<AppState>,
    mut shop: Shop,
    CspNonce(nonce): CspNonce,
) -> Result<RefundPolicyTemplate> {
    let layout = Layout::new(&state, &mut shop.state, nonce, Utc::now());
    shop.save().await?;

    Ok(RefundPolicyTemplate {
        layout,
        whatsapp_number: state.config().store.whatsapp_number.clone(),
    })
}
