//! Visitor state extractor.
//!
//! Loads the visitor's `ShopSession` from the tower-sessions `Session` that
//! `SessionManagerLayer` put into the request extensions.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{ShopSession, session_keys};

/// Extractor holding the visitor's storefront state.
///
/// A visitor without a session yet gets a fresh `ShopSession`. Handlers that
/// change the state must call [`Shop::save`] before responding; an unchanged
/// state is not written, so visitors who only browse never get a session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut shop: Shop) -> Result<Redirect> {
///     shop.state.cart.clear();
///     shop.save().await?;
///     Ok(Redirect::to("/"))
/// }
/// ```
pub struct Shop {
    session: Session,
    loaded: ShopSession,
    pub state: ShopSession,
}

impl Shop {
    /// Write the state back to the session if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&mut self) -> Result<(), AppError> {
        if self.state == self.loaded {
            return Ok(());
        }
        self.session.insert(session_keys::SHOP, &self.state).await?;
        self.loaded.clone_from(&self.state);
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Shop
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let state = match session.get::<ShopSession>(session_keys::SHOP).await {
            Ok(state) => state.unwrap_or_default(),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                // Shape written by an older build
                tracing::warn!(error = %e, "discarding unreadable shop session");
                ShopSession::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            session,
            loaded: state.clone(),
            state,
        })
    }
}
