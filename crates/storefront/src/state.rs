//! Application state shared across handlers.

use std::sync::Arc;

use nfxseller_core::ticker::{BannerRotation, Countdown, Typewriter};
use nfxseller_core::{Catalog, CatalogError, CheckoutInitiator};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is immutable
/// after startup; per-visitor state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutInitiator,
    banners: BannerRotation,
    typewriter: Typewriter,
    countdown: Countdown,
}

impl AppState {
    /// Create application state with the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog fails validation.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_catalog(config, Catalog::embedded()?))
    }

    /// Create application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let checkout = CheckoutInitiator::new(
            config.store.name.clone(),
            &config.store.whatsapp_number,
        );
        let countdown = Countdown::new(config.store.offer_ends_at);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
                banners: BannerRotation::default(),
                typewriter: Typewriter::default(),
                countdown,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutInitiator {
        &self.inner.checkout
    }

    #[must_use]
    pub fn banners(&self) -> &BannerRotation {
        &self.inner.banners
    }

    #[must_use]
    pub fn typewriter(&self) -> &Typewriter {
        &self.inner.typewriter
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.inner.countdown
    }
}
