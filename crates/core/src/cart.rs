//! Cart store.
//!
//! A cart is a mapping from `(product, validity)` to a line item carrying a
//! unit price snapshotted at add time and a quantity of at least one. Adding a
//! key that is already present merges into the existing line; decreasing a
//! line to zero removes it.
//!
//! Lines keep insertion order so the cart page lists items in the order the
//! visitor added them.

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::types::{ONE_TIME_LABEL, Product, ProductId, Validity};

/// Errors returned by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("product {0} cannot be added to the cart")]
    NotPurchasable(ProductId),

    #[error("unit price cannot be negative")]
    NegativePrice,

    #[error("cart line not found: {0}")]
    NotFound(CartKey),

    #[error("quantity limit reached for {0}")]
    QuantityOverflow(CartKey),
}

/// Composite key identifying one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: ProductId,
    pub validity: Option<Validity>,
}

impl CartKey {
    #[must_use]
    pub const fn new(product_id: ProductId, validity: Option<Validity>) -> Self {
        Self {
            product_id,
            validity,
        }
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.validity {
            Some(validity) => write!(f, "{} ({validity})", self.product_id),
            None => write!(f, "{} ({ONE_TIME_LABEL})", self.product_id),
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub key: CartKey,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The visitor's cart.
///
/// Serializes as a list of line items so it can live in a JSON-backed session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    lines: IndexMap<CartKey, LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product at `unit_price`.
    ///
    /// If the `(product, validity)` line already exists its quantity grows by
    /// `quantity` and the original unit price is kept.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity` is zero
    /// - `NotPurchasable` for contact-for-price and unavailable products
    /// - `NegativePrice` if `unit_price` is below zero
    /// - `QuantityOverflow` if the merged quantity does not fit in a `u32`
    pub fn add(
        &mut self,
        product: &Product,
        validity: Option<Validity>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<&LineItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.is_purchasable() {
            return Err(CartError::NotPurchasable(product.id.clone()));
        }
        if unit_price.is_sign_negative() {
            return Err(CartError::NegativePrice);
        }

        let key = CartKey::new(product.id.clone(), validity);
        let entry = self
            .lines
            .entry(key.clone())
            .or_insert_with(|| LineItem {
                key: key.clone(),
                unit_price,
                quantity: 0,
            });
        entry.quantity = entry
            .quantity
            .checked_add(quantity)
            .ok_or(CartError::QuantityOverflow(key))?;

        Ok(entry)
    }

    /// Increase a line's quantity by one. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub fn increase(&mut self, key: &CartKey) -> Result<u32, CartError> {
        let line = self
            .lines
            .get_mut(key)
            .ok_or_else(|| CartError::NotFound(key.clone()))?;
        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityOverflow(key.clone()))?;
        Ok(line.quantity)
    }

    /// Decrease a line's quantity by one, removing it when it reaches zero.
    ///
    /// Returns the remaining quantity, or `None` if the line was removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub fn decrease(&mut self, key: &CartKey) -> Result<Option<u32>, CartError> {
        let line = self
            .lines
            .get_mut(key)
            .ok_or_else(|| CartError::NotFound(key.clone()))?;

        if line.quantity > 1 {
            line.quantity -= 1;
            return Ok(Some(line.quantity));
        }

        self.lines.shift_remove(key);
        Ok(None)
    }

    /// Remove a line unconditionally. Removing a missing line is a no-op.
    pub fn remove(&mut self, key: &CartKey) -> Option<LineItem> {
        self.lines.shift_remove(key)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&LineItem> {
        self.lines.get(key)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Exact sum of `unit_price * quantity` over every line.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.values().map(LineItem::line_total).sum()
    }

    /// Sum of quantities, for the navbar badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Join lines with catalog data for rendering and checkout.
    ///
    /// Lines whose product has disappeared from the catalog are skipped.
    #[must_use]
    pub fn snapshot(&self, catalog: &Catalog) -> CartSnapshot {
        let lines = self
            .lines
            .values()
            .filter(|line| line.quantity > 0)
            .filter_map(|line| {
                let Some(product) = catalog.get(&line.key.product_id) else {
                    tracing::warn!(key = %line.key, "cart line references unknown product");
                    return None;
                };
                Some(SnapshotLine {
                    key: line.key.clone(),
                    name: product.name.clone(),
                    image_url: product.image_url.clone(),
                    fallback_image_url: product.placeholder_image_url(64, 64),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                })
            })
            .collect();

        CartSnapshot::new(lines)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        let mut lines: IndexMap<CartKey, LineItem> = IndexMap::with_capacity(items.len());
        for item in items.into_iter().filter(|item| item.quantity > 0) {
            match lines.get_mut(&item.key) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => {
                    lines.insert(item.key.clone(), item);
                }
            }
        }
        Self { lines }
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.lines.into_values().collect()
    }
}

/// A cart line joined with the product data needed to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub key: CartKey,
    pub name: String,
    pub image_url: String,
    pub fallback_image_url: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl SnapshotLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// The validity label, or "one-time" for option-less products.
    #[must_use]
    pub fn validity_label(&self) -> &str {
        self.key
            .validity
            .as_ref()
            .map_or(ONE_TIME_LABEL, Validity::as_str)
    }
}

/// Read-only view of the cart at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartSnapshot {
    /// Build a snapshot from lines, computing the totals.
    #[must_use]
    pub fn new(lines: Vec<SnapshotLine>) -> Self {
        let total = lines.iter().map(SnapshotLine::line_total).sum();
        let item_count = lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity));
        Self {
            lines,
            total,
            item_count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
