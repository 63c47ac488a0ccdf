//! The product catalog.
//!
//! The catalog is a static list embedded at compile time from
//! `data/catalog.json`. It is parsed and validated exactly once at startup and
//! never mutated afterwards; everything else reads it by product id.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Offer, Product, ProductId, Validity};

/// Catalog source compiled into the binary.
const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

/// Fixed-price products listed below this price are shown as unavailable.
const MIN_LISTED_PRICE: Decimal = Decimal::from_parts(48, 0, 0, false, 0);

/// Errors raised while loading the catalog or resolving a price from it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    #[error("product {product} lists validity '{validity}' more than once")]
    DuplicateValidity {
        product: ProductId,
        validity: Validity,
    },

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("product {product} has no validity option '{validity}'")]
    UnknownValidity {
        product: ProductId,
        validity: Validity,
    },

    #[error("product {0} requires a validity option")]
    ValidityRequired(ProductId),

    #[error("product {0} cannot be purchased")]
    NotPurchasable(ProductId),
}

/// A resolved unit price for one (product, validity) selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote<'a> {
    pub product: &'a Product,
    pub validity: Option<Validity>,
    pub unit_price: Decimal,
}

/// Immutable product catalog with id lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded data fails to parse or validate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON or invalid product data.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Build a catalog, validating and normalizing every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for duplicate ids, negative prices, or duplicate
    /// validity labels within a product.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        let mut normalized = Vec::with_capacity(products.len());

        for product in products {
            validate_product(&product)?;
            if index.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
            index.insert(product.id.clone(), normalized.len());
            normalized.push(normalize(product));
        }

        tracing::debug!(products = normalized.len(), "catalog loaded");
        Ok(Self {
            products: normalized,
            index,
        })
    }

    /// All products in listing order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// A blank query returns every product.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Every product except `id`, for the "you might also like" list.
    pub fn others<'a>(&'a self, id: &'a ProductId) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| &p.id != id)
    }

    /// Resolve the unit price for a product and validity selection.
    ///
    /// # Errors
    ///
    /// - `UnknownProduct` if the id is not in the catalog
    /// - `NotPurchasable` for contact-for-price and unavailable products
    /// - `ValidityRequired` if the product has options but none was given
    /// - `UnknownValidity` if the label is not one of the product's options
    pub fn quote(
        &self,
        id: &ProductId,
        validity: Option<&Validity>,
    ) -> Result<Quote<'_>, CatalogError> {
        let product = self
            .get(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))?;

        if !product.is_purchasable() {
            return Err(CatalogError::NotPurchasable(id.clone()));
        }

        match (product.options().is_empty(), validity) {
            (false, None) => Err(CatalogError::ValidityRequired(id.clone())),
            (true, Some(label)) => Err(CatalogError::UnknownValidity {
                product: id.clone(),
                validity: label.clone(),
            }),
            (true, None) => Ok(Quote {
                product,
                validity: None,
                unit_price: product.base_price().unwrap_or_default(),
            }),
            (false, Some(label)) => {
                let unit_price =
                    product
                        .price_for(Some(label))
                        .ok_or_else(|| CatalogError::UnknownValidity {
                            product: id.clone(),
                            validity: label.clone(),
                        })?;
                Ok(Quote {
                    product,
                    validity: Some(label.clone()),
                    unit_price,
                })
            }
        }
    }
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    let Offer::Standard {
        base_price,
        options,
    } = &product.offer
    else {
        return Ok(());
    };

    if base_price.is_sign_negative() || options.iter().any(|o| o.price.is_sign_negative()) {
        return Err(CatalogError::NegativePrice(product.id.clone()));
    }

    for (i, option) in options.iter().enumerate() {
        if options
            .iter()
            .skip(i + 1)
            .any(|other| other.validity == option.validity)
        {
            return Err(CatalogError::DuplicateValidity {
                product: product.id.clone(),
                validity: option.validity.clone(),
            });
        }
    }

    Ok(())
}

/// Apply listing rules that depend on price.
fn normalize(mut product: Product) -> Product {
    let below_minimum = product
        .base_price()
        .is_some_and(|price| price > Decimal::ZERO && price < MIN_LISTED_PRICE);

    if below_minimum {
        tracing::debug!(product = %product.id, "listing below minimum price as unavailable");
        product.offer = Offer::Unavailable;
    }
    product
}
