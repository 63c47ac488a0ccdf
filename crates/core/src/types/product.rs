//! Product records and their offers.
//!
//! A product's purchasability is a tagged variant rather than a pair of
//! loosely related flags, so every code path has to say what it does with
//! contact-for-price and unavailable listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, Validity};

/// Base URL of the placeholder image service used when a product image fails.
const PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co";

/// One purchasable validity option (e.g. "1-month" at ₹159).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityOption {
    pub validity: Validity,
    pub price: Decimal,
}

/// How (and whether) a product can be bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Offer {
    /// Fixed-price product.
    ///
    /// An empty `options` list means a single implicit "one-time" option
    /// priced at `base_price`.
    Standard {
        base_price: Decimal,
        #[serde(default)]
        options: Vec<ValidityOption>,
    },
    /// No listed price; the visitor has to message the seller.
    ContactForPrice,
    /// Listed, but cannot be bought right now.
    Unavailable,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub offer: Offer,
}

impl Product {
    /// Whether the product can go into the cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        matches!(self.offer, Offer::Standard { .. })
    }

    #[must_use]
    pub const fn is_contact_for_price(&self) -> bool {
        matches!(self.offer, Offer::ContactForPrice)
    }

    /// Validity options in catalog order. Empty for option-less and
    /// non-purchasable products.
    #[must_use]
    pub fn options(&self) -> &[ValidityOption] {
        match &self.offer {
            Offer::Standard { options, .. } => options,
            Offer::ContactForPrice | Offer::Unavailable => &[],
        }
    }

    /// The validity preselected on the product page (the first option).
    #[must_use]
    pub fn default_validity(&self) -> Option<&Validity> {
        self.options().first().map(|option| &option.validity)
    }

    /// Listing price shown on product cards.
    #[must_use]
    pub const fn base_price(&self) -> Option<Decimal> {
        match &self.offer {
            Offer::Standard { base_price, .. } => Some(*base_price),
            Offer::ContactForPrice | Offer::Unavailable => None,
        }
    }

    /// Unit price for a validity selection.
    ///
    /// Option-less products are priced with `None`; products with options
    /// require one of their labels. Returns `None` for any other combination.
    #[must_use]
    pub fn price_for(&self, validity: Option<&Validity>) -> Option<Decimal> {
        let Offer::Standard {
            base_price,
            options,
        } = &self.offer
        else {
            return None;
        };

        match (options.is_empty(), validity) {
            (true, None) => Some(*base_price),
            (false, Some(wanted)) => options
                .iter()
                .find(|option| &option.validity == wanted)
                .map(|option| option.price),
            _ => None,
        }
    }

    /// Fallback image URL from the placeholder service.
    ///
    /// Spaces in the product name become `+` in the `text` query.
    #[must_use]
    pub fn placeholder_image_url(&self, width: u32, height: u32) -> String {
        format!(
            "{PLACEHOLDER_IMAGE_BASE}/{width}x{height}/555/FFF?text={}",
            self.name.replace(' ', "+")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(offer: Offer) -> Product {
        Product {
            id: ProductId::new("s1"),
            name: "Amazon Prime Video".to_string(),
            description: String::new(),
            image_url: String::new(),
            offer,
        }
    }

    fn netflix_offer() -> Offer {
        Offer::Standard {
            base_price: Decimal::new(159, 0),
            options: vec![
                ValidityOption {
                    validity: Validity::new("1-month"),
                    price: Decimal::new(159, 0),
                },
                ValidityOption {
                    validity: Validity::new("1-year"),
                    price: Decimal::new(1699, 0),
                },
            ],
        }
    }

    #[test]
    fn test_price_for_validity_option() {
        let p = product(netflix_offer());
        assert_eq!(
            p.price_for(Some(&Validity::new("1-year"))),
            Some(Decimal::new(1699, 0))
        );
        assert_eq!(p.price_for(Some(&Validity::new("2-year"))), None);
        assert_eq!(p.price_for(None), None);
        assert_eq!(p.default_validity(), Some(&Validity::new("1-month")));
    }

    #[test]
    fn test_price_for_option_less_product() {
        let p = product(Offer::Standard {
            base_price: Decimal::new(399, 0),
            options: Vec::new(),
        });
        assert_eq!(p.price_for(None), Some(Decimal::new(399, 0)));
        assert_eq!(p.price_for(Some(&Validity::new("one-time"))), None);
    }

    #[test]
    fn test_non_purchasable_offers_have_no_price() {
        for offer in [Offer::ContactForPrice, Offer::Unavailable] {
            let p = product(offer);
            assert!(!p.is_purchasable());
            assert!(p.options().is_empty());
            assert_eq!(p.base_price(), None);
            assert_eq!(p.price_for(None), None);
        }
    }

    #[test]
    fn test_placeholder_image_url_replaces_spaces() {
        let p = product(Offer::Unavailable);
        assert_eq!(
            p.placeholder_image_url(300, 200),
            "https://placehold.co/300x200/555/FFF?text=Amazon+Prime+Video"
        );
    }

    #[test]
    fn test_offer_json_shape() {
        let json = r#"{"kind":"standard","base_price":"3.99","options":[]}"#;
        let offer: Offer = serde_json::from_str(json).unwrap_or(Offer::Unavailable);
        assert_eq!(
            offer,
            Offer::Standard {
                base_price: Decimal::new(399, 2),
                options: Vec::new()
            }
        );

        let contact: Offer =
            serde_json::from_str(r#"{"kind":"contact_for_price"}"#).unwrap_or(Offer::Unavailable);
        assert_eq!(contact, Offer::ContactForPrice);
    }
}
