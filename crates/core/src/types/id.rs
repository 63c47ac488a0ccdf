//! Newtype IDs for type-safe references.
//!
//! Use the `define_id!` macro to create string-backed wrappers that prevent
//! accidentally mixing identifiers of different kinds (a product id is not a
//! validity label, even though both are strings in the catalog).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Macro to define a string-backed, type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `Display`, `AsRef<str>`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use nfxseller_core::define_id;
/// define_id!(SkuId);
/// define_id!(BundleId);
///
/// let sku = SkuId::new("s1");
/// let bundle = BundleId::new("s1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = bundle;
/// assert_eq!(sku.as_str(), bundle.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProductId);
// A validity option label such as "1-month" or "lifetime". Unique per product.
define_id!(Validity);

/// Display label used for products that have no validity options.
pub const ONE_TIME_LABEL: &str = "one-time";

/// Ephemeral order identifier shown on the confirmation screen.
///
/// Always a 12-digit number. It is never persisted or checked against
/// anything, so two visitors may well receive the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Smallest generated order number.
    pub const MIN: u64 = 100_000_000_000;
    /// Largest generated order number.
    pub const MAX: u64 = 999_999_999_999;

    /// Draw a random order number from `[MIN, MAX]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(Self::MIN..=Self::MAX))
    }

    /// Get the underlying number.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Customer-facing reference, e.g. `UPI-ORD-123456789012`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("UPI-ORD-{}", self.0)
    }
}

impl ::core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_product_id_roundtrips_through_json_as_plain_string() {
        let id = ProductId::new("g_wukong");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"g_wukong\"");
        assert_eq!(id.to_string(), "g_wukong");
    }

    #[test]
    fn test_order_id_in_twelve_digit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let id = OrderId::generate(&mut rng);
            assert!((OrderId::MIN..=OrderId::MAX).contains(&id.as_u64()));
            assert_eq!(id.to_string().len(), 12);
        }
    }

    #[test]
    fn test_order_reference_format() {
        let id = OrderId(123_456_789_012);
        assert_eq!(id.reference(), "UPI-ORD-123456789012");
    }
}
