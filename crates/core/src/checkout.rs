//! Checkout hand-off.
//!
//! There is no payment gateway. Checkout produces a pre-filled chat message
//! and a `wa.me` deep link; the seller confirms the UPI payment by hand.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartSnapshot;
use crate::types::{OrderId, Price};

const WHATSAPP_BASE_URL: &str = "https://wa.me";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Everything the confirmation screen needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutHandoff {
    pub order_id: OrderId,
    pub message: String,
    pub deep_link: String,
    pub total: Decimal,
}

/// Builds checkout hand-offs for one store.
#[derive(Debug, Clone)]
pub struct CheckoutInitiator {
    store_name: String,
    whatsapp_number: String,
}

impl CheckoutInitiator {
    /// `whatsapp_number` may carry a leading `+`; `wa.me` wants bare digits.
    #[must_use]
    pub fn new(store_name: impl Into<String>, whatsapp_number: &str) -> Self {
        Self {
            store_name: store_name.into(),
            whatsapp_number: whatsapp_number.trim_start_matches('+').to_owned(),
        }
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Create the hand-off for a cart snapshot.
    ///
    /// The cart is not touched; the caller clears it once the visitor
    /// dismisses the confirmation.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if the snapshot has no lines.
    pub fn initiate<R: Rng + ?Sized>(
        &self,
        snapshot: &CartSnapshot,
        rng: &mut R,
    ) -> Result<CheckoutHandoff, CheckoutError> {
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_id = OrderId::generate(rng);
        let message = self.message(snapshot);
        let deep_link = self.deep_link(&message);

        tracing::info!(
            order = %order_id,
            lines = snapshot.lines.len(),
            total = %snapshot.total,
            "checkout initiated"
        );

        Ok(CheckoutHandoff {
            order_id,
            message,
            deep_link,
            total: snapshot.total,
        })
    }

    /// The pre-filled chat message.
    #[must_use]
    pub fn message(&self, snapshot: &CartSnapshot) -> String {
        let mut lines = Vec::with_capacity(snapshot.lines.len() + 3);
        lines.push(format!(
            "Hello! I've placed an order on {}. Order Details:",
            self.store_name
        ));
        for line in &snapshot.lines {
            lines.push(format!(
                "{} x{} ({}) - {}",
                line.name,
                line.quantity,
                line.validity_label(),
                Price::inr(line.unit_price).display_exact()
            ));
        }
        lines.push(format!(
            "Total: {}",
            Price::inr(snapshot.total).display_exact()
        ));
        lines.push(
            "Kindly provide your UPI transaction ID and payment screenshot here for verification."
                .to_owned(),
        );
        lines.join("\n")
    }

    #[must_use]
    pub fn deep_link(&self, message: &str) -> String {
        format!(
            "{WHATSAPP_BASE_URL}/{}?text={}",
            self.whatsapp_number,
            encode_uri_component(message)
        )
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`.
///
/// `urlencoding` leaves only `A-Z a-z 0-9 - _ . ~` alone; the browser function
/// also keeps `! ' ( ) *`.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    let encoded = urlencoding::encode(input);
    if !encoded.contains("%2") {
        return encoded.into_owned();
    }

    let mut out = String::with_capacity(encoded.len());
    let mut rest: &str = &encoded;
    while let Some(pos) = rest.find('%') {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        let (escape, after) = tail.split_at(tail.len().min(3));
        match escape {
            "%21" => out.push('!'),
            "%27" => out.push('\''),
            "%28" => out.push('('),
            "%29" => out.push(')'),
            "%2A" => out.push('*'),
            other => out.push_str(other),
        }
        rest = after;
    }
    out.push_str(rest);
    out
}
