//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are `rust_decimal::Decimal`, so summing many lines never drifts the
//! way binary floating point does (`3.99 * 5` is exactly `19.95`).
//!
//! Formatting follows the `en-IN` locale: the last three integer digits form
//! one group and every group above it has two digits (`1,00,000`).

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Indian rupees.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Shop display format, rounded to whole units (e.g. `₹1,699`).
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{}",
            self.currency_code.symbol(),
            format_en_in(self.amount, 0)
        )
    }

    /// Exact display format with up to three fraction digits (e.g. `₹3.99`).
    ///
    /// This is the format used inside the checkout hand-off message.
    #[must_use]
    pub fn display_exact(&self) -> String {
        format!(
            "{}{}",
            self.currency_code.symbol(),
            format_en_in(self.amount, 3)
        )
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// ISO 4217 currency codes.
///
/// The shop sells in rupees only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Currency symbol used in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
        }
    }
}

/// Format an amount with `en-IN` digit grouping.
///
/// The amount is rounded half away from zero to `max_fraction_digits`, then
/// trailing fractional zeros are dropped (`159.00` prints as `159`).
#[must_use]
pub fn format_en_in(amount: Decimal, max_fraction_digits: u32) -> String {
    let rounded = amount
        .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Insert `en-IN` group separators into a string of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, group) = rest.split_at(rest.len() - 2);
        groups.push(group);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_en_in_grouping() {
        assert_eq!(format_en_in(Decimal::new(159, 0), 0), "159");
        assert_eq!(format_en_in(Decimal::new(1699, 0), 0), "1,699");
        assert_eq!(format_en_in(Decimal::new(100_000, 0), 0), "1,00,000");
        assert_eq!(format_en_in(Decimal::new(12_345_678, 0), 0), "1,23,45,678");
        assert_eq!(format_en_in(Decimal::ZERO, 0), "0");
    }

    #[test]
    fn test_format_en_in_drops_trailing_zeros() {
        assert_eq!(format_en_in(Decimal::new(15900, 2), 3), "159");
        assert_eq!(format_en_in(Decimal::new(1995, 2), 3), "19.95");
        assert_eq!(format_en_in(Decimal::new(399, 2), 3), "3.99");
        assert_eq!(format_en_in(Decimal::new(123_450, 1), 3), "12,345");
    }

    #[test]
    fn test_format_en_in_rounds_half_away_from_zero() {
        assert_eq!(format_en_in(Decimal::new(1995, 2), 0), "20");
        assert_eq!(format_en_in(Decimal::new(1245, 1), 0), "125");
        assert_eq!(format_en_in(Decimal::new(12_345, 4), 3), "1.235");
    }

    #[test]
    fn test_format_en_in_negative() {
        assert_eq!(format_en_in(Decimal::new(-150_000, 0), 0), "-1,50,000");
    }

    #[test]
    fn test_price_display() {
        let price = Price::inr(Decimal::new(169_900, 2));
        assert_eq!(price.display(), "₹1,699");
        assert_eq!(Price::inr(Decimal::new(399, 2)).display_exact(), "₹3.99");
    }

    #[test]
    fn test_price_sum_is_exact() {
        // 0.1 + 0.2 style drift must not appear
        let total: Price = std::iter::repeat_n(Price::inr(Decimal::new(1, 1)), 3).sum();
        assert_eq!(total.amount, Decimal::new(3, 1));
        assert_eq!(Price::inr(Decimal::new(1599, 2)).times(9).amount, Decimal::new(14391, 2));
    }
}
