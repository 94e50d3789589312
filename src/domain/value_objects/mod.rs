//! Value Objects for the catalog

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used when a product record does not carry one.
pub const DEFAULT_CURRENCY: &str = "VND";

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_uppercase() } }
    pub fn vnd(amount: Decimal) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_negative(&self) -> bool { self.amount.is_sign_negative() && !self.amount.is_zero() }

    /// Number of decimal places the currency is quoted in.
    pub fn minor_units(&self) -> u32 {
        match self.currency.as_str() {
            "VND" | "JPY" | "KRW" => 0,
            _ => 2,
        }
    }

    /// Price after taking `discount` percent off, rounded to the currency's minor unit.
    pub fn apply_discount(&self, discount: Discount) -> Money {
        if discount.is_none() { return self.clone(); }
        let factor = Decimal::from(100 - u32::from(discount.percent())) / Decimal::ONE_HUNDRED;
        let amount = (self.amount * factor).round_dp_with_strategy(self.minor_units(), RoundingStrategy::MidpointAwayFromZero);
        Money::new(amount.min(self.amount), &self.currency)
    }
}

impl Default for Money { fn default() -> Self { Self::zero(DEFAULT_CURRENCY) } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {}", self.amount, self.currency) }
}

/// Discount percentage, always within `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Discount(u8);

impl Discount {
    pub fn new(percent: u8) -> Result<Self, DiscountError> {
        if percent > 100 { return Err(DiscountError::OutOfRange(percent)); }
        Ok(Self(percent))
    }
    pub fn percent(&self) -> u8 { self.0 }
    pub fn is_none(&self) -> bool { self.0 == 0 }
}

impl TryFrom<u8> for Discount {
    type Error = DiscountError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Discount> for u8 {
    fn from(value: Discount) -> Self { value.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum DiscountError { OutOfRange(u8) }
impl std::error::Error for DiscountError {}
impl fmt::Display for DiscountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::OutOfRange(p) => write!(f, "Discount {p}% is outside 0..=100") }
    }
}

/// A single entry of a product's attribute bag.
///
/// Text is tried before numbers so that `"08"` stays text and is never
/// renormalized to `8`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Text(String),
    Number(Decimal),
    Flag(bool),
}

impl SpecValue {
    /// True for values a facet should never offer (empty or whitespace-only text).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }

    /// The value's kind, for checking against a declared attribute type.
    pub fn kind(&self) -> SpecKind {
        match self {
            Self::Text(_) => SpecKind::Text,
            Self::Number(_) => SpecKind::Number,
            Self::Flag(_) => SpecKind::Flag,
        }
    }
}

/// Text form used for facet values and filter matching.
impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::Number(n) => write!(f, "{}", n.normalize()),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for SpecValue { fn from(value: &str) -> Self { Self::Text(value.to_string()) } }
impl From<String> for SpecValue { fn from(value: String) -> Self { Self::Text(value) } }
impl From<Decimal> for SpecValue { fn from(value: Decimal) -> Self { Self::Number(value) } }
impl From<i64> for SpecValue { fn from(value: i64) -> Self { Self::Number(Decimal::from(value)) } }
impl From<i32> for SpecValue { fn from(value: i32) -> Self { Self::Number(Decimal::from(value)) } }
impl From<bool> for SpecValue { fn from(value: bool) -> Self { Self::Flag(value) } }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind { Text, Number, Flag }

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_discount_bounds() {
        assert!(Discount::new(100).is_ok());
        assert_eq!(Discount::new(101), Err(DiscountError::OutOfRange(101)));
    }
    #[test]
    fn test_apply_discount_rounds_to_minor_unit() {
        let price = Money::vnd(Decimal::new(1_999_999, 0));
        let discounted = price.apply_discount(Discount::new(15).unwrap());
        // 1_699_999.15 rounds to a whole dong
        assert_eq!(discounted.amount(), Decimal::new(1_699_999, 0));
        let usd = Money::new(Decimal::new(1999, 2), "usd");
        assert_eq!(usd.apply_discount(Discount::new(50).unwrap()).amount(), Decimal::new(1000, 2));
        assert_eq!(usd.currency(), "USD");
    }
    #[test]
    fn test_spec_value_text_form() {
        let parsed: Vec<SpecValue> = serde_json::from_str(r#"["08", 16, 16.0, 3.50, true, ""]"#).unwrap();
        let text: Vec<String> = parsed.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["08", "16", "16", "3.5", "true", ""]);
        assert_eq!(parsed[0].kind(), SpecKind::Text);
        assert_eq!(parsed[1].kind(), SpecKind::Number);
        assert!(parsed[5].is_empty());
        assert!(!parsed[1].is_empty());
    }
    #[test]
    fn test_zero_discount_keeps_price() {
        let price = Money::vnd(Decimal::new(500_000, 0));
        assert_eq!(price.apply_discount(Discount::default()), price);
    }
}
