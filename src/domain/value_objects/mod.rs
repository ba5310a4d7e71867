//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Korean won amount, displayed with thousands separators and a `원` suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Won(Decimal);

impl Won {
    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_negative(&self) -> bool { self.0.is_sign_negative() && !self.0.is_zero() }
    pub fn multiply(&self, qty: i64) -> Won { Won(self.0 * Decimal::from(qty)) }

    /// Parses a form input. Anything that is not a finite, non-negative decimal is rejected.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() { return Err(MoneyError::Empty); }
        let amount = Decimal::from_str(trimmed).map_err(|_| MoneyError::NotANumber(trimmed.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() { return Err(MoneyError::Negative); }
        Ok(Self(amount))
    }
}

impl std::ops::Add for Won {
    type Output = Won;
    fn add(self, other: Won) -> Won { Won(self.0 + other.0) }
}

impl std::iter::Sum for Won {
    fn sum<I: Iterator<Item = Won>>(iter: I) -> Won { iter.fold(Won::zero(), |acc, w| acc + w) }
}

impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}원", group_thousands(self.0)) }
}

/// At most three fraction digits, matching what a browser locale formatter shows.
fn group_thousands(amount: Decimal) -> String {
    let rounded = amount.round_dp(3).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() { out.push('-'); }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 { out.push(','); }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { Empty, NotANumber(String), Negative }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "amount is required"),
            Self::NotANumber(raw) => write!(f, "'{}' is not a number", raw),
            Self::Negative => write!(f, "amount must not be negative"),
        }
    }
}

/// Descriptive or nutritional value the server may send as text or as a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    /// Empty form input means "absent".
    pub fn from_input(input: &str) -> Option<Self> {
        if input.is_empty() { None } else { Some(Self::Text(input.to_string())) }
    }

    pub fn is_blank(&self) -> bool { matches!(self, Self::Text(t) if t.is_empty()) }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Number(n) => write!(f, "{}", n), Self::Text(t) => f.write_str(t) }
    }
}

pub const PLACEHOLDER: &str = "-";

/// Category filter on the catalog page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Tag(String),
}

impl CategoryFilter {
    /// `ALL` (any case) or empty means no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") { Self::All } else { Self::Tag(trimmed.to_string()) }
    }
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self { Self::All => true, Self::Tag(tag) => category == Some(tag.as_str()) }
    }
    pub fn as_query(&self) -> &str { match self { Self::All => "ALL", Self::Tag(t) => t } }
}

/// Renders an optional field verbatim, or the placeholder when absent or blank.
pub fn display_or_placeholder(value: Option<&FieldValue>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_won_display() {
        assert_eq!(Won::new(Decimal::new(4500, 0)).to_string(), "4,500원");
        assert_eq!(Won::new(Decimal::new(1234567, 0)).to_string(), "1,234,567원");
        assert_eq!(Won::new(Decimal::new(999, 0)).to_string(), "999원");
        assert_eq!(Won::zero().to_string(), "0원");
        assert_eq!(Won::new(Decimal::new(12345, 1)).to_string(), "1,234.5원");
        assert_eq!(Won::new(Decimal::new(450000, 2)).to_string(), "4,500원");
    }
    #[test]
    fn test_won_parse() {
        assert_eq!(Won::parse(" 4500 ").unwrap().amount(), Decimal::new(4500, 0));
        assert_eq!(Won::parse("NaN"), Err(MoneyError::NotANumber("NaN".into())));
        assert_eq!(Won::parse("abc"), Err(MoneyError::NotANumber("abc".into())));
        assert_eq!(Won::parse(""), Err(MoneyError::Empty));
        assert_eq!(Won::parse("-1"), Err(MoneyError::Negative));
        assert!(Won::parse("0").is_ok());
    }
    #[test]
    fn test_category_filter() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        let drink = CategoryFilter::parse("drink");
        assert!(drink.matches(Some("drink")));
        assert!(!drink.matches(Some("food")));
        assert!(!drink.matches(None));
        assert!(CategoryFilter::All.matches(None));
    }
    #[test]
    fn test_field_value_placeholder() {
        assert_eq!(display_or_placeholder(None), "-");
        assert_eq!(display_or_placeholder(Some(&FieldValue::Text(String::new()))), "-");
        assert_eq!(display_or_placeholder(Some(&FieldValue::Text("milk".into()))), "milk");
        let n: FieldValue = serde_json::from_str("120").unwrap();
        assert_eq!(display_or_placeholder(Some(&n)), "120");
    }
}
