//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that sums over any number of
//! transactions are exact. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount a single transaction or budget may carry (one billion units)
    ///
    /// Totals over tens of millions of entries at this size still fit in `i64`.
    pub const MAX_ENTRY: Money = Money(100_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use spendwise::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Whether this is a valid amount for one transaction or budget
    pub const fn is_within_entry_limit(&self) -> bool {
        self.0 > 0 && self.0 <= Self::MAX_ENTRY.0
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250.00", "10".
    /// Digits beyond the second decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();

        let (negative, s) = if let Some(stripped) = original.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, original)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let s: String = s.chars().filter(|c| *c != ',').collect();

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let cents = if let Some((whole, fraction)) = s.split_once('.') {
            if fraction.contains('.') || !fraction.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(original.to_string()));
            }

            let dollars: i64 = if whole.is_empty() {
                0
            } else {
                whole
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?
            };

            // Pad or truncate cents to 2 digits
            let cents: i64 = match fraction.len() {
                0 => 0,
                1 => fraction
                    .parse::<i64>()
                    .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?
                    * 10,
                _ => fraction[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?,
            };

            dollars
                .checked_mul(100)
                .and_then(|d| d.checked_add(cents))
                .ok_or_else(|| MoneyParseError::OutOfRange(original.to_string()))?
        } else {
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?
                .checked_mul(100)
                .ok_or_else(|| MoneyParseError::OutOfRange(original.to_string()))?
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, magnitude / 100, magnitude % 100)
    }

    /// Plain decimal representation without a currency symbol ("-12.50")
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

/// Serde adapter writing an amount in currency units as a decimal string
/// ("2750.00") instead of integer cents.
///
/// Use with `#[serde(with = "crate::models::money::decimal")]`.
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let s = String::deserialize(deserializer)?;
        Money::parse(&s).map_err(<D::Error as de::Error>::custom)
    }
}

/// Like [`decimal`], for a category-to-amount map
pub mod decimal_map {
    use std::collections::BTreeMap;

    use super::Money;
    use serde::ser::SerializeMap;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, money) in map {
            out.serialize_entry(key, &money.to_decimal_string())?;
        }
        out.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Money>, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, s)| {
                let money = Money::parse(&s).map_err(<D::Error as de::Error>::custom)?;
                Ok((key, money))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert!(m.is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(5)), "   $0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_entry_limit() {
        assert!(Money::from_cents(1).is_within_entry_limit());
        assert!(Money::MAX_ENTRY.is_within_entry_limit());
        assert!(!Money::from_cents(Money::MAX_ENTRY.cents() + 1).is_within_entry_limit());
        assert!(!Money::zero().is_within_entry_limit());
        assert!(!Money::parse("90000000000000000").unwrap().is_within_entry_limit());
    }

    #[test]
    fn test_arithmetic_never_wraps() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!((big + big).cents(), i64::MAX);
        assert_eq!((-big - big).cents(), i64::MIN);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("1,500.00").unwrap().cents(), 150000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("12.x5").is_err());
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(230000).to_decimal_string(), "2300.00");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
        assert_eq!(Money::from_cents(i64::MIN).to_decimal_string(), "-92233720368547758.08");
    }

    #[test]
    fn test_sum_is_exact() {
        // 0.10 added ten times is exactly 1.00
        let total: Money = std::iter::repeat(Money::from_cents(10)).take(10).sum();
        assert_eq!(total, Money::from_cents(100));
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }

    #[test]
    fn test_decimal_adapter() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "decimal")]
            amount: Money,
            #[serde(with = "decimal_map")]
            by_category: std::collections::BTreeMap<String, Money>,
        }

        let row = Row {
            amount: Money::from_cents(-275050),
            by_category: [("Food".to_string(), Money::from_cents(5))].into_iter().collect(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["amount"], "-2750.50");
        assert_eq!(json["by_category"]["Food"], "0.05");

        let back: Row = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);

        let bad = serde_json::json!({ "amount": "ten", "by_category": {} });
        assert!(serde_json::from_value::<Row>(bad).is_err());
    }
}
