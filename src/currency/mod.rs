//! Fixed-point US dollar amounts held as whole cents.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};

const SYMBOL: &str = "$";
const GROUPING_SEPARATOR: char = ',';
const MINOR_PER_MAJOR: i64 = 100;

static DOLLARS_AND_CENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$(\d+(?:,\d{3})*)\.(\d{2})$").expect("valid currency pattern"));

/// A currency amount counted in cents.
///
/// Every arithmetic operation works on the integer cent count, so totals are
/// conserved exactly. The only lossy operation is [`Amount::scale`], which
/// truncates toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    units: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { units: 0 };
    /// Largest amount [`Amount::parse`] accepts: $1,000,000,000,000.00.
    pub const MAX: Amount = Amount {
        units: 100_000_000_000_000,
    };

    pub const fn from_cents(units: i64) -> Self {
        Self { units }
    }

    pub fn units(&self) -> i64 {
        self.units
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Parses `"$d,ddd.dd"` text. Grouping commas are optional, cents are not.
    /// Amounts above [`Amount::MAX`] are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let caps = DOLLARS_AND_CENTS
            .captures(trimmed)
            .ok_or_else(|| BillingError::MalformedCurrency(text.to_string()))?;
        let dollars: i64 = caps[1]
            .replace(GROUPING_SEPARATOR, "")
            .parse()
            .map_err(|_| BillingError::MalformedCurrency(text.to_string()))?;
        let cents: i64 = caps[2]
            .parse()
            .map_err(|_| BillingError::MalformedCurrency(text.to_string()))?;
        dollars
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|units| units.checked_add(cents))
            .filter(|&units| units <= Self::MAX.units)
            .map(Self::from_cents)
            .ok_or_else(|| BillingError::MalformedCurrency(text.to_string()))
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.units.checked_add(rhs.units).map(Amount::from_cents)
    }

    /// Multiplies by `factor`, truncating the result toward zero.
    pub fn scale(&self, factor: f64) -> Amount {
        Amount::from_cents((factor * self.units as f64) as i64)
    }

    /// Like [`Amount::scale`], but `None` when the product is not finite or
    /// does not fit in the cent count.
    pub fn checked_scale(&self, factor: f64) -> Option<Amount> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        let product = (factor * self.units as f64).trunc();
        if !product.is_finite() || product >= LIMIT || product < -LIMIT {
            return None;
        }
        Some(Amount::from_cents(product as i64))
    }

    /// Partitions the amount into `parts` pieces that differ by at most one cent.
    ///
    /// The first `units % parts` pieces carry the extra cent. Returns an empty
    /// vector when `parts` is zero.
    pub fn split(&self, parts: usize) -> Vec<Amount> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.units.div_euclid(n);
        let remainder = self.units.rem_euclid(n) as usize;
        (0..parts)
            .map(|idx| {
                if idx < remainder {
                    Amount::from_cents(base + 1)
                } else {
                    Amount::from_cents(base)
                }
            })
            .collect()
    }

    /// Signed difference `self - other`.
    pub fn difference(&self, other: Amount) -> Amount {
        Amount::from_cents(self.units - other.units)
    }

    /// Formats as `$1,234.56`, with a leading `-` for negative balances.
    pub fn display(&self) -> String {
        let abs = self.units.unsigned_abs();
        let dollars = group_digits(&(abs / MINOR_PER_MAJOR as u64).to_string());
        let cents = abs % MINOR_PER_MAJOR as u64;
        let sign = if self.units < 0 { "-" } else { "" };
        format!("{sign}{SYMBOL}{dollars}.{cents:02}")
    }
}

/// Exact sum of any number of amounts.
pub fn sum<I>(amounts: I) -> Amount
where
    I: IntoIterator<Item = Amount>,
{
    Amount::from_cents(amounts.into_iter().map(|a| a.units).sum())
}

/// Sum that reports `None` instead of overflowing.
pub fn checked_sum<I>(amounts: I) -> Option<Amount>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        sum(iter)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        sum(iter.copied())
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::from_cents(self.units + rhs.units)
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        self.difference(rhs)
    }
}

impl FromStr for Amount {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_amounts() {
        for (text, units) in [
            ("$1.00", 100),
            ("$1,000.00", 100_000),
            ("$1,001.01", 100_101),
            ("$3333.01", 333_301),
            ("$0.00", 0),
        ] {
            let amount = Amount::parse(text).expect("valid amount");
            assert_eq!(amount.units(), units, "for {text}");
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        for text in [
            "$$1",
            "$",
            "1",
            "1.00",
            "1,00",
            "1,000",
            "$1",
            "$1.0",
            "$1,00.00",
            "$1.005",
        ] {
            let err = Amount::parse(text).expect_err("should not parse");
            assert!(
                matches!(err, BillingError::MalformedCurrency(_)),
                "unexpected error for {text}: {err}"
            );
        }
    }

    #[test]
    fn amounts_above_the_maximum_are_rejected() {
        assert_eq!(Amount::parse("$1,000,000,000,000.00").unwrap(), Amount::MAX);
        for text in ["$1,000,000,000,000.01", "$90,000,000,000,000,000.00"] {
            assert!(
                matches!(Amount::parse(text), Err(BillingError::MalformedCurrency(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let big = Amount::from_cents(i64::MAX / 2 + 1);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(checked_sum([big, big, Amount::from_cents(-1)]), None);
        assert_eq!(
            checked_sum([Amount::MAX, Amount::MAX]),
            Some(Amount::from_cents(200_000_000_000_000))
        );
        assert_eq!(
            Amount::MAX.checked_scale(1.5),
            Some(Amount::from_cents(150_000_000_000_000))
        );
        assert_eq!(Amount::MAX.checked_scale(1e6), None);
        assert_eq!(Amount::MAX.checked_scale(f64::INFINITY), None);
        assert_eq!(
            Amount::from_cents(-999).checked_scale(0.5),
            Some(Amount::from_cents(-499))
        );
    }

    #[test]
    fn displays_with_grouping() {
        assert_eq!(Amount::from_cents(123_456).display(), "$1,234.56");
        assert_eq!(Amount::from_cents(100_000_000).display(), "$1,000,000.00");
        assert_eq!(Amount::from_cents(5).display(), "$0.05");
        assert_eq!(Amount::from_cents(-61_500).display(), "-$615.00");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn split_hands_remainder_to_leading_parts() {
        let parts = Amount::from_cents(1000).split(3);
        assert_eq!(
            parts,
            vec![
                Amount::from_cents(334),
                Amount::from_cents(333),
                Amount::from_cents(333)
            ]
        );
        assert_eq!(parts.iter().sum::<Amount>(), Amount::from_cents(1000));
    }

    #[test]
    fn split_conserves_negative_amounts() {
        let parts = Amount::from_cents(-7).split(2);
        assert_eq!(parts.iter().sum::<Amount>(), Amount::from_cents(-7));
        assert!(Amount::from_cents(5).split(0).is_empty());
    }

    #[test]
    fn scale_truncates_toward_zero() {
        assert_eq!(Amount::from_cents(120_000).scale(1.1), Amount::from_cents(132_000));
        assert_eq!(Amount::from_cents(999).scale(0.5), Amount::from_cents(499));
        assert_eq!(Amount::from_cents(-999).scale(0.5), Amount::from_cents(-499));
    }

    #[test]
    fn difference_is_signed() {
        let owed = Amount::from_cents(40_000);
        let paid = Amount::from_cents(60_000);
        assert_eq!(owed.difference(paid), Amount::from_cents(-20_000));
        assert_eq!(sum([owed, paid]), Amount::from_cents(100_000));
    }
}
