//! Fixed-point currency amount with two decimal places.
//!
//! Ledger aggregation stays in `rust_decimal` so sums never lose cents;
//! conversion to `f64` only happens where a ratio or rate is computed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use super::ValidationError;

/// A currency amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use fund_metrics::Money;
///
/// let amount = Money::from_str("1000000").unwrap();
/// assert_eq!(amount.to_string(), "1000000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places carried by every amount.
    pub const SCALE: u32 = 2;

    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Wraps a decimal, rounding half away from zero to whole cents.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Wraps a decimal only if it has no precision below cents.
    pub fn from_decimal_exact(value: Decimal) -> Option<Self> {
        if value.normalize().scale() > Self::SCALE {
            return None;
        }
        Some(Self::new(value))
    }

    /// Whole currency units, e.g. `Money::from_units(400_000)`.
    pub fn from_units(units: i64) -> Self {
        Self::new(Decimal::from(units))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Negative amounts become zero.
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }

    /// Multiplies by a dimensionless factor, rounding back to cents.
    pub fn scaled_by(&self, factor: Decimal) -> Self {
        Self::new(self.0 * factor)
    }

    /// Lossy conversion for ratio and rate math.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

/// Parsing is an ingestion path: sub-cent precision is rejected, never rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|_| ValidationError::UnparseableAmount(s.to_string()))?;
        Money::from_decimal_exact(decimal).ok_or_else(|| ValidationError::SubCentPrecision(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}
