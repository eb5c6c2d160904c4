//! Monetary amounts
//!
//! Amounts are kept as integer cents. On the wire they are decimal numbers
//! with at most two fraction digits.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest amount accepted from a caller (one trillion, in cents)
const MAX_CENTS: u64 = 100_000_000_000_000;

/// Errors converting a decimal number into [`Money`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// NaN or infinite
    #[error("amount must be a finite number")]
    NotFinite,

    /// Below zero
    #[error("amount cannot be negative")]
    Negative,

    /// More than two fraction digits
    #[error("amount has more than two decimal places")]
    TooPrecise,

    /// Above [`MAX_CENTS`]
    #[error("amount is too large")]
    TooLarge,
}

/// A non-negative amount of money, in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Create from a number of cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Number of cents
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal amount such as `1250.5`
    #[allow(clippy::cast_sign_loss)]
    pub fn from_decimal(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        if value < 0.0 {
            return Err(MoneyError::Negative);
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(MoneyError::TooPrecise);
        }
        if rounded > MAX_CENTS as f64 {
            return Err(MoneyError::TooLarge);
        }
        Ok(Self(rounded as u64))
    }

    /// Decimal representation for JSON
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checked addition
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction (`None` when the result would be negative)
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply by a count, saturating
    #[must_use]
    pub fn times(self, count: usize) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).fold(0u64, u64::saturating_add))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}

/// Render a signed cent balance as a decimal number
#[must_use]
pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}
