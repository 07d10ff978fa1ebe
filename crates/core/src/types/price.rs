//! Type-safe price representation using decimal arithmetic.
//!
//! The store operates in a single currency; display formatting (locale,
//! symbols, grouping) is a presentation-layer concern and lives outside
//! this crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when constructing a [`Price`] from a negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price amount must be non-negative: {amount}")]
pub struct NegativePrice {
    /// The rejected amount.
    pub amount: Decimal,
}

/// A non-negative money amount in the store's currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`NegativePrice`] if `amount` is negative.
    pub fn new(amount: Decimal) -> Result<Self, NegativePrice> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(NegativePrice { amount });
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply this unit price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_amounts() {
        let err = Price::new(Decimal::from(-1)).expect_err("negative must fail");
        assert_eq!(err.amount, Decimal::from(-1));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn multiplies_by_quantity() {
        let unit = Price::from(100_000);
        assert_eq!(unit.times(2), Price::from(200_000));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn sums_to_zero_over_empty_iterator() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total, Price::ZERO);
    }
}
