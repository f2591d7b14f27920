//! # Unit Types
//!
//! Type-safe wrappers for the quantities on a bill. They keep weight,
//! money, and percentages from being mixed up while serializing as plain
//! numbers.
//!
//! ## Example
//!
//! ```rust
//! use bullion_core::units::{Grams, Money, Percent, PricePerGram};
//!
//! let value: Money = Grams(10.0) * PricePerGram(60.0);
//! assert_eq!(value.0, 600.0);
//!
//! let fee = Percent(5.0).of(value);
//! assert_eq!(fee.0, 30.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

// ============================================================================
// Weight
// ============================================================================

/// Weight in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

// ============================================================================
// Money
// ============================================================================

/// An amount in the shop's currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so callers can right-align amounts in columns
        f.pad(&format!("{:.2}", self.0))
    }
}

/// Price of one gram of metal
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricePerGram(pub f64);

impl Mul<PricePerGram> for Grams {
    type Output = Money;
    fn mul(self, rhs: PricePerGram) -> Money {
        Money(self.0 * rhs.0)
    }
}

// ============================================================================
// Rates
// ============================================================================

/// A percentage rate (5.0 means 5%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// Apply the rate to an amount: `amount x rate / 100`
    pub fn of(self, amount: Money) -> Money {
        Money(amount.0 * self.0 / 100.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ============================================================================
// Bill arithmetic
// ============================================================================

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

/// Scale by a dimensionless factor (purity)
impl Mul<f64> for Money {
    type Output = Money;
    fn mul(self, rhs: f64) -> Money {
        Money(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_times_price() {
        let value = Grams(2.5) * PricePerGram(40.0);
        assert_eq!(value, Money(100.0));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(Percent(3.0).of(Money(630.0)).0, 18.9);
        assert_eq!(Percent(0.0).of(Money(630.0)).0, 0.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money(10.0);
        let b = Money(2.5);
        assert_eq!((a + b).0, 12.5);
        assert_eq!((a * 2.0).0, 20.0);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money(648.9).to_string(), "648.90");
        assert_eq!(format!("{:>8}", Money(18.9)), "   18.90");
        assert_eq!(Money(18.904999).to_string(), "18.90");
    }

    #[test]
    fn test_serialization() {
        let w = Grams(12.5);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "12.5");
    }
}
