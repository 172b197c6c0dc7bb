use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A currency amount as shown to the customer.
///
/// Wraps `rust_decimal::Decimal` so plan prices, discounts and totals never
/// pass through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Renders the amount with a currency prefix and two decimals, e.g. `$24.99`.
    pub fn display(&self, currency: &str) -> String {
        format!("{currency}{:.2}", self.0.round_dp(2))
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// A flat discount applied at the summary stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub amount: Money,
    pub description: String,
}

impl Discount {
    pub fn new(amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            amount: Money::new(amount),
            description: description.into(),
        }
    }
}

impl Default for Discount {
    fn default() -> Self {
        Self::new(Decimal::new(500, 2), "First month discount")
    }
}
