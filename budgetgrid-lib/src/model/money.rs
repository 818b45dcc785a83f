//! Money type

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

/// A monetary amount, such as an allocated or realized budget.
///
/// The currency itself is a presentation concern and lives in
/// [`RenderConfig`](crate::render::RenderConfig).
///
/// # Example
///
/// ```
/// use budgetgrid_lib::model::Money;
/// use rust_decimal::Decimal;
///
/// let allocation = Money::new(Decimal::new(125_000_050, 2)); // 1,250,000.50
/// assert_eq!(allocation.to_f64(), 1_250_000.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole currency units.
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::new(units, 0))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion used by aggregation.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
