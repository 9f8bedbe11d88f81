//! Stock quantities.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of units held for one item.
///
/// Stored as a non-negative count. A freshly loaded inventory may hold zero
/// units of an item; mutations must leave the count strictly positive, which
/// is what [`Quantity::adjusted`] enforces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Apply a signed delta, requiring the result to be greater than zero.
    pub fn adjusted(self, delta: i64) -> DomainResult<Quantity> {
        let next = i128::from(self.0) + i128::from(delta);
        if next <= 0 {
            return Err(DomainError::validation(format!(
                "resulting quantity would be {next}; must be greater than zero"
            )));
        }
        u64::try_from(next)
            .map(Quantity)
            .map_err(|_| DomainError::validation("resulting quantity is too large"))
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}
