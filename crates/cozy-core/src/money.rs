//! # Money
//!
//! Currency code and minor-unit arithmetic.
//! Amounts are always carried as integers in the smallest currency unit.

use crate::error::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};

/// Currencies the relay charges in (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code as the payment API expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Convert from smallest unit to a display decimal.
    ///
    /// Plain floating-point division, no rounding: 1999 cents is 19.99.
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        match self {
            Currency::USD => amount as f64 / 100.0,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Sum minor-unit amounts, rejecting overflow instead of wrapping.
pub fn sum_minor_units<I>(amounts: I) -> RelayResult<i64>
where
    I: IntoIterator<Item = i64>,
{
    amounts.into_iter().try_fold(0_i64, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| RelayError::InvalidAmount("total exceeds the supported range".into()))
    })
}
