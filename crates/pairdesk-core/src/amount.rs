//! Precision-safe submission amounts.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. An `Amount` is always
//! strictly positive; every constructor enforces it, so a request built from
//! an `Amount` never carries zero or a negative value.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Smallest preset offered in the amount picker (USDT).
const PRESET_STEP: u32 = 10;

/// Number of preset amounts (10, 20, ... 150).
const PRESET_COUNT: u32 = 15;

/// Strictly positive amount in the platform's settlement unit (USDT).
///
/// Serialized as a JSON number, matching what the bid/ask endpoints expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount, rejecting zero and negative values.
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be greater than zero, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Parse user-entered text.
    ///
    /// Surrounding whitespace is ignored. Empty input, non-numeric input and
    /// values `<= 0` are rejected.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidAmount("amount is empty".to_string()));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|e| CoreError::InvalidAmount(format!("{trimmed:?} is not a number: {e}")))?;
        Self::new(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Preset amounts offered next to the free-form field: 10 to 150 in steps of 10.
    pub fn presets() -> Vec<Amount> {
        (1..=PRESET_COUNT)
            .map(|i| Amount(Decimal::from(i * PRESET_STEP)))
            .collect()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}
