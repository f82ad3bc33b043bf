//! # Monetary Amounts
//!
//! [`Amount`] wraps a `rust_decimal::Decimal` and guarantees it is not
//! negative. Fines are computed with exact decimal arithmetic and only
//! converted to `f64` at the JSON boundary, where clients expect a number.
//!
//! Validated amounts are capped at [`Amount::MAX`] (10^15 currency units),
//! so applying any escalation multiplier stays far inside `Decimal` range.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Largest amount [`Amount::new`] accepts.
    pub const MAX: Amount = Amount(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    /// Wrap a decimal, rejecting negative values and values above
    /// [`Amount::MAX`].
    ///
    /// `field` is the wire name reported in the error.
    pub fn new(value: Decimal, field: &'static str) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::NegativeAmount { field, value });
        }
        if value > Self::MAX.0 {
            return Err(ValidationError::AmountOutOfRange { field, value });
        }
        Ok(Self(value))
    }

    /// A whole number of currency units.
    pub fn from_whole(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Multiply by a non-negative factor. Saturates at `Decimal::MAX`,
    /// which validated amounts times the escalation multipliers never reach.
    pub(crate) fn scaled(self, factor: Decimal) -> Self {
        debug_assert!(!factor.is_sign_negative());
        Self(self.0.saturating_mul(factor))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}
