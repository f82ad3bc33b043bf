//! # Validation Errors
//!
//! Every way a submission or a calculator input can be rejected. Variants
//! carry the offending wire field or value so the caller can tell the user
//! exactly what to fix.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::CatalogProfile;

/// A submission field or calculator input failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("{field} is required")]
    MissingField {
        /// Wire (camelCase) name of the field.
        field: &'static str,
    },

    /// An amount that must be non-negative was negative.
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount {
        /// Wire name of the field carrying the amount.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// An amount is above [`Amount::MAX`](crate::Amount::MAX).
    #[error("{field} exceeds the maximum amount (got {value})")]
    AmountOutOfRange {
        /// Wire name of the field carrying the amount.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Occurrence counts start at one.
    #[error("occurrenceCount must be a positive integer (got {0})")]
    InvalidOccurrenceCount(i64),

    /// The selected breach id is not in the active catalog.
    #[error("unknown breach id {0}")]
    UnknownBreach(u64),

    /// The selected penalty id is not in the tier catalog.
    #[error("unknown penalty id {0}")]
    UnknownPenalty(u64),

    /// A date field did not parse as `YYYY-MM-DD`.
    #[error("{field} is not a valid date: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Wire name of the date field.
        field: &'static str,
        /// The string that failed to parse.
        value: String,
    },

    /// The submission carries a field that belongs to the other profile's
    /// resolution path.
    #[error("{field} cannot be used with the {profile} profile")]
    AmbiguousResolution {
        /// Wire name of the conflicting field.
        field: &'static str,
        /// The profile the submission was validated against.
        profile: CatalogProfile,
    },
}

impl ValidationError {
    /// Wire name of the field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::NegativeAmount { field, .. }
            | Self::AmountOutOfRange { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::AmbiguousResolution { field, .. } => field,
            Self::InvalidOccurrenceCount(_) => "occurrenceCount",
            Self::UnknownBreach(_) => "selectedBreach",
            Self::UnknownPenalty(_) => "selectedPenalty",
        }
    }
}
