//! # Repeat-Offense Escalation
//!
//! The fine for a breach depends on how many times the same breach was
//! committed within a rolling 12-month window (art. 3.5 of the association
//! regulation):
//!
//! | Occurrence | Tier                          | Fine         |
//! |------------|-------------------------------|--------------|
//! | 1          | [`EscalationTier::FirstOffense`] | base       |
//! | 2          | [`EscalationTier::Warning`]   | base         |
//! | 3          | [`EscalationTier::Surcharge`] | base × 1.5   |
//! | 4 and up   | [`EscalationTier::Doubled`]   | base × 2     |
//!
//! The second occurrence is a warning, but the warning is non-monetary:
//! the base fine still applies.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::amount::Amount;
use crate::error::ValidationError;

/// Number of times a breach was committed in the rolling window. Always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccurrenceCount(u32);

impl OccurrenceCount {
    /// Counts offered to the user when filling in a form. The last entry
    /// stands for "five or more"; the rule is flat from the fourth on.
    pub const SELECTABLE: [u32; 5] = [1, 2, 3, 4, 5];

    /// Validate a raw count. Zero and negative values are rejected; counts
    /// beyond `u32::MAX` saturate, which the flat fourth tier makes harmless.
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw < 1 {
            return Err(ValidationError::InvalidOccurrenceCount(raw));
        }
        Ok(Self(u32::try_from(raw).unwrap_or(u32::MAX)))
    }

    /// The count as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The escalation tier this count falls into.
    pub fn tier(self) -> EscalationTier {
        match self.0 {
            1 => EscalationTier::FirstOffense,
            2 => EscalationTier::Warning,
            3 => EscalationTier::Surcharge,
            _ => EscalationTier::Doubled,
        }
    }
}

impl fmt::Display for OccurrenceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for OccurrenceCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

/// Escalation bracket reached by an occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTier {
    /// First occurrence: base fine.
    FirstOffense,
    /// Second occurrence: warning, base fine preserved.
    Warning,
    /// Third occurrence: base fine plus 50%.
    Surcharge,
    /// Fourth and later occurrences: base fine doubled.
    Doubled,
}

impl EscalationTier {
    /// Factor applied to the base fine.
    pub fn multiplier(self) -> Decimal {
        match self {
            Self::FirstOffense | Self::Warning => Decimal::ONE,
            Self::Surcharge => Decimal::new(15, 1),
            Self::Doubled => Decimal::new(2, 0),
        }
    }

    /// Short human-readable label, printed on the notice.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstOffense => "first offense",
            Self::Warning => "second offense (warning)",
            Self::Surcharge => "third offense (+50%)",
            Self::Doubled => "fourth or later offense (x2)",
        }
    }
}

/// Apply the escalation rule to a base fine.
pub fn calculate(base: Amount, occurrences: OccurrenceCount) -> Amount {
    base.scaled(occurrences.tier().multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count(n: i64) -> OccurrenceCount {
        OccurrenceCount::new(n).unwrap()
    }

    fn amount(units: i64, scale: u32) -> Amount {
        Amount::new(Decimal::new(units, scale), "baseAmount").unwrap()
    }

    #[test]
    fn first_offense_keeps_base() {
        assert_eq!(calculate(amount(1000, 0), count(1)), amount(1000, 0));
    }

    #[test]
    fn warning_keeps_base() {
        assert_eq!(calculate(amount(1000, 0), count(2)), amount(1000, 0));
    }

    #[test]
    fn third_offense_adds_half() {
        assert_eq!(calculate(amount(500, 0), count(3)), amount(750, 0));
    }

    #[test]
    fn fifth_offense_is_doubled() {
        assert_eq!(calculate(amount(2500, 0), count(5)), amount(5000, 0));
    }

    #[test]
    fn fractional_base_is_exact() {
        // 333.33 × 1.5 = 499.995, no float drift
        assert_eq!(calculate(amount(33333, 2), count(3)), amount(499995, 3));
    }

    #[test]
    fn zero_and_negative_counts_rejected() {
        assert_eq!(
            OccurrenceCount::new(0),
            Err(ValidationError::InvalidOccurrenceCount(0))
        );
        assert_eq!(
            OccurrenceCount::new(-3),
            Err(ValidationError::InvalidOccurrenceCount(-3))
        );
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(count(i64::MAX).get(), u32::MAX);
        assert_eq!(count(i64::MAX).tier(), EscalationTier::Doubled);
    }

    #[test]
    fn tiers_by_count() {
        assert_eq!(count(1).tier(), EscalationTier::FirstOffense);
        assert_eq!(count(2).tier(), EscalationTier::Warning);
        assert_eq!(count(3).tier(), EscalationTier::Surcharge);
        assert_eq!(count(4).tier(), EscalationTier::Doubled);
        assert_eq!(count(40).tier(), EscalationTier::Doubled);
    }

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&EscalationTier::FirstOffense).unwrap();
        assert_eq!(json, "\"first_offense\"");
    }

    #[test]
    fn maximum_base_escalates_without_overflow() {
        let max = Amount::MAX.as_decimal();
        assert_eq!(calculate(Amount::MAX, count(1)), Amount::MAX);
        assert_eq!(
            calculate(Amount::MAX, count(3)).as_decimal(),
            max * Decimal::new(15, 1)
        );
        assert_eq!(
            calculate(Amount::MAX, count(i64::MAX)).as_decimal(),
            max * Decimal::new(2, 0)
        );
    }

    #[test]
    fn decimal_max_base_is_rejected_before_calculation() {
        assert!(matches!(
            Amount::new(Decimal::MAX, "baseAmount"),
            Err(ValidationError::AmountOutOfRange { field: "baseAmount", .. })
        ));
    }

    /// Bases across the whole accepted range, from cents up to the cap.
    fn base_amount() -> impl Strategy<Value = Amount> {
        prop_oneof![
            (0i64..10_000_000, 0u32..4).prop_map(|(units, scale)| amount(units, scale)),
            (0i64..=1_000_000_000_000_000, 0u32..4)
                .prop_map(|(units, scale)| amount(units, scale)),
            Just(Amount::MAX),
        ]
    }

    proptest! {
        /// The first two occurrences never change the fine.
        #[test]
        fn first_and_second_are_base(base in base_amount()) {
            prop_assert_eq!(calculate(base, count(1)), base);
            prop_assert_eq!(calculate(base, count(2)), base);
        }

        /// The third occurrence is exactly one and a half times the base.
        #[test]
        fn third_is_one_and_a_half(base in base_amount()) {
            let expected = base.as_decimal() * Decimal::new(15, 1);
            prop_assert_eq!(calculate(base, count(3)).as_decimal(), expected);
        }

        /// Every occurrence from the fourth on is exactly double, with no
        /// further escalation.
        #[test]
        fn fourth_and_later_are_flat_double(base in base_amount(), n in 4i64..10_000) {
            let expected = base.as_decimal() * Decimal::new(2, 0);
            prop_assert_eq!(calculate(base, count(n)).as_decimal(), expected);
            prop_assert_eq!(calculate(base, count(n)), calculate(base, count(4)));
        }

        /// Escalation never lowers a fine.
        #[test]
        fn never_below_base(base in base_amount(), n in 1i64..100) {
            prop_assert!(calculate(base, count(n)) >= base);
        }
    }
}
