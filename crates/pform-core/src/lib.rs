#![deny(missing_docs)]

//! # pform-core: Domain Core for the Penalty Form Service
//!
//! Everything the service knows about breaches and fines lives here. The
//! crate has no I/O: the HTTP layer (`pform-api`), the CLI (`pform-cli`)
//! and the document generator (`pform-document`) all build on it.
//!
//! ## Design Principles
//!
//! 1. **[`Amount`] is never negative.** Fines are `rust_decimal::Decimal`
//!    values wrapped in a newtype whose only constructor rejects negatives.
//!    No floating-point arithmetic touches a fine.
//!
//! 2. **[`OccurrenceCount`] is never zero.** The escalation rule in
//!    [`calculator`] is a total function because its input type cannot
//!    represent a count below one.
//!
//! 3. **Two closed catalog profiles.** [`CatalogProfile::Escalation`]
//!    (breaches carry a base amount, fines escalate by repetition) and
//!    [`CatalogProfile::Tier`] (breaches are paired with a fixed penalty
//!    tier) are separate data models. A submission is validated against
//!    exactly one of them.
//!
//! 4. **Validation produces a new type.** [`PenaltyForm`] is the raw wire
//!    shape; [`CompletedSubmission`] is only reachable through
//!    [`PenaltyForm::complete`] and always carries a resolved fine.

pub mod amount;
pub mod calculator;
pub mod catalog;
pub mod error;
pub mod submission;

pub use amount::Amount;
pub use calculator::{calculate, EscalationTier, OccurrenceCount};
pub use catalog::{Breach, Catalog, CatalogProfile, Penalty, TierBreach, UnknownProfile};
pub use error::ValidationError;
pub use submission::{
    CompletedSubmission, EscalatedSubmission, PenaltyForm, Reporter, Selection, TieredSubmission,
};
