//! # Form Submissions
//!
//! [`PenaltyForm`] mirrors the JSON the form posts: every field optional,
//! camelCase names, unknown fields ignored. [`PenaltyForm::complete`]
//! validates it against the active [`Catalog`] and produces a
//! [`CompletedSubmission`], running the escalation rule when the client did
//! not send a calculated penalty.
//!
//! Breach and penalty selections are resolved by id against the catalog;
//! any other fields the client echoes back (description, base amount) are
//! ignored so the catalog stays authoritative.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::calculator::{calculate, EscalationTier, OccurrenceCount};
use crate::catalog::{Breach, Catalog, CatalogProfile, Penalty, TierBreach};
use crate::error::ValidationError;

/// Reference to a catalog entry by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    /// Catalog id of the selected entry.
    #[serde(default)]
    pub id: Option<u64>,
}

impl Selection {
    /// Select the catalog entry with the given id.
    pub fn id(id: u64) -> Self {
        Self { id: Some(id) }
    }
}

/// Raw form submission as posted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyForm {
    /// Reporter first name.
    pub first_name: Option<String>,
    /// Reporter last name.
    pub last_name: Option<String>,
    /// Apartment or unit the breach is attributed to.
    pub unit: Option<String>,
    /// The breach being reported.
    pub selected_breach: Option<Selection>,
    /// Day the breach happened, `YYYY-MM-DD`.
    pub breach_date: Option<String>,
    /// Times the breach occurred in the last 12 months, this one included.
    pub occurrence_count: Option<i64>,
    /// Free-text circumstances.
    pub context_information: Option<String>,
    /// References to photos, recordings or other evidence.
    pub evidence_materials: Option<Vec<String>>,
    /// Fine already computed by the client, if any.
    pub calculated_penalty: Option<Decimal>,
    /// Penalty tier chosen by the user (tier profile).
    pub selected_penalty: Option<Selection>,
}

/// Who filed the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    /// First name, trimmed.
    pub first_name: String,
    /// Last name, trimmed.
    pub last_name: String,
}

impl Reporter {
    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated escalation-profile submission with its fine resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalatedSubmission {
    /// Who filed the report.
    pub reporter: Reporter,
    /// Unit the breach is attributed to.
    pub unit: String,
    /// Catalog entry of the breach.
    pub breach: Breach,
    /// Day the breach happened.
    pub breach_date: NaiveDate,
    /// Occurrence count within the rolling window.
    pub occurrence_count: OccurrenceCount,
    /// Free-text circumstances.
    pub context_information: String,
    /// Evidence references, blank entries removed.
    pub evidence_materials: Vec<String>,
    /// Fine to be charged.
    pub calculated_penalty: Amount,
}

impl EscalatedSubmission {
    /// Escalation tier the occurrence count falls into.
    pub fn tier(&self) -> EscalationTier {
        self.occurrence_count.tier()
    }
}

/// A validated tier-profile submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredSubmission {
    /// Who filed the report.
    pub reporter: Reporter,
    /// Unit the breach is attributed to, when given.
    pub unit: Option<String>,
    /// Catalog entry of the breach.
    pub breach: TierBreach,
    /// Chosen penalty tier.
    pub penalty: Penalty,
}

/// A submission that passed validation and carries exactly one resolved fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum CompletedSubmission {
    /// Fine computed from base amount and occurrence count.
    Escalated(EscalatedSubmission),
    /// Fine taken from a fixed tier.
    Tiered(TieredSubmission),
}

impl CompletedSubmission {
    /// Who filed the report.
    pub fn reporter(&self) -> &Reporter {
        match self {
            Self::Escalated(s) => &s.reporter,
            Self::Tiered(s) => &s.reporter,
        }
    }

    /// Code of the reported breach.
    pub fn breach_code(&self) -> &'static str {
        match self {
            Self::Escalated(s) => s.breach.code,
            Self::Tiered(s) => s.breach.code,
        }
    }

    /// The fine to be charged.
    pub fn penalty_amount(&self) -> Amount {
        match self {
            Self::Escalated(s) => s.calculated_penalty,
            Self::Tiered(s) => s.penalty.amount,
        }
    }

    /// Profile the submission was validated against.
    pub fn profile(&self) -> CatalogProfile {
        match self {
            Self::Escalated(_) => CatalogProfile::Escalation,
            Self::Tiered(_) => CatalogProfile::Tier,
        }
    }
}

impl PenaltyForm {
    /// Validate against `catalog` and resolve the fine.
    ///
    /// Fails on the first problem found, naming the offending field.
    pub fn complete(&self, catalog: &Catalog) -> Result<CompletedSubmission, ValidationError> {
        let reporter = Reporter {
            first_name: required(&self.first_name, "firstName")?,
            last_name: required(&self.last_name, "lastName")?,
        };

        match catalog.profile() {
            CatalogProfile::Escalation => self
                .complete_escalated(catalog, reporter)
                .map(CompletedSubmission::Escalated),
            CatalogProfile::Tier => self
                .complete_tiered(catalog, reporter)
                .map(CompletedSubmission::Tiered),
        }
    }

    fn complete_escalated(
        &self,
        catalog: &Catalog,
        reporter: Reporter,
    ) -> Result<EscalatedSubmission, ValidationError> {
        let unit = required(&self.unit, "unit")?;
        if self.selected_penalty.is_some() {
            return Err(ValidationError::AmbiguousResolution {
                field: "selectedPenalty",
                profile: CatalogProfile::Escalation,
            });
        }

        let breach_id = selection_id(&self.selected_breach, "selectedBreach")?;
        let breach = catalog
            .breach(breach_id)
            .ok_or(ValidationError::UnknownBreach(breach_id))?;

        let raw_date = required(&self.breach_date, "breachDate")?;
        let breach_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDate {
                field: "breachDate",
                value: raw_date.clone(),
            }
        })?;

        let occurrence_count = self
            .occurrence_count
            .ok_or(ValidationError::MissingField {
                field: "occurrenceCount",
            })
            .and_then(OccurrenceCount::new)?;

        let context_information = required(&self.context_information, "contextInformation")?;

        let calculated_penalty = match self.calculated_penalty {
            Some(supplied) => Amount::new(supplied, "calculatedPenalty")?,
            None => {
                let amount = calculate(breach.base_amount, occurrence_count);
                tracing::debug!(
                    breach = breach.code,
                    occurrences = occurrence_count.get(),
                    %amount,
                    "derived penalty from escalation rule"
                );
                amount
            }
        };

        Ok(EscalatedSubmission {
            reporter,
            unit,
            breach: breach.clone(),
            breach_date,
            occurrence_count,
            context_information,
            evidence_materials: self.evidence(),
            calculated_penalty,
        })
    }

    fn complete_tiered(
        &self,
        catalog: &Catalog,
        reporter: Reporter,
    ) -> Result<TieredSubmission, ValidationError> {
        let ambiguous = |field| ValidationError::AmbiguousResolution {
            field,
            profile: CatalogProfile::Tier,
        };
        if self.occurrence_count.is_some() {
            return Err(ambiguous("occurrenceCount"));
        }
        if self.calculated_penalty.is_some() {
            return Err(ambiguous("calculatedPenalty"));
        }

        let breach_id = selection_id(&self.selected_breach, "selectedBreach")?;
        let breach = catalog
            .tier_breach(breach_id)
            .ok_or(ValidationError::UnknownBreach(breach_id))?;

        let penalty_id = selection_id(&self.selected_penalty, "selectedPenalty")?;
        let penalty = catalog
            .penalty(penalty_id)
            .ok_or(ValidationError::UnknownPenalty(penalty_id))?;

        Ok(TieredSubmission {
            reporter,
            unit: optional(&self.unit),
            breach: breach.clone(),
            penalty: penalty.clone(),
        })
    }

    fn evidence(&self) -> Vec<String> {
        self.evidence_materials
            .iter()
            .flatten()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    optional(value).ok_or(ValidationError::MissingField { field })
}

fn selection_id(
    selection: &Option<Selection>,
    field: &'static str,
) -> Result<u64, ValidationError> {
    selection
        .as_ref()
        .and_then(|s| s.id)
        .ok_or(ValidationError::MissingField { field })
}
