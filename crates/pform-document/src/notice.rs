//! # Notice Text
//!
//! Flattens a submission into a [`NoticeView`] and renders it through the
//! embedded `penalty_notice.hbs` template. The template produces plain text;
//! lines starting with `# ` and `## ` are headings for the PDF layout.
//!
//! The registry runs in strict mode, so every field the template touches
//! must exist on the view. Fields that do not apply to a profile are
//! rendered as `-` rather than omitted.
//!
//! Reporter-supplied text never starts a line with `#`, so it cannot be
//! laid out as a heading.

use handlebars::Handlebars;
use serde::Serialize;

use pform_core::CompletedSubmission;

use crate::{DocumentError, RenderContext};

const TEMPLATE_NAME: &str = "penalty_notice";
const TEMPLATE_SOURCE: &str = include_str!("../templates/penalty_notice.hbs");
const NOT_APPLICABLE: &str = "-";

/// Template data for one notice.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    /// Document reference (UUID).
    pub reference: String,
    /// Issue date, `dd/mm/yyyy`.
    pub today: String,
    /// Reporter's full name.
    pub reporter: String,
    /// Unit the breach is attributed to.
    pub unit: String,
    /// Catalog code of the breach.
    pub breach_code: String,
    /// Catalog description of the breach.
    pub breach_description: String,
    /// Regulation article (escalation profile).
    pub regulation_reference: String,
    /// Day of the breach, `dd/mm/yyyy` (escalation profile).
    pub breach_date: String,
    /// Selects the escalation sections of the template.
    pub escalated: bool,
    /// Base fine of the breach (escalation profile).
    pub base_amount: String,
    /// Occurrences in the last 12 months (escalation profile).
    pub occurrence_count: String,
    /// Label of the escalation tier reached (escalation profile).
    pub escalation: String,
    /// Code of the chosen penalty tier (tier profile).
    pub penalty_code: String,
    /// Description of the chosen penalty tier (tier profile).
    pub penalty_description: String,
    /// Fine to pay.
    pub amount: String,
    /// Circumstances described by the reporter.
    pub context_information: String,
    /// Evidence references, one per bullet.
    pub evidence: Vec<String>,
}

impl NoticeView {
    /// Build the view for `submission`.
    pub fn new(submission: &CompletedSubmission, context: &RenderContext) -> Self {
        let na = || NOT_APPLICABLE.to_string();
        let reporter = inert(&submission.reporter().full_name());
        let amount = submission.penalty_amount().to_string();
        let reference = context.reference.to_string();
        let today = context.formatted_date();

        match submission {
            CompletedSubmission::Escalated(s) => Self {
                reference,
                today,
                reporter,
                unit: inert(&s.unit),
                breach_code: s.breach.code.to_string(),
                breach_description: s.breach.description.to_string(),
                regulation_reference: s.breach.regulation_reference.to_string(),
                breach_date: s.breach_date.format("%d/%m/%Y").to_string(),
                escalated: true,
                base_amount: s.breach.base_amount.to_string(),
                occurrence_count: s.occurrence_count.to_string(),
                escalation: s.tier().label().to_string(),
                penalty_code: na(),
                penalty_description: na(),
                amount,
                context_information: inert(&s.context_information),
                evidence: s.evidence_materials.iter().map(|e| inert(e)).collect(),
            },
            CompletedSubmission::Tiered(s) => Self {
                reference,
                today,
                reporter,
                unit: s.unit.as_deref().map(inert).unwrap_or_else(na),
                breach_code: s.breach.code.to_string(),
                breach_description: s.breach.description.to_string(),
                regulation_reference: na(),
                breach_date: na(),
                escalated: false,
                base_amount: na(),
                occurrence_count: na(),
                escalation: na(),
                penalty_code: s.penalty.code.to_string(),
                penalty_description: s.penalty.description.to_string(),
                amount,
                context_information: na(),
                evidence: Vec::new(),
            },
        }
    }
}

/// Indent every line of `text` that starts with `#` by one space.
fn inert(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.starts_with('#') {
                format!(" {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handlebars registry holding the notice template.
pub struct NoticeTemplate {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for NoticeTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeTemplate")
            .field("template", &TEMPLATE_NAME)
            .finish_non_exhaustive()
    }
}

impl NoticeTemplate {
    /// Register the embedded template.
    pub fn new() -> Result<Self, DocumentError> {
        Self::from_source(TEMPLATE_SOURCE)
    }

    /// Register a custom template source under the notice name.
    pub fn from_source(source: &str) -> Result<Self, DocumentError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| DocumentError::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Render the notice text.
    pub fn render(&self, view: &NoticeView) -> Result<String, DocumentError> {
        self.registry
            .render(TEMPLATE_NAME, view)
            .map_err(|e| DocumentError::Template(e.to_string()))
    }
}
