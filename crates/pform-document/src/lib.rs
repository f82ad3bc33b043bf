//! # pform-document: Penalty Notice Generation
//!
//! Turns a [`CompletedSubmission`] into a downloadable document. The HTTP
//! layer and the CLI only see the [`DocumentGenerator`] trait; the shipped
//! implementation is [`PdfGenerator`], which renders the notice text with a
//! handlebars template ([`notice`]) and lays it out on A4 pages ([`pdf`]).
//!
//! ## Pipeline
//!
//! ```text
//! CompletedSubmission + RenderContext
//!        │
//!        ▼
//!   NoticeView ──handlebars──▶ notice text ──layout──▶ lopdf Document ──▶ bytes
//! ```

#![deny(missing_docs)]

pub mod notice;
pub mod pdf;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use pform_core::CompletedSubmission;

pub use notice::NoticeTemplate;
pub use pdf::PdfGenerator;

/// File name offered to the browser for a generated notice.
pub const ATTACHMENT_FILE_NAME: &str = "penalty_form.pdf";

/// MIME type of generated notices.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Failure while producing a document. No partial output is ever returned.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The notice template failed to register or render.
    #[error("template error: {0}")]
    Template(String),

    /// The rendered notice could not be encoded as PDF.
    #[error("PDF encoding error: {0}")]
    Encoding(String),
}

/// Per-document values that do not come from the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Issue date printed on the notice.
    pub today: NaiveDate,
    /// Unique reference printed on the notice and logged.
    pub reference: Uuid,
}

impl RenderContext {
    /// Context for a document issued now, in local time.
    pub fn now() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            reference: Uuid::new_v4(),
        }
    }

    /// Issue date as `dd/mm/yyyy`.
    pub fn formatted_date(&self) -> String {
        self.today.format("%d/%m/%Y").to_string()
    }
}

/// Renders completed submissions into documents.
///
/// Implementations must be shareable across request handlers.
pub trait DocumentGenerator: Send + Sync {
    /// Render `submission` into document bytes.
    fn generate(
        &self,
        submission: &CompletedSubmission,
        context: &RenderContext,
    ) -> Result<Vec<u8>, DocumentError>;

    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }
}
