//! # Form Routes
//!
//! `GET /` serves the penalty form page, rendered from an embedded
//! handlebars template with the active profile's reference data.
//! `POST /generate-pdf` completes a submitted form against the catalog and
//! answers the generated notice as an attachment.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use handlebars::Handlebars;
use serde::Serialize;

use pform_core::{Catalog, CatalogProfile, PenaltyForm};
use pform_document::{RenderContext, ATTACHMENT_FILE_NAME};

use crate::error::AppError;
use crate::extractors::parse_json_body;
use crate::state::{AppState, StartupError};

const PAGE_TEMPLATE: &str = "index";
const PAGE_SOURCE: &str = include_str!("../../templates/index.html.hbs");

/// Build the form router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form_page))
        .route("/generate-pdf", post(generate_pdf))
}

#[derive(Debug, Serialize)]
struct BreachOption {
    id: u64,
    label: String,
    base_amount: String,
}

#[derive(Debug, Serialize)]
struct PenaltyOption {
    id: u64,
    label: String,
}

/// Template data for the form page.
#[derive(Debug, Serialize)]
struct FormPage {
    profile: &'static str,
    escalation: bool,
    breaches: Vec<BreachOption>,
    occurrences: Vec<u32>,
    penalties: Vec<PenaltyOption>,
}

impl FormPage {
    fn new(catalog: &Catalog) -> Self {
        let breaches = match catalog.profile() {
            CatalogProfile::Escalation => catalog
                .breaches()
                .iter()
                .map(|b| BreachOption {
                    id: b.id,
                    label: format!("{} - {}", b.code, b.description),
                    base_amount: b.base_amount.to_string(),
                })
                .collect(),
            CatalogProfile::Tier => catalog
                .tier_breaches()
                .iter()
                .map(|b| BreachOption {
                    id: b.id,
                    label: format!("{} - {}", b.code, b.description),
                    base_amount: String::new(),
                })
                .collect(),
        };
        let penalties = catalog
            .penalties()
            .unwrap_or_default()
            .iter()
            .map(|p| PenaltyOption {
                id: p.id,
                label: format!("{} - {} ({})", p.code, p.description, p.amount),
            })
            .collect();

        Self {
            profile: catalog.profile().as_str(),
            escalation: catalog.profile() == CatalogProfile::Escalation,
            breaches,
            occurrences: catalog.occurrences().unwrap_or_default().to_vec(),
            penalties,
        }
    }
}

/// Handlebars registry holding the form page. Output is HTML-escaped.
pub struct FormView {
    registry: Handlebars<'static>,
}

impl FormView {
    /// Register the embedded page template.
    pub fn new() -> Result<Self, StartupError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(PAGE_TEMPLATE, PAGE_SOURCE)
            .map_err(|e| StartupError::View(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Render the page for `catalog`.
    pub fn render(&self, catalog: &Catalog) -> Result<String, AppError> {
        self.registry
            .render(PAGE_TEMPLATE, &FormPage::new(catalog))
            .map_err(|e| AppError::Internal(format!("form page: {e}")))
    }
}

/// GET /: The penalty form.
async fn form_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.view.render(&state.catalog).map(Html)
}

/// POST /generate-pdf: Validate a submission and return its penalty notice.
#[utoipa::path(
    post,
    path = "/generate-pdf",
    request_body(content = String, description = "Penalty form as JSON", content_type = "application/json"),
    responses(
        (status = 200, description = "Penalty notice", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Body is not a JSON penalty form", body = crate::error::ErrorBody),
        (status = 422, description = "Submission failed validation", body = crate::error::ErrorBody),
        (status = 500, description = "Document generation failed; empty body"),
    ),
    tag = "form"
)]
pub(crate) async fn generate_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let form: PenaltyForm = parse_json_body(&body)?;
    let submission = form.complete(&state.catalog)?;
    let context = RenderContext::now();
    let document = state.generator.generate(&submission, &context)?;

    tracing::info!(
        reference = %context.reference,
        profile = %submission.profile(),
        breach = submission.breach_code(),
        amount = %submission.penalty_amount(),
        bytes = document.len(),
        "penalty notice generated"
    );

    let headers = [
        (CONTENT_TYPE, state.generator.content_type().to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ATTACHMENT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, document).into_response())
}
