//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Penalty Form API",
        version = "0.1.0",
        description = "Breach and penalty catalogs, escalated penalty calculation, and PDF penalty notices.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::catalog::list_breaches,
        crate::routes::catalog::list_occurrences,
        crate::routes::catalog::list_penalties,
        crate::routes::calculator::calculate_penalty,
        crate::routes::calculator::calculate_penalty_alias,
        crate::routes::form::generate_pdf,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "catalog", description = "Reference data of the active profile"),
        (name = "calculator", description = "Escalated penalty calculation"),
        (name = "form", description = "Form submission and notice generation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
