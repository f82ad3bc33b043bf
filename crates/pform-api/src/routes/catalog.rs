//! # Reference Catalog Routes
//!
//! Read-only listings of the active profile's reference data. A listing the
//! profile does not carry answers 404 instead of an empty array.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use pform_core::{Breach, CatalogProfile, Penalty, TierBreach};

use crate::error::AppError;
use crate::state::AppState;

/// Breach list in the shape of the active profile.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BreachListing {
    /// Breaches with base fines and regulation articles.
    Escalation(&'static [Breach]),
    /// Breaches without amounts; the fine comes from a penalty tier.
    Tier(&'static [TierBreach]),
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/breaches", get(list_breaches))
        .route("/api/occurrences", get(list_occurrences))
        .route("/api/penalties", get(list_penalties))
}

/// GET /api/breaches: List the breaches of the active profile.
#[utoipa::path(
    get,
    path = "/api/breaches",
    responses(
        (status = 200, description = "Breach list; escalation entries carry baseAmount and regulationReference"),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_breaches(State(state): State<AppState>) -> Json<BreachListing> {
    let listing = match state.catalog.profile() {
        CatalogProfile::Escalation => BreachListing::Escalation(state.catalog.breaches()),
        CatalogProfile::Tier => BreachListing::Tier(state.catalog.tier_breaches()),
    };
    Json(listing)
}

/// GET /api/occurrences: Selectable occurrence counts.
#[utoipa::path(
    get,
    path = "/api/occurrences",
    responses(
        (status = 200, description = "Occurrence counts in ascending order", body = [u32]),
        (status = 404, description = "Profile has no occurrence counts", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_occurrences(
    State(state): State<AppState>,
) -> Result<Json<&'static [u32]>, AppError> {
    state.catalog.occurrences().map(Json).ok_or_else(|| {
        AppError::NotFound(format!(
            "occurrence counts are not offered by the {} profile",
            state.catalog.profile()
        ))
    })
}

/// GET /api/penalties: Penalty tiers.
#[utoipa::path(
    get,
    path = "/api/penalties",
    responses(
        (status = 200, description = "Penalty tiers in ascending amount"),
        (status = 404, description = "Profile has no penalty tiers", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_penalties(
    State(state): State<AppState>,
) -> Result<Json<&'static [Penalty]>, AppError> {
    state.catalog.penalties().map(Json).ok_or_else(|| {
        AppError::NotFound(format!(
            "penalty tiers are not offered by the {} profile",
            state.catalog.profile()
        ))
    })
}
