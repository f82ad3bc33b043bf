//! # Penalty Calculator Routes
//!
//! `GET /api/calculate` and its alias `GET /api/calculate-penalty` apply the
//! escalation multiplier to a base fine. Both answer a bare JSON number.

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use pform_core::{calculate, Amount, OccurrenceCount};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

/// Calculator query string.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalculateQuery {
    /// Base fine, non-negative.
    #[param(value_type = f64)]
    pub base_amount: Decimal,
    /// Occurrences in the last twelve months, 1 or more.
    pub occurrence_count: i64,
}

/// Build the calculator router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calculate", get(calculate_penalty))
        .route("/api/calculate-penalty", get(calculate_penalty_alias))
}

fn evaluate(
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> Result<Json<Amount>, AppError> {
    let query = extract_query(query)?;
    let base = Amount::new(query.base_amount, "baseAmount")?;
    let occurrences = OccurrenceCount::new(query.occurrence_count)?;
    let amount = calculate(base, occurrences);
    tracing::debug!(%base, %occurrences, %amount, "penalty calculated");
    Ok(Json(amount))
}

/// GET /api/calculate: Escalated penalty for a base fine.
#[utoipa::path(
    get,
    path = "/api/calculate",
    params(CalculateQuery),
    responses(
        (status = 200, description = "Calculated penalty", body = f64),
        (status = 400, description = "Missing or malformed parameter", body = crate::error::ErrorBody),
        (status = 422, description = "Negative amount or count below 1", body = crate::error::ErrorBody),
    ),
    tag = "calculator"
)]
pub(crate) async fn calculate_penalty(
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> Result<Json<Amount>, AppError> {
    evaluate(query)
}

/// GET /api/calculate-penalty: Alias of `/api/calculate`.
#[utoipa::path(
    get,
    path = "/api/calculate-penalty",
    params(CalculateQuery),
    responses(
        (status = 200, description = "Calculated penalty", body = f64),
        (status = 400, description = "Missing or malformed parameter", body = crate::error::ErrorBody),
        (status = 422, description = "Negative amount or count below 1", body = crate::error::ErrorBody),
    ),
    tag = "calculator"
)]
pub(crate) async fn calculate_penalty_alias(
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> Result<Json<Amount>, AppError> {
    evaluate(query)
}
