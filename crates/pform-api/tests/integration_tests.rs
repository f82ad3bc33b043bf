//! # Integration Tests for pform-api
//!
//! Drives the full router: catalog listings in both profiles, the
//! calculator, form submission and PDF delivery, error mapping, health
//! probes, metrics, and the OpenAPI document.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pform_api::state::{AppConfig, AppState};
use pform_core::{CatalogProfile, CompletedSubmission};
use pform_document::{DocumentError, DocumentGenerator, RenderContext};

/// Helper: build the test app for the escalation profile.
fn test_app() -> axum::Router {
    pform_api::app(AppState::new().unwrap())
}

/// Helper: build the test app for `profile`.
fn test_app_with_profile(profile: CatalogProfile) -> axum::Router {
    let config = AppConfig {
        profile,
        ..AppConfig::default()
    };
    pform_api::app(AppState::with_config(config).unwrap())
}

/// Helper: read response body as bytes.
async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: axum::Router, body: &Value) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/generate-pdf")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

fn escalation_form() -> Value {
    json!({
        "firstName": "Maria",
        "lastName": "Rusu",
        "unit": "Bl. 3, Ap. 41",
        "selectedBreach": { "id": 8 },
        "breachDate": "2024-05-02",
        "occurrenceCount": 1,
        "contextInformation": "Saci de gunoi lăsați lângă parcare.",
        "evidenceMaterials": ["IMG_0012.jpg"]
    })
}

struct FailingGenerator;

impl DocumentGenerator for FailingGenerator {
    fn generate(
        &self,
        _submission: &CompletedSubmission,
        _context: &RenderContext,
    ) -> Result<Vec<u8>, DocumentError> {
        Err(DocumentError::Encoding("disk full".into()))
    }
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = get(test_app(), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = get(test_app(), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Catalog ------------------------------------------------------------------

#[tokio::test]
async fn test_escalation_breaches_carry_base_amounts() {
    let response = get(test_app(), "/api/breaches").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let breaches = body.as_array().unwrap();
    assert_eq!(breaches.len(), 35);
    assert_eq!(breaches[0]["id"], 1);
    assert_eq!(breaches[0]["code"], "B5.1.1");
    assert_eq!(breaches[0]["baseAmount"].as_f64(), Some(1000.0));
    assert_eq!(breaches[0]["regulationReference"], "5.1.1");
}

#[tokio::test]
async fn test_tier_breaches_have_no_amounts() {
    let response = get(test_app_with_profile(CatalogProfile::Tier), "/api/breaches").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let first = &body.as_array().unwrap()[0];
    assert!(first.get("baseAmount").is_none());
    assert!(first.get("description").is_some());
}

#[tokio::test]
async fn test_occurrences_listing() {
    let response = get(test_app(), "/api/occurrences").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_occurrences_not_offered_in_tier_profile() {
    let response = get(
        test_app_with_profile(CatalogProfile::Tier),
        "/api/occurrences",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_penalties_listing_in_tier_profile() {
    let response = get(test_app_with_profile(CatalogProfile::Tier), "/api/penalties").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let penalties = body.as_array().unwrap();
    assert_eq!(penalties.len(), 7);
    assert_eq!(penalties[0]["amount"].as_f64(), Some(0.0));
    assert_eq!(penalties[6]["amount"].as_f64(), Some(7500.0));
}

#[tokio::test]
async fn test_penalties_not_offered_in_escalation_profile() {
    let response = get(test_app(), "/api/penalties").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Calculator ---------------------------------------------------------------

async fn calculated(uri: &str) -> f64 {
    let response = get(test_app(), uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_f64().unwrap()
}

#[tokio::test]
async fn test_calculate_first_offense() {
    assert_eq!(
        calculated("/api/calculate?baseAmount=1000.0&occurrenceCount=1").await,
        1000.0
    );
}

#[tokio::test]
async fn test_calculate_third_offense_adds_half() {
    assert_eq!(
        calculated("/api/calculate?baseAmount=500.0&occurrenceCount=3").await,
        750.0
    );
}

#[tokio::test]
async fn test_calculate_penalty_alias_doubles_from_fourth() {
    assert_eq!(
        calculated("/api/calculate-penalty?baseAmount=2500.0&occurrenceCount=5").await,
        5000.0
    );
}

#[tokio::test]
async fn test_calculate_zero_count_is_validation_error() {
    let response = get(test_app(), "/api/calculate?baseAmount=100&occurrenceCount=0").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"]["field"], "occurrenceCount");
}

#[tokio::test]
async fn test_calculate_negative_amount_is_validation_error() {
    let response = get(test_app(), "/api/calculate?baseAmount=-5&occurrenceCount=1").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_calculate_amount_beyond_maximum_is_validation_error() {
    for count in [3, 4] {
        let uri = format!(
            "/api/calculate?baseAmount=79228162514264337593543950335&occurrenceCount={count}"
        );
        let response = get(test_app(), &uri).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"]["field"], "baseAmount");
    }
}

#[tokio::test]
async fn test_calculate_maximum_amount_is_doubled() {
    assert_eq!(
        calculated("/api/calculate?baseAmount=1000000000000000&occurrenceCount=4").await,
        2e15
    );
}

#[tokio::test]
async fn test_calculate_malformed_query_is_bad_request() {
    let response = get(test_app(), "/api/calculate?baseAmount=100&occurrenceCount=two").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(test_app(), "/api/calculate?occurrenceCount=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Form ---------------------------------------------------------------------

#[tokio::test]
async fn test_form_page_is_html() {
    let response = get(test_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_string(response).await.contains("/generate-pdf"));
}

#[tokio::test]
async fn test_generate_pdf_returns_attachment() {
    let response = post_json(test_app(), &escalation_form()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"penalty_form.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_generate_pdf_accepts_plain_text_body() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate-pdf")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from(escalation_form().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_pdf_tier_profile() {
    let form = json!({
        "firstName": "Ion",
        "lastName": "Ionescu",
        "selectedBreach": { "id": 16 },
        "selectedPenalty": { "id": 2 }
    });
    let response = post_json(test_app_with_profile(CatalogProfile::Tier), &form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_generate_pdf_missing_first_name() {
    let mut form = escalation_form();
    form["firstName"] = json!("");
    let response = post_json(test_app(), &form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "firstName");
}

#[tokio::test]
async fn test_generate_pdf_unknown_breach() {
    let mut form = escalation_form();
    form["selectedBreach"] = json!({ "id": 999 });
    let response = post_json(test_app(), &form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["details"]["field"],
        "selectedBreach"
    );
}

#[tokio::test]
async fn test_generate_pdf_rejects_other_profile_fields() {
    let mut form = escalation_form();
    form["selectedPenalty"] = json!({ "id": 1 });
    let response = post_json(test_app(), &form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_generate_pdf_malformed_body() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate-pdf")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_generation_failure_is_empty_500() {
    let state =
        AppState::with_generator(AppConfig::default(), Arc::new(FailingGenerator)).unwrap();
    let response = post_json(pform_api::app(state), &escalation_form()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert!(body_bytes(response).await.is_empty());
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_requests_errors_and_documents() {
    let app = test_app();
    get(app.clone(), "/api/breaches").await;
    get(app.clone(), "/api/penalties").await;
    post_json(app.clone(), &escalation_form()).await;

    let response = get(app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["requests"], 3);
    assert_eq!(body["errors"], 1);
    assert_eq!(body["documents"], 1);
}

#[tokio::test]
async fn test_openapi_lists_routes() {
    let response = get(test_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/breaches",
        "/api/occurrences",
        "/api/penalties",
        "/api/calculate",
        "/api/calculate-penalty",
        "/generate-pdf",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
