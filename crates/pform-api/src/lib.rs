//! # pform-api: Penalty Form HTTP Service
//!
//! Serves the penalty form page, the reference catalog of the configured
//! profile, the penalty calculator, and PDF penalty notices.
//!
//! ## API Surface
//!
//! | Route                          | Module                  |
//! |--------------------------------|-------------------------|
//! | `GET /api/breaches`            | [`routes::catalog`]     |
//! | `GET /api/occurrences`         | [`routes::catalog`]     |
//! | `GET /api/penalties`           | [`routes::catalog`]     |
//! | `GET /api/calculate`           | [`routes::calculator`]  |
//! | `GET /api/calculate-penalty`   | [`routes::calculator`]  |
//! | `GET /`                        | [`routes::form`]        |
//! | `POST /generate-pdf`           | [`routes::form`]        |
//! | `GET /openapi.json`            | [`openapi`]             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
///
/// Health probes and `/metrics` sit outside the metrics and tracing layers
/// so probing does not skew the counters.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::calculator::router())
        .merge(routes::form::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(Extension(metrics.clone()))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics_snapshot))
        .layer(Extension(metrics));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the catalog is static and templates register at
/// startup, so a running process is ready.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics: Current request counters.
async fn metrics_snapshot(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
