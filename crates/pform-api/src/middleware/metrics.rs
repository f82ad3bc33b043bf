//! # Request Metrics
//!
//! In-process request, error and generated-document counters, exposed as
//! JSON at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;

use pform_document::PDF_CONTENT_TYPE;

/// Shared metrics state.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    document_count: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Requests seen.
    pub requests: u64,
    /// Requests answered with a 4xx or 5xx status.
    pub errors: u64,
    /// PDF documents served.
    pub documents: u64,
}

impl ApiMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen.
    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests answered with a 4xx or 5xx status.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// PDF documents served.
    pub fn documents(&self) -> u64 {
        self.document_count.load(Ordering::Relaxed)
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
            documents: self.documents(),
        }
    }

    fn record(&self, response: &Response) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        } else if response
            .headers()
            .get(CONTENT_TYPE)
            .is_some_and(|v| v.as_bytes() == PDF_CONTENT_TYPE.as_bytes())
        {
            self.document_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Middleware that updates the counters found in the request extensions.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record(&response);
    }

    response
}
