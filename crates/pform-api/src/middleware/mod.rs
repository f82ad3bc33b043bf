//! Request middleware.

pub mod metrics;
pub mod tracing_layer;
