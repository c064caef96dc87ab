//! HTTP middleware and relay counters.
//!
//! Layer order: Request → CORS → Tracing → Handler

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::RelayMetrics;
pub use tracing::TracingLayer;
