//! Dispatch middleware: observation hooks around handler invocation.

mod core;
mod metrics;
mod tracing;

pub use core::Middleware;
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
