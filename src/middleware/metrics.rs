use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Middleware counting dispatches
///
/// Tracks the total number of dispatches, their average latency, how many
/// ended in a redirect, and a per-handler count.
#[derive(Default)]
pub struct MetricsMiddleware {
    dispatch_count: AtomicUsize,
    redirect_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    per_handler: DashMap<String, usize>,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of completed dispatches
    pub fn dispatch_count(&self) -> usize {
        self.dispatch_count.load(Ordering::Relaxed)
    }

    /// Dispatches that answered with a redirect
    pub fn redirect_count(&self) -> usize {
        self.redirect_count.load(Ordering::Relaxed)
    }

    /// Dispatches of one handler
    pub fn handler_count(&self, handler_name: &str) -> usize {
        self.per_handler
            .get(handler_name)
            .map(|c| *c.value())
            .unwrap_or(0)
    }

    /// Mean dispatch latency, zero before the first dispatch
    pub fn average_latency(&self) -> Duration {
        let count = self.dispatch_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        if matches!(res, HandlerResponse::Redirect { .. }) {
            self.redirect_count.fetch_add(1, Ordering::Relaxed);
        }
        *self
            .per_handler
            .entry(req.handler_name.clone())
            .or_insert(0) += 1;
    }
}
