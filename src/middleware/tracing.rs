use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::logging::redact_param;

/// Logs the start and end of every dispatch with redacted parameters.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        let params: Vec<(String, String)> = req
            .path_params
            .iter()
            .map(|(k, v)| (k.to_string(), redact_param(k, v)))
            .collect();
        info!(
            navigation_id = %req.navigation_id,
            handler = %req.handler_name,
            pattern = %req.pattern,
            path_params = ?params,
            "Navigation dispatch start"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        info!(
            navigation_id = %req.navigation_id,
            handler = %req.handler_name,
            outcome = res.kind(),
            latency_us = latency.as_micros() as u64,
            "Navigation dispatch complete"
        );
    }
}
