use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hook around every dispatch.
///
/// `before` may return a response to skip the handler; `after` sees the final
/// response, whether it came from the handler or from a short-circuit.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
