//! Dispatcher core: handler-name lookup, middleware and panic recovery.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::ids::NavigationId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::table::RouteTable;

/// Navigation data passed to a handler
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique id for log correlation
    pub navigation_id: NavigationId,
    /// Normalized fragment that was matched
    pub fragment: String,
    /// Pattern of the matched route
    pub pattern: String,
    /// Name of the handler processing this navigation
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
}

impl HandlerRequest {
    /// Get a path parameter by name (last write wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last write wins)
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Build the request for `m` under an existing navigation id
    #[must_use]
    pub fn new(m: RouteMatch, navigation_id: NavigationId) -> Self {
        Self {
            navigation_id,
            fragment: m.fragment,
            pattern: m.route.pattern.clone(),
            handler_name: m.handler_name,
            path_params: m.path_params,
            query_params: m.query_params,
            query: m.query,
        }
    }
}

/// What a handler asks the application to do next
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerResponse {
    /// Show a view with the given context
    Render { view: String, context: Value },
    /// Navigate to another fragment
    Redirect { fragment: String },
}

impl HandlerResponse {
    #[must_use]
    pub fn render(view: impl Into<String>) -> Self {
        Self::Render {
            view: view.into(),
            context: Value::Object(Default::default()),
        }
    }

    #[must_use]
    pub fn render_with(view: impl Into<String>, context: Value) -> Self {
        Self::Render {
            view: view.into(),
            context,
        }
    }

    #[must_use]
    pub fn redirect(fragment: impl Into<String>) -> Self {
        Self::Redirect {
            fragment: fragment.into(),
        }
    }

    /// Short label for logs: `render` or `redirect`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerResponse::Render { .. } => "render",
            HandlerResponse::Redirect { .. } => "redirect",
        }
    }
}

/// Dispatch failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A matched route names a handler nobody registered
    HandlerNotFound { handler_name: String },
    /// Active routes name handlers that are not registered
    MissingHandlers { handlers: Vec<String> },
    /// The handler panicked; the panic was contained
    HandlerPanicked {
        handler_name: String,
        message: String,
    },
    /// Redirects kept chaining past the configured limit
    RedirectLoop { fragment: String, limit: usize },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::HandlerNotFound { handler_name } => {
                write!(f, "no handler registered for '{}'", handler_name)
            }
            DispatchError::MissingHandlers { handlers } => write!(
                f,
                "route table names unregistered handlers: {}",
                handlers.join(", ")
            ),
            DispatchError::HandlerPanicked {
                handler_name,
                message,
            } => write!(f, "handler '{}' panicked: {}", handler_name, message),
            DispatchError::RedirectLoop { fragment, limit } => write!(
                f,
                "more than {} redirects while navigating to '{}'",
                limit, fragment
            ),
        }
    }
}

impl std::error::Error for DispatchError {}

/// A registered handler
pub type HandlerFn = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Binds handler names to functions and invokes them for matched routes
#[derive(Clone, Default)]
pub struct Dispatcher {
    /// Map of handler names to their functions
    pub handlers: HashMap<String, HandlerFn>,
    /// Middleware applied to every dispatch, in insertion order
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("Dispatcher")
            .field("handlers", &names)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler_fn` under `name`, replacing any previous binding.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        if self
            .handlers
            .insert(name.to_string(), Arc::new(handler_fn))
            .is_some()
        {
            warn!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Replaced existing handler"
            );
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered successfully"
            );
        }
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Check that every active route of `table` has a registered handler.
    pub fn verify(&self, table: &RouteTable) -> Result<(), DispatchError> {
        let missing: Vec<String> = table
            .handler_names()
            .into_iter()
            .filter(|name| !self.has_handler(name))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        error!(missing = ?missing, "Route table names unregistered handlers");
        Err(DispatchError::MissingHandlers { handlers: missing })
    }

    /// Invoke the handler for a matched route exactly once.
    pub fn dispatch(&self, route_match: RouteMatch) -> Result<HandlerResponse, DispatchError> {
        self.dispatch_with_id(route_match, NavigationId::new())
    }

    /// Like [`Dispatcher::dispatch`], tagging the request with `navigation_id`.
    pub fn dispatch_with_id(
        &self,
        route_match: RouteMatch,
        navigation_id: NavigationId,
    ) -> Result<HandlerResponse, DispatchError> {
        debug!(
            navigation_id = %navigation_id,
            handler_name = %route_match.handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let Some(handler) = self.handlers.get(&route_match.handler_name) else {
            let available: Vec<&String> = self.handlers.keys().collect();
            error!(
                handler_name = %route_match.handler_name,
                available_handlers = ?available,
                "Handler not found"
            );
            return Err(DispatchError::HandlerNotFound {
                handler_name: route_match.handler_name,
            });
        };

        let request = HandlerRequest::new(route_match, navigation_id);
        let start = Instant::now();

        let short_circuit = self.middlewares.iter().find_map(|mw| mw.before(&request));
        let mut response = match short_circuit {
            Some(response) => {
                debug!(
                    navigation_id = %request.navigation_id,
                    handler_name = %request.handler_name,
                    "Middleware short-circuited dispatch"
                );
                response
            }
            None => match catch_unwind(AssertUnwindSafe(|| handler(&request))) {
                Ok(response) => response,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(
                        navigation_id = %request.navigation_id,
                        handler_name = %request.handler_name,
                        panic_message = %message,
                        "Handler panicked"
                    );
                    return Err(DispatchError::HandlerPanicked {
                        handler_name: request.handler_name,
                        message,
                    });
                }
            },
        };

        let latency = start.elapsed();
        for mw in &self.middlewares {
            mw.after(&request, &mut response, latency);
        }

        info!(
            navigation_id = %request.navigation_id,
            handler_name = %request.handler_name,
            outcome = response.kind(),
            latency_us = latency.as_micros(),
            "Handler execution complete"
        );
        Ok(response)
    }
}
