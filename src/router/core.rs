//! Router core: ordered matching of fragments against compiled patterns.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::pattern::{compile_pattern, normalize_fragment, CompiledPattern};
use crate::logging::redact_param;
use crate::table::{RouteMeta, RouteTable, RouteTableError};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for a single match. Names are shared with the compiled
/// route; values are per-navigation.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of matching a fragment to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route
    pub route: Arc<RouteMeta>,
    /// The fragment that was matched, after normalization
    pub fragment: String,
    /// Name of the handler that should process this navigation
    pub handler_name: String,
    /// Decoded path parameters in declaration order; unmatched optional
    /// parameters are absent
    pub path_params: ParamVec,
    /// Parsed query string parameters
    pub query_params: ParamVec,
    /// The raw query string, without the leading `?`
    pub query: Option<String>,
}

impl RouteMatch {
    /// Get a path parameter by name (last write wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last write wins, so `?a=1&a=2` gives `2`)
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn query_params_map(&self) -> HashMap<String, String> {
        self.query_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Decode one path parameter as a URI component. `+` is left alone.
fn decode_param(name: &str, raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!(
                param = %name,
                value = %redact_param(name, raw),
                error = %e,
                "Path parameter is not valid UTF-8 after decoding; keeping raw value"
            );
            raw.to_string()
        }
    }
}

fn parse_query(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Matches fragments to handler names using a compiled [`RouteTable`]
///
/// Only enabled routes are compiled. Matching walks them in declaration
/// order and stops at the first hit, so an earlier, broader pattern shadows
/// a later, narrower one.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<(CompiledPattern, Arc<RouteMeta>)>,
}

impl Router {
    /// Compile every enabled route of the table
    pub fn new(table: &RouteTable) -> Result<Self, RouteTableError> {
        let mut routes = Vec::with_capacity(table.len());
        for meta in table.active() {
            let compiled = compile_pattern(&meta.pattern)?;
            routes.push((compiled, Arc::new(meta.clone())));
        }

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|(_, meta)| format!("'{}' -> {}", meta.pattern, meta.handler_name))
            .collect();
        info!(
            routes_count = routes.len(),
            disabled_count = table.len() - routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self { routes })
    }

    /// Active patterns in matching order
    #[must_use]
    pub fn get_all_patterns(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|(_, meta)| meta.pattern.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a URL, hash or fragment. The input is normalized first.
    #[must_use]
    pub fn route(&self, url: &str) -> Option<RouteMatch> {
        let fragment = normalize_fragment(url);
        self.route_fragment(&fragment)
    }

    /// Match an already normalized fragment
    #[must_use]
    pub fn route_fragment(&self, fragment: &str) -> Option<RouteMatch> {
        debug!(fragment = %fragment, "Route match attempt");
        let match_start = Instant::now();

        for (compiled, meta) in &self.routes {
            let Some(caps) = compiled.regex.captures(fragment) else {
                continue;
            };

            let mut path_params = ParamVec::new();
            for (i, name) in compiled.param_names.iter().enumerate() {
                if let Some(m) = caps.get(i + 1) {
                    path_params.push((Arc::clone(name), decode_param(name, m.as_str())));
                }
            }

            let query = caps
                .get(compiled.param_names.len() + 1)
                .map(|m| m.as_str().to_string());
            let query_params = query.as_deref().map(parse_query).unwrap_or_default();

            let match_duration = match_start.elapsed();
            let logged_params: Vec<(String, String)> = path_params
                .iter()
                .map(|(k, v)| (k.to_string(), redact_param(k, v)))
                .collect();
            if match_duration > Duration::from_millis(1) {
                warn!(
                    fragment = %fragment,
                    handler_name = %meta.handler_name,
                    route_pattern = %meta.pattern,
                    path_params = ?logged_params,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                info!(
                    fragment = %fragment,
                    handler_name = %meta.handler_name,
                    route_pattern = %meta.pattern,
                    path_params = ?logged_params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }

            return Some(RouteMatch {
                route: Arc::clone(meta),
                fragment: fragment.to_string(),
                handler_name: meta.handler_name.clone(),
                path_params,
                query_params,
                query,
            });
        }

        warn!(
            fragment = %fragment,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }
}
