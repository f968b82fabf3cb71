use serde::{Deserialize, Serialize};

/// A single declared route: a URL fragment pattern bound to a handler name.
///
/// `param_names` and `index` are derived when the table is built; they are
/// never read from a route file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    /// Fragment pattern, e.g. `reset/:token`. The empty string is the root.
    pub pattern: String,
    /// Name of the controller operation invoked when the pattern matches.
    pub handler_name: String,
    /// Disabled routes stay in the table for bookkeeping but are never matched.
    pub enabled: bool,
    /// Named parameters (`:name` and `*name`) in declaration order.
    pub param_names: Vec<String>,
    /// Position in the table, zero based.
    pub index: usize,
}

impl RouteMeta {
    /// Declare an active route.
    pub fn new(pattern: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            handler_name: handler_name.into(),
            enabled: true,
            param_names: Vec::new(),
            index: 0,
        }
    }

    /// Declare a route that is kept in the table but never matched.
    pub fn disabled(pattern: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(pattern, handler_name)
        }
    }

    /// True for the root route (empty pattern).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// On-disk shape of a route entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteEntry {
    pub pattern: String,
    pub handler: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// On-disk shape of a route table file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteFile {
    pub routes: Vec<RouteEntry>,
}

impl From<RouteEntry> for RouteMeta {
    fn from(entry: RouteEntry) -> Self {
        Self {
            pattern: entry.pattern,
            handler_name: entry.handler,
            enabled: entry.enabled,
            param_names: Vec::new(),
            index: 0,
        }
    }
}
