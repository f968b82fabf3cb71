use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use tracing::{debug, info};

use super::error::RouteTableError;
use super::types::RouteMeta;
use crate::router::pattern::{param_names, parse_pattern};

/// Immutable, declaration-ordered route table.
///
/// Built once at startup through [`RouteTable::new`], which validates every
/// entry. Disabled entries are kept so that pattern uniqueness covers them,
/// but they are never handed to the router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteMeta>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl RouteTable {
    /// Validate and freeze a list of routes.
    ///
    /// Fills in `index` and `param_names` for each route.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self, RouteTableError> {
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(routes.len());
        let mut built = Vec::with_capacity(routes.len());

        for (index, mut route) in routes.into_iter().enumerate() {
            if route.pattern.starts_with('/') || route.pattern.starts_with('#') {
                return Err(RouteTableError::LeadingSeparator {
                    pattern: route.pattern,
                });
            }
            if !is_identifier(&route.handler_name) {
                return Err(RouteTableError::InvalidHandlerName {
                    pattern: route.pattern,
                    handler: route.handler_name,
                });
            }
            if let Some(&first) = seen.get(&route.pattern) {
                return Err(RouteTableError::DuplicatePattern {
                    pattern: route.pattern,
                    first,
                    second: index,
                });
            }

            let tokens = parse_pattern(&route.pattern)?;
            let names = param_names(&tokens);
            let mut unique = HashSet::with_capacity(names.len());
            for name in &names {
                if !unique.insert(name.as_str()) {
                    return Err(RouteTableError::DuplicateParam {
                        pattern: route.pattern,
                        param: name.clone(),
                    });
                }
            }

            debug!(
                index = index,
                pattern = %route.pattern,
                handler_name = %route.handler_name,
                enabled = route.enabled,
                params = ?names,
                "Route declared"
            );

            seen.insert(route.pattern.clone(), index);
            route.index = index;
            route.param_names = names;
            built.push(route);
        }

        let table = Self { routes: built };
        info!(
            routes_count = table.routes.len(),
            active_count = table.active().count(),
            "Route table built"
        );
        Ok(table)
    }

    /// All declared routes, enabled or not, in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteMeta] {
        &self.routes
    }

    /// Enabled routes in declaration order.
    pub fn active(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().filter(|r| r.enabled)
    }

    /// Handler bound to an exact pattern, if that pattern is active.
    #[must_use]
    pub fn handler_for(&self, pattern: &str) -> Option<&str> {
        self.active()
            .find(|r| r.pattern == pattern)
            .map(|r| r.handler_name.as_str())
    }

    /// The active pattern → handler mapping, in declaration order.
    #[must_use]
    pub fn mapping(&self) -> Vec<(&str, &str)> {
        self.active()
            .map(|r| (r.pattern.as_str(), r.handler_name.as_str()))
            .collect()
    }

    /// Distinct handler names of the active routes, first-seen order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for route in self.active() {
            if !names.contains(&route.handler_name.as_str()) {
                names.push(&route.handler_name);
            }
        }
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Write one line per route in declaration order; disabled routes only with `all`.
    pub fn dump_routes<W: Write>(&self, all: bool, out: &mut W) -> io::Result<()> {
        for route in self.routes.iter().filter(|r| all || r.enabled) {
            let state = if route.enabled { "" } else { " (disabled)" };
            writeln!(
                out,
                "{:<24} -> {}{}",
                format!("'{}'", route.pattern),
                route.handler_name,
                state
            )?;
        }
        Ok(())
    }
}
