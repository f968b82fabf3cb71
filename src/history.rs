//! # Navigation History
//!
//! Drives the router and dispatcher the way a browser shell does: it keeps
//! the current fragment, turns navigation requests into at most one handler
//! invocation, and follows handler redirects.
//!
//! ```rust
//! use std::sync::Arc;
//! use timeside_router::controller::AppController;
//! use timeside_router::dispatcher::Dispatcher;
//! use timeside_router::history::{History, HistoryConfig, NavigateOptions, Navigation};
//! use timeside_router::registry::register_all;
//! use timeside_router::router::Router;
//! use timeside_router::table::app_routes;
//!
//! let mut dispatcher = Dispatcher::new();
//! register_all(&mut dispatcher, Arc::new(AppController::new()));
//! let router = Router::new(app_routes()).unwrap();
//! let mut history =
//!     History::new(router, dispatcher, app_routes(), HistoryConfig::default()).unwrap();
//!
//! let nav = history.navigate("#logout", NavigateOptions::trigger()).unwrap();
//! assert!(matches!(nav, Navigation::Dispatched { ref handler_name, .. } if handler_name == "home"));
//! assert_eq!(history.current(), Some(""));
//! ```

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dispatcher::{DispatchError, Dispatcher, HandlerResponse};
use crate::ids::NavigationId;
use crate::router::{normalize_fragment, Router};
use crate::runtime_config::{RuntimeConfig, DEFAULT_MAX_REDIRECTS};
use crate::table::RouteTable;

/// Entries kept in the visited log before the oldest are dropped.
pub const DEFAULT_MAX_VISITED: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Redirects one navigation may follow
    pub max_redirects: usize,
    /// Capacity of the visited log
    pub max_visited: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_visited: DEFAULT_MAX_VISITED,
        }
    }
}

impl From<&RuntimeConfig> for HistoryConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            max_redirects: config.max_redirects,
            ..Self::default()
        }
    }
}

/// Options for [`History::navigate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Dispatch the matching handler; otherwise only the current fragment changes
    pub trigger: bool,
    /// Dispatch even when the fragment equals the current one
    pub force: bool,
}

impl NavigateOptions {
    #[must_use]
    pub fn trigger() -> Self {
        Self {
            trigger: true,
            force: false,
        }
    }

    #[must_use]
    pub fn forced() -> Self {
        Self {
            trigger: true,
            force: true,
        }
    }
}

/// Outcome of one navigation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Navigation {
    /// A handler ran; `fragment` is where the navigation ended up
    Dispatched {
        /// Shared by every dispatch of this navigation, redirects included
        navigation_id: NavigationId,
        fragment: String,
        handler_name: String,
        response: HandlerResponse,
        /// Fragments visited through handler redirects, in order
        redirects: Vec<String>,
    },
    /// No active route matches the fragment
    NotFound { fragment: String },
    /// Fragment equals the current one; nothing happened
    Unchanged { fragment: String },
    /// Current fragment updated without dispatch
    Recorded { fragment: String },
}

/// In-process navigation state over a [`Router`] and [`Dispatcher`]
#[derive(Debug)]
pub struct History {
    router: Router,
    dispatcher: Dispatcher,
    current: Option<String>,
    visited: VecDeque<String>,
    max_redirects: usize,
    max_visited: usize,
}

impl History {
    /// Fails if an active route of `table` names an unregistered handler.
    pub fn new(
        router: Router,
        dispatcher: Dispatcher,
        table: &RouteTable,
        config: HistoryConfig,
    ) -> Result<Self, DispatchError> {
        dispatcher.verify(table)?;
        info!(
            routes_count = router.len(),
            max_redirects = config.max_redirects,
            max_visited = config.max_visited,
            "Navigation history ready"
        );
        Ok(Self {
            router,
            dispatcher,
            current: None,
            visited: VecDeque::with_capacity(config.max_visited.min(64)),
            max_redirects: config.max_redirects,
            max_visited: config.max_visited,
        })
    }

    /// Fragment currently shown, `None` before the first navigation
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The most recent fragments that became current, oldest first.
    ///
    /// Holds at most `max_visited` entries.
    #[must_use]
    pub fn visited(&self) -> Vec<&str> {
        self.visited.iter().map(String::as_str).collect()
    }

    fn set_current(&mut self, fragment: &str) {
        self.current = Some(fragment.to_string());
        if self.max_visited == 0 {
            return;
        }
        if self.visited.len() == self.max_visited {
            self.visited.pop_front();
        }
        self.visited.push_back(fragment.to_string());
    }

    /// Load the initial URL: it becomes current and is dispatched.
    pub fn start(&mut self, url: &str) -> Result<Navigation, DispatchError> {
        let fragment = normalize_fragment(url);
        self.set_current(&fragment);
        self.dispatch_fragment(fragment)
    }

    /// Navigate to `url`.
    pub fn navigate(
        &mut self,
        url: &str,
        options: NavigateOptions,
    ) -> Result<Navigation, DispatchError> {
        let fragment = normalize_fragment(url);
        if !options.force && self.current.as_deref() == Some(fragment.as_str()) {
            debug!(fragment = %fragment, "Navigation to current fragment ignored");
            return Ok(Navigation::Unchanged { fragment });
        }

        self.set_current(&fragment);
        if !options.trigger {
            return Ok(Navigation::Recorded { fragment });
        }
        self.dispatch_fragment(fragment)
    }

    /// Match `url` and dispatch its handler once, following redirects.
    ///
    /// Does not change the current fragment unless a handler redirects.
    pub fn load_url(&mut self, url: &str) -> Result<Navigation, DispatchError> {
        self.dispatch_fragment(normalize_fragment(url))
    }

    /// `requested` must already be normalized.
    fn dispatch_fragment(&mut self, requested: String) -> Result<Navigation, DispatchError> {
        let navigation_id = NavigationId::new();
        let mut target = requested.clone();
        let mut redirects: Vec<String> = Vec::new();

        loop {
            let Some(route_match) = self.router.route_fragment(&target) else {
                return Ok(Navigation::NotFound { fragment: target });
            };
            let handler_name = route_match.handler_name.clone();

            match self.dispatcher.dispatch_with_id(route_match, navigation_id)? {
                HandlerResponse::Redirect { fragment: next } => {
                    if redirects.len() >= self.max_redirects {
                        warn!(
                            navigation_id = %navigation_id,
                            fragment = %requested,
                            limit = self.max_redirects,
                            "Redirect limit reached"
                        );
                        return Err(DispatchError::RedirectLoop {
                            fragment: requested,
                            limit: self.max_redirects,
                        });
                    }
                    let next = normalize_fragment(&next);
                    debug!(
                        navigation_id = %navigation_id,
                        from = %target,
                        to = %next,
                        "Following handler redirect"
                    );
                    self.set_current(&next);
                    redirects.push(next.clone());
                    target = next;
                }
                response => {
                    return Ok(Navigation::Dispatched {
                        navigation_id,
                        fragment: target,
                        handler_name,
                        response,
                        redirects,
                    })
                }
            }
        }
    }
}
