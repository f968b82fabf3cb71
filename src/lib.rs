//! # timeside-router
//!
//! The client-side route table of the Timeside player, together with the
//! machinery that makes it do something: a pattern matcher, a name-based
//! handler dispatcher and an in-process navigation history.
//!
//! ## Overview
//!
//! The route table is declarative: an ordered list of fragment patterns,
//! each bound to a handler name. The built-in table is:
//!
//! | pattern               | handler               |
//! |-----------------------|-----------------------|
//! | *(empty)*             | `home`                |
//! | `temp_hom`            | `temp_home`           |
//! | `auth/forgetpassword` | `auth_forgetpassword` |
//! | `reset/:token`        | `auth_newpassword`    |
//! | `logout`              | `logout`              |
//!
//! A block of user-management routes is declared but disabled and never
//! matches.
//!
//! ## Architecture
//!
//! - **[`table`]** - Route declarations, validation and route files
//! - **[`router`]** - Pattern compilation and first-match-wins matching
//! - **[`dispatcher`]** - Handler registry and invocation
//! - **[`middleware`]** - Hooks around dispatch (metrics, logging)
//! - **[`controller`]** / **[`registry`]** - The player's handlers
//! - **[`history`]** - Navigation state and redirect following
//! - **[`cli`]** - The `timeside-router` binary
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Shell
//!     participant History
//!     participant Router
//!     participant Dispatcher
//!     participant Controller
//!
//!     Shell->>History: navigate("#reset/abc")
//!     History->>History: normalize → "reset/abc"
//!     History->>Router: route_fragment("reset/abc")
//!     Router-->>History: RouteMatch(auth_newpassword, token=abc)
//!     History->>Dispatcher: dispatch(match)
//!     Dispatcher->>Controller: auth_newpassword(req)
//!     Controller-->>Dispatcher: Render("auth/new_password")
//!     Dispatcher-->>History: HandlerResponse
//!     History-->>Shell: Navigation::Dispatched
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use timeside_router::router::Router;
//! use timeside_router::table::app_routes;
//!
//! let router = Router::new(app_routes()).unwrap();
//! assert_eq!(router.route("").unwrap().handler_name, "home");
//! assert!(router.route("users/list").is_none());
//! ```

pub mod cli;
pub mod controller;
pub mod dispatcher;
pub mod history;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod table;

pub use dispatcher::{DispatchError, Dispatcher, HandlerRequest, HandlerResponse};
pub use history::{History, HistoryConfig, NavigateOptions, Navigation};
pub use router::{RouteMatch, Router};
pub use table::{app_routes, load_routes, RouteMeta, RouteTable, RouteTableError};
