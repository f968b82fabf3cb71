//! # Route Table Module
//!
//! Declares which URL fragments the player recognises and which controller
//! operation handles each one.
//!
//! A [`RouteTable`] is an ordered, validated, immutable list of
//! [`RouteMeta`] entries. Order is significant: the router tries routes in
//! declaration order and the first match wins.
//!
//! Tables come from two places:
//!
//! - [`app_routes`] returns the built-in player table
//! - [`load_routes`] reads a YAML or JSON route file
//!
//! ```rust
//! use timeside_router::table::app_routes;
//!
//! let table = app_routes();
//! assert_eq!(table.handler_for("reset/:token"), Some("auth_newpassword"));
//! ```

mod build;
mod defaults;
mod error;
mod load;
mod types;

pub use build::RouteTable;
pub use defaults::{app_route_list, app_routes};
pub use error::RouteTableError;
pub use load::{load_routes, parse_routes};
pub use types::{RouteEntry, RouteFile, RouteMeta};
