//! # Router Module
//!
//! Turns the declarative [`RouteTable`](crate::table::RouteTable) into a
//! matcher for URL fragments.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling each enabled pattern to an anchored regex at startup
//! - Matching fragments against those patterns in declaration order
//! - Extracting and percent-decoding named path parameters
//! - Parsing an optional trailing query string
//!
//! Disabled table entries are never compiled and therefore never match.
//!
//! ## Example
//!
//! ```rust
//! use timeside_router::router::Router;
//! use timeside_router::table::app_routes;
//!
//! let router = Router::new(app_routes()).unwrap();
//! let m = router.route("#reset/a%2Bb").unwrap();
//! assert_eq!(m.handler_name, "auth_newpassword");
//! assert_eq!(m.get_path_param("token"), Some("a+b"));
//! ```

mod core;
pub mod pattern;
#[cfg(test)]
mod tests;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use pattern::normalize_fragment;
