//! # Dispatcher Module
//!
//! Binds the handler names declared in the route table to functions and
//! invokes them for matched routes.
//!
//! ## Overview
//!
//! - Handlers are registered by name with [`Dispatcher::register_handler`]
//! - [`Dispatcher::verify`] rejects a table whose active routes name
//!   handlers that were never registered
//! - [`Dispatcher::dispatch`] runs middleware, calls the handler exactly
//!   once and contains panics as [`DispatchError::HandlerPanicked`]
//!
//! Dispatch is synchronous: navigation events are handled one at a time on
//! the caller's thread.
//!
//! ```rust
//! use timeside_router::dispatcher::{Dispatcher, HandlerResponse};
//! use timeside_router::router::Router;
//! use timeside_router::table::{RouteMeta, RouteTable};
//!
//! let table = RouteTable::new(vec![RouteMeta::new("reset/:token", "auth_newpassword")]).unwrap();
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_handler("auth_newpassword", |req| {
//!     HandlerResponse::render_with(
//!         "auth/new_password",
//!         serde_json::json!({ "token": req.get_path_param("token") }),
//!     )
//! });
//! dispatcher.verify(&table).unwrap();
//!
//! let router = Router::new(&table).unwrap();
//! let response = dispatcher.dispatch(router.route("reset/abc").unwrap()).unwrap();
//! assert_eq!(response.kind(), "render");
//! ```

mod core;

pub use core::{DispatchError, Dispatcher, HandlerFn, HandlerRequest, HandlerResponse};
