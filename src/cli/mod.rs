//! # CLI Module
//!
//! Command-line access to the route table.
//!
//! ## Commands
//!
//! ```bash
//! # List active routes (add --all for disabled ones)
//! timeside-router routes
//!
//! # Resolve a URL to its handler and parameters
//! timeside-router match '#reset/abc%2F123'
//!
//! # Validate a route file
//! timeside-router check --file routes/app_routes.yaml
//!
//! # Drive the player controller through a sequence of navigations
//! timeside-router navigate '' auth/forgetpassword logout
//! ```
//!
//! Every command reads the built-in table unless `--file` or
//! `TIMESIDE_ROUTES_FILE` names a route file.

mod commands;


pub use commands::{run_cli, Cli, Commands};
