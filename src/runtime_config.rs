//! # Runtime Configuration Module
//!
//! Environment-driven settings for the router and its CLI.
//!
//! ## Environment Variables
//!
//! ### `TIMESIDE_ROUTES_FILE`
//!
//! Path to a YAML or JSON route file. When unset, the built-in player
//! table is used.
//!
//! ### `TIMESIDE_MAX_REDIRECTS`
//!
//! How many handler redirects one navigation may follow before it is
//! abandoned. Accepts decimal (`8`) or hexadecimal (`0x8`).
//!
//! Default: `8`
//!
//! ```rust
//! use timeside_router::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Max redirects: {}", config.max_redirects);
//! ```

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_REDIRECTS: usize = 8;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Route file overriding the built-in table
    pub routes_file: Option<PathBuf>,
    /// Redirect chain limit per navigation
    pub max_redirects: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            routes_file: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

fn parse_count(val: &str) -> Option<usize> {
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("TIMESIDE_ROUTES_FILE").ok(),
            env::var("TIMESIDE_MAX_REDIRECTS").ok(),
        )
    }

    fn from_vars(routes_file: Option<String>, max_redirects: Option<String>) -> Self {
        Self {
            routes_file: routes_file.filter(|s| !s.is_empty()).map(PathBuf::from),
            max_redirects: max_redirects
                .as_deref()
                .and_then(parse_count)
                .unwrap_or(DEFAULT_MAX_REDIRECTS),
        }
    }
}
