//! Structured logging setup
//!
//! Configures `tracing` output for the router and its CLI:
//! - JSON or pretty formatting
//! - `EnvFilter` level and per-target directives
//! - Optional non-blocking output via `tracing-appender`
//! - Masking of sensitive route parameters (reset tokens and the like)

use anyhow::{Context, Result};
use std::env;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Redaction level for route parameters written to logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedactionLevel {
    /// No redaction (dev only)
    None = 0,
    /// Mask parameters whose name marks them as a credential
    Credentials = 1,
    /// Mask every parameter value
    Full = 2,
}

impl RedactionLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => RedactionLevel::None,
            "full" => RedactionLevel::Full,
            _ => RedactionLevel::Credentials,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => RedactionLevel::None,
            2 => RedactionLevel::Full,
            _ => RedactionLevel::Credentials,
        }
    }
}

static REDACTION: AtomicU8 = AtomicU8::new(RedactionLevel::Credentials as u8);

const SENSITIVE_PARAMS: [&str; 5] = ["token", "password", "secret", "key", "auth"];

/// Set the process-wide redaction level used by [`redact_param`].
pub fn set_redaction_level(level: RedactionLevel) {
    REDACTION.store(level as u8, Ordering::Relaxed);
}

#[must_use]
pub fn redaction_level() -> RedactionLevel {
    RedactionLevel::from_u8(REDACTION.load(Ordering::Relaxed))
}

fn mask(level: RedactionLevel, name: &str, value: &str) -> String {
    let sensitive = || {
        let lower = name.to_ascii_lowercase();
        SENSITIVE_PARAMS.iter().any(|s| lower.contains(s))
    };
    match level {
        RedactionLevel::None => value.to_string(),
        RedactionLevel::Credentials if !sensitive() => value.to_string(),
        _ if value.chars().count() > 8 => {
            let head: String = value.chars().take(4).collect();
            format!("{head}***")
        }
        _ => "<REDACTED>".to_string(),
    }
}

/// Value of a route parameter as it may appear in logs.
#[must_use]
pub fn redact_param(name: &str, value: &str) -> String {
    mask(redaction_level(), name, value)
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub redact_level: RedactionLevel,
    /// Write through a non-blocking appender
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("TIMESIDE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("TIMESIDE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            redact_level: RedactionLevel::parse(
                &env::var("TIMESIDE_LOG_REDACT_LEVEL").unwrap_or_else(|_| "credentials".to_string()),
            ),
            async_logging: env::var("TIMESIDE_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            target_filter: env::var("TIMESIDE_LOG_TARGET_FILTER").ok(),
            include_location: env::var("TIMESIDE_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

/// Initialize logging with the given level, other settings from the environment
pub fn init_logging(log_level: &str) -> Result<()> {
    let mut config = LogConfig::from_env();
    config.log_level = log_level.to_string();
    init_logging_with_config(&config)
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already set.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
            }
        }
    }

    set_redaction_level(config.redact_level);

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        let fmt_layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(non_blocking)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(non_blocking)
                .boxed(),
        };
        registry
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize async logging")?;
        // keep the worker alive for the process lifetime
        std::mem::forget(guard);
    } else {
        let fmt_layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(std::io::stderr)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(std::io::stderr)
                .boxed(),
        };
        registry
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize sync logging")?;
    }

    Ok(())
}
