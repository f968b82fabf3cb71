use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::controller::AppController;
use crate::dispatcher::Dispatcher;
use crate::history::{History, HistoryConfig, NavigateOptions};
use crate::middleware::TracingMiddleware;
use crate::registry::register_all;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::table::{app_routes, load_routes, RouteTable};

/// Command-line interface for the player route table
#[derive(Parser)]
#[command(name = "timeside-router")]
#[command(about = "Inspect and exercise the Timeside player route table", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TIMESIDE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List routes in declaration order
    Routes {
        /// Route file (YAML or JSON); defaults to TIMESIDE_ROUTES_FILE, then the built-in table
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Include disabled routes
        #[arg(short, long, default_value_t = false)]
        all: bool,
    },
    /// Show which handler a URL or fragment resolves to
    Match {
        /// URL, `#fragment` or bare fragment
        url: String,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Validate a route table
    Check {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Navigate through a sequence of URLs with the player controller
    Navigate {
        /// URLs or fragments, visited in order
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,

        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Redirect limit per navigation; defaults to TIMESIDE_MAX_REDIRECTS
        #[arg(long)]
        max_redirects: Option<usize>,
    },
}

fn resolve_table(file: Option<&PathBuf>, config: &RuntimeConfig) -> anyhow::Result<RouteTable> {
    match file.or(config.routes_file.as_ref()) {
        Some(path) => load_routes(path),
        None => Ok(app_routes().clone()),
    }
}

/// Execute a parsed command
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RuntimeConfig::from_env();

    match cli.command {
        Commands::Routes { file, all } => {
            let table = resolve_table(file.as_ref(), &config)?;
            let stdout = std::io::stdout();
            table
                .dump_routes(all, &mut stdout.lock())
                .context("failed to write route listing")
        }
        Commands::Match { url, file } => {
            let table = resolve_table(file.as_ref(), &config)?;
            let router = Router::new(&table)?;
            let m = router
                .route(&url)
                .ok_or_else(|| anyhow!("no route matches '{}'", url))?;
            let out = json!({
                "fragment": m.fragment,
                "pattern": m.route.pattern,
                "handler": m.handler_name,
                "path_params": m.path_params_map(),
                "query_params": m.query_params_map(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Check { file } => {
            let table = resolve_table(file.as_ref(), &config)?;
            let router = Router::new(&table)?;
            println!(
                "ok: {} routes, {} active, {} handlers",
                table.len(),
                router.len(),
                table.handler_names().len()
            );
            Ok(())
        }
        Commands::Navigate {
            urls,
            file,
            max_redirects,
        } => {
            let table = resolve_table(file.as_ref(), &config)?;
            let router = Router::new(&table)?;
            let mut dispatcher = Dispatcher::new();
            dispatcher.add_middleware(Arc::new(TracingMiddleware));
            register_all(&mut dispatcher, Arc::new(AppController::new()));

            let mut history_config = HistoryConfig::from(&config);
            if let Some(limit) = max_redirects {
                history_config.max_redirects = limit;
            }
            let mut history = History::new(router, dispatcher, &table, history_config)
                .context("route table does not fit the player controller")?;

            for url in &urls {
                let nav = history.navigate(url, NavigateOptions::trigger())?;
                println!("{}", serde_json::to_string(&nav)?);
            }
            Ok(())
        }
    }
}
