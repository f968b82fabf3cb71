use std::path::Path;

use anyhow::Context;
use tracing::info;

use super::build::RouteTable;
use super::types::{RouteFile, RouteMeta};

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse a route file body. YAML when `yaml` is set, JSON otherwise.
pub fn parse_routes(content: &str, yaml: bool) -> anyhow::Result<RouteTable> {
    let file: RouteFile = if yaml {
        serde_yaml::from_str(content).context("invalid YAML route file")?
    } else {
        serde_json::from_str(content).context("invalid JSON route file")?
    };
    let routes: Vec<RouteMeta> = file.routes.into_iter().map(RouteMeta::from).collect();
    Ok(RouteTable::new(routes)?)
}

/// Load a route table from a `.yaml`/`.yml` or JSON file.
pub fn load_routes(file_path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    let table = parse_routes(&content, is_yaml(path))
        .with_context(|| format!("failed to load route file {}", path.display()))?;
    info!(
        path = %path.display(),
        routes_count = table.len(),
        "Route file loaded"
    );
    Ok(table)
}
