//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState, FlexiblePathsResponse, PathsResponse, StatusResponse};
use crate::config::Config;
use linkpath_core::{
    ConstraintSet, LinkRef, LinkpathError, MetricValue, NodeId, Path, PathCost, PathFilter,
    TopologyGraph, TopologySnapshot, TopologyStore,
};
use std::path::PathBuf;
use std::time::Instant;

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Maximum topology file size (100 MB).
const MAX_TOPOLOGY_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &std::path::Path, max_size: u64) -> Result<(), LinkpathError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| LinkpathError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(LinkpathError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `path` to an existing regular file.
fn validate_file_path(path: &std::path::Path) -> Result<PathBuf, LinkpathError> {
    let canonical = path.canonicalize().map_err(|e| {
        LinkpathError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LinkpathError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a topology snapshot from a JSON file.
pub fn load_topology(path: &std::path::Path) -> Result<TopologySnapshot, LinkpathError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_TOPOLOGY_FILE_SIZE)?;

    let contents = std::fs::read(&validated)
        .map_err(|e| LinkpathError::Io(format!("Failed to read topology: {}", e)))?;

    serde_json::from_slice(&contents).map_err(|e| {
        LinkpathError::Serialization(format!(
            "Invalid topology JSON in '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Parse repeated `key=value` arguments into a constraint set.
///
/// Values go through [`MetricValue::parse`], so `100` is a number and `A`
/// is text. A repeated key keeps its last value.
pub fn parse_metric_args(args: &[String]) -> Result<ConstraintSet, LinkpathError> {
    let mut constraints = ConstraintSet::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            LinkpathError::InvalidQuery(format!("Expected KEY=VALUE, got '{}'", arg))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(LinkpathError::InvalidQuery(format!(
                "Empty metric name in '{}'",
                arg
            )));
        }
        constraints.insert(key.to_string(), MetricValue::parse(value));
    }
    Ok(constraints)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    topology: Option<&std::path::Path>,
) -> Result<(), LinkpathError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = TopologyStore::new();
    if let Some(path) = topology {
        let snapshot = load_topology(path)?;
        store.replace_topology(&snapshot);
        tracing::info!(
            path = %path.display(),
            nodes = store.snapshot().node_count(),
            "Preloaded topology"
        );
    }

    println!("linkpath Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Max paths:  {}", config.search.max_paths);
    println!("  Max hops:   {}", config.search.max_hops);
    println!();
    println!("Endpoints:");
    println!("  PUT  /topology       - Replace the topology");
    println!("  POST /v2             - Shortest paths");
    println!("  POST /v3             - Constrained / flexible paths");
    println!("  POST /links/metadata - Link metadata");
    println!("  GET  /status         - Topology summary");
    println!("  GET  /health         - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(AppState::with_store(config, store)).await
}

// =============================================================================
// PATHS COMMAND
// =============================================================================

/// A path query assembled from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct PathQuery {
    pub source: String,
    pub destination: String,
    pub metrics: ConstraintSet,
    pub flexible: bool,
    pub cost_key: Option<String>,
    pub desired_links: Vec<String>,
    pub undesired_links: Vec<String>,
    pub hide_device_hops: bool,
}

impl PathQuery {
    fn filter(&self) -> PathFilter {
        let filter = self
            .desired_links
            .iter()
            .fold(PathFilter::default(), |f, id| f.desire(LinkRef::Id(id.clone())));
        self.undesired_links
            .iter()
            .fold(filter, |f, id| f.avoid(LinkRef::Id(id.clone())))
    }
}

/// Run a path query against a topology file and print the result.
pub fn cmd_paths(
    config: &Config,
    topology: &std::path::Path,
    query: &PathQuery,
    json_mode: bool,
) -> Result<(), LinkpathError> {
    let graph = TopologyGraph::from_snapshot(&load_topology(topology)?);
    let engine = config.engine();
    let source = NodeId::new(query.source.trim());
    let destination = NodeId::new(query.destination.trim());
    let cost = PathCost::from_key(query.cost_key.as_deref());
    let filter = query.filter();
    let deadline = config
        .search_timeout()
        .and_then(|t| Instant::now().checked_add(t));

    let present = |paths: Vec<Path>| -> Vec<Path> {
        let paths = filter.apply(&graph, paths);
        if query.hide_device_hops {
            paths.iter().map(|p| graph.strip_device_hops(p)).collect()
        } else {
            paths
        }
    };

    if query.flexible {
        let mut results = engine.flexible_paths(
            &graph,
            &source,
            &destination,
            &query.metrics,
            &cost,
            deadline,
        )?;
        for result in &mut results {
            result.paths = present(std::mem::take(&mut result.paths));
        }
        results.retain(|result| !result.paths.is_empty());

        if json_mode {
            let output = FlexiblePathsResponse::new(results);
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
            return Ok(());
        }

        if results.is_empty() {
            println!("No path from {} to {}", source, destination);
        }
        for result in &results {
            let kept: Vec<String> = result.constraints.keys().cloned().collect();
            println!(
                "Enforced [{}], relaxed [{}]:",
                kept.join(", "),
                result.relaxed.join(", ")
            );
            print_paths(&result.paths);
        }
        return Ok(());
    }

    let paths = present(engine.constrained_paths_until(
        &graph,
        &source,
        &destination,
        &query.metrics,
        &cost,
        deadline,
    )?);

    if json_mode {
        let output = PathsResponse::new(paths);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if paths.is_empty() {
        println!("No path from {} to {}", source, destination);
    } else {
        println!("Paths {} -> {}:", source, destination);
        print_paths(&paths);
    }
    Ok(())
}

fn print_paths(paths: &[Path]) {
    for (rank, path) in paths.iter().enumerate() {
        let hops: Vec<&str> = path.nodes().iter().map(NodeId::as_str).collect();
        println!("  {:>3}. {}", rank + 1, hops.join(" -> "));
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Summarize a topology file.
pub fn cmd_status(topology: &std::path::Path, json_mode: bool) -> Result<(), LinkpathError> {
    let graph = TopologyGraph::from_snapshot(&load_topology(topology)?);
    let summary = graph.summary();

    if json_mode {
        let output = StatusResponse::new(0, summary);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("linkpath Topology Status");
    println!("========================");
    println!("File: {:?}", topology);
    println!();
    println!("Nodes:      {}", summary.node_count);
    println!("  Devices:    {}", summary.device_count);
    println!("  Interfaces: {}", summary.interface_count);
    println!("  Endpoints:  {}", summary.endpoint_count);
    println!("Edges:      {}", summary.edge_count);
    println!("  Links:      {}", summary.link_count);
    println!("Metrics:    {}", summary.observed_metrics.join(", "));

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
