//! # linkpath CLI Module
//!
//! This module implements the CLI interface for linkpath.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `paths` - Run a path query against a topology file
//! - `status` - Summarize a topology file

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use linkpath_core::LinkpathError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// linkpath - constrained network path finding
///
/// Finds paths between endpoints of a switch/host topology, keeping only
/// the links whose metrics satisfy the requested constraints.
#[derive(Parser, Debug)]
#[command(name = "linkpath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a linkpath.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the configuration)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the configuration)
        #[arg(short, long)]
        port: Option<u16>,

        /// Topology JSON file to load before serving
        #[arg(short, long)]
        topology: Option<PathBuf>,
    },

    /// Find paths in a topology file
    Paths {
        /// Topology JSON file
        #[arg(short, long)]
        topology: PathBuf,

        /// Source endpoint
        #[arg(short, long)]
        source: String,

        /// Destination endpoint
        #[arg(short, long)]
        destination: String,

        /// Constraint as key=value (repeatable), e.g. -m bandwidth=100
        #[arg(short, long = "metric", value_name = "KEY=VALUE")]
        metrics: Vec<String>,

        /// Relax constraints until some path exists
        #[arg(long)]
        flexible: bool,

        /// Rank by this metric instead of hop count
        #[arg(long)]
        cost_key: Option<String>,

        /// Link id every returned path must use (repeatable)
        #[arg(long = "via", value_name = "LINK_ID")]
        desired_links: Vec<String>,

        /// Link id no returned path may use (repeatable)
        #[arg(long = "avoid", value_name = "LINK_ID")]
        undesired_links: Vec<String>,

        /// Drop device nodes from the printed hops
        #[arg(long)]
        hide_device_hops: bool,
    },

    /// Summarize a topology file
    Status {
        /// Topology JSON file
        #[arg(short, long)]
        topology: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LinkpathError> {
    let config = Config::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Server {
            host,
            port,
            topology,
        } => cmd_server(config, host, port, topology.as_deref()).await,
        Commands::Paths {
            topology,
            source,
            destination,
            metrics,
            flexible,
            cost_key,
            desired_links,
            undesired_links,
            hide_device_hops,
        } => {
            let query = PathQuery {
                source,
                destination,
                metrics: parse_metric_args(&metrics)?,
                flexible,
                cost_key,
                desired_links,
                undesired_links,
                hide_device_hops,
            };
            cmd_paths(&config, &topology, &query, json_mode)
        }
        Commands::Status { topology } => cmd_status(&topology, json_mode),
    }
}
