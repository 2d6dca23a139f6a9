//! # linkpath - constrained path finding service
//!
//! The main binary for the linkpath path engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for one-off queries against topology files
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/linkpath (THE BINARY)            │
//! │                                                      │
//! │   ┌─────────────┐          ┌─────────────┐           │
//! │   │    CLI      │          │  HTTP API   │           │
//! │   │   (clap)    │          │   (axum)    │           │
//! │   └──────┬──────┘          └──────┬──────┘           │
//! │          └───────────┬────────────┘                  │
//! │                      ▼                               │
//! │              ┌───────────────┐                       │
//! │              │ linkpath-core │                       │
//! │              │ (THE ENGINE)  │                       │
//! │              └───────────────┘                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server with a preloaded topology
//! linkpath server --port 8080 --topology topology.json
//!
//! # One-off queries
//! linkpath status -t topology.json
//! linkpath paths -t topology.json -s User1 -d User4 -m bandwidth=100 --flexible
//! ```

use clap::Parser;
use linkpath::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // LINKPATH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LINKPATH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "linkpath=info,linkpath_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  linkpath v{}
  constrained paths over switch/host topologies
"#,
        env!("CARGO_PKG_VERSION")
    );
}
