//! # linkpath HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Topology summary
//! - `PUT /topology` - Replace the topology (API key protected when configured)
//! - `POST /v2` - Unconstrained shortest paths
//! - `POST /v3` - Constrained or flexible paths
//! - `POST /links/metadata` - Metadata of the link between two endpoints
//!
//! ## Security Configuration
//!
//! - `server.cors_origins`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `server.rate_limit`: Query requests per second (default: 100, 0 to disable)
//! - `server.api_key`: If set, topology writes require Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::keys_match;
pub use handlers::ApiError;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    ConstrainedPathRequest, EndpointsJson, ErrorResponse, FlexiblePathsResponse,
    FlexibleResultJson, HealthResponse, LinkMetadataRequest, LinkMetadataResponse, PathJson,
    PathsResponse, ShortestPathRequest, StatusResponse, TopologyUpdateResponse,
};

use crate::config::Config;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use linkpath_core::{LinkpathError, PathEngine, TopologyStore};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit for every route.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The current topology graph.
    pub store: Arc<TopologyStore>,
    pub engine: Arc<PathEngine>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state with an empty topology and an engine built from `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_store(config, TopologyStore::new())
    }

    #[must_use]
    pub fn with_store(config: Config, store: TopologyStore) -> Self {
        Self {
            store: Arc::new(store),
            engine: Arc::new(config.engine()),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `server.cors_origins`.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: the comma-separated list
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting on query routes, authentication on the topology route
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.server.cors_origins.as_deref());

    let mut queries = Router::new()
        .route("/v2", post(handlers::shortest_paths_handler))
        .route("/v3", post(handlers::constrained_paths_handler))
        .route("/links/metadata", post(handlers::link_metadata_handler));

    match create_rate_limiter(state.config.server.rate_limit) {
        Some(limiter) => {
            tracing::info!(
                "Rate limiting enabled: {} requests/second",
                state.config.server.rate_limit
            );
            queries = queries.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    let mut writes = Router::new().route("/topology", put(handlers::topology_handler));

    if state.config.api_key().is_some() {
        tracing::info!("API key authentication enabled for topology writes");
        writes = writes.layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::api_key_auth_middleware,
        ));
    } else {
        tracing::warn!(
            "API key authentication DISABLED - anyone can replace the topology. \
             Set LINKPATH_API_KEY to enable authentication."
        );
    }

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .merge(queries)
        .merge(writes)
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(state: AppState) -> Result<(), LinkpathError> {
    let addr = state.config.bind_address();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LinkpathError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("linkpath HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| LinkpathError::Io(format!("Server error: {}", e)))
}
