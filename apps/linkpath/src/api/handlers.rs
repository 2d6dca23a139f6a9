//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every search takes one topology snapshot up front and runs on the
//! blocking pool.

use super::{
    AppState,
    types::{
        ConstrainedPathRequest, ErrorResponse, FlexiblePathsResponse, HealthResponse,
        LinkMetadataRequest, LinkMetadataResponse, PathsResponse, ShortestPathRequest,
        StatusResponse, TopologyUpdateResponse,
    },
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use linkpath_core::{LinkpathError, Path, TopologyGraph, TopologySnapshot};
use std::time::{Duration, Instant};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Error returned by a handler, rendered as `{ "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: "Search timed out".to_string(),
        }
    }
}

impl From<LinkpathError> for ApiError {
    fn from(error: LinkpathError) -> Self {
        let status = match &error {
            LinkpathError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            LinkpathError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
            LinkpathError::Config(_)
            | LinkpathError::Serialization(_)
            | LinkpathError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Run a search on the blocking pool.
async fn run_blocking<T, F>(search: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, LinkpathError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(search)
        .await
        .map_err(|e| ApiError::internal(format!("Search task failed: {}", e)))?
        .map_err(ApiError::from)
}

fn present(graph: &TopologyGraph, paths: Vec<Path>, hide_device_hops: bool) -> Vec<Path> {
    if hide_device_hops {
        paths
            .iter()
            .map(|path| graph.strip_device_hops(path))
            .collect()
    } else {
        paths
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get topology status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let graph = state.store.snapshot();
    let response = StatusResponse::new(state.store.generation(), graph.summary());
    (StatusCode::OK, Json(response))
}

// =============================================================================
// TOPOLOGY HANDLER
// =============================================================================

/// Replace the whole topology.
pub async fn topology_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<TopologySnapshot>,
) -> Result<Json<TopologyUpdateResponse>, ApiError> {
    let store = state.store.clone();
    let applied = run_blocking(move || Ok(store.replace_topology(&snapshot))).await?;

    let graph = state.store.snapshot();
    Ok(Json(TopologyUpdateResponse {
        applied,
        generation: state.store.generation(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
    }))
}

// =============================================================================
// PATH HANDLERS
// =============================================================================

/// Unconstrained shortest paths.
pub async fn shortest_paths_handler(
    State(state): State<AppState>,
    Json(request): Json<ShortestPathRequest>,
) -> Result<Json<PathsResponse>, ApiError> {
    let (source, destination) = request.endpoints.node_ids()?;
    let filter = request.endpoints.filter()?;
    let hide = request.endpoints.hide_device_hops;
    let cost = request.cost();

    let graph = state.store.snapshot();
    let engine = state.engine.clone();
    let timeout = state.config.search_timeout();
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

    let paths = within(timeout, run_blocking(move || {
        let paths = engine.shortest_paths_until(&graph, &source, &destination, &cost, deadline)?;
        let paths = filter.apply(&graph, paths);
        Ok(present(&graph, paths, hide))
    }))
    .await?;

    Ok(Json(PathsResponse::new(paths)))
}

/// Constrained paths, or the relaxation search when `flexible` is set.
pub async fn constrained_paths_handler(
    State(state): State<AppState>,
    Json(request): Json<ConstrainedPathRequest>,
) -> Result<Response, ApiError> {
    let (source, destination) = request.endpoints.node_ids()?;
    let filter = request.endpoints.filter()?;
    let hide = request.endpoints.hide_device_hops;
    let cost = request.cost();
    let constraints = request.metrics;

    let graph = state.store.snapshot();
    let engine = state.engine.clone();
    let timeout = state.config.search_timeout();
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

    if !request.flexible {
        let paths = within(timeout, run_blocking(move || {
            let paths = engine.constrained_paths_until(
                &graph,
                &source,
                &destination,
                &constraints,
                &cost,
                deadline,
            )?;
            let paths = filter.apply(&graph, paths);
            Ok(present(&graph, paths, hide))
        }))
        .await?;
        return Ok(Json(PathsResponse::new(paths)).into_response());
    }

    let results = within(timeout, run_blocking(move || {
        let mut results = engine.flexible_paths(
            &graph,
            &source,
            &destination,
            &constraints,
            &cost,
            deadline,
        )?;
        for result in &mut results {
            let paths = filter.apply(&graph, std::mem::take(&mut result.paths));
            result.paths = present(&graph, paths, hide);
        }
        // A subset whose every path was filtered out is not a result
        results.retain(|result| !result.paths.is_empty());
        Ok(results)
    }))
    .await?;

    Ok(Json(FlexiblePathsResponse::new(results)).into_response())
}

/// Await `search`, giving up at twice `timeout` so the engine's own
/// deadline normally reports first.
async fn within<T>(
    timeout: Option<Duration>,
    search: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit.saturating_mul(2), search)
            .await
            .map_err(|_| ApiError::timeout())?,
        None => search.await,
    }
}

// =============================================================================
// LINK METADATA HANDLER
// =============================================================================

/// Metadata of the link between two endpoints.
pub async fn link_metadata_handler(
    State(state): State<AppState>,
    Json(request): Json<LinkMetadataRequest>,
) -> Result<Json<LinkMetadataResponse>, ApiError> {
    let (a, b) = request.node_ids()?;
    let graph = state.store.snapshot();

    let response = match graph.link_metadata(&a, &b) {
        Some(metadata) => LinkMetadataResponse {
            found: true,
            metadata: metadata.clone(),
        },
        None => LinkMetadataResponse {
            found: false,
            metadata: Default::default(),
        },
    };

    Ok(Json(response))
}
