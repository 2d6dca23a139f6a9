//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use linkpath_core::{
    ConstraintSet, FlexibleResult, LinkRef, LinkpathError, Metadata, NodeId, Path, PathCost,
    PathFilter, TopologySummary,
    primitives::{MAX_FILTER_LINKS, MAX_NODE_ID_LENGTH},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Topology status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub generation: u64,
    pub node_count: usize,
    pub device_count: usize,
    pub interface_count: usize,
    pub endpoint_count: usize,
    pub edge_count: usize,
    pub link_count: usize,
    pub observed_metrics: Vec<String>,
}

impl StatusResponse {
    #[must_use]
    pub fn new(generation: u64, summary: TopologySummary) -> Self {
        Self {
            generation,
            node_count: summary.node_count,
            device_count: summary.device_count,
            interface_count: summary.interface_count,
            endpoint_count: summary.endpoint_count,
            edge_count: summary.edge_count,
            link_count: summary.link_count,
            observed_metrics: summary.observed_metrics,
        }
    }
}

// =============================================================================
// TOPOLOGY UPDATE RESPONSE
// =============================================================================

/// Result of a `PUT /topology`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyUpdateResponse {
    /// `false` when the snapshot was empty and the current graph was kept.
    pub applied: bool,
    pub generation: u64,
    pub node_count: usize,
    pub edge_count: usize,
}

// =============================================================================
// PATH REQUESTS
// =============================================================================

/// Fields shared by every path request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsJson {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub desired_links: Vec<LinkRef>,
    #[serde(default)]
    pub undesired_links: Vec<LinkRef>,
    /// Drop device nodes from the returned hops.
    #[serde(default)]
    pub hide_device_hops: bool,
}

impl EndpointsJson {
    /// Validate and convert the endpoints.
    pub fn node_ids(&self) -> Result<(NodeId, NodeId), LinkpathError> {
        Ok((
            validate_node_id("source", &self.source)?,
            validate_node_id("destination", &self.destination)?,
        ))
    }

    /// Validate and build the link filter.
    pub fn filter(&self) -> Result<PathFilter, LinkpathError> {
        let count = self.desired_links.len() + self.undesired_links.len();
        if count > MAX_FILTER_LINKS {
            return Err(LinkpathError::InvalidQuery(format!(
                "{} filter links exceed maximum {}",
                count, MAX_FILTER_LINKS
            )));
        }
        Ok(PathFilter::new(
            self.desired_links.clone(),
            self.undesired_links.clone(),
        ))
    }
}

fn validate_node_id(field: &str, raw: &str) -> Result<NodeId, LinkpathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkpathError::InvalidQuery(format!("{} must not be empty", field)));
    }
    if trimmed.len() > MAX_NODE_ID_LENGTH {
        return Err(LinkpathError::InvalidQuery(format!(
            "{} length {} exceeds maximum {} bytes",
            field,
            trimmed.len(),
            MAX_NODE_ID_LENGTH
        )));
    }
    Ok(NodeId::new(trimmed))
}

/// `POST /v2`: unconstrained shortest paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    #[serde(flatten)]
    pub endpoints: EndpointsJson,
    /// Metric to rank by instead of hop count.
    #[serde(default)]
    pub parameter: Option<String>,
}

impl ShortestPathRequest {
    #[must_use]
    pub fn cost(&self) -> PathCost {
        PathCost::from_key(self.parameter.as_deref())
    }
}

/// `POST /v3`: constrained or flexible paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstrainedPathRequest {
    #[serde(flatten)]
    pub endpoints: EndpointsJson,
    #[serde(default, alias = "constraints")]
    pub metrics: ConstraintSet,
    #[serde(default)]
    pub flexible: bool,
    #[serde(default)]
    pub cost_key: Option<String>,
}

impl ConstrainedPathRequest {
    #[must_use]
    pub fn cost(&self) -> PathCost {
        PathCost::from_key(self.cost_key.as_deref())
    }
}

// =============================================================================
// PATH RESPONSES
// =============================================================================

/// One path in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathJson {
    pub hops: Vec<String>,
}

impl From<Path> for PathJson {
    fn from(path: Path) -> Self {
        Self {
            hops: path.0.into_iter().map(|node| node.0).collect(),
        }
    }
}

/// Response of `POST /v2` and non-flexible `POST /v3`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsResponse {
    pub paths: Vec<PathJson>,
}

impl PathsResponse {
    #[must_use]
    pub fn new(paths: Vec<Path>) -> Self {
        Self {
            paths: paths.into_iter().map(PathJson::from).collect(),
        }
    }
}

/// One relaxation outcome in a flexible response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlexibleResultJson {
    pub paths: Vec<PathJson>,
    /// The constraints that were enforced.
    pub metrics: ConstraintSet,
    pub relaxed: Vec<String>,
}

/// Response of flexible `POST /v3`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlexiblePathsResponse {
    pub results: Vec<FlexibleResultJson>,
}

impl FlexiblePathsResponse {
    #[must_use]
    pub fn new(results: Vec<FlexibleResult>) -> Self {
        Self {
            results: results
                .into_iter()
                .map(|result| FlexibleResultJson {
                    paths: result.paths.into_iter().map(PathJson::from).collect(),
                    metrics: result.constraints,
                    relaxed: result.relaxed,
                })
                .collect(),
        }
    }
}

// =============================================================================
// LINK METADATA
// =============================================================================

/// `POST /links/metadata` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkMetadataRequest {
    pub endpoint_a: String,
    pub endpoint_b: String,
}

impl LinkMetadataRequest {
    pub fn node_ids(&self) -> Result<(NodeId, NodeId), LinkpathError> {
        Ok((
            validate_node_id("endpoint_a", &self.endpoint_a)?,
            validate_node_id("endpoint_b", &self.endpoint_b)?,
        ))
    }
}

/// `POST /links/metadata` response. `found` is false when no link joins the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkMetadataResponse {
    pub found: bool,
    pub metadata: Metadata,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
