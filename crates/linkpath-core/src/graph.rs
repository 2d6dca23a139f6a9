//! # Topology Graph
//!
//! The attributed, undirected graph a path query runs against.
//!
//! A `TopologyGraph` is built in one go from a [`TopologySnapshot`] and is
//! read-only afterwards. Node identifiers are indexed through `BTreeMap`s so
//! every listing comes out in deterministic order.

use crate::topology::{DeviceDescriptor, LinkDescriptor, TopologySnapshot};
use crate::{EdgeAttributes, EdgeKind, Metadata, NodeId, NodeKind, Path};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// SUMMARY
// =============================================================================

/// Counts describing a topology graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub node_count: usize,
    pub device_count: usize,
    pub interface_count: usize,
    pub endpoint_count: usize,
    pub edge_count: usize,
    pub link_count: usize,
    pub observed_metrics: Vec<String>,
}

// =============================================================================
// GRAPH
// =============================================================================

/// The attributed topology graph.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    graph: UnGraph<NodeId, EdgeAttributes>,

    /// NodeId -> petgraph index
    index: BTreeMap<NodeId, NodeIndex>,

    /// NodeId -> what the node stands for
    kinds: BTreeMap<NodeId, NodeKind>,

    /// Link identifier -> endpoints, for link-level path filtering
    links: BTreeMap<String, (NodeId, NodeId)>,

    /// Every metric name reported by at least one link
    observed_metrics: BTreeSet<String>,
}

impl TopologyGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a topology snapshot.
    ///
    /// Malformed devices, interfaces and links are skipped; inactive links
    /// are ignored. Link endpoints that were never declared become
    /// [`NodeKind::Endpoint`] nodes.
    #[must_use]
    pub fn from_snapshot(snapshot: &TopologySnapshot) -> Self {
        let mut graph = Self::new();

        for device in &snapshot.devices {
            graph.add_device(device);
        }

        for link in &snapshot.links {
            graph.add_link(link);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            metrics = graph.observed_metrics.len(),
            "Topology graph built"
        );

        graph
    }

    fn add_device(&mut self, device: &DeviceDescriptor) {
        let Some(device_id) = non_empty(device.id.as_deref()) else {
            tracing::warn!(
                event = "topology_skip",
                reason = "device_without_id",
                "Skipping device without identifier"
            );
            return;
        };

        let device_id = NodeId::new(device_id);
        let device_idx = self.insert_node(device_id.clone(), NodeKind::Device);

        for interface in &device.interfaces {
            let Some(interface_id) = non_empty(interface.id.as_deref()) else {
                tracing::warn!(
                    event = "topology_skip",
                    reason = "interface_without_id",
                    device = %device_id,
                    "Skipping interface without identifier"
                );
                continue;
            };

            if interface_id == device_id.as_str() {
                continue;
            }

            let interface_idx = self.insert_node(NodeId::new(interface_id), NodeKind::Interface);
            self.upsert_edge(device_idx, interface_idx, EdgeAttributes::attachment());
        }
    }

    fn add_link(&mut self, link: &LinkDescriptor) {
        let endpoints = (
            non_empty(link.endpoint_a.as_deref()),
            non_empty(link.endpoint_b.as_deref()),
        );
        let (Some(a), Some(b)) = endpoints else {
            tracing::warn!(
                event = "topology_skip",
                reason = "link_missing_endpoint",
                link = link.id.as_deref().unwrap_or("<unnamed>"),
                "Skipping link with a missing endpoint"
            );
            return;
        };

        if !link.active {
            tracing::debug!(link = link.id.as_deref().unwrap_or("<unnamed>"), "Skipping inactive link");
            return;
        }

        if a == b {
            tracing::warn!(
                event = "topology_skip",
                reason = "self_loop",
                endpoint = a,
                "Skipping link that loops back to its own endpoint"
            );
            return;
        }

        let a = NodeId::new(a);
        let b = NodeId::new(b);
        let a_idx = self.insert_node(a.clone(), NodeKind::Endpoint);
        let b_idx = self.insert_node(b.clone(), NodeKind::Endpoint);

        self.observed_metrics
            .extend(link.metadata.keys().cloned());

        let link_id = non_empty(link.id.as_deref()).map(str::to_string);
        if let Some(id) = &link_id {
            self.links.insert(id.clone(), (a, b));
        }

        self.upsert_edge(a_idx, b_idx, EdgeAttributes::link(link_id, link.metadata.clone()));
    }

    /// Insert a node, returning the existing index if the id is known.
    ///
    /// A declared kind replaces an implicit `Endpoint` kind, never the reverse.
    fn insert_node(&mut self, id: NodeId, kind: NodeKind) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            if kind != NodeKind::Endpoint {
                self.kinds.insert(id, kind);
            }
            return idx;
        }

        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        self.kinds.insert(id, kind);
        idx
    }

    /// Insert an edge, or merge into the existing edge between the pair.
    ///
    /// Metrics of a later link overwrite same-named metrics of an earlier one.
    fn upsert_edge(&mut self, a: NodeIndex, b: NodeIndex, attrs: EdgeAttributes) {
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let existing = &mut self.graph[edge];
                if attrs.kind == EdgeKind::Link {
                    existing.kind = EdgeKind::Link;
                }
                if attrs.link_id.is_some() {
                    existing.link_id = attrs.link_id;
                }
                existing.metrics.extend(attrs.metrics);
            }
            None => {
                self.graph.add_edge(a, b, attrs);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total number of edges, attachments included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn node_kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.kinds.get(id).copied()
    }

    /// All node identifiers in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.index.keys()
    }

    /// All edges as `(low, high, attributes)` with endpoints ordered, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(&NodeId, &NodeId, &EdgeAttributes)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|edge| {
                let (a, b) = self.graph.edge_endpoints(edge)?;
                let (a, b) = (&self.graph[a], &self.graph[b]);
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                Some((low, high, &self.graph[edge]))
            })
            .collect();
        edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        edges
    }

    /// Attributes of the edge between `a` and `b`, in either order.
    #[must_use]
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&EdgeAttributes> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        let edge = self.graph.find_edge(a, b)?;
        Some(&self.graph[edge])
    }

    /// Metrics of the link between `a` and `b`, in either order.
    #[must_use]
    pub fn link_metadata(&self, a: &NodeId, b: &NodeId) -> Option<&Metadata> {
        self.edge_between(a, b)
            .filter(|attrs| attrs.kind == EdgeKind::Link)
            .map(|attrs| &attrs.metrics)
    }

    /// Endpoints of the link with the given identifier.
    #[must_use]
    pub fn link_endpoints(&self, link_id: &str) -> Option<(&NodeId, &NodeId)> {
        self.links.get(link_id).map(|(a, b)| (a, b))
    }

    /// Metric names reported by at least one link.
    #[must_use]
    pub fn observed_metrics(&self) -> &BTreeSet<String> {
        &self.observed_metrics
    }

    /// Drop device nodes from a path, keeping interface-level hops.
    #[must_use]
    pub fn strip_device_hops(&self, path: &Path) -> Path {
        Path::new(
            path.nodes()
                .iter()
                .filter(|node| self.node_kind(node) != Some(NodeKind::Device))
                .cloned()
                .collect(),
        )
    }

    /// Summary counts for status reporting.
    #[must_use]
    pub fn summary(&self) -> TopologySummary {
        let count_kind = |kind: NodeKind| self.kinds.values().filter(|k| **k == kind).count();

        TopologySummary {
            node_count: self.node_count(),
            device_count: count_kind(NodeKind::Device),
            interface_count: count_kind(NodeKind::Interface),
            endpoint_count: count_kind(NodeKind::Endpoint),
            edge_count: self.edge_count(),
            link_count: self
                .graph
                .edge_weights()
                .filter(|attrs| attrs.kind == EdgeKind::Link)
                .count(),
            observed_metrics: self.observed_metrics.iter().cloned().collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Crate-internal views for the search
    // -------------------------------------------------------------------------

    /// Iterate raw edges as `(a, b, attributes)` in petgraph order.
    pub(crate) fn raw_edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &EdgeAttributes)> {
        self.graph.edge_indices().filter_map(|edge| {
            let (a, b) = self.graph.edge_endpoints(edge)?;
            Some((&self.graph[a], &self.graph[b], &self.graph[edge]))
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
