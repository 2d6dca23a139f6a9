//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the path engine:
//! - Node identity (`NodeId`, `NodeKind`)
//! - Edge attributes (`MetricValue`, `Metadata`, `EdgeAttributes`, `MetricLookup`)
//! - Query inputs and outputs (`ConstraintSet`, `Path`)
//! - Error types (`LinkpathError`)
//!
//! ## Determinism Guarantees
//!
//! Every map in this module is a `BTreeMap`, so serialized metadata and
//! constraint sets always come out in the same key order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// NODE IDENTIFIERS
// =============================================================================

/// Opaque identifier of a node (device or interface) in the topology.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a node stands for in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A switch, host or any other device declared in the snapshot.
    Device,
    /// A port owned by a device.
    Interface,
    /// A link endpoint that was never declared as a device or interface.
    Endpoint,
}

// =============================================================================
// METRICS
// =============================================================================

/// Value of a single link metric.
///
/// Numbers cover threshold metrics (bandwidth, delay, ...); text covers
/// identity-style metrics such as ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// The numeric value, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// The text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    /// Parse a command-line style value: numbers win, anything else is text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for MetricValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Metric name -> value mapping carried by a link.
pub type Metadata = BTreeMap<String, MetricValue>;

/// Metric name -> required target, supplied per query.
///
/// Keys without a registered rule are ignored by the engine.
pub type ConstraintSet = BTreeMap<String, MetricValue>;

// =============================================================================
// EDGES
// =============================================================================

/// Origin of an edge in the topology graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Joins an interface to the device that owns it. Carries no metrics.
    Attachment,
    /// A network link reported by the topology.
    Link,
}

/// Result of looking a metric up on an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricLookup<'a> {
    /// The edge reported a value for the metric.
    Present(&'a MetricValue),
    /// The edge is a link that never reported the metric.
    Absent,
    /// The edge is structural; link metrics do not apply to it.
    NotApplicable,
}

/// Attributes stored on every edge of the topology graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub kind: EdgeKind,
    /// Identifier of the link that produced this edge, if the snapshot had one.
    pub link_id: Option<String>,
    pub metrics: Metadata,
}

impl EdgeAttributes {
    /// Attributes of an interface-to-device attachment.
    #[must_use]
    pub fn attachment() -> Self {
        Self {
            kind: EdgeKind::Attachment,
            link_id: None,
            metrics: Metadata::new(),
        }
    }

    /// Attributes of a network link.
    #[must_use]
    pub fn link(link_id: Option<String>, metrics: Metadata) -> Self {
        Self {
            kind: EdgeKind::Link,
            link_id,
            metrics,
        }
    }

    /// Look up a metric without applying any defaulting policy.
    #[must_use]
    pub fn lookup(&self, metric: &str) -> MetricLookup<'_> {
        match self.kind {
            EdgeKind::Attachment => MetricLookup::NotApplicable,
            EdgeKind::Link => self
                .metrics
                .get(metric)
                .map_or(MetricLookup::Absent, MetricLookup::Present),
        }
    }
}

// =============================================================================
// PATH
// =============================================================================

/// A simple path: node identifiers from source to destination, no repeats.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Path(pub Vec<NodeId>);

impl Path {
    #[must_use]
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }

    /// The nodes of the path, in order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Number of edges traversed.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn source(&self) -> Option<&NodeId> {
        self.0.first()
    }

    #[must_use]
    pub fn destination(&self) -> Option<&NodeId> {
        self.0.last()
    }

    /// Consecutive node pairs, i.e. the edges the path walks over.
    pub fn hops(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> + '_ {
        self.0.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Whether the path walks over the edge `a`-`b` in either direction.
    #[must_use]
    pub fn traverses(&self, a: &NodeId, b: &NodeId) -> bool {
        self.hops()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// The same path walked from destination to source.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }

    /// Whether no node appears twice.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::BTreeSet::new();
        self.0.iter().all(|n| seen.insert(n))
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| NodeId(s.into())).collect())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in linkpath.
///
/// An infeasible query is NOT an error: it is an empty result set.
#[derive(Debug, Error)]
pub enum LinkpathError {
    /// A search ran past its wall-clock deadline.
    ///
    /// `explored` counts constraint subsets for a relaxation search and
    /// expanded partial paths for a single constrained search.
    #[error("Search deadline exceeded after exploring {explored} candidates")]
    DeadlineExceeded { explored: usize },

    /// The query cannot be executed as stated.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A configuration value could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_value_parse_prefers_numbers() {
        assert_eq!(MetricValue::parse("100"), MetricValue::Number(100.0));
        assert_eq!(MetricValue::parse(" 0.05 "), MetricValue::Number(0.05));
        assert_eq!(MetricValue::parse("A"), MetricValue::Text("A".to_string()));
        assert_eq!(MetricValue::parse("NaN"), MetricValue::Text("NaN".to_string()));
    }

    #[test]
    fn metric_value_untagged_json() {
        let n: MetricValue = serde_json::from_str("42").expect("number");
        let t: MetricValue = serde_json::from_str("\"B\"").expect("text");
        assert_eq!(n, MetricValue::Number(42.0));
        assert_eq!(t, MetricValue::Text("B".to_string()));
    }

    #[test]
    fn attachment_lookup_is_not_applicable() {
        let edge = EdgeAttributes::attachment();
        assert_eq!(edge.lookup("bandwidth"), MetricLookup::NotApplicable);
    }

    #[test]
    fn link_lookup_distinguishes_absent() {
        let mut metrics = Metadata::new();
        metrics.insert("delay".to_string(), MetricValue::from(10));
        let edge = EdgeAttributes::link(None, metrics);

        assert_eq!(
            edge.lookup("delay"),
            MetricLookup::Present(&MetricValue::Number(10.0))
        );
        assert_eq!(edge.lookup("bandwidth"), MetricLookup::Absent);
    }

    #[test]
    fn path_hops_and_traversal() {
        let path: Path = ["a", "b", "c"].into_iter().collect();

        assert_eq!(path.hop_count(), 2);
        assert_eq!(path.hops().count(), 2);
        assert!(path.traverses(&NodeId::from("c"), &NodeId::from("b")));
        assert!(!path.traverses(&NodeId::from("a"), &NodeId::from("c")));
        assert_eq!(path.reversed().source(), Some(&NodeId::from("c")));
    }

    #[test]
    fn single_node_path_has_no_hops() {
        let path: Path = ["a"].into_iter().collect();
        assert_eq!(path.hop_count(), 0);
        assert!(path.is_simple());
    }

    #[test]
    fn repeated_node_is_not_simple() {
        let path: Path = ["a", "b", "a"].into_iter().collect();
        assert!(!path.is_simple());
    }
}
