//! # Path Filtering
//!
//! Post-filter over search results: keep the paths that walk over every
//! desired link and over none of the undesired ones.

use crate::graph::TopologyGraph;
use crate::{NodeId, Path};
use serde::{Deserialize, Serialize};

/// Reference to a link, either by identifier or by its two endpoints.
///
/// Serialized untagged: `"S1:1<->S2:1"` or `["S1:1", "S2:1"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkRef {
    Id(String),
    Endpoints(NodeId, NodeId),
}

impl LinkRef {
    /// The endpoints this reference points at, if it can be resolved.
    #[must_use]
    pub fn resolve(&self, graph: &TopologyGraph) -> Option<(NodeId, NodeId)> {
        match self {
            Self::Id(id) => graph
                .link_endpoints(id)
                .map(|(a, b)| (a.clone(), b.clone())),
            Self::Endpoints(a, b) => Some((a.clone(), b.clone())),
        }
    }
}

/// Desired and undesired links for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilter {
    #[serde(default)]
    pub desired: Vec<LinkRef>,
    #[serde(default)]
    pub undesired: Vec<LinkRef>,
}

impl PathFilter {
    #[must_use]
    pub fn new(desired: Vec<LinkRef>, undesired: Vec<LinkRef>) -> Self {
        Self { desired, undesired }
    }

    #[must_use]
    pub fn desire(mut self, link: LinkRef) -> Self {
        self.desired.push(link);
        self
    }

    #[must_use]
    pub fn avoid(mut self, link: LinkRef) -> Self {
        self.undesired.push(link);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.desired.is_empty() && self.undesired.is_empty()
    }

    /// Keep the paths that satisfy the filter, preserving their order.
    ///
    /// A desired link id that names no link empties the result. An undesired
    /// one is ignored.
    #[must_use]
    pub fn apply(&self, graph: &TopologyGraph, paths: Vec<Path>) -> Vec<Path> {
        if self.is_empty() {
            return paths;
        }

        let mut desired = Vec::with_capacity(self.desired.len());
        for link in &self.desired {
            match link.resolve(graph) {
                Some(endpoints) => desired.push(endpoints),
                None => {
                    tracing::debug!(?link, "Desired link is not in the topology");
                    return Vec::new();
                }
            }
        }

        let undesired: Vec<(NodeId, NodeId)> = self
            .undesired
            .iter()
            .filter_map(|link| link.resolve(graph))
            .collect();

        paths
            .into_iter()
            .filter(|path| {
                desired.iter().all(|(a, b)| path.traverses(a, b))
                    && !undesired.iter().any(|(a, b)| path.traverses(a, b))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{LinkDescriptor, TopologySnapshot};

    fn square() -> TopologyGraph {
        TopologyGraph::from_snapshot(&TopologySnapshot::new(
            vec![],
            vec![
                LinkDescriptor::new("a", "b").with_id("ab"),
                LinkDescriptor::new("b", "d").with_id("bd"),
                LinkDescriptor::new("a", "c").with_id("ac"),
                LinkDescriptor::new("c", "d").with_id("cd"),
            ],
        ))
    }

    fn path(nodes: &[&str]) -> Path {
        nodes.iter().copied().collect()
    }

    fn both_routes() -> Vec<Path> {
        vec![
            path(&["a", "b", "d"]),
            path(&["a", "c", "d"]),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let graph = square();
        assert_eq!(PathFilter::default().apply(&graph, both_routes()), both_routes());
    }

    #[test]
    fn desired_link_by_id() {
        let graph = square();
        let filter = PathFilter::default().desire(LinkRef::Id("cd".to_string()));
        let kept = filter.apply(&graph, both_routes());
        assert_eq!(kept, vec![path(&["a", "c", "d"])]);
    }

    #[test]
    fn undesired_link_by_endpoints_either_direction() {
        let graph = square();
        let filter =
            PathFilter::default().avoid(LinkRef::Endpoints(NodeId::from("b"), NodeId::from("a")));
        let kept = filter.apply(&graph, both_routes());
        assert_eq!(kept, vec![path(&["a", "c", "d"])]);
    }

    #[test]
    fn unknown_desired_link_empties_result() {
        let graph = square();
        let filter = PathFilter::default().desire(LinkRef::Id("nope".to_string()));
        assert!(filter.apply(&graph, both_routes()).is_empty());
    }

    #[test]
    fn unknown_undesired_link_is_ignored() {
        let graph = square();
        let filter = PathFilter::default().avoid(LinkRef::Id("nope".to_string()));
        assert_eq!(filter.apply(&graph, both_routes()), both_routes());
    }

    #[test]
    fn desired_links_must_all_be_present() {
        let graph = square();
        let filter = PathFilter::new(
            vec![LinkRef::Id("ab".to_string()), LinkRef::Id("cd".to_string())],
            vec![],
        );
        assert!(filter.apply(&graph, both_routes()).is_empty());
    }

    #[test]
    fn link_ref_json_forms() {
        let by_id: LinkRef = serde_json::from_str("\"ab\"").expect("id");
        let by_pair: LinkRef = serde_json::from_str("[\"a\", \"b\"]").expect("pair");
        assert_eq!(by_id, LinkRef::Id("ab".to_string()));
        assert_eq!(
            by_pair,
            LinkRef::Endpoints(NodeId::from("a"), NodeId::from("b"))
        );
    }
}
