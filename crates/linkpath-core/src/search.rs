//! # Constrained Path Search
//!
//! Enumerates simple paths inside the subgraph induced by the edges that pass
//! every constraint of a query.
//!
//! 1. Each registered constraint becomes a [`Predicate`]; every edge of the
//!    topology is tested against all of them.
//! 2. The passing edges (and the nodes they touch) form the induced subgraph.
//! 3. `source == destination` is answered directly with `[[source]]` when the
//!    node exists in the full topology.
//! 4. Otherwise simple paths are produced lazily, best first, by cost, then
//!    hop count, then node identifiers.
//!
//! ## Best-first enumeration
//!
//! A reverse Dijkstra from the destination gives every node its exact
//! distance to go, measured as `(cost, hops)` compared lexicographically.
//! Partial paths wait in a priority queue keyed by walked distance plus
//! distance to go, then by their node sequence. The distance to go never
//! overestimates and a prefix sorts before its extensions, so complete
//! paths leave the queue in final rank order. The search stops as soon as
//! `max_paths` of them are out, and reads the clock every
//! [`DEADLINE_CHECK_INTERVAL`] expansions.
//!
//! Negative link metrics cost zero under a metric key.
//!
//! No path, or an endpoint missing from the induced subgraph, gives an empty
//! result. That is the infeasible outcome, not an error.

use crate::graph::TopologyGraph;
use crate::predicate::{AbsentMetricPolicy, MetricRegistry, Predicate};
use crate::primitives::{ATTACHMENT_COST, DEADLINE_CHECK_INTERVAL, MISSING_METRIC_COST};
use crate::{ConstraintSet, EdgeAttributes, EdgeKind, LinkpathError, NodeId, Path};
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};
use std::ops::Add;
use std::time::Instant;

// =============================================================================
// PATH COST
// =============================================================================

/// How candidate paths are ranked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCost {
    /// Fewest edges first.
    #[default]
    Hops,
    /// Smallest sum of the named link metric first.
    Metric(String),
}

impl PathCost {
    /// Rank by the given metric, or by hop count when no key is supplied.
    #[must_use]
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(k) => Self::Metric(k.to_string()),
            None => Self::Hops,
        }
    }

    /// Cost of walking one edge.
    ///
    /// Attachments are free under a metric key. Links that do not report a
    /// numeric value for the key cost [`MISSING_METRIC_COST`].
    #[must_use]
    pub fn edge_cost(&self, edge: &EdgeAttributes) -> f64 {
        match self {
            Self::Hops => 1.0,
            Self::Metric(key) => match edge.kind {
                EdgeKind::Attachment => ATTACHMENT_COST,
                EdgeKind::Link => edge
                    .metrics
                    .get(key)
                    .and_then(|value| value.as_number())
                    .unwrap_or(MISSING_METRIC_COST),
            },
        }
    }
}

// =============================================================================
// SEARCH LIMITS
// =============================================================================

/// Bounds on a single search. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Keep at most this many paths (the best ranked ones).
    pub max_paths: Option<usize>,
    /// Ignore paths longer than this many edges.
    pub max_hops: Option<usize>,
}

// =============================================================================
// INDUCED SUBGRAPH
// =============================================================================

/// Path length compared by cost first, then by edge count.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
struct Distance {
    cost: f64,
    hops: usize,
}

impl Distance {
    fn edge(cost: f64) -> Self {
        Self { cost, hops: 1 }
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.hops.cmp(&other.hops))
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            cost: self.cost + rhs.cost,
            hops: self.hops + rhs.hops,
        }
    }
}

/// A partial path waiting in the best-first queue.
struct Frontier {
    /// Walked distance plus the distance still to go.
    estimate: Distance,
    walked: Distance,
    nodes: Vec<NodeIndex>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate
            .rank(&other.estimate)
            .then_with(|| self.nodes.cmp(&other.nodes))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// The subgraph formed by the edges that passed every predicate.
///
/// Edge weights are the per-edge cost under the query's [`PathCost`].
/// Nodes are inserted in identifier order, so comparing index sequences
/// compares the identifier sequences they stand for.
struct InducedSubgraph {
    graph: UnGraph<NodeId, f64>,
    index: BTreeMap<NodeId, NodeIndex>,
}

impl InducedSubgraph {
    fn build(
        topology: &TopologyGraph,
        predicates: &[Predicate],
        policy: AbsentMetricPolicy,
        cost: &PathCost,
    ) -> Self {
        let observed = topology.observed_metrics();
        let admitted: Vec<(&NodeId, &NodeId, f64)> = topology
            .raw_edges()
            .filter(|(_, _, attrs)| {
                predicates
                    .iter()
                    .all(|predicate| predicate.evaluate(attrs, policy, observed))
            })
            .map(|(a, b, attrs)| (a, b, cost.edge_cost(attrs).max(0.0)))
            .collect();

        let mut induced = Self {
            graph: UnGraph::default(),
            index: BTreeMap::new(),
        };

        let endpoints: BTreeSet<&NodeId> = admitted.iter().flat_map(|(a, b, _)| [*a, *b]).collect();
        for id in endpoints {
            let idx = induced.graph.add_node(id.clone());
            induced.index.insert(id.clone(), idx);
        }

        for (a, b, weight) in admitted {
            if let (Some(&a), Some(&b)) = (induced.index.get(a), induced.index.get(b)) {
                induced.graph.add_edge(a, b, weight);
            }
        }

        induced
    }

    fn to_path(&self, nodes: &[NodeIndex]) -> Path {
        Path::new(nodes.iter().map(|idx| self.graph[*idx].clone()).collect())
    }

    fn ranked_paths(
        &self,
        source: &NodeId,
        destination: &NodeId,
        limits: SearchLimits,
        deadline: Option<Instant>,
    ) -> Result<Vec<Path>, LinkpathError> {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(destination)) else {
            return Ok(Vec::new());
        };
        if limits.max_hops == Some(0) || limits.max_paths == Some(0) {
            return Ok(Vec::new());
        }

        let to_go: HashMap<NodeIndex, Distance> =
            dijkstra(&self.graph, to, None, |edge| Distance::edge(*edge.weight()));
        let fewest_hops: Option<HashMap<NodeIndex, usize>> = limits
            .max_hops
            .map(|_| dijkstra(&self.graph, to, None, |_| 1usize));

        let Some(&start) = to_go.get(&from) else {
            return Ok(Vec::new());
        };

        let mut queue = BinaryHeap::new();
        queue.push(Reverse(Frontier {
            estimate: start,
            walked: Distance::default(),
            nodes: vec![from],
        }));

        let mut paths = Vec::new();
        let mut expanded = 0usize;

        while let Some(Reverse(frontier)) = queue.pop() {
            if expanded % DEADLINE_CHECK_INTERVAL == 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(LinkpathError::DeadlineExceeded { explored: expanded });
            }
            expanded += 1;

            let Some(&tail) = frontier.nodes.last() else {
                continue;
            };

            if tail == to {
                paths.push(self.to_path(&frontier.nodes));
                if limits.max_paths.is_some_and(|max| paths.len() >= max) {
                    break;
                }
                continue;
            }

            let walked_hops = frontier.nodes.len();
            for edge in self.graph.edges(tail) {
                let next = if edge.source() == tail { edge.target() } else { edge.source() };
                if frontier.nodes.contains(&next) {
                    continue;
                }
                let Some(&remaining) = to_go.get(&next) else {
                    continue;
                };
                if let (Some(max), Some(fewest)) = (limits.max_hops, &fewest_hops) {
                    match fewest.get(&next) {
                        Some(&hops) if walked_hops + hops <= max => {}
                        _ => continue,
                    }
                }

                let walked = frontier.walked + Distance::edge(*edge.weight());
                let mut nodes = frontier.nodes.clone();
                nodes.push(next);
                queue.push(Reverse(Frontier {
                    estimate: walked + remaining,
                    walked,
                    nodes,
                }));
            }
        }

        tracing::trace!(expanded, queued = queue.len(), "Best-first enumeration stopped");
        Ok(paths)
    }
}

// =============================================================================
// PATH ENGINE
// =============================================================================

/// The path engine: metric rules, absent-metric policy and search bounds.
///
/// The engine holds no topology; every query is run against a
/// [`TopologyGraph`] snapshot supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct PathEngine {
    registry: MetricRegistry,
    policy: AbsentMetricPolicy,
    limits: SearchLimits,
}

impl PathEngine {
    /// Create an engine with the given metric rules.
    #[must_use]
    pub fn new(registry: MetricRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AbsentMetricPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    #[must_use]
    pub fn policy(&self) -> AbsentMetricPolicy {
        self.policy
    }

    #[must_use]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Ranked simple paths with no constraint applied.
    #[must_use]
    pub fn shortest_paths(
        &self,
        graph: &TopologyGraph,
        source: &NodeId,
        destination: &NodeId,
        cost: &PathCost,
    ) -> Vec<Path> {
        self.constrained_paths(graph, source, destination, &ConstraintSet::new(), cost)
    }

    /// [`shortest_paths`](Self::shortest_paths) bounded by a wall-clock deadline.
    ///
    /// # Errors
    ///
    /// [`LinkpathError::DeadlineExceeded`] if `deadline` passes first.
    pub fn shortest_paths_until(
        &self,
        graph: &TopologyGraph,
        source: &NodeId,
        destination: &NodeId,
        cost: &PathCost,
        deadline: Option<Instant>,
    ) -> Result<Vec<Path>, LinkpathError> {
        self.constrained_paths_until(graph, source, destination, &ConstraintSet::new(), cost, deadline)
    }

    /// Ranked simple paths that only use edges passing every constraint.
    #[must_use]
    pub fn constrained_paths(
        &self,
        graph: &TopologyGraph,
        source: &NodeId,
        destination: &NodeId,
        constraints: &ConstraintSet,
        cost: &PathCost,
    ) -> Vec<Path> {
        // Without a deadline the search cannot fail
        self.constrained_paths_until(graph, source, destination, constraints, cost, None)
            .unwrap_or_default()
    }

    /// [`constrained_paths`](Self::constrained_paths) bounded by a wall-clock
    /// deadline, checked while paths are being enumerated.
    ///
    /// # Errors
    ///
    /// [`LinkpathError::DeadlineExceeded`] if `deadline` passes first.
    pub fn constrained_paths_until(
        &self,
        graph: &TopologyGraph,
        source: &NodeId,
        destination: &NodeId,
        constraints: &ConstraintSet,
        cost: &PathCost,
        deadline: Option<Instant>,
    ) -> Result<Vec<Path>, LinkpathError> {
        if source == destination {
            return Ok(if graph.contains_node(source) {
                vec![Path::new(vec![source.clone()])]
            } else {
                Vec::new()
            });
        }

        let predicates = self.registry.predicates(constraints);
        let induced = InducedSubgraph::build(graph, &predicates, self.policy, cost);
        let paths = match induced.ranked_paths(source, destination, self.limits, deadline) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(
                    %source,
                    %destination,
                    constraints = predicates.len(),
                    error = %e,
                    "Constrained search deadline exceeded"
                );
                return Err(e);
            }
        };

        tracing::debug!(
            %source,
            %destination,
            constraints = predicates.len(),
            admitted_edges = induced.graph.edge_count(),
            paths = paths.len(),
            "Constrained search finished"
        );

        Ok(paths)
    }

    /// The edges of the subgraph induced by `constraints`, as ordered pairs.
    #[must_use]
    pub fn admitted_edges(
        &self,
        graph: &TopologyGraph,
        constraints: &ConstraintSet,
    ) -> BTreeSet<(NodeId, NodeId)> {
        let predicates = self.registry.predicates(constraints);
        let observed = graph.observed_metrics();

        graph
            .raw_edges()
            .filter(|(_, _, attrs)| {
                predicates
                    .iter()
                    .all(|predicate| predicate.evaluate(attrs, self.policy, observed))
            })
            .map(|(a, b, _)| match a.cmp(b) {
                Ordering::Greater => (b.clone(), a.clone()),
                _ => (a.clone(), b.clone()),
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricValue;
    use crate::topology::{DeviceDescriptor, LinkDescriptor, TopologySnapshot};
    use petgraph::algo::all_simple_paths;
    use std::time::Duration;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn path(nodes: &[&str]) -> Path {
        nodes.iter().copied().collect()
    }

    /// D1 - D2 - D3 - D4 - D5 with a shortcut D2 - D4.
    fn chain_with_shortcut() -> TopologyGraph {
        let devices = ["D1", "D2", "D3", "D4", "D5"]
            .into_iter()
            .map(DeviceDescriptor::new)
            .collect();
        let links = vec![
            LinkDescriptor::new("D1", "D2"),
            LinkDescriptor::new("D2", "D3"),
            LinkDescriptor::new("D3", "D4"),
            LinkDescriptor::new("D2", "D4"),
            LinkDescriptor::new("D4", "D5"),
        ];
        TopologyGraph::from_snapshot(&TopologySnapshot::new(devices, links))
    }

    /// `side` x `side` switches named `g<row><col>`, joined to their right
    /// and lower neighbours. Every link has delay `row + col + 1`.
    fn grid(side: usize) -> TopologyGraph {
        let mut links = Vec::new();
        for row in 0..side {
            for col in 0..side {
                let here = format!("g{}{}", row, col);
                let delay = (row + col + 1) as i32;
                if col + 1 < side {
                    let right = format!("g{}{}", row, col + 1);
                    links.push(LinkDescriptor::new(here.clone(), right).with_metric("delay", delay));
                }
                if row + 1 < side {
                    let below = format!("g{}{}", row + 1, col);
                    links.push(LinkDescriptor::new(here.clone(), below).with_metric("delay", delay));
                }
            }
        }
        TopologyGraph::from_snapshot(&TopologySnapshot::new(vec![], links))
    }

    /// Every simple path, ranked by full sort.
    fn ranked_by_sorting(graph: &TopologyGraph, source: &str, destination: &str, cost: &PathCost) -> Vec<Path> {
        let induced = InducedSubgraph::build(graph, &[], AbsentMetricPolicy::default(), cost);
        let from = induced.index[&id(source)];
        let to = induced.index[&id(destination)];
        let mut ranked: Vec<(f64, Path)> = all_simple_paths(&induced.graph, from, to, 0, None)
            .map(|nodes: Vec<NodeIndex>| {
                let total = nodes
                    .windows(2)
                    .filter_map(|pair| induced.graph.find_edge(pair[0], pair[1]))
                    .map(|edge| induced.graph[edge])
                    .sum();
                (total, induced.to_path(&nodes))
            })
            .collect();
        ranked.sort_by(|(cost_a, a), (cost_b, b)| {
            cost_a
                .total_cmp(cost_b)
                .then_with(|| a.hop_count().cmp(&b.hop_count()))
                .then_with(|| a.cmp(b))
        });
        ranked.into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn shortest_path_comes_first() {
        let graph = chain_with_shortcut();
        let engine = PathEngine::default();

        let paths = engine.shortest_paths(&graph, &id("D1"), &id("D5"), &PathCost::Hops);

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], path(&["D1", "D2", "D4", "D5"]));
        assert_eq!(paths[1], path(&["D1", "D2", "D3", "D4", "D5"]));
    }

    #[test]
    fn same_source_and_destination() {
        let graph = chain_with_shortcut();
        let engine = PathEngine::default();

        let paths = engine.shortest_paths(&graph, &id("D3"), &id("D3"), &PathCost::Hops);
        assert_eq!(paths, vec![path(&["D3"])]);

        let missing = engine.shortest_paths(&graph, &id("nope"), &id("nope"), &PathCost::Hops);
        assert!(missing.is_empty());
    }

    #[test]
    fn trivial_path_ignores_constraints() {
        let graph = chain_with_shortcut();
        let engine = PathEngine::default();
        let mut constraints = ConstraintSet::new();
        constraints.insert("bandwidth".to_string(), MetricValue::from(1_000_000));

        let paths = engine.constrained_paths(&graph, &id("D1"), &id("D1"), &constraints, &PathCost::Hops);
        assert_eq!(paths, vec![path(&["D1"])]);
    }

    #[test]
    fn unknown_endpoint_gives_empty_result() {
        let graph = chain_with_shortcut();
        let engine = PathEngine::default();
        assert!(engine
            .shortest_paths(&graph, &id("D1"), &id("D9"), &PathCost::Hops)
            .is_empty());
    }

    #[test]
    fn metric_cost_reorders_paths() {
        let snapshot = TopologySnapshot::new(
            vec![],
            vec![
                LinkDescriptor::new("a", "b").with_metric("delay", 50),
                LinkDescriptor::new("b", "d").with_metric("delay", 50),
                LinkDescriptor::new("a", "c").with_metric("delay", 1),
                LinkDescriptor::new("c", "e").with_metric("delay", 1),
                LinkDescriptor::new("e", "d").with_metric("delay", 1),
            ],
        );
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let engine = PathEngine::default();

        let by_hops = engine.shortest_paths(&graph, &id("a"), &id("d"), &PathCost::Hops);
        assert_eq!(by_hops[0], path(&["a", "b", "d"]));

        let by_delay = engine.shortest_paths(&graph, &id("a"), &id("d"), &PathCost::from_key(Some("delay")));
        assert_eq!(by_delay[0], path(&["a", "c", "e", "d"]));
    }

    #[test]
    fn constraint_rejecting_every_edge_gives_empty_result() {
        let snapshot = TopologySnapshot::new(
            vec![],
            vec![LinkDescriptor::new("a", "b").with_metric("bandwidth", 10)],
        );
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let engine = PathEngine::default();
        let mut constraints = ConstraintSet::new();
        constraints.insert("bandwidth".to_string(), MetricValue::from(100));

        assert!(engine
            .constrained_paths(&graph, &id("a"), &id("b"), &constraints, &PathCost::Hops)
            .is_empty());
        assert!(engine.admitted_edges(&graph, &constraints).is_empty());
    }

    #[test]
    fn limits_bound_hops_and_count() {
        let graph = chain_with_shortcut();
        let engine = PathEngine::default().with_limits(SearchLimits {
            max_paths: None,
            max_hops: Some(3),
        });
        let paths = engine.shortest_paths(&graph, &id("D1"), &id("D5"), &PathCost::Hops);
        assert_eq!(paths, vec![path(&["D1", "D2", "D4", "D5"])]);

        let engine = PathEngine::default().with_limits(SearchLimits {
            max_paths: Some(1),
            max_hops: None,
        });
        assert_eq!(
            engine
                .shortest_paths(&graph, &id("D1"), &id("D5"), &PathCost::Hops)
                .len(),
            1
        );

        let engine = PathEngine::default().with_limits(SearchLimits {
            max_paths: None,
            max_hops: Some(0),
        });
        assert!(engine
            .shortest_paths(&graph, &id("D1"), &id("D2"), &PathCost::Hops)
            .is_empty());
    }

    #[test]
    fn cost_key_ignores_blank() {
        assert_eq!(PathCost::from_key(Some("  ")), PathCost::Hops);
        assert_eq!(PathCost::from_key(None), PathCost::Hops);
        assert_eq!(
            PathCost::from_key(Some("delay")),
            PathCost::Metric("delay".to_string())
        );
    }

    #[test]
    fn attachments_are_free_under_metric_cost() {
        assert_eq!(
            PathCost::Metric("delay".to_string()).edge_cost(&EdgeAttributes::attachment()),
            0.0
        );
        assert_eq!(PathCost::Hops.edge_cost(&EdgeAttributes::attachment()), 1.0);
    }

    #[test]
    fn lazy_order_matches_full_sort() {
        let graph = grid(3);
        let engine = PathEngine::default();

        for cost in [PathCost::Hops, PathCost::from_key(Some("delay"))] {
            let lazy = engine.shortest_paths(&graph, &id("g00"), &id("g22"), &cost);
            let sorted = ranked_by_sorting(&graph, "g00", "g22", &cost);
            assert_eq!(lazy.len(), 12);
            assert_eq!(lazy, sorted);
        }
    }

    #[test]
    fn single_best_path_on_a_large_grid_is_fast() {
        let graph = grid(6);
        let engine = PathEngine::default().with_limits(SearchLimits {
            max_paths: Some(1),
            max_hops: None,
        });
        let started = Instant::now();
        let deadline = Some(started + Duration::from_secs(5));

        let paths = engine
            .shortest_paths_until(&graph, &id("g00"), &id("g55"), &PathCost::Hops, deadline)
            .expect("one path well before the deadline");

        // Ten hops; among equals the identifier order walks row 0 first
        assert_eq!(
            paths,
            vec![path(&[
                "g00", "g01", "g02", "g03", "g04", "g05", "g15", "g25", "g35", "g45", "g55"
            ])]
        );
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn hop_bound_prunes_without_losing_paths() {
        let graph = grid(4);
        let engine = PathEngine::default().with_limits(SearchLimits {
            max_paths: None,
            max_hops: Some(6),
        });

        // Only the monotone staircases fit in six hops
        let paths = engine.shortest_paths(&graph, &id("g00"), &id("g33"), &PathCost::Hops);
        assert_eq!(paths.len(), 20);
        assert!(paths.iter().all(|p| p.hop_count() == 6));
    }

    #[test]
    fn expired_deadline_stops_constrained_search() {
        let graph = grid(6);
        let engine = PathEngine::default();
        let deadline = Some(Instant::now());
        std::thread::sleep(Duration::from_millis(1));

        let result = engine.constrained_paths_until(
            &graph,
            &id("g00"),
            &id("g55"),
            &ConstraintSet::new(),
            &PathCost::Hops,
            deadline,
        );
        assert!(matches!(
            result,
            Err(LinkpathError::DeadlineExceeded { explored: 0 })
        ));
    }

    #[test]
    fn deadline_interrupts_full_enumeration() {
        let graph = grid(6);
        let engine = PathEngine::default();
        let started = Instant::now();
        let deadline = Some(started + Duration::from_millis(50));

        let result = engine.shortest_paths_until(&graph, &id("g00"), &id("g55"), &PathCost::Hops, deadline);

        assert!(matches!(result, Err(LinkpathError::DeadlineExceeded { .. })));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn negative_metric_costs_nothing() {
        let snapshot = TopologySnapshot::new(
            vec![],
            vec![
                LinkDescriptor::new("a", "b").with_metric("delay", -5),
                LinkDescriptor::new("b", "c").with_metric("delay", 1),
                LinkDescriptor::new("a", "c").with_metric("delay", 1),
            ],
        );
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let engine = PathEngine::default();

        // Both paths cost 1; the shorter one wins the tie
        let paths = engine.shortest_paths(&graph, &id("a"), &id("c"), &PathCost::from_key(Some("delay")));
        assert_eq!(paths, vec![path(&["a", "c"]), path(&["a", "b", "c"])]);
    }
}
