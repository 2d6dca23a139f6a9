//! # Property-Based Tests
//!
//! Invariants of ingestion and search over randomly generated topologies.

use linkpath_core::{
    ConstraintSet, LinkDescriptor, MetricValue, NodeId, Path, PathCost, PathEngine, SearchLimits,
    TopologyGraph, TopologySnapshot, TopologyStore,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// GENERATORS
// =============================================================================

/// A random link between nodes `n0..n7` with bandwidth and delay metrics.
fn arb_link() -> impl Strategy<Value = LinkDescriptor> {
    (0u8..8, 0u8..8, 1i32..200, 1i32..200).prop_map(|(a, b, bandwidth, delay)| {
        LinkDescriptor::new(format!("n{}", a), format!("n{}", b))
            .with_metric("bandwidth", bandwidth)
            .with_metric("delay", delay)
    })
}

fn arb_snapshot() -> impl Strategy<Value = TopologySnapshot> {
    vec(arb_link(), 1..16).prop_map(|links| TopologySnapshot::new(vec![], links))
}

fn bounded_engine() -> PathEngine {
    PathEngine::default().with_limits(SearchLimits {
        max_paths: None,
        max_hops: Some(6),
    })
}

fn edges_used(paths: &[Path]) -> BTreeSet<(NodeId, NodeId)> {
    paths
        .iter()
        .flat_map(|p| {
            p.hops()
                .map(|(a, b)| {
                    if a <= b {
                        (a.clone(), b.clone())
                    } else {
                        (b.clone(), a.clone())
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Node count equals the number of distinct non-looping endpoints.
    #[test]
    fn node_count_matches_distinct_endpoints(snapshot in arb_snapshot()) {
        let graph = TopologyGraph::from_snapshot(&snapshot);

        let expected: BTreeSet<String> = snapshot
            .links
            .iter()
            .filter(|l| l.endpoint_a != l.endpoint_b)
            .flat_map(|l| [l.endpoint_a.clone(), l.endpoint_b.clone()])
            .flatten()
            .collect();

        prop_assert_eq!(graph.node_count(), expected.len());
    }

    /// Replacing twice with the same snapshot yields identical state.
    #[test]
    fn replace_is_idempotent(snapshot in arb_snapshot()) {
        let store = TopologyStore::new();
        store.replace_topology(&snapshot);
        let first = store.snapshot();
        store.replace_topology(&snapshot);
        let second = store.snapshot();

        prop_assert_eq!(first.summary(), second.summary());
        prop_assert_eq!(first.edges(), second.edges());
    }

    /// Every returned path is simple and runs from source to destination.
    #[test]
    fn paths_are_simple(snapshot in arb_snapshot(), a in 0u8..8, b in 0u8..8) {
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let source = NodeId::new(format!("n{}", a));
        let destination = NodeId::new(format!("n{}", b));

        for p in bounded_engine().shortest_paths(&graph, &source, &destination, &PathCost::Hops) {
            prop_assert!(p.is_simple());
            prop_assert_eq!(p.source(), Some(&source));
            prop_assert_eq!(p.destination(), Some(&destination));
        }
    }

    /// Edges used under C2 are admitted under any C1 that C2 contains.
    #[test]
    fn monotone_in_constraints(
        snapshot in arb_snapshot(),
        a in 0u8..8,
        b in 0u8..8,
        bandwidth in 1i32..200,
        delay in 1i32..200,
    ) {
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let engine = bounded_engine();
        let source = NodeId::new(format!("n{}", a));
        let destination = NodeId::new(format!("n{}", b));

        let mut c1 = ConstraintSet::new();
        c1.insert("bandwidth".to_string(), MetricValue::from(bandwidth));
        let mut c2 = c1.clone();
        c2.insert("delay".to_string(), MetricValue::from(delay));

        let used = edges_used(&engine.constrained_paths(&graph, &source, &destination, &c2, &PathCost::Hops));
        let admitted = engine.admitted_edges(&graph, &c1);

        prop_assert!(used.is_subset(&admitted));
    }

    /// Swapping source and destination reverses the result set.
    #[test]
    fn search_is_symmetric(snapshot in arb_snapshot(), a in 0u8..8, b in 0u8..8, bandwidth in 1i32..200) {
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let engine = bounded_engine();
        let source = NodeId::new(format!("n{}", a));
        let destination = NodeId::new(format!("n{}", b));
        let mut constraints = ConstraintSet::new();
        constraints.insert("bandwidth".to_string(), MetricValue::from(bandwidth));

        let forward: BTreeSet<Path> = engine
            .constrained_paths(&graph, &source, &destination, &constraints, &PathCost::Hops)
            .iter()
            .map(Path::reversed)
            .collect();
        let backward: BTreeSet<Path> = engine
            .constrained_paths(&graph, &destination, &source, &constraints, &PathCost::Hops)
            .into_iter()
            .collect();

        prop_assert_eq!(forward, backward);
    }

    /// Results are ranked by non-decreasing hop count.
    #[test]
    fn ranked_by_hops(snapshot in arb_snapshot(), a in 0u8..8, b in 0u8..8) {
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let source = NodeId::new(format!("n{}", a));
        let destination = NodeId::new(format!("n{}", b));

        let paths = bounded_engine().shortest_paths(&graph, &source, &destination, &PathCost::Hops);
        for pair in paths.windows(2) {
            prop_assert!(pair[0].hop_count() <= pair[1].hop_count());
        }
    }

    /// Capping the path count keeps the best-ranked prefix of the full list.
    #[test]
    fn capped_search_is_a_prefix(
        snapshot in arb_snapshot(),
        a in 0u8..8,
        b in 0u8..8,
        cap in 1usize..6,
        by_delay in any::<bool>(),
    ) {
        let graph = TopologyGraph::from_snapshot(&snapshot);
        let source = NodeId::new(format!("n{}", a));
        let destination = NodeId::new(format!("n{}", b));
        let cost = if by_delay { PathCost::from_key(Some("delay")) } else { PathCost::Hops };

        let all = bounded_engine().shortest_paths(&graph, &source, &destination, &cost);
        let capped = bounded_engine()
            .with_limits(SearchLimits { max_paths: Some(cap), max_hops: Some(6) })
            .shortest_paths(&graph, &source, &destination, &cost);

        prop_assert_eq!(&capped[..], &all[..all.len().min(cap)]);
    }
}
