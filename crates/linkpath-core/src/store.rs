//! # Topology Store
//!
//! Holds the current [`TopologyGraph`] and publishes replacements atomically.
//!
//! A replacement is built completely off to the side and then published with
//! a single pointer swap. A query takes one [`TopologyStore::snapshot`] and
//! keeps it for its whole run, so it sees either the old or the new topology,
//! never a mix.

use crate::graph::TopologyGraph;
use crate::topology::TopologySnapshot;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared, swappable topology graph.
#[derive(Debug)]
pub struct TopologyStore {
    current: ArcSwap<TopologyGraph>,
    generation: AtomicU64,
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyStore {
    /// Create a store holding an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(TopologyGraph::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// The graph as of now. Stays valid even if a replacement is published.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TopologyGraph> {
        self.current.load_full()
    }

    /// Replace the whole topology.
    ///
    /// An empty snapshot is a no-op and returns `false`; the current graph is
    /// kept. Otherwise the new graph is published and `true` is returned.
    pub fn replace_topology(&self, snapshot: &TopologySnapshot) -> bool {
        if snapshot.is_empty() {
            tracing::debug!("Ignoring empty topology update");
            return false;
        }

        let next = TopologyGraph::from_snapshot(snapshot);
        let node_count = next.node_count();
        let edge_count = next.edge_count();

        self.current.store(Arc::new(next));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst).saturating_add(1);

        tracing::info!(
            generation,
            nodes = node_count,
            edges = edge_count,
            "Topology graph updated"
        );
        true
    }

    /// Number of topology updates applied so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
