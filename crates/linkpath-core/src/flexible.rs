//! # Flexible Relaxation Search
//!
//! When the full constraint set admits no path, find the largest subsets of
//! it that still do.
//!
//! The registered constraints are put in metric-name order and each subset is
//! a bitmask over them (constraint `i` is bit `n - 1 - i`). Walking masks from
//! `2^n - 1` down to `0` and keeping the ones with `k` bits set yields the
//! `k`-subsets in lexicographic order. Levels go from `k = n` down to `k = 0`;
//! the search stops after the first level where some subset produced a path.
//!
//! The deadline is checked before each subset and, through the constrained
//! search, while that subset's paths are being enumerated.

use crate::graph::TopologyGraph;
use crate::primitives::MAX_FLEXIBLE_CONSTRAINTS;
use crate::search::{PathCost, PathEngine};
use crate::{ConstraintSet, LinkpathError, MetricValue, NodeId, Path};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Paths found under one constraint subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleResult {
    pub paths: Vec<Path>,
    /// The constraints that were enforced.
    pub constraints: ConstraintSet,
    /// Metric names dropped from the request, in name order.
    pub relaxed: Vec<String>,
}

impl PathEngine {
    /// Relaxation search over the registered constraints.
    ///
    /// Returns one [`FlexibleResult`] per feasible subset of the first
    /// cardinality level that has any, or an empty vector when even the
    /// empty subset finds nothing.
    ///
    /// # Errors
    ///
    /// - [`LinkpathError::InvalidQuery`] if more than
    ///   [`MAX_FLEXIBLE_CONSTRAINTS`] registered constraints were given.
    /// - [`LinkpathError::DeadlineExceeded`] if `deadline` passes before the
    ///   search finishes. `explored` counts the subsets started.
    pub fn flexible_paths(
        &self,
        graph: &TopologyGraph,
        source: &NodeId,
        destination: &NodeId,
        constraints: &ConstraintSet,
        cost: &PathCost,
        deadline: Option<Instant>,
    ) -> Result<Vec<FlexibleResult>, LinkpathError> {
        let registered: Vec<(&String, &MetricValue)> = constraints
            .iter()
            .filter(|(metric, _)| self.registry().is_registered(metric))
            .collect();
        let n = registered.len();

        if n > MAX_FLEXIBLE_CONSTRAINTS {
            return Err(LinkpathError::InvalidQuery(format!(
                "flexible search accepts at most {} constraints, got {}",
                MAX_FLEXIBLE_CONSTRAINTS, n
            )));
        }

        let full_mask: u32 = (1u32 << n) - 1;
        let mut explored = 0usize;

        for level in (0..=n).rev() {
            let mut results = Vec::new();

            for mask in (0..=full_mask).rev() {
                if mask.count_ones() as usize != level {
                    continue;
                }

                if deadline.is_some_and(|d| Instant::now() >= d) {
                    tracing::warn!(
                        %source,
                        %destination,
                        explored,
                        "Flexible search deadline exceeded"
                    );
                    return Err(LinkpathError::DeadlineExceeded { explored });
                }
                explored += 1;

                let mut subset = ConstraintSet::new();
                let mut relaxed = Vec::new();
                for (i, (metric, target)) in registered.iter().enumerate() {
                    if mask & (1 << (n - 1 - i)) != 0 {
                        subset.insert((*metric).clone(), (*target).clone());
                    } else {
                        relaxed.push((*metric).clone());
                    }
                }

                let paths = self
                    .constrained_paths_until(graph, source, destination, &subset, cost, deadline)
                    .map_err(|_| LinkpathError::DeadlineExceeded { explored })?;
                if !paths.is_empty() {
                    results.push(FlexibleResult {
                        paths,
                        constraints: subset,
                        relaxed,
                    });
                }
            }

            if !results.is_empty() {
                tracing::debug!(
                    %source,
                    %destination,
                    requested = n,
                    kept = level,
                    explored,
                    results = results.len(),
                    "Flexible search settled"
                );
                return Ok(results);
            }
        }

        tracing::debug!(%source, %destination, explored, "Flexible search found no path");
        Ok(Vec::new())
    }
}
