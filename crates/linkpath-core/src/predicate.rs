//! # Constraint Predicates
//!
//! Maps a metric name to the rule used to compare an edge's value with the
//! target a query asked for.
//!
//! | Comparison | Rule | Standard metrics |
//! |------------|------|------------------|
//! | Equality | edge value == target | ownership |
//! | Floor | edge value >= target | bandwidth, priority, reliability |
//! | Ceiling | edge value <= target | delay, utilization |
//!
//! Metric names without a registered rule are ignored by the engine.
//!
//! ## Absent Metrics
//!
//! Links do not have to report every metric. What an absent metric means is
//! decided by [`AbsentMetricPolicy`]:
//! - `ZeroFill` (default): an absent metric reads as `0` when at least one
//!   link in the graph reported it. A link that never reported a floor metric
//!   therefore fails any positive floor, and passes any ceiling at or above
//!   zero.
//! - `Satisfies`: an absent metric does not constrain the link.
//!
//! Either way, metrics no link reported are not filled, and attachment edges
//! carry no metrics and always pass.

use crate::primitives::{BANDWIDTH, DELAY, OWNERSHIP, PRIORITY, RELIABILITY, UTILIZATION};
use crate::{ConstraintSet, EdgeAttributes, MetricLookup, MetricValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// COMPARISON
// =============================================================================

/// Comparison rule for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Value must equal the target.
    Equality,
    /// Value must be at least the target (higher is better).
    Floor,
    /// Value must be at most the target (lower is better).
    Ceiling,
}

impl Comparison {
    /// Check `actual` against `target`.
    ///
    /// Floor and ceiling only compare numbers; any text operand fails.
    #[must_use]
    pub fn holds(self, actual: &MetricValue, target: &MetricValue) -> bool {
        match self {
            Self::Equality => match (actual, target) {
                (MetricValue::Number(a), MetricValue::Number(t)) => a == t,
                (MetricValue::Text(a), MetricValue::Text(t)) => a == t,
                _ => false,
            },
            Self::Floor => match (actual.as_number(), target.as_number()) {
                (Some(a), Some(t)) => a >= t,
                _ => false,
            },
            Self::Ceiling => match (actual.as_number(), target.as_number()) {
                (Some(a), Some(t)) => a <= t,
                _ => false,
            },
        }
    }
}

// =============================================================================
// ABSENT METRIC POLICY
// =============================================================================

/// How a predicate treats a link that never reported the metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentMetricPolicy {
    /// The link reads as `0` if the metric was observed anywhere in the graph.
    #[default]
    ZeroFill,
    /// The link passes.
    Satisfies,
}

impl std::str::FromStr for AbsentMetricPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "satisfies" => Ok(Self::Satisfies),
            "zero_fill" | "zero-fill" | "zerofill" => Ok(Self::ZeroFill),
            other => Err(format!("unknown absent metric policy '{}'", other)),
        }
    }
}

// =============================================================================
// PREDICATE
// =============================================================================

/// A constraint bound to its comparison rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    metric: String,
    comparison: Comparison,
    target: MetricValue,
}

impl Predicate {
    #[must_use]
    pub fn new(metric: impl Into<String>, comparison: Comparison, target: MetricValue) -> Self {
        Self {
            metric: metric.into(),
            comparison,
            target,
        }
    }

    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    #[must_use]
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    #[must_use]
    pub fn target(&self) -> &MetricValue {
        &self.target
    }

    /// Test an edge.
    ///
    /// `observed` is the set of metrics reported anywhere in the graph; it is
    /// only consulted under [`AbsentMetricPolicy::ZeroFill`].
    #[must_use]
    pub fn evaluate(
        &self,
        edge: &EdgeAttributes,
        policy: AbsentMetricPolicy,
        observed: &BTreeSet<String>,
    ) -> bool {
        match edge.lookup(&self.metric) {
            MetricLookup::NotApplicable => true,
            MetricLookup::Present(value) => self.comparison.holds(value, &self.target),
            MetricLookup::Absent => match policy {
                AbsentMetricPolicy::Satisfies => true,
                AbsentMetricPolicy::ZeroFill => {
                    !observed.contains(&self.metric)
                        || self.comparison.holds(&MetricValue::Number(0.0), &self.target)
                }
            },
        }
    }
}

// =============================================================================
// METRIC REGISTRY
// =============================================================================

/// Registry of metric name -> comparison rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRegistry {
    rules: BTreeMap<String, Comparison>,
}

impl Default for MetricRegistry {
    /// The standard vocabulary: bandwidth, delay, utilization, priority,
    /// reliability and ownership.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(BANDWIDTH, Comparison::Floor)
            .register(DELAY, Comparison::Ceiling)
            .register(UTILIZATION, Comparison::Ceiling)
            .register(PRIORITY, Comparison::Floor)
            .register(RELIABILITY, Comparison::Floor)
            .register(OWNERSHIP, Comparison::Equality);
        registry
    }
}

impl MetricRegistry {
    /// A registry with no rules; every constraint is ignored.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Register (or replace) the rule for a metric.
    pub fn register(&mut self, metric: impl Into<String>, comparison: Comparison) -> &mut Self {
        self.rules.insert(metric.into(), comparison);
        self
    }

    #[must_use]
    pub fn comparison(&self, metric: &str) -> Option<Comparison> {
        self.rules.get(metric).copied()
    }

    #[must_use]
    pub fn is_registered(&self, metric: &str) -> bool {
        self.rules.contains_key(metric)
    }

    /// Registered metric names in sorted order.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// The subset of `constraints` that has a registered rule.
    #[must_use]
    pub fn registered_constraints(&self, constraints: &ConstraintSet) -> ConstraintSet {
        constraints
            .iter()
            .filter(|(metric, _)| self.is_registered(metric))
            .map(|(metric, target)| (metric.clone(), target.clone()))
            .collect()
    }

    /// Build one predicate per registered constraint, in metric-name order.
    #[must_use]
    pub fn predicates(&self, constraints: &ConstraintSet) -> Vec<Predicate> {
        constraints
            .iter()
            .filter_map(|(metric, target)| {
                self.comparison(metric)
                    .map(|comparison| Predicate::new(metric.clone(), comparison, target.clone()))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
