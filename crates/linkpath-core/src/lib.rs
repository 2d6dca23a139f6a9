//! # linkpath-core
//!
//! The constrained path-finding engine for linkpath.
//!
//! Given a network topology of devices, interfaces and links carrying metric
//! metadata, this crate answers: which simple paths connect A to B using only
//! links that meet a set of metric constraints? And, if none do, which largest
//! subsets of those constraints can still be met?
//!
//! ## Layout
//!
//! - `types`: node identity, metric values, edge attributes, paths, errors
//! - `topology`: snapshot descriptors delivered by the topology source
//! - `graph`: the attributed graph built from a snapshot
//! - `store`: the swappable current graph
//! - `predicate`: metric name -> comparison rule
//! - `search`: constrained shortest-simple-paths
//! - `flexible`: constraint relaxation search
//! - `filter`: desired/undesired link post-filter
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Every observable ordering is deterministic
//! - An infeasible query yields an empty result, never an error

// =============================================================================
// MODULES
// =============================================================================

pub mod filter;
pub mod flexible;
pub mod graph;
pub mod predicate;
pub mod primitives;
pub mod search;
pub mod store;
pub mod topology;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    ConstraintSet, EdgeAttributes, EdgeKind, LinkpathError, Metadata, MetricLookup, MetricValue,
    NodeId, NodeKind, Path,
};

// =============================================================================
// RE-EXPORTS: Topology
// =============================================================================

pub use graph::{TopologyGraph, TopologySummary};
pub use store::TopologyStore;
pub use topology::{DeviceDescriptor, InterfaceDescriptor, LinkDescriptor, TopologySnapshot};

// =============================================================================
// RE-EXPORTS: Path Engine
// =============================================================================

pub use filter::{LinkRef, PathFilter};
pub use flexible::FlexibleResult;
pub use predicate::{AbsentMetricPolicy, Comparison, MetricRegistry, Predicate};
pub use search::{PathCost, PathEngine, SearchLimits};
