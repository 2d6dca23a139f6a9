//! # Engine Primitives
//!
//! Fixed constants for the linkpath engine: the standard metric vocabulary,
//! path costing defaults, and the bounds that keep every query finite.

// =============================================================================
// STANDARD METRIC VOCABULARY
// =============================================================================

/// Link capacity. Higher is better (floor rule).
pub const BANDWIDTH: &str = "bandwidth";

/// Link latency. Lower is better (ceiling rule).
pub const DELAY: &str = "delay";

/// Link load. Lower is better (ceiling rule).
pub const UTILIZATION: &str = "utilization";

/// Operator priority. Higher is better (floor rule).
pub const PRIORITY: &str = "priority";

/// Link reliability score. Higher is better (floor rule).
pub const RELIABILITY: &str = "reliability";

/// Owning tenant or operator of a link. Must match exactly (equality rule).
pub const OWNERSHIP: &str = "ownership";

// =============================================================================
// PATH COSTING
// =============================================================================

/// Cost of walking from an interface to its device under any cost key.
pub const ATTACHMENT_COST: f64 = 0.0;

/// Cost of a link that does not report a numeric value for the cost key.
pub const MISSING_METRIC_COST: f64 = 1.0;

// =============================================================================
// SEARCH BOUNDS
// =============================================================================

/// Largest constraint set the relaxation search will expand.
///
/// The search visits up to `2^n` subsets; the standard vocabulary has six
/// metrics, so this leaves room for custom registrations.
pub const MAX_FLEXIBLE_CONSTRAINTS: usize = 12;

/// Default hop bound applied by the application layer.
pub const DEFAULT_MAX_HOPS: usize = 32;

/// Default wall-clock bound for one path query, in milliseconds.
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 5_000;

/// Partial paths expanded between two reads of the clock.
pub const DEADLINE_CHECK_INTERVAL: usize = 256;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for node identifiers accepted at the boundary.
pub const MAX_NODE_ID_LENGTH: usize = 256;

/// Maximum number of desired/undesired links in a single filter.
pub const MAX_FILTER_LINKS: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_is_free() {
        assert_eq!(ATTACHMENT_COST, 0.0);
        assert!(MISSING_METRIC_COST > ATTACHMENT_COST);
    }

    #[test]
    fn flexible_bound_fits_bitmask() {
        assert!(MAX_FLEXIBLE_CONSTRAINTS < u32::BITS as usize);
    }

    #[test]
    fn deadline_interval_is_positive() {
        assert!(DEADLINE_CHECK_INTERVAL > 0);
    }
}
