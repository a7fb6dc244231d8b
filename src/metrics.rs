//! Defines the metric keys and labels emitted by skipdict.
//!
//! Using a central module for these constants helps prevent typos and ensures
//! consistency across the codebase. Nothing is recorded unless the host
//! application installs a `metrics` recorder.

// --- Metric Keys ---

/// Tracks the total number of user-initiated operations.
///
/// Labels:
/// - `type`: "get", "has", "set", "delete", "pop", "keys", "clear"
pub const OPERATIONS_TOTAL: &str = "skipdict_operations_total";

/// Tracks lookups that ended in `NotFound`.
///
/// Labels:
/// - `type`: "get", "delete", "pop"
pub const MISSES_TOTAL: &str = "skipdict_misses_total";

/// Tracks inserts rejected by the key policy.
pub const TYPE_MISMATCHES_TOTAL: &str = "skipdict_type_mismatches_total";

/// Tracks the total number of nodes allocated by inserts of new keys.
pub const NODES_ALLOCATED_TOTAL: &str = "skipdict_nodes_allocated_total";

/// Tracks the total number of nodes freed by `delete`, `pop` and `clear`.
pub const NODES_FREED_TOTAL: &str = "skipdict_nodes_freed_total";

// --- Label Keys ---

pub const LABEL_OPERATION_TYPE: &str = "type";

// --- Operation Labels ---

pub const OP_GET: &str = "get";
pub const OP_HAS: &str = "has";
pub const OP_SET: &str = "set";
pub const OP_DELETE: &str = "delete";
pub const OP_POP: &str = "pop";
pub const OP_KEYS: &str = "keys";
pub const OP_CLEAR: &str = "clear";

pub(crate) fn record_operation(op: &'static str) {
    metrics::counter!(OPERATIONS_TOTAL, LABEL_OPERATION_TYPE => op).increment(1);
}

pub(crate) fn record_miss(op: &'static str) {
    metrics::counter!(MISSES_TOTAL, LABEL_OPERATION_TYPE => op).increment(1);
}
