//! # Registry Metrics
//!
//! Prometheus counters for registry activity.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! rr-02-registry = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `registry_mutations_total` - Committed mutations (by operation)
//! - `registry_rejections_total` - Rejected mutations (by reason)
//! - `registry_reward_failures_total` - Failed reward payouts (by reward kind)
//! - `registry_compensations_total` - Compensating transfers attempted (by outcome)
//!
//! Without the feature every function is a no-op.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Committed mutations, labeled by operation
    pub static ref MUTATIONS: IntCounterVec = register_int_counter_vec!(
        "registry_mutations_total",
        "Total number of committed registry mutations",
        &["operation"]
    )
    .expect("Failed to create MUTATIONS metric");

    /// Rejected mutations, labeled by reason
    pub static ref REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "registry_rejections_total",
        "Total number of rejected registry mutations",
        &["reason"]
    )
    .expect("Failed to create REJECTIONS metric");

    /// Failed reward payouts, labeled by reward kind
    pub static ref REWARD_FAILURES: IntCounterVec = register_int_counter_vec!(
        "registry_reward_failures_total",
        "Total number of failed reward payouts",
        &["kind"]
    )
    .expect("Failed to create REWARD_FAILURES metric");

    /// Compensating transfers, labeled by outcome
    pub static ref COMPENSATIONS: IntCounterVec = register_int_counter_vec!(
        "registry_compensations_total",
        "Total number of compensating stake transfers",
        &["outcome"]
    )
    .expect("Failed to create COMPENSATIONS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a committed mutation
#[cfg(feature = "metrics")]
pub fn record_mutation(operation: &str) {
    MUTATIONS.with_label_values(&[operation]).inc();
}

/// Record a rejected mutation
#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    REJECTIONS.with_label_values(&[reason]).inc();
}

/// Record a failed reward payout
#[cfg(feature = "metrics")]
pub fn record_reward_failure(kind: &str) {
    REWARD_FAILURES.with_label_values(&[kind]).inc();
}

/// Record a compensating transfer
#[cfg(feature = "metrics")]
pub fn record_compensation(succeeded: bool) {
    let outcome = if succeeded { "refunded" } else { "failed" };
    COMPENSATIONS.with_label_values(&[outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature is disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_mutation(_operation: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_reward_failure(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_compensation(_succeeded: bool) {}
