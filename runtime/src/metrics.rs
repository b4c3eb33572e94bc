//! Metrics for the store runtime.
//!
//! Metrics are emitted through the [`metrics`] facade. Nothing is recorded
//! unless the application installs a recorder, so the store is usable
//! without any exporter.
//!
//! # Example
//!
//! ```
//! use nested_todo_runtime::metrics::{describe_metrics, StoreMetrics};
//! use std::time::Duration;
//!
//! describe_metrics();
//! StoreMetrics::record_action(Duration::from_micros(3));
//! ```

use metrics::{describe_counter, describe_histogram};
use std::time::Duration;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Register descriptions for every metric the runtime emits.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    // Store Metrics
    describe_counter!(
        "store_actions_total",
        "Total number of actions reduced by stores"
    );
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time taken by the reducer for a single action"
    );
    describe_counter!(
        "store_notifications_total",
        "Total number of change notifications sent to subscribers"
    );
    describe_counter!(
        "store_rejected_total",
        "Total number of sends rejected because the store was notifying"
    );

    // Dispatcher Metrics
    describe_counter!(
        "dispatcher_dispatches_total",
        "Total number of actions delivered by the dispatcher"
    );
    describe_counter!(
        "dispatcher_rejected_total",
        "Total number of dispatches rejected because one was in progress"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action reduced by a store.
    pub fn record_action(duration: Duration) {
        counter!("store_actions_total").increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record one change notification round.
    pub fn record_notification() {
        counter!("store_notifications_total").increment(1);
    }

    /// Record a re-entrant send that was rejected.
    pub fn record_rejected() {
        counter!("store_rejected_total").increment(1);
    }
}

/// Dispatcher metrics recorder.
pub struct DispatcherMetrics;

impl DispatcherMetrics {
    /// Record a delivered dispatch.
    pub fn record_dispatch() {
        counter!("dispatcher_dispatches_total").increment(1);
    }

    /// Record a rejected dispatch.
    pub fn record_rejected() {
        counter!("dispatcher_rejected_total").increment(1);
    }
}
