//! Generic entity processing metrics and in-flight tracking
//!
//! The in-flight gauge only stays accurate when every increment is matched
//! by exactly one decrement. A missed release on an error path makes the
//! gauge drift upward for the lifetime of the process, so wrap units of work
//! in an [`InFlightGuard`] instead of pairing calls by hand:
//!
//! ```rust
//! use prometheus::Registry;
//! use promcommon::ProcessingMetrics;
//!
//! fn ingest(metrics: &ProcessingMetrics, payload: &str) -> Result<usize, String> {
//!     let _in_flight = metrics.track_in_flight("ingest");
//!     if payload.is_empty() {
//!         return Err("empty payload".to_string());
//!     }
//!     Ok(payload.len())
//! }
//!
//! let registry = Registry::new();
//! let metrics = ProcessingMetrics::new(&registry).unwrap();
//! assert!(ingest(&metrics, "").is_err());
//! assert_eq!(metrics.in_flight("ingest"), 0);
//! ```

use std::fmt;

use prometheus::{HistogramVec, IntCounterVec, IntGaugeVec, Registry};
use tracing::info;

use super::instruments::{counter_vec, duration_histogram_vec, gauge_vec};
use super::timer::DurationTimer;
use super::traits::ProcessingObserver;
use crate::error::MetricsResult;

pub const ENTITIES_PROCESSED_TOTAL: &str = "entities_processed_total";
pub const ENTITY_PROCESSING_DURATION: &str = "entity_processing_duration";
pub const ENTITIES_IN_FLIGHT: &str = "entities_in_flight";

/// Processed entity counts, processing latency and in-flight work
#[derive(Clone)]
pub struct ProcessingMetrics {
    processed_total: IntCounterVec,
    processing_duration: HistogramVec,
    in_flight: IntGaugeVec,
}

impl ProcessingMetrics {
    /// Create the processing instruments and register them with `registry`
    ///
    /// # Errors
    /// Fails if any instrument name is already registered.
    pub fn new(registry: &Registry) -> MetricsResult<Self> {
        let processed_total = counter_vec(
            registry,
            ENTITIES_PROCESSED_TOTAL,
            "Count of entities processed, both sum and successes",
            &["entity_type", "result"],
        )?;
        let processing_duration = duration_histogram_vec(
            registry,
            ENTITY_PROCESSING_DURATION,
            "A Histogram of the entities processing duration in seconds",
            &["entity_type"],
        )?;
        let in_flight = gauge_vec(
            registry,
            ENTITIES_IN_FLIGHT,
            "Number of requests or messages in processing now",
            &["operation"],
        )?;

        info!(
            metrics = ?[ENTITIES_PROCESSED_TOTAL, ENTITY_PROCESSING_DURATION, ENTITIES_IN_FLIGHT],
            "Processing metrics registered"
        );
        Ok(Self { processed_total, processing_duration, in_flight })
    }

    /// Mark one unit of `operation` in flight until the guard is dropped
    pub fn track_in_flight<'a>(&'a self, operation: &'a str) -> InFlightGuard<'a> {
        InFlightGuard::acquire(self, operation)
    }

    /// Current in-flight value for `operation`
    ///
    /// Reading goes through `with_label_values`, so asking about an
    /// operation that was never tracked creates and exports a zero series
    /// for it.
    pub fn in_flight(&self, operation: &str) -> i64 {
        self.in_flight.with_label_values(&[operation]).get()
    }
}

impl ProcessingObserver for ProcessingMetrics {
    fn inc_processed(&self, entity_type: &str, result: &str) {
        self.processed_total.with_label_values(&[entity_type, result]).inc();
    }

    fn start_processing_timer(&self, entity_type: &str) -> DurationTimer {
        DurationTimer::start(self.processing_duration.with_label_values(&[entity_type]))
    }

    fn inc_in_flight(&self, operation: &str) {
        self.in_flight.with_label_values(&[operation]).inc();
    }

    fn dec_in_flight(&self, operation: &str) {
        self.in_flight.with_label_values(&[operation]).dec();
    }
}

impl fmt::Debug for ProcessingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingMetrics")
            .field("processed_total", &ENTITIES_PROCESSED_TOTAL)
            .field("processing_duration", &ENTITY_PROCESSING_DURATION)
            .field("in_flight", &ENTITIES_IN_FLIGHT)
            .finish()
    }
}

/// Scoped in-flight slot
///
/// Acquiring increments the observer's in-flight gauge for `operation`;
/// dropping the guard decrements it exactly once, whichever way the scope
/// is left.
#[derive(Debug)]
#[must_use = "dropping the guard releases the in-flight slot immediately"]
pub struct InFlightGuard<'a> {
    observer: &'a dyn ProcessingObserver,
    operation: &'a str,
}

impl<'a> InFlightGuard<'a> {
    /// Increment the in-flight gauge for `operation` and hold it
    pub fn acquire(observer: &'a dyn ProcessingObserver, operation: &'a str) -> Self {
        observer.inc_in_flight(operation);
        Self { observer, operation }
    }

    /// Operation label this guard holds
    pub fn operation(&self) -> &str {
        self.operation
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.observer.dec_in_flight(self.operation);
    }
}
