//! Recording implementations of the observer traits
//!
//! Provides a fake metrics sink for testing instrumented code without a
//! registry.

// Allow missing panics docs for test mocks - lock poisoning is recovered
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::metrics::{
    BrokerObserver, CacheObserver, DatabaseObserver, DbOperation, DurationTimer, HttpObserver,
    ProcessingObserver,
};

/// One call made against [`RecordingMetrics`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricEvent {
    BrokerRead { queue: String, result: String },
    BrokerWrite { queue: String, result: String },
    BrokerWriteTimer { queue: String },
    CacheHit { operation: String },
    CacheMiss { operation: String },
    Database { verb: DbOperation, database: String, operation: String, result: String },
    DatabaseTimer { verb: DbOperation, database: String, operation: String },
    HttpRequest { destination: String, endpoint: String, result: String },
    HttpRequestTimer { destination: String, endpoint: String },
    Processed { entity_type: String, result: String },
    ProcessingTimer { entity_type: String },
    InFlightInc { operation: String },
    InFlightDec { operation: String },
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<MetricEvent>,
    in_flight: HashMap<String, i64>,
}

/// Fake metrics sink recording every call
///
/// Clones share the same record, so one handle can be given to the code
/// under test and another kept for assertions. Timers it hands out never
/// record into a histogram; starting one is recorded as an event.
///
/// # Examples
///
/// ```rust,ignore
/// use promcommon::testing::mocks::{MetricEvent, RecordingMetrics};
/// use promcommon::CacheObserver;
///
/// let metrics = RecordingMetrics::new();
/// metrics.inc_hits("user_by_id");
/// assert_eq!(
///     metrics.events(),
///     vec![MetricEvent::CacheHit { operation: "user_by_id".to_string() }]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingMetrics {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingMetrics {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event recorded so far, in call order
    pub fn events(&self) -> Vec<MetricEvent> {
        self.lock().events.clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&MetricEvent) -> bool) -> usize {
        self.lock().events.iter().filter(|event| predicate(event)).count()
    }

    /// Net in-flight value for `operation`
    pub fn in_flight(&self, operation: &str) -> i64 {
        self.lock().in_flight.get(operation).copied().unwrap_or(0)
    }

    /// Forget all recorded events and in-flight values
    pub fn reset(&self) {
        let mut guard = self.lock();
        guard.events.clear();
        guard.in_flight.clear();
    }

    fn push(&self, event: MetricEvent) {
        self.lock().events.push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn database(&self, verb: DbOperation, database: &str, operation: &str, result: &str) {
        self.push(MetricEvent::Database {
            verb,
            database: database.to_string(),
            operation: operation.to_string(),
            result: result.to_string(),
        });
    }

    fn database_timer(&self, verb: DbOperation, database: &str, operation: &str) -> DurationTimer {
        self.push(MetricEvent::DatabaseTimer {
            verb,
            database: database.to_string(),
            operation: operation.to_string(),
        });
        DurationTimer::noop()
    }
}

impl BrokerObserver for RecordingMetrics {
    fn inc_reads(&self, queue: &str, result: &str) {
        self.push(MetricEvent::BrokerRead { queue: queue.to_string(), result: result.to_string() });
    }

    fn inc_writes(&self, queue: &str, result: &str) {
        self.push(MetricEvent::BrokerWrite { queue: queue.to_string(), result: result.to_string() });
    }

    fn start_write_timer(&self, queue: &str) -> DurationTimer {
        self.push(MetricEvent::BrokerWriteTimer { queue: queue.to_string() });
        DurationTimer::noop()
    }
}

impl CacheObserver for RecordingMetrics {
    fn inc_hits(&self, operation: &str) {
        self.push(MetricEvent::CacheHit { operation: operation.to_string() });
    }

    fn inc_misses(&self, operation: &str) {
        self.push(MetricEvent::CacheMiss { operation: operation.to_string() });
    }
}

impl DatabaseObserver for RecordingMetrics {
    fn inc_selects(&self, database: &str, operation: &str, result: &str) {
        self.database(DbOperation::Select, database, operation, result);
    }

    fn inc_inserts(&self, database: &str, operation: &str, result: &str) {
        self.database(DbOperation::Insert, database, operation, result);
    }

    fn inc_updates(&self, database: &str, operation: &str, result: &str) {
        self.database(DbOperation::Update, database, operation, result);
    }

    fn inc_deletes(&self, database: &str, operation: &str, result: &str) {
        self.database(DbOperation::Delete, database, operation, result);
    }

    fn start_select_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.database_timer(DbOperation::Select, database, operation)
    }

    fn start_insert_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.database_timer(DbOperation::Insert, database, operation)
    }

    fn start_update_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.database_timer(DbOperation::Update, database, operation)
    }

    fn start_delete_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.database_timer(DbOperation::Delete, database, operation)
    }
}

impl HttpObserver for RecordingMetrics {
    fn inc_requests(&self, destination: &str, endpoint: &str, result: &str) {
        self.push(MetricEvent::HttpRequest {
            destination: destination.to_string(),
            endpoint: endpoint.to_string(),
            result: result.to_string(),
        });
    }

    fn start_request_timer(&self, destination: &str, endpoint: &str) -> DurationTimer {
        self.push(MetricEvent::HttpRequestTimer {
            destination: destination.to_string(),
            endpoint: endpoint.to_string(),
        });
        DurationTimer::noop()
    }
}

impl ProcessingObserver for RecordingMetrics {
    fn inc_processed(&self, entity_type: &str, result: &str) {
        self.push(MetricEvent::Processed {
            entity_type: entity_type.to_string(),
            result: result.to_string(),
        });
    }

    fn start_processing_timer(&self, entity_type: &str) -> DurationTimer {
        self.push(MetricEvent::ProcessingTimer { entity_type: entity_type.to_string() });
        DurationTimer::noop()
    }

    fn inc_in_flight(&self, operation: &str) {
        let mut guard = self.lock();
        *guard.in_flight.entry(operation.to_string()).or_insert(0) += 1;
        guard.events.push(MetricEvent::InFlightInc { operation: operation.to_string() });
    }

    fn dec_in_flight(&self, operation: &str) {
        let mut guard = self.lock();
        *guard.in_flight.entry(operation.to_string()).or_insert(0) -= 1;
        guard.events.push(MetricEvent::InFlightDec { operation: operation.to_string() });
    }
}
