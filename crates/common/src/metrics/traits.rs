//! Capability traits consumed by instrumented code
//!
//! Application code depends on these narrow traits rather than on the
//! concrete metric groups, so it can be exercised against [`NoOpMetrics`]
//! or a recording fake in tests. None of the methods can fail.
//!
//! `result` arguments follow the attempt/failure convention
//! ([`crate::labels::ATTEMPT`], [`crate::labels::FAILURE`]); the value is
//! passed through unchecked.

use std::fmt::Debug;

use super::timer::DurationTimer;

// ============================================================================
// Broker
// ============================================================================

/// Message queue reads, writes and write latency
pub trait BrokerObserver: Send + Sync + Debug {
    /// Count a read from `queue`
    fn inc_reads(&self, queue: &str, result: &str);

    /// Count a write to `queue`
    fn inc_writes(&self, queue: &str, result: &str);

    /// Start timing a write to `queue`
    fn start_write_timer(&self, queue: &str) -> DurationTimer;
}

// ============================================================================
// Cache
// ============================================================================

/// Cache hit/miss accounting per access site
pub trait CacheObserver: Send + Sync + Debug {
    /// Count a record found in cache
    fn inc_hits(&self, operation: &str);

    /// Count a record not found in cache
    fn inc_misses(&self, operation: &str);
}

// ============================================================================
// Database
// ============================================================================

/// Per-verb database statement counters and latencies
pub trait DatabaseObserver: Send + Sync + Debug {
    fn inc_selects(&self, database: &str, operation: &str, result: &str);
    fn inc_inserts(&self, database: &str, operation: &str, result: &str);
    fn inc_updates(&self, database: &str, operation: &str, result: &str);
    fn inc_deletes(&self, database: &str, operation: &str, result: &str);

    fn start_select_timer(&self, database: &str, operation: &str) -> DurationTimer;
    fn start_insert_timer(&self, database: &str, operation: &str) -> DurationTimer;
    fn start_update_timer(&self, database: &str, operation: &str) -> DurationTimer;
    fn start_delete_timer(&self, database: &str, operation: &str) -> DurationTimer;
}

// ============================================================================
// Outgoing HTTP
// ============================================================================

/// Requests sent to other services
pub trait HttpObserver: Send + Sync + Debug {
    /// Count a request to `endpoint` on `destination`
    fn inc_requests(&self, destination: &str, endpoint: &str, result: &str);

    /// Start timing a request to `endpoint` on `destination`
    fn start_request_timer(&self, destination: &str, endpoint: &str) -> DurationTimer;
}

// ============================================================================
// Processing
// ============================================================================

/// Generic entity processing plus in-flight concurrency
///
/// `inc_in_flight` and `dec_in_flight` must be paired by the caller; prefer
/// [`super::processing::InFlightGuard`], which releases on every exit path.
pub trait ProcessingObserver: Send + Sync + Debug {
    /// Count one processed entity of `entity_type`
    fn inc_processed(&self, entity_type: &str, result: &str);

    /// Start timing the processing of one `entity_type` entity
    fn start_processing_timer(&self, entity_type: &str) -> DurationTimer;

    /// One more unit of `operation` work in progress
    fn inc_in_flight(&self, operation: &str);

    /// One unit of `operation` work finished
    fn dec_in_flight(&self, operation: &str);
}

// ============================================================================
// No-Op Implementation
// ============================================================================

/// Metrics sink that records nothing
///
/// Useful for tests and for binaries that run with metrics disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl BrokerObserver for NoOpMetrics {
    fn inc_reads(&self, _queue: &str, _result: &str) {}

    fn inc_writes(&self, _queue: &str, _result: &str) {}

    fn start_write_timer(&self, _queue: &str) -> DurationTimer {
        DurationTimer::noop()
    }
}

impl CacheObserver for NoOpMetrics {
    fn inc_hits(&self, _operation: &str) {}

    fn inc_misses(&self, _operation: &str) {}
}

impl DatabaseObserver for NoOpMetrics {
    fn inc_selects(&self, _database: &str, _operation: &str, _result: &str) {}

    fn inc_inserts(&self, _database: &str, _operation: &str, _result: &str) {}

    fn inc_updates(&self, _database: &str, _operation: &str, _result: &str) {}

    fn inc_deletes(&self, _database: &str, _operation: &str, _result: &str) {}

    fn start_select_timer(&self, _database: &str, _operation: &str) -> DurationTimer {
        DurationTimer::noop()
    }

    fn start_insert_timer(&self, _database: &str, _operation: &str) -> DurationTimer {
        DurationTimer::noop()
    }

    fn start_update_timer(&self, _database: &str, _operation: &str) -> DurationTimer {
        DurationTimer::noop()
    }

    fn start_delete_timer(&self, _database: &str, _operation: &str) -> DurationTimer {
        DurationTimer::noop()
    }
}

impl HttpObserver for NoOpMetrics {
    fn inc_requests(&self, _destination: &str, _endpoint: &str, _result: &str) {}

    fn start_request_timer(&self, _destination: &str, _endpoint: &str) -> DurationTimer {
        DurationTimer::noop()
    }
}

impl ProcessingObserver for NoOpMetrics {
    fn inc_processed(&self, _entity_type: &str, _result: &str) {}

    fn start_processing_timer(&self, _entity_type: &str) -> DurationTimer {
        DurationTimer::noop()
    }

    fn inc_in_flight(&self, _operation: &str) {}

    fn dec_in_flight(&self, _operation: &str) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::labels::{ATTEMPT, POSTGRESQL};

    /// Instrumented code written against the trait objects compiles and runs
    /// with the no-op sink.
    #[test]
    fn noop_metrics_satisfy_every_trait() {
        let broker: Arc<dyn BrokerObserver> = Arc::new(NoOpMetrics);
        let cache: Arc<dyn CacheObserver> = Arc::new(NoOpMetrics);
        let database: Arc<dyn DatabaseObserver> = Arc::new(NoOpMetrics);
        let http: Arc<dyn HttpObserver> = Arc::new(NoOpMetrics);
        let processing: Arc<dyn ProcessingObserver> = Arc::new(NoOpMetrics);

        broker.inc_reads("orders", ATTEMPT);
        broker.inc_writes("orders", ATTEMPT);
        assert!(broker.start_write_timer("orders").is_noop());

        cache.inc_hits("user_by_id");
        cache.inc_misses("user_by_id");

        database.inc_selects(POSTGRESQL, "GetUser", ATTEMPT);
        database.inc_deletes(POSTGRESQL, "DropUser", ATTEMPT);
        assert!(database.start_update_timer(POSTGRESQL, "RenameUser").is_noop());

        http.inc_requests("billing", "/v1/charge", ATTEMPT);
        assert!(http.start_request_timer("billing", "/v1/charge").is_noop());

        processing.inc_processed("invoice", ATTEMPT);
        processing.inc_in_flight("ingest");
        processing.dec_in_flight("ingest");
        assert!(processing.start_processing_timer("invoice").is_noop());
    }
}
