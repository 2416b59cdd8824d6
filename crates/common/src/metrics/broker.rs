//! Message broker metrics, labeled per queue

use std::fmt;

use prometheus::{HistogramVec, IntCounterVec, Registry};
use tracing::info;

use super::instruments::{counter_vec, duration_histogram_vec};
use super::timer::DurationTimer;
use super::traits::BrokerObserver;
use crate::error::MetricsResult;

pub const BROKER_READS_TOTAL: &str = "broker_messages_reads_total";
pub const BROKER_WRITES_TOTAL: &str = "broker_messages_writes_total";
pub const BROKER_WRITE_DURATION: &str = "broker_write_duration";

/// Reads, writes and write latency for every queue a process talks to
#[derive(Clone)]
pub struct BrokerMetrics {
    reads_total: IntCounterVec,
    writes_total: IntCounterVec,
    write_duration: HistogramVec,
}

impl BrokerMetrics {
    /// Create the broker instruments and register them with `registry`
    ///
    /// # Errors
    /// Fails if any instrument name is already registered.
    pub fn new(registry: &Registry) -> MetricsResult<Self> {
        let reads_total = counter_vec(
            registry,
            BROKER_READS_TOTAL,
            "Count of messages read from queues, attempts and failures separately",
            &["queue", "result"],
        )?;
        let writes_total = counter_vec(
            registry,
            BROKER_WRITES_TOTAL,
            "Count of messages written to queues, attempts and failures separately",
            &["queue", "result"],
        )?;
        let write_duration = duration_histogram_vec(
            registry,
            BROKER_WRITE_DURATION,
            "A Histogram of the write operation duration in seconds",
            &["queue"],
        )?;

        info!(
            metrics = ?[BROKER_READS_TOTAL, BROKER_WRITES_TOTAL, BROKER_WRITE_DURATION],
            "Broker metrics registered"
        );
        Ok(Self { reads_total, writes_total, write_duration })
    }
}

impl BrokerObserver for BrokerMetrics {
    fn inc_reads(&self, queue: &str, result: &str) {
        self.reads_total.with_label_values(&[queue, result]).inc();
    }

    fn inc_writes(&self, queue: &str, result: &str) {
        self.writes_total.with_label_values(&[queue, result]).inc();
    }

    fn start_write_timer(&self, queue: &str) -> DurationTimer {
        DurationTimer::start(self.write_duration.with_label_values(&[queue]))
    }
}

impl fmt::Debug for BrokerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerMetrics")
            .field("reads_total", &BROKER_READS_TOTAL)
            .field("writes_total", &BROKER_WRITES_TOTAL)
            .field("write_duration", &BROKER_WRITE_DURATION)
            .finish()
    }
}
