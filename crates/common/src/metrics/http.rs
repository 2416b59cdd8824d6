//! Outgoing HTTP request metrics

use std::fmt;

use prometheus::{HistogramVec, IntCounterVec, Registry};
use tracing::info;

use super::instruments::{counter_vec, duration_histogram_vec};
use super::timer::DurationTimer;
use super::traits::HttpObserver;
use crate::error::MetricsResult;

pub const OUTGOING_HTTP_REQUESTS_TOTAL: &str = "outgoing_http_requests_total";
pub const OUTGOING_HTTP_REQUEST_DURATION: &str = "outgoing_http_request_duration";

/// Requests to other services, keyed by destination service and endpoint
#[derive(Clone)]
pub struct HttpMetrics {
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl HttpMetrics {
    /// Create the outgoing HTTP instruments and register them with `registry`
    ///
    /// # Errors
    /// Fails if either instrument name is already registered.
    pub fn new(registry: &Registry) -> MetricsResult<Self> {
        let requests_total = counter_vec(
            registry,
            OUTGOING_HTTP_REQUESTS_TOTAL,
            "Count of requests sent to other services - failures or attempts",
            &["destination", "endpoint", "result"],
        )?;
        let request_duration = duration_histogram_vec(
            registry,
            OUTGOING_HTTP_REQUEST_DURATION,
            "A Histogram of requests sent to other services duration in seconds",
            &["destination", "endpoint"],
        )?;

        info!(
            metrics = ?[OUTGOING_HTTP_REQUESTS_TOTAL, OUTGOING_HTTP_REQUEST_DURATION],
            "Outgoing HTTP metrics registered"
        );
        Ok(Self { requests_total, request_duration })
    }
}

impl HttpObserver for HttpMetrics {
    fn inc_requests(&self, destination: &str, endpoint: &str, result: &str) {
        self.requests_total.with_label_values(&[destination, endpoint, result]).inc();
    }

    fn start_request_timer(&self, destination: &str, endpoint: &str) -> DurationTimer {
        DurationTimer::start(self.request_duration.with_label_values(&[destination, endpoint]))
    }
}

impl fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMetrics")
            .field("requests_total", &OUTGOING_HTTP_REQUESTS_TOTAL)
            .field("request_duration", &OUTGOING_HTTP_REQUEST_DURATION)
            .finish()
    }
}
