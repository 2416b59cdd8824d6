//! Cache hit/miss counters

use std::fmt;

use prometheus::{IntCounterVec, Registry};
use tracing::info;

use super::instruments::counter_vec;
use super::traits::CacheObserver;
use crate::error::MetricsResult;

pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";

/// Hits and misses keyed by the cache access site
#[derive(Clone)]
pub struct CacheMetrics {
    hits_total: IntCounterVec,
    misses_total: IntCounterVec,
}

impl CacheMetrics {
    /// Create the cache counters and register them with `registry`
    ///
    /// # Errors
    /// Fails if either counter name is already registered.
    pub fn new(registry: &Registry) -> MetricsResult<Self> {
        let hits_total = counter_vec(
            registry,
            CACHE_HITS_TOTAL,
            "Count of records found in cache",
            &["operation"],
        )?;
        let misses_total = counter_vec(
            registry,
            CACHE_MISSES_TOTAL,
            "Count of records not found in cache",
            &["operation"],
        )?;

        info!(metrics = ?[CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL], "Cache metrics registered");
        Ok(Self { hits_total, misses_total })
    }
}

impl CacheObserver for CacheMetrics {
    fn inc_hits(&self, operation: &str) {
        self.hits_total.with_label_values(&[operation]).inc();
    }

    fn inc_misses(&self, operation: &str) {
        self.misses_total.with_label_values(&[operation]).inc();
    }
}

impl fmt::Debug for CacheMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheMetrics")
            .field("hits_total", &CACHE_HITS_TOTAL)
            .field("misses_total", &CACHE_MISSES_TOTAL)
            .finish()
    }
}
