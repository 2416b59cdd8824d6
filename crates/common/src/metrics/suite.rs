//! Every metric group, built together at startup

use std::sync::Arc;

use prometheus::Registry;
use tracing::info;

use super::broker::BrokerMetrics;
use super::build_info::{register_build_info, BuildInfo};
use super::cache::CacheMetrics;
use super::database::DatabaseMetrics;
use super::http::HttpMetrics;
use super::processing::ProcessingMetrics;
use crate::config::MetricsConfig;
use crate::error::MetricsResult;

/// All metric groups registered on one registry
///
/// Each field is shared behind an `Arc` so subsystems can hold only the
/// group they instrument, typically as `Arc<dyn ...Observer>`.
#[derive(Debug, Clone)]
pub struct MetricsSuite {
    pub broker: Arc<BrokerMetrics>,
    pub cache: Arc<CacheMetrics>,
    pub database: Arc<DatabaseMetrics>,
    pub http: Arc<HttpMetrics>,
    pub processing: Arc<ProcessingMetrics>,
}

impl MetricsSuite {
    /// Register every group, plus build info when enabled in `config`
    ///
    /// # Errors
    /// Fails on the first instrument that cannot be registered; a registry
    /// that already holds any of these groups is rejected.
    pub fn new(registry: &Registry, config: &MetricsConfig) -> MetricsResult<Self> {
        let suite = Self {
            broker: Arc::new(BrokerMetrics::new(registry)?),
            cache: Arc::new(CacheMetrics::new(registry)?),
            database: Arc::new(DatabaseMetrics::new(registry)?),
            http: Arc::new(HttpMetrics::new(registry)?),
            processing: Arc::new(ProcessingMetrics::new(registry)?),
        };

        if config.build_info.enabled {
            register_build_info(registry, &BuildInfo::from_config(&config.build_info))?;
        }

        info!(build_info = config.build_info.enabled, "Metrics suite initialized");
        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{ATTEMPT, POSTGRESQL};
    use crate::metrics::registry::render;
    use crate::metrics::{
        BrokerObserver, CacheObserver, DatabaseObserver, HttpObserver, ProcessingObserver,
    };

    #[test]
    fn suite_registers_every_group() {
        let registry = Registry::new();
        let suite = MetricsSuite::new(&registry, &MetricsConfig::default()).unwrap();

        suite.broker.inc_reads("orders", ATTEMPT);
        suite.cache.inc_misses("user_by_id");
        suite.database.inc_inserts(POSTGRESQL, "CreateUser", ATTEMPT);
        suite.http.inc_requests("billing", "/v1/charge", ATTEMPT);
        suite.processing.inc_processed("invoice", ATTEMPT);

        let exposition = render(&registry).unwrap();
        for name in [
            "broker_messages_reads_total",
            "cache_misses_total",
            "database_inserts_total",
            "outgoing_http_requests_total",
            "entities_processed_total",
            "build_info",
        ] {
            assert!(exposition.contains(&format!("# TYPE {name} ")), "missing {name}");
        }
    }

    #[test]
    fn build_info_can_be_disabled() {
        let mut config = MetricsConfig::default();
        config.build_info.enabled = false;
        let registry = Registry::new();
        let _suite = MetricsSuite::new(&registry, &config).unwrap();
        assert!(!render(&registry).unwrap().contains("build_info"));
    }

    #[test]
    fn second_suite_on_same_registry_fails() {
        let registry = Registry::new();
        let _suite = MetricsSuite::new(&registry, &MetricsConfig::default()).unwrap();
        let err = MetricsSuite::new(&registry, &MetricsConfig::default()).unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn groups_coerce_to_trait_objects() {
        let registry = Registry::new();
        let suite = MetricsSuite::new(&registry, &MetricsConfig::default()).unwrap();
        let database: Arc<dyn DatabaseObserver> = suite.database.clone();
        let processing: Arc<dyn ProcessingObserver> = suite.processing.clone();
        database.start_select_timer(POSTGRESQL, "GetUser").observe_duration();
        processing.inc_in_flight("ingest");
        processing.dec_in_flight("ingest");
        assert_eq!(suite.processing.in_flight("ingest"), 0);
    }
}
