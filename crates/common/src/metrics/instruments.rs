//! Instrument construction and registration shared by every metric group

use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry};
use tracing::{debug, warn};

use crate::error::{MetricsError, MetricsResult};
use crate::labels::duration_buckets;

/// Build and register a labeled integer counter
pub(crate) fn counter_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> MetricsResult<IntCounterVec> {
    let counter = IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| MetricsError::instrument(name, source))?;
    register(registry, name, &counter)?;
    Ok(counter)
}

/// Build and register a labeled histogram over the shared duration buckets
pub(crate) fn duration_histogram_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> MetricsResult<HistogramVec> {
    let opts = HistogramOpts::new(name, help).buckets(duration_buckets());
    let histogram =
        HistogramVec::new(opts, labels).map_err(|source| MetricsError::instrument(name, source))?;
    register(registry, name, &histogram)?;
    Ok(histogram)
}

/// Build and register a labeled integer gauge
pub(crate) fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> MetricsResult<IntGaugeVec> {
    let gauge = IntGaugeVec::new(Opts::new(name, help), labels)
        .map_err(|source| MetricsError::instrument(name, source))?;
    register(registry, name, &gauge)?;
    Ok(gauge)
}

/// Register a clone of `collector`; the registry and the caller share the
/// same underlying series.
pub(crate) fn register<C>(registry: &Registry, name: &str, collector: &C) -> MetricsResult<()>
where
    C: Collector + Clone + 'static,
{
    match registry.register(Box::new(collector.clone())) {
        Ok(()) => {
            debug!(metric = name, "Registered metric");
            Ok(())
        }
        Err(source) => {
            warn!(metric = name, error = %source, "Metric registration rejected");
            Err(MetricsError::registration(name, source))
        }
    }
}
