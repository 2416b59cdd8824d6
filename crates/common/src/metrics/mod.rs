//! Typed metric groups
//!
//! Each group owns its instruments, registers them once in its constructor
//! and exposes narrow increment / timer methods through a capability trait:
//!
//! | Group | Trait | Instruments |
//! |-------|-------|-------------|
//! | [`BrokerMetrics`] | [`BrokerObserver`] | reads, writes, write duration per queue |
//! | [`CacheMetrics`] | [`CacheObserver`] | hits, misses per operation |
//! | [`DatabaseMetrics`] | [`DatabaseObserver`] | per-verb counters and durations |
//! | [`HttpMetrics`] | [`HttpObserver`] | outgoing requests and durations |
//! | [`ProcessingMetrics`] | [`ProcessingObserver`] | processed entities, duration, in-flight |
//!
//! All duration histograms share [`crate::labels::DURATION_BUCKETS`].
//! Instruments are safe to use from any number of threads at once; the
//! underlying `prometheus` types are atomic.

pub mod broker;
pub mod build_info;
pub mod cache;
pub mod database;
pub mod http;
mod instruments;
pub mod processing;
pub mod registry;
pub mod suite;
pub mod timer;
pub mod traits;

// Re-export commonly used types
pub use broker::BrokerMetrics;
pub use build_info::{register_build_info, BuildInfo};
pub use cache::CacheMetrics;
pub use database::{DatabaseMetrics, DbOperation};
pub use http::HttpMetrics;
pub use processing::{InFlightGuard, ProcessingMetrics};
pub use registry::{build_registry, render};
pub use suite::MetricsSuite;
pub use timer::DurationTimer;
pub use traits::{
    BrokerObserver, CacheObserver, DatabaseObserver, HttpObserver, NoOpMetrics,
    ProcessingObserver,
};
