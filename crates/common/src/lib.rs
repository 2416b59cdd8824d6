//! Typed Prometheus metric groups for application code.
//!
//! Each metric group (broker, cache, database, outgoing HTTP, processing)
//! constructs its labeled instruments once, registers them with an
//! explicitly passed [`prometheus::Registry`], and exposes narrow
//! increment / start-timer methods through a capability trait. Calling code
//! never deals with instrument names or label schemas.
//!
//! ```rust
//! use prometheus::Registry;
//! use promcommon::labels::{ATTEMPT, FAILURE, POSTGRESQL};
//! use promcommon::{render, DatabaseMetrics, DatabaseObserver};
//!
//! let registry = Registry::new();
//! let db = DatabaseMetrics::new(&registry).unwrap();
//!
//! db.inc_selects(POSTGRESQL, "GetUser", ATTEMPT);
//! let timer = db.start_select_timer(POSTGRESQL, "GetUser");
//! // ... run the query, on error:
//! db.inc_selects(POSTGRESQL, "GetUser", FAILURE);
//! timer.observe_duration();
//!
//! let exposition = render(&registry).unwrap();
//! assert!(exposition.contains("database_selects_total"));
//! ```
//!
//! # Modules
//!
//! - [`labels`]: canonical label values and the shared bucket schema
//! - [`metrics`]: metric groups, traits, timers and registry helpers
//! - [`config`]: registry / build-info configuration and its loader
//! - [`error`]: construction and configuration errors
//! - `testing` (feature `test-utils`): recording fakes

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod config;
pub mod error;
pub mod labels;
pub mod metrics;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use config::{BuildInfoConfig, MetricsConfig};
pub use error::{MetricsError, MetricsResult};
pub use labels::{DatabaseSystem, Outcome, DURATION_BUCKETS};
pub use metrics::{
    build_registry, register_build_info, render, BrokerMetrics, BrokerObserver, BuildInfo,
    CacheMetrics, CacheObserver, DatabaseMetrics, DatabaseObserver, DbOperation, DurationTimer,
    HttpMetrics, HttpObserver, InFlightGuard, MetricsSuite, NoOpMetrics, ProcessingMetrics,
    ProcessingObserver,
};
