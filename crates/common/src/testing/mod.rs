//! Testing utilities and helpers
//!
//! - **[`mocks`]**: [`RecordingMetrics`], a fake implementing every observer
//!   trait
//! - [`init_test_tracing`]: installs a `tracing` subscriber honoring
//!   `RUST_LOG`, once per process
//!
//! ## Usage
//!
//! ```rust,ignore
//! use promcommon::testing::{init_test_tracing, RecordingMetrics};
//! use promcommon::BrokerObserver;
//!
//! init_test_tracing();
//! let metrics = RecordingMetrics::new();
//! metrics.inc_reads("orders", promcommon::labels::ATTEMPT);
//! assert_eq!(metrics.events().len(), 1);
//! ```

pub mod mocks;

use tracing_subscriber::EnvFilter;

// Re-export commonly used items
pub use mocks::{MetricEvent, RecordingMetrics};

/// Install a test-friendly subscriber; later calls are no-ops
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
