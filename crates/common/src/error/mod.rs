//! Error types for metric group construction and configuration
//!
//! Only two classes of failure exist in this crate:
//!
//! 1. **Construction-time failures**: an instrument descriptor is invalid or
//!    its name collides with one already present in the registry. These are
//!    fatal; callers should abort startup with `?` rather than carry on with
//!    instruments the registry will never export.
//!
//! 2. **Configuration failures**: the metrics configuration could not be
//!    loaded, parsed or validated.
//!
//! Hot-path operations (`inc_*`, `start_*_timer`, in-flight tracking) are
//! infallible and never produce a [`MetricsError`]. Caller misuse such as a
//! wrong result label or an unpaired in-flight decrement shows up only as
//! incorrect metric values.
//!
//! ## Examples
//!
//! ```rust
//! use prometheus::Registry;
//! use promcommon::{CacheMetrics, MetricsError};
//!
//! let registry = Registry::new();
//! let _cache = CacheMetrics::new(&registry).unwrap();
//!
//! match CacheMetrics::new(&registry) {
//!     Err(err) => assert!(err.is_duplicate()),
//!     Ok(_) => unreachable!("second registration must be rejected"),
//! }
//! # let _: Option<MetricsError> = None;
//! ```

use thiserror::Error;

/// Errors raised while building metric groups or loading configuration
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The registry rejected an instrument, usually because the name is
    /// already registered
    #[error("failed to register metric `{metric}`: {source}")]
    Registration {
        /// Fully qualified instrument name
        metric: String,
        /// Underlying registry error
        #[source]
        source: prometheus::Error,
    },

    /// The instrument descriptor itself is invalid (name, labels, buckets)
    #[error("invalid metric descriptor `{metric}`: {source}")]
    Instrument {
        /// Instrument name as requested
        metric: String,
        /// Underlying descriptor error
        #[source]
        source: prometheus::Error,
    },

    /// Configuration could not be loaded or failed validation
    #[error("metrics configuration error: {0}")]
    Config(String),

    /// Gathered metric families could not be encoded
    #[error("metrics encoding error: {0}")]
    Encode(String),
}

/// Message prefix `prometheus` uses when a name is reused with another
/// label set or help string
const CONFLICTING_DESCRIPTOR: &str = "a previously registered descriptor with the same fully-qualified name";

impl MetricsError {
    pub(crate) fn registration(metric: impl Into<String>, source: prometheus::Error) -> Self {
        Self::Registration { metric: metric.into(), source }
    }

    pub(crate) fn instrument(metric: impl Into<String>, source: prometheus::Error) -> Self {
        Self::Instrument { metric: metric.into(), source }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true when the registry refused a name it already holds
    ///
    /// Covers both an identical descriptor and one reusing the name with a
    /// different label set or help string.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::Registration { source: prometheus::Error::AlreadyReg, .. } => true,
            Self::Registration { source: prometheus::Error::Msg(message), .. } => {
                message.contains(CONFLICTING_DESCRIPTOR)
            }
            _ => false,
        }
    }

    /// Name of the instrument involved, if any
    pub fn metric(&self) -> Option<&str> {
        match self {
            Self::Registration { metric, .. } | Self::Instrument { metric, .. } => Some(metric),
            Self::Config(_) | Self::Encode(_) => None,
        }
    }
}

/// Result alias used throughout the crate
pub type MetricsResult<T> = Result<T, MetricsError>;
