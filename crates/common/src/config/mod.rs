//! Metrics configuration
//!
//! Every field is optional; an empty configuration yields a plain registry
//! whose instrument names match the exported names exactly, with build info
//! enabled.

pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::labels::INSTRUMENT_LABEL_NAMES;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, parse_const_labels, probe_config_paths};

/// Registry and build-info settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prefix prepended to every instrument name (`<namespace>_<name>`)
    pub namespace: Option<String>,
    /// Labels attached to every exported series
    pub const_labels: BTreeMap<String, String>,
    /// Build metadata gauge
    pub build_info: BuildInfoConfig,
}

/// Settings for the `build_info` gauge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInfoConfig {
    pub enabled: bool,
    /// Defaults to the running executable's file stem
    pub package: Option<String>,
    /// Defaults to `unknown`
    pub version: Option<String>,
    /// Defaults to `unknown`
    pub revision: Option<String>,
}

impl Default for BuildInfoConfig {
    fn default() -> Self {
        Self { enabled: true, package: None, version: None, revision: None }
    }
}

impl MetricsConfig {
    /// Check namespace and constant label names against the exposition
    /// format's naming rules
    ///
    /// Constant labels may not reuse a label name of any instrument in this
    /// crate, see [`INSTRUMENT_LABEL_NAMES`].
    ///
    /// # Errors
    /// Returns [`MetricsError::Config`] describing the first invalid field.
    pub fn validate(&self) -> MetricsResult<()> {
        if let Some(namespace) = &self.namespace {
            if namespace.is_empty() {
                return Err(MetricsError::config("namespace must not be empty"));
            }
            if !is_valid_metric_name(namespace) {
                return Err(MetricsError::config(format!("invalid namespace `{namespace}`")));
            }
        }

        for name in self.const_labels.keys() {
            if !is_valid_label_name(name) {
                return Err(MetricsError::config(format!("invalid constant label name `{name}`")));
            }
            if name.starts_with("__") {
                return Err(MetricsError::config(format!(
                    "constant label name `{name}` uses the reserved `__` prefix"
                )));
            }
            if INSTRUMENT_LABEL_NAMES.contains(&name.as_str()) {
                return Err(MetricsError::config(format!(
                    "constant label name `{name}` collides with an instrument label"
                )));
            }
        }
        Ok(())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
