//! Registry construction and text exposition
//!
//! The registry is created once at process start and passed explicitly to
//! every metric group constructor. This crate never keeps a global registry.

use std::collections::HashMap;

use prometheus::{Encoder, Registry, TextEncoder};
use tracing::info;

use crate::config::MetricsConfig;
use crate::error::{MetricsError, MetricsResult};

/// Build the process registry described by `config`
///
/// Without a namespace or constant labels this is a plain `Registry::new()`
/// and instrument names are exported exactly as declared. A namespace is
/// prepended to every instrument name (`<namespace>_<name>`), which changes
/// the exported names.
///
/// # Errors
/// Returns [`MetricsError::Config`] if the configuration is invalid.
pub fn build_registry(config: &MetricsConfig) -> MetricsResult<Registry> {
    config.validate()?;

    if config.namespace.is_none() && config.const_labels.is_empty() {
        return Ok(Registry::new());
    }

    let const_labels = if config.const_labels.is_empty() {
        None
    } else {
        let labels: HashMap<String, String> =
            config.const_labels.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Some(labels)
    };

    let registry = Registry::new_custom(config.namespace.clone(), const_labels)
        .map_err(|e| MetricsError::config(format!("invalid registry settings: {e}")))?;

    info!(
        namespace = config.namespace.as_deref().unwrap_or(""),
        const_labels = config.const_labels.len(),
        "Metrics registry created"
    );
    Ok(registry)
}

/// Gather every registered instrument and encode it in the text format
///
/// # Errors
/// Returns [`MetricsError::Encode`] if encoding fails.
pub fn render(registry: &Registry) -> MetricsResult<String> {
    let encoder = TextEncoder::new();
    let families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer).map_err(|e| MetricsError::Encode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| MetricsError::Encode(e.to_string()))
}
