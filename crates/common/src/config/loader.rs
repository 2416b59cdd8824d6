//! Configuration loader
//!
//! Loads [`MetricsConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory if one exists
//! 2. If any `PROMCOMMON_*` variable is set, configuration comes from the
//!    environment
//! 3. Otherwise probes for a config file (JSON or TOML)
//! 4. Otherwise falls back to [`MetricsConfig::default`]
//!
//! ## Environment Variables
//! - `PROMCOMMON_NAMESPACE`: instrument name prefix
//! - `PROMCOMMON_CONST_LABELS`: constant labels as `key=value,key=value`
//! - `PROMCOMMON_BUILD_INFO_ENABLED`: register `build_info` (true/false)
//! - `PROMCOMMON_BUILD_PACKAGE`: `package` label of `build_info`
//! - `PROMCOMMON_BUILD_VERSION`: `version` label of `build_info`
//! - `PROMCOMMON_BUILD_REVISION`: `revision` label of `build_info`
//!
//! ## File Locations
//! `./promcommon.toml`, `./promcommon.json`, `./metrics.toml`,
//! `./metrics.json` in the current working directory, in that order.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{BuildInfoConfig, MetricsConfig};
use crate::error::{MetricsError, MetricsResult};

const ENV_PREFIX: &str = "PROMCOMMON_";
const ENV_NAMESPACE: &str = "PROMCOMMON_NAMESPACE";
const ENV_CONST_LABELS: &str = "PROMCOMMON_CONST_LABELS";
const ENV_BUILD_INFO_ENABLED: &str = "PROMCOMMON_BUILD_INFO_ENABLED";
const ENV_BUILD_PACKAGE: &str = "PROMCOMMON_BUILD_PACKAGE";
const ENV_BUILD_VERSION: &str = "PROMCOMMON_BUILD_VERSION";
const ENV_BUILD_REVISION: &str = "PROMCOMMON_BUILD_REVISION";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns [`MetricsError::Config`] if a source exists but is malformed or
/// fails validation.
pub fn load() -> MetricsResult<MetricsConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) => tracing::trace!(error = %e, "No .env file loaded"),
    }

    if has_prefixed_var(std::env::vars_os()) {
        let config = load_from_env()?;
        tracing::info!("Metrics configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(&path),
        None => {
            tracing::debug!("No metrics configuration found, using defaults");
            Ok(MetricsConfig::default())
        }
    }
}

/// Whether any variable name starts with `PROMCOMMON_`; non-UTF-8 names
/// and values are skipped
fn has_prefixed_var<I>(vars: I) -> bool
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().any(|(key, _)| key.to_str().is_some_and(|k| k.starts_with(ENV_PREFIX)))
}

/// Load configuration from `PROMCOMMON_*` environment variables
///
/// Unset variables keep their default values.
///
/// # Errors
/// Returns [`MetricsError::Config`] for unparsable values or an invalid
/// resulting configuration.
pub fn load_from_env() -> MetricsResult<MetricsConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from any key lookup (environment, test maps)
pub(crate) fn load_from_lookup<F>(lookup: F) -> MetricsResult<MetricsConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let namespace = lookup(ENV_NAMESPACE).filter(|s| !s.trim().is_empty());
    let const_labels = match lookup(ENV_CONST_LABELS) {
        Some(raw) => parse_const_labels(&raw)?,
        None => BTreeMap::new(),
    };
    let enabled = match lookup(ENV_BUILD_INFO_ENABLED) {
        Some(raw) => parse_bool(ENV_BUILD_INFO_ENABLED, &raw)?,
        None => true,
    };

    let config = MetricsConfig {
        namespace,
        const_labels,
        build_info: BuildInfoConfig {
            enabled,
            package: lookup(ENV_BUILD_PACKAGE),
            version: lookup(ENV_BUILD_VERSION),
            revision: lookup(ENV_BUILD_REVISION),
        },
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// Format is detected by extension (`.json` or `.toml`).
///
/// # Errors
/// Returns [`MetricsError::Config`] if the file is missing, unreadable,
/// malformed or fails validation.
pub fn load_from_file(path: &Path) -> MetricsResult<MetricsConfig> {
    if !path.exists() {
        return Err(MetricsError::config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading metrics configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| MetricsError::config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> MetricsResult<MetricsConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MetricsError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MetricsError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(MetricsError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the current working directory
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_in(&cwd)
}

pub(crate) fn probe_in(dir: &Path) -> Option<PathBuf> {
    ["promcommon.toml", "promcommon.json", "metrics.toml", "metrics.json"]
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Parse `key=value,key=value` into constant labels
///
/// Whitespace around keys and values is trimmed; empty segments are
/// skipped.
///
/// # Errors
/// Returns [`MetricsError::Config`] for segments without `=`, empty keys or
/// repeated keys.
pub fn parse_const_labels(raw: &str) -> MetricsResult<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=').ok_or_else(|| {
            MetricsError::config(format!("constant label `{segment}` is not key=value"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(MetricsError::config(format!("constant label `{segment}` has no name")));
        }
        if labels.insert(key.to_string(), value.trim().to_string()).is_some() {
            return Err(MetricsError::config(format!("constant label `{key}` given twice")));
        }
    }
    Ok(labels)
}

fn parse_bool(key: &str, raw: &str) -> MetricsResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MetricsError::config(format!("{key}: expected a boolean, got `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = load_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MetricsConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load_from_lookup(lookup(&[
            (ENV_NAMESPACE, "orders"),
            (ENV_CONST_LABELS, "region=eu-west-1, tier = gold"),
            (ENV_BUILD_INFO_ENABLED, "off"),
            (ENV_BUILD_PACKAGE, "orders-worker"),
            (ENV_BUILD_VERSION, "1.4.2"),
            (ENV_BUILD_REVISION, "9f1c2ab"),
        ]))
        .unwrap();

        assert_eq!(config.namespace.as_deref(), Some("orders"));
        assert_eq!(config.const_labels.get("region").map(String::as_str), Some("eu-west-1"));
        assert_eq!(config.const_labels.get("tier").map(String::as_str), Some("gold"));
        assert!(!config.build_info.enabled);
        assert_eq!(config.build_info.package.as_deref(), Some("orders-worker"));
        assert_eq!(config.build_info.version.as_deref(), Some("1.4.2"));
        assert_eq!(config.build_info.revision.as_deref(), Some("9f1c2ab"));
    }

    #[test]
    fn blank_namespace_is_ignored() {
        let config = load_from_lookup(lookup(&[(ENV_NAMESPACE, "  ")])).unwrap();
        assert!(config.namespace.is_none());
    }

    #[test]
    fn invalid_boolean_is_rejected() {
        let err = load_from_lookup(lookup(&[(ENV_BUILD_INFO_ENABLED, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_BUILD_INFO_ENABLED));
    }

    #[test]
    fn invalid_namespace_from_env_is_rejected() {
        assert!(load_from_lookup(lookup(&[(ENV_NAMESPACE, "orders-api")])).is_err());
    }

    #[test]
    fn const_label_parsing_edge_cases() {
        assert!(parse_const_labels("").unwrap().is_empty());
        assert_eq!(parse_const_labels("a=1,,b=").unwrap().len(), 2);
        assert!(parse_const_labels("novalue").is_err());
        assert!(parse_const_labels("=1").is_err());
        assert!(parse_const_labels("a=1,a=2").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = parse_config("namespace = \"x\"", Path::new("metrics.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_is_tolerated() {
        use std::os::unix::ffi::OsStringExt;

        let garbage = OsString::from_vec(vec![0xff, 0xfe]);
        let vars = vec![
            (OsString::from("PATH"), garbage.clone()),
            (garbage.clone(), OsString::from("x")),
        ];
        assert!(!has_prefixed_var(vars.clone()));

        let mut with_prefix = vars;
        with_prefix.push((OsString::from(ENV_NAMESPACE), garbage));
        assert!(has_prefixed_var(with_prefix));
    }

    #[cfg(unix)]
    #[test]
    fn load_survives_non_utf8_variable() {
        use std::os::unix::ffi::OsStrExt;

        let key = "PROMCOMMON_TEST_NON_UTF8_VALUE";
        std::env::set_var(key, std::ffi::OsStr::from_bytes(b"\xff\xfe"));
        let result = std::panic::catch_unwind(load);
        std::env::remove_var(key);

        // The prefixed variable switches to env mode; its value is never read.
        assert!(result.is_ok(), "load panicked");
    }

    #[test]
    fn probing_prefers_promcommon_toml() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_in(dir.path()).is_none());

        std::fs::write(dir.path().join("metrics.json"), "{}").unwrap();
        assert_eq!(probe_in(dir.path()), Some(dir.path().join("metrics.json")));

        std::fs::write(dir.path().join("promcommon.toml"), "").unwrap();
        assert_eq!(probe_in(dir.path()), Some(dir.path().join("promcommon.toml")));
    }
}
