//! Static build metadata exposed as a constant gauge

use prometheus::{IntGaugeVec, Opts, Registry};
use tracing::info;

use super::instruments::register;
use crate::config::BuildInfoConfig;
use crate::error::{MetricsError, MetricsResult};

pub const BUILD_INFO: &str = "build_info";

/// Label value used for metadata nobody supplied
pub const UNKNOWN: &str = "unknown";

/// Build metadata published under [`BUILD_INFO`]
///
/// A library cannot see the build identity of the binary it is linked
/// into, so the identity comes from the caller: [`build_info!`] expands
/// `env!("CARGO_PKG_NAME")` and friends inside the calling crate.
///
/// [`build_info!`]: crate::build_info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub package: String,
    pub version: String,
    pub revision: String,
}

/// [`BuildInfo`] of the crate invoking the macro
///
/// `revision` is read from `PROMCOMMON_BUILD_REVISION` at the caller's
/// compile time and is `unknown` when unset.
///
/// ```rust
/// let build = promcommon::build_info!();
/// assert_eq!(build.package, env!("CARGO_PKG_NAME"));
/// assert_eq!(build.version, env!("CARGO_PKG_VERSION"));
/// ```
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::BuildInfo {
            package: ::std::string::String::from(env!("CARGO_PKG_NAME")),
            version: ::std::string::String::from(env!("CARGO_PKG_VERSION")),
            revision: ::std::string::String::from(
                match option_env!("PROMCOMMON_BUILD_REVISION") {
                    Some(revision) => revision,
                    None => $crate::metrics::build_info::UNKNOWN,
                },
            ),
        }
    };
}

impl BuildInfo {
    /// Identity of the running executable: its file stem as `package`,
    /// `unknown` version and revision
    pub fn from_process() -> Self {
        let package = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_else(|| UNKNOWN.to_string());
        Self { package, version: UNKNOWN.to_string(), revision: UNKNOWN.to_string() }
    }

    /// Metadata from configuration, falling back to [`BuildInfo::from_process`]
    pub fn from_config(config: &BuildInfoConfig) -> Self {
        Self::from_process().overridden_by(config)
    }

    /// Replace every field `config` sets explicitly
    pub fn overridden_by(self, config: &BuildInfoConfig) -> Self {
        Self {
            package: config.package.clone().unwrap_or(self.package),
            version: config.version.clone().unwrap_or(self.version),
            revision: config.revision.clone().unwrap_or(self.revision),
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::from_process()
    }
}

/// Register `build_info{package, version, revision} 1` with `registry`
///
/// Call once at startup. A second call on the same registry is rejected
/// with a duplicate registration error and leaves the first series intact.
///
/// # Errors
/// Fails if [`BUILD_INFO`] is already registered.
pub fn register_build_info(registry: &Registry, build: &BuildInfo) -> MetricsResult<()> {
    let gauge = IntGaugeVec::new(
        Opts::new(BUILD_INFO, "A metric with a constant '1' value labeled by build metadata"),
        &["package", "version", "revision"],
    )
    .map_err(|source| MetricsError::instrument(BUILD_INFO, source))?;
    register(registry, BUILD_INFO, &gauge)?;

    gauge
        .with_label_values(&[build.package.as_str(), build.version.as_str(), build.revision.as_str()])
        .set(1);

    info!(
        package = %build.package,
        version = %build.version,
        revision = %build.revision,
        "Build info registered"
    );
    Ok(())
}
