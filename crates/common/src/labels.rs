//! Canonical label values and the shared duration bucket schema
//!
//! Instrument names, label names and the values below are a wire contract
//! with dashboards and alerting rules downstream. Do not rename them without
//! a migration plan.
//!
//! Label values passed by callers are free-form strings and are never
//! validated or bounded. Passing unbounded dynamic values (user IDs, raw
//! URLs) creates one series per distinct value inside the registry.

use std::fmt;

/// Result label emitted before every operation
pub const ATTEMPT: &str = "attempt";
/// Result label emitted additionally when an operation fails
pub const FAILURE: &str = "failure";

/// Database system identifier for PostgreSQL
pub const POSTGRESQL: &str = "postgresql";
/// Database system identifier for MySQL
pub const MYSQL: &str = "mysql";
/// Database system identifier for ClickHouse
pub const CLICKHOUSE: &str = "clickhouse";
/// Database system identifier for MongoDB
pub const MONGO: &str = "mongo";
/// Database system identifier for Aerospike
pub const AEROSPIKE: &str = "aerospike";

/// Bucket upper bounds (seconds) shared by every duration histogram
///
/// Extends the Prometheus default buckets so long operations such as 30s
/// queries still land in a finite bucket.
pub const DURATION_BUCKETS: [f64; 19] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0,
    90.0, 120.0, 300.0,
];

/// Label names the instruments of this crate declare, plus the
/// histogram bucket label `le`
///
/// Constant labels must not reuse any of them.
pub const INSTRUMENT_LABEL_NAMES: [&str; 11] = [
    "database",
    "destination",
    "endpoint",
    "entity_type",
    "le",
    "operation",
    "package",
    "queue",
    "result",
    "revision",
    "version",
];

/// Bucket schema as an owned vector, ready for `HistogramOpts::buckets`
pub fn duration_buckets() -> Vec<f64> {
    DURATION_BUCKETS.to_vec()
}

/// Outcome of an instrumented operation
///
/// Every operation records an [`Outcome::Attempt`]; failed operations also
/// record an [`Outcome::Failure`]. Success counts are derived downstream as
/// attempts minus failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Attempt,
    Failure,
}

impl Outcome {
    /// Label value for this outcome
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attempt => ATTEMPT,
            Self::Failure => FAILURE,
        }
    }
}

impl AsRef<str> for Outcome {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known database systems
///
/// Other systems can be labeled with any string; this enum only covers the
/// identifiers dashboards already know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseSystem {
    Postgresql,
    Mysql,
    Clickhouse,
    Mongo,
    Aerospike,
}

impl DatabaseSystem {
    /// Label value for this database system
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => POSTGRESQL,
            Self::Mysql => MYSQL,
            Self::Clickhouse => CLICKHOUSE,
            Self::Mongo => MONGO,
            Self::Aerospike => AEROSPIKE,
        }
    }
}

impl AsRef<str> for DatabaseSystem {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DatabaseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
