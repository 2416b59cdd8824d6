//! Database statement metrics
//!
//! One counter and one duration histogram per CRUD verb. Counters are
//! labeled `{database, operation, result}`, histograms `{database,
//! operation}`. `database` is normally one of the identifiers in
//! [`crate::labels`], but any string is accepted.
//!
//! Callers record an `attempt` before issuing a statement and a `failure`
//! only when it fails; nothing here enforces that.

use std::fmt;

use prometheus::{HistogramVec, IntCounterVec, Registry};
use tracing::info;

use super::instruments::{counter_vec, duration_histogram_vec};
use super::timer::DurationTimer;
use super::traits::DatabaseObserver;
use crate::error::MetricsResult;

/// CRUD verb a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbOperation {
    Select,
    Insert,
    Update,
    Delete,
}

impl DbOperation {
    /// Every verb, in registration order
    pub const ALL: [Self; 4] = [Self::Select, Self::Insert, Self::Update, Self::Delete];

    /// Name of the counter for this verb
    pub const fn counter_name(self) -> &'static str {
        match self {
            Self::Select => "database_selects_total",
            Self::Insert => "database_inserts_total",
            Self::Update => "database_updates_total",
            Self::Delete => "database_deletes_total",
        }
    }

    /// Name of the duration histogram for this verb
    pub const fn histogram_name(self) -> &'static str {
        match self {
            Self::Select => "database_select_duration",
            Self::Insert => "database_insert_duration",
            Self::Update => "database_update_duration",
            Self::Delete => "database_delete_duration",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            Self::Select => "selects",
            Self::Insert => "inserts",
            Self::Update => "updates",
            Self::Delete => "deletes",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone)]
struct VerbInstruments {
    total: IntCounterVec,
    duration: HistogramVec,
}

impl VerbInstruments {
    fn register(registry: &Registry, verb: DbOperation) -> MetricsResult<Self> {
        let total = counter_vec(
            registry,
            verb.counter_name(),
            &format!(
                "Count of {} sent to database, attempts and failures separately",
                verb.plural()
            ),
            &["database", "operation", "result"],
        )?;
        let duration = duration_histogram_vec(
            registry,
            verb.histogram_name(),
            &format!("A Histogram of the database {} duration in seconds", verb.plural()),
            &["database", "operation"],
        )?;
        Ok(Self { total, duration })
    }
}

/// Eight database instruments: four counters and four histograms
#[derive(Clone)]
pub struct DatabaseMetrics {
    verbs: [VerbInstruments; 4],
}

impl DatabaseMetrics {
    /// Create the database instruments and register them with `registry`
    ///
    /// # Errors
    /// Fails if any of the eight instrument names is already registered.
    pub fn new(registry: &Registry) -> MetricsResult<Self> {
        let verbs = [
            VerbInstruments::register(registry, DbOperation::Select)?,
            VerbInstruments::register(registry, DbOperation::Insert)?,
            VerbInstruments::register(registry, DbOperation::Update)?,
            VerbInstruments::register(registry, DbOperation::Delete)?,
        ];

        info!(instruments = DbOperation::ALL.len() * 2, "Database metrics registered");
        Ok(Self { verbs })
    }

    fn instruments(&self, verb: DbOperation) -> &VerbInstruments {
        &self.verbs[verb.index()]
    }

    /// Count one `verb` statement
    pub fn inc(&self, verb: DbOperation, database: &str, operation: &str, result: &str) {
        self.instruments(verb).total.with_label_values(&[database, operation, result]).inc();
    }

    /// Start timing one `verb` statement
    pub fn start_timer(&self, verb: DbOperation, database: &str, operation: &str) -> DurationTimer {
        DurationTimer::start(
            self.instruments(verb).duration.with_label_values(&[database, operation]),
        )
    }
}

impl DatabaseObserver for DatabaseMetrics {
    fn inc_selects(&self, database: &str, operation: &str, result: &str) {
        self.inc(DbOperation::Select, database, operation, result);
    }

    fn inc_inserts(&self, database: &str, operation: &str, result: &str) {
        self.inc(DbOperation::Insert, database, operation, result);
    }

    fn inc_updates(&self, database: &str, operation: &str, result: &str) {
        self.inc(DbOperation::Update, database, operation, result);
    }

    fn inc_deletes(&self, database: &str, operation: &str, result: &str) {
        self.inc(DbOperation::Delete, database, operation, result);
    }

    fn start_select_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.start_timer(DbOperation::Select, database, operation)
    }

    fn start_insert_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.start_timer(DbOperation::Insert, database, operation)
    }

    fn start_update_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.start_timer(DbOperation::Update, database, operation)
    }

    fn start_delete_timer(&self, database: &str, operation: &str) -> DurationTimer {
        self.start_timer(DbOperation::Delete, database, operation)
    }
}

impl fmt::Debug for DatabaseMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = DbOperation::ALL
            .iter()
            .flat_map(|verb| [verb.counter_name(), verb.histogram_name()])
            .collect();
        f.debug_struct("DatabaseMetrics").field("instruments", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{ATTEMPT, FAILURE, MYSQL, POSTGRESQL};
    use crate::metrics::registry::render;

    fn count(metrics: &DatabaseMetrics, verb: DbOperation, labels: &[&str; 3]) -> u64 {
        metrics.instruments(verb).total.with_label_values(labels).get()
    }

    #[test]
    fn verbs_are_indexed_in_declaration_order() {
        for (position, verb) in DbOperation::ALL.iter().enumerate() {
            assert_eq!(verb.index(), position);
        }
    }

    #[test]
    fn select_attempt_and_failure_are_separate_series() {
        let registry = Registry::new();
        let metrics = DatabaseMetrics::new(&registry).unwrap();

        metrics.inc_selects(POSTGRESQL, "GetUser", ATTEMPT);
        metrics.inc_selects(POSTGRESQL, "GetUser", FAILURE);

        assert_eq!(count(&metrics, DbOperation::Select, &[POSTGRESQL, "GetUser", ATTEMPT]), 1);
        assert_eq!(count(&metrics, DbOperation::Select, &[POSTGRESQL, "GetUser", FAILURE]), 1);
        assert_eq!(count(&metrics, DbOperation::Select, &[POSTGRESQL, "ListUsers", ATTEMPT]), 0);
        assert_eq!(count(&metrics, DbOperation::Insert, &[POSTGRESQL, "GetUser", ATTEMPT]), 0);
    }

    #[test]
    fn each_verb_routes_to_its_own_instruments() {
        let registry = Registry::new();
        let metrics = DatabaseMetrics::new(&registry).unwrap();

        metrics.inc_inserts(MYSQL, "CreateOrder", ATTEMPT);
        metrics.inc_updates(MYSQL, "ShipOrder", ATTEMPT);
        metrics.inc_updates(MYSQL, "ShipOrder", ATTEMPT);
        metrics.inc_deletes("cassandra", "PurgeOrder", ATTEMPT);

        assert_eq!(count(&metrics, DbOperation::Insert, &[MYSQL, "CreateOrder", ATTEMPT]), 1);
        assert_eq!(count(&metrics, DbOperation::Update, &[MYSQL, "ShipOrder", ATTEMPT]), 2);
        assert_eq!(count(&metrics, DbOperation::Delete, &["cassandra", "PurgeOrder", ATTEMPT]), 1);

        metrics.start_select_timer(MYSQL, "GetOrder").observe_duration();
        metrics.start_insert_timer(MYSQL, "CreateOrder").observe_duration();
        metrics.start_update_timer(MYSQL, "ShipOrder").observe_duration();
        metrics.start_delete_timer(MYSQL, "PurgeOrder").observe_duration();

        for (verb, operation) in [
            (DbOperation::Select, "GetOrder"),
            (DbOperation::Insert, "CreateOrder"),
            (DbOperation::Update, "ShipOrder"),
            (DbOperation::Delete, "PurgeOrder"),
        ] {
            let series = metrics.instruments(verb).duration.with_label_values(&[MYSQL, operation]);
            assert_eq!(series.get_sample_count(), 1, "{verb:?}");
        }
    }

    #[test]
    fn registers_all_eight_instruments() {
        let registry = Registry::new();
        let metrics = DatabaseMetrics::new(&registry).unwrap();
        for verb in DbOperation::ALL {
            metrics.inc(verb, POSTGRESQL, "Touch", ATTEMPT);
            metrics.start_timer(verb, POSTGRESQL, "Touch").observe_duration();
        }

        let exposition = render(&registry).unwrap();
        for verb in DbOperation::ALL {
            assert!(exposition.contains(&format!("# TYPE {} counter", verb.counter_name())));
            assert!(exposition.contains(&format!("# TYPE {} histogram", verb.histogram_name())));
        }
        assert_eq!(exposition.matches("# TYPE database_").count(), 8);

        let err = DatabaseMetrics::new(&registry).unwrap_err();
        assert!(err.is_duplicate());
    }
}
