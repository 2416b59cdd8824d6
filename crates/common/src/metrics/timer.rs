//! Scoped duration observation
//!
//! Every `start_*_timer` operation hands out a [`DurationTimer`]. The timer
//! records the elapsed wall-clock seconds into its histogram series exactly
//! once: either when one of the consuming methods is called, or when the
//! timer is dropped. Wrapping a fallible operation therefore records its
//! duration on every exit path, including `?` returns and panics.
//!
//! ```rust
//! use prometheus::Registry;
//! use promcommon::{labels, DatabaseMetrics, DatabaseObserver};
//!
//! fn load_user(db: &DatabaseMetrics) -> Result<(), String> {
//!     db.inc_selects(labels::POSTGRESQL, "GetUser", labels::ATTEMPT);
//!     let _timer = db.start_select_timer(labels::POSTGRESQL, "GetUser");
//!     Err("connection reset".to_string())
//!     // `_timer` observes here even though the query failed
//! }
//!
//! let registry = Registry::new();
//! let db = DatabaseMetrics::new(&registry).unwrap();
//! assert!(load_user(&db).is_err());
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use prometheus::Histogram;

/// Handle measuring one operation's duration
#[must_use = "a timer observes on drop; binding it to `_` drops it immediately"]
pub struct DurationTimer {
    histogram: Option<Histogram>,
    started: Instant,
    observed: bool,
}

impl DurationTimer {
    /// Start timing against a labeled histogram series
    pub(crate) fn start(histogram: Histogram) -> Self {
        Self { histogram: Some(histogram), started: Instant::now(), observed: false }
    }

    /// A timer attached to no histogram; it measures but never records
    pub fn noop() -> Self {
        Self { histogram: None, started: Instant::now(), observed: false }
    }

    /// Time since the timer was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether this timer records into a histogram at all
    pub fn is_noop(&self) -> bool {
        self.histogram.is_none()
    }

    /// Record the elapsed time now
    pub fn observe_duration(self) {
        let _ = self.stop_and_record();
    }

    /// Record the elapsed time now and return it in seconds
    pub fn stop_and_record(mut self) -> f64 {
        self.finish(true)
    }

    /// Stop without recording; returns the elapsed seconds
    pub fn stop_and_discard(mut self) -> f64 {
        self.finish(false)
    }

    fn finish(&mut self, record: bool) -> f64 {
        self.observed = true;
        let seconds = self.started.elapsed().as_secs_f64();
        if record {
            if let Some(histogram) = &self.histogram {
                histogram.observe(seconds);
            }
        }
        seconds
    }
}

impl Drop for DurationTimer {
    fn drop(&mut self) {
        if !self.observed {
            self.finish(true);
        }
    }
}

impl fmt::Debug for DurationTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurationTimer")
            .field("noop", &self.is_noop())
            .field("elapsed", &self.elapsed())
            .field("observed", &self.observed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use prometheus::HistogramOpts;

    use super::*;
    use crate::labels::duration_buckets;

    fn histogram() -> Histogram {
        Histogram::with_opts(HistogramOpts::new("timer_test", "Timer test").buckets(duration_buckets()))
            .unwrap()
    }

    #[test]
    fn drop_records_exactly_once() {
        let histogram = histogram();
        {
            let _timer = DurationTimer::start(histogram.clone());
        }
        assert_eq!(histogram.get_sample_count(), 1);
    }

    #[test]
    fn explicit_observation_does_not_double_count() {
        let histogram = histogram();
        let timer = DurationTimer::start(histogram.clone());
        thread::sleep(Duration::from_millis(5));
        let seconds = timer.stop_and_record();
        assert!(seconds >= 0.005);
        assert_eq!(histogram.get_sample_count(), 1);
        assert!((histogram.get_sample_sum() - seconds).abs() < 1e-9);
    }

    #[test]
    fn discard_records_nothing() {
        let histogram = histogram();
        let timer = DurationTimer::start(histogram.clone());
        let _ = timer.stop_and_discard();
        assert_eq!(histogram.get_sample_count(), 0);
    }

    #[test]
    fn records_on_error_path() {
        fn failing(histogram: &Histogram) -> Result<(), &'static str> {
            let _timer = DurationTimer::start(histogram.clone());
            Err::<(), _>("boom")?;
            Ok(())
        }

        let histogram = histogram();
        assert!(failing(&histogram).is_err());
        assert_eq!(histogram.get_sample_count(), 1);
    }

    #[test]
    fn noop_timer_measures_without_recording() {
        let timer = DurationTimer::noop();
        assert!(timer.is_noop());
        thread::sleep(Duration::from_millis(2));
        assert!(timer.elapsed() >= Duration::from_millis(2));
        timer.observe_duration();
    }
}
