//! What a single sampling cycle did.

use crate::config::ReloadOutcome;
use crate::metrics::Metric;

/// Result of handling one metric during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    /// The value was read and published.
    Published(f64),
    /// The metric's activation flag was off; its reader was not invoked.
    Skipped,
    /// Reading or publishing failed; the previous value stays exposed.
    Failed(String),
}

impl MetricOutcome {
    /// Returns true if a value was published.
    pub fn is_published(&self) -> bool {
        matches!(self, MetricOutcome::Published(_))
    }
}

/// Per-metric outcomes of a cycle, in publish order, plus the config reload that ended it.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// One entry per metric, in [`Metric::ALL`] order.
    pub outcomes: Vec<(Metric, MetricOutcome)>,
    /// What the end-of-cycle config reload applied.
    pub reload: ReloadOutcome,
}

impl CycleReport {
    /// Returns the outcome recorded for `metric`.
    pub fn outcome(&self, metric: Metric) -> Option<&MetricOutcome> {
        self.outcomes
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, outcome)| outcome)
    }

    /// Number of metrics published this cycle.
    pub fn published(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_published()).count()
    }

    /// Number of metrics that failed this cycle.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, MetricOutcome::Failed(_)))
            .count()
    }
}
