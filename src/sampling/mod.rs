//! The sampling loop that feeds the metrics hub.
//!
//! One cycle consults the activation flags, reads each enabled statistic in
//! a fixed order, publishes what it could read, and reloads the config.
//! Failures are confined to the metric that failed; the loop never stops
//! on its own.

mod report;
mod sampler;

pub use report::{CycleReport, MetricOutcome};
pub use sampler::{Sampler, DEFAULT_DISK_DEVICE};

use crate::procfs::ReadError;
use crate::rates::RateError;
use thiserror::Error;

/// Reasons a statistic could not be sampled this cycle.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The statistic could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The rate tracker could not produce a value.
    #[error(transparent)]
    Rate(#[from] RateError),
    /// `MemTotal` is zero, so no percentage exists.
    #[error("kernel reports zero total memory")]
    ZeroMemoryTotal,
}

impl SampleError {
    /// True for the expected failure while a rate tracker records its first sample.
    pub fn is_warmup(&self) -> bool {
        matches!(self, SampleError::Rate(RateError::Baseline))
    }
}
