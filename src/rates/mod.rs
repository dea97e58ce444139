//! Rate and delta trackers.
//!
//! Kernel counters are cumulative since boot. The trackers here keep the
//! previous sample so the sampling loop can publish per-interval values.
//! Each statistic owns exactly one tracker for the life of the process;
//! tests construct fresh ones with a controlled previous sample.

mod bandwidth;
mod counter;
mod cpu;

pub use bandwidth::{BandwidthMeter, MIN_ELAPSED};
pub use counter::{CounterDelta, DiskThroughput};
pub use cpu::CpuUsage;

use thiserror::Error;

/// Reasons a tracker cannot produce a rate for the current sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateError {
    /// The tracker had no previous sample; this one becomes the baseline.
    #[error("first sample recorded, no rate until the next one")]
    Baseline,
    /// The CPU jiffy counters did not advance.
    #[error("no CPU time elapsed since the previous sample")]
    NoElapsedTicks,
    /// Too little wall time passed to compute a meaningful rate.
    #[error("no time elapsed since the previous sample")]
    NoElapsedTime,
}
