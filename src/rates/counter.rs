//! Deltas between consecutive samples of a cumulative counter.

use crate::procfs::{bytes_to_mb, DiskSectors, SECTOR_SIZE};

/// Turns a monotonically increasing counter into per-interval deltas.
///
/// The first sample only establishes a baseline and yields a zero delta.
/// A counter that goes backwards (reset, wraparound) also yields zero
/// instead of an underflowed value.
#[derive(Debug, Clone, Default)]
pub struct CounterDelta {
    /// Previous raw counter value.
    previous: Option<u64>,
}

impl CounterDelta {
    /// Creates a tracker with no baseline.
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Creates a tracker that already holds `previous` as its last sample.
    pub fn with_previous(previous: u64) -> Self {
        Self {
            previous: Some(previous),
        }
    }

    /// Records `current` and returns the increase since the previous sample.
    pub fn update(&mut self, current: u64) -> u64 {
        let delta = self
            .previous
            .map(|prev| current.saturating_sub(prev))
            .unwrap_or(0);

        // Store current as previous for next call
        self.previous = Some(current);

        delta
    }

    /// Forgets the baseline; the next sample yields zero.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Megabytes moved to and from a block device between samples.
#[derive(Debug, Clone, Default)]
pub struct DiskThroughput {
    read: CounterDelta,
    written: CounterDelta,
}

impl DiskThroughput {
    /// Creates a tracker with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker primed with a previous sample.
    pub fn with_previous(previous: DiskSectors) -> Self {
        Self {
            read: CounterDelta::with_previous(previous.read),
            written: CounterDelta::with_previous(previous.written),
        }
    }

    /// Records `current` and returns the MB read plus written since the previous sample.
    pub fn update(&mut self, current: DiskSectors) -> f64 {
        let sectors = self
            .read
            .update(current.read)
            .saturating_add(self.written.update(current.written));
        bytes_to_mb(sectors.saturating_mul(SECTOR_SIZE))
    }

    /// Forgets the baseline of both counters.
    pub fn reset(&mut self) {
        self.read.reset();
        self.written.reset();
    }
}
