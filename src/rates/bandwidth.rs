//! Network bandwidth in MB/s.

use std::time::{Duration, Instant};

use super::RateError;

use crate::procfs::{bytes_to_mb, NetBytes};

/// Shortest span a rate is computed over.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Sample {
    bytes: NetBytes,
    at: Instant,
}

/// Average network bandwidth between consecutive samples.
///
/// Elapsed time comes from the monotonic clock; callers pass the instant
/// at which the counters were read.
#[derive(Debug, Clone, Default)]
pub struct BandwidthMeter {
    previous: Option<Sample>,
}

impl BandwidthMeter {
    /// Creates a meter with no baseline.
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Creates a meter primed with counters read at `at`.
    pub fn with_previous(bytes: NetBytes, at: Instant) -> Self {
        Self {
            previous: Some(Sample { bytes, at }),
        }
    }

    /// Records `bytes` read at `now` and returns MB/s since the previous sample.
    ///
    /// The first sample reports 0.0. If less than [`MIN_ELAPSED`] has passed
    /// the call fails with [`RateError::NoElapsedTime`] and the previous
    /// sample is kept, so the next call measures across the whole span.
    pub fn update(&mut self, bytes: NetBytes, now: Instant) -> Result<f64, RateError> {
        let Some(previous) = self.previous else {
            self.previous = Some(Sample { bytes, at: now });
            return Ok(0.0);
        };

        let elapsed = now.saturating_duration_since(previous.at);
        if elapsed < MIN_ELAPSED {
            return Err(RateError::NoElapsedTime);
        }

        let delta = bytes
            .received
            .saturating_sub(previous.bytes.received)
            .saturating_add(bytes.transmitted.saturating_sub(previous.bytes.transmitted));
        self.previous = Some(Sample { bytes, at: now });

        Ok(bytes_to_mb(delta) / elapsed.as_secs_f64())
    }

    /// Forgets the baseline; the next sample reports 0.0.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MB: u64 = 1024 * 1024;

    fn bytes(received: u64, transmitted: u64) -> NetBytes {
        NetBytes {
            received,
            transmitted,
        }
    }

    #[test]
    fn test_first_sample_reports_zero() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::new();
        assert_eq!(meter.update(bytes(100 * MB, 100 * MB), start).unwrap(), 0.0);

        let rate = meter
            .update(bytes(101 * MB, 100 * MB), start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn test_rate_over_elapsed_seconds() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::with_previous(bytes(0, 0), start);

        let rate = meter
            .update(bytes(3 * MB, MB), start + Duration::from_secs(2))
            .unwrap();
        assert_eq!(rate, 2.0);
    }

    #[test]
    fn test_zero_elapsed_keeps_previous_sample() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::with_previous(bytes(0, 0), start);

        assert!(matches!(
            meter.update(bytes(MB, 0), start),
            Err(RateError::NoElapsedTime)
        ));

        // The whole 2 MB is measured against the original sample
        let rate = meter
            .update(bytes(2 * MB, 0), start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(rate, 2.0);
    }

    #[test]
    fn test_near_zero_elapsed_keeps_previous_sample() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::with_previous(bytes(0, 0), start);

        assert!(matches!(
            meter.update(bytes(MB, 0), start + Duration::from_nanos(1)),
            Err(RateError::NoElapsedTime)
        ));
        assert!(matches!(
            meter.update(bytes(MB, 0), start + Duration::from_micros(999)),
            Err(RateError::NoElapsedTime)
        ));

        let rate = meter.update(bytes(MB, 0), start + MIN_ELAPSED).unwrap();
        assert!((rate - 1000.0).abs() < 1e-9, "{rate}");
    }

    #[test]
    fn test_reset_starts_fresh_baseline() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::with_previous(bytes(0, 0), start);
        meter.reset();

        let later = start + Duration::from_secs(60);
        assert_eq!(meter.update(bytes(500 * MB, 0), later).unwrap(), 0.0);
        let rate = meter
            .update(bytes(501 * MB, 0), later + Duration::from_secs(1))
            .unwrap();
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let start = Instant::now();
        let mut meter = BandwidthMeter::with_previous(bytes(10 * MB, 10 * MB), start);

        let rate = meter
            .update(bytes(MB, MB), start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(rate, 0.0);
    }

    proptest! {
        #[test]
        fn prop_rate_matches_delta_over_elapsed(
            prev in 0u64..1 << 40,
            current in 0u64..1 << 40,
            millis in 1u64..100_000,
        ) {
            let start = Instant::now();
            let elapsed = Duration::from_millis(millis);
            let mut meter = BandwidthMeter::with_previous(bytes(prev, 0), start);

            let rate = meter.update(bytes(current, 0), start + elapsed).unwrap();
            let expected = bytes_to_mb(current.saturating_sub(prev)) / elapsed.as_secs_f64();

            prop_assert!(rate >= 0.0);
            prop_assert!((rate - expected).abs() <= expected.abs() * 1e-12);
        }
    }
}
