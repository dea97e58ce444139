//! CPU utilisation from cumulative jiffies.

use super::RateError;

use crate::procfs::CpuTimes;

/// Computes the busy percentage between consecutive `/proc/stat` samples.
///
/// `used = total_delta - idle_delta`, `percent = 100 * used / total_delta`,
/// where idle includes iowait.
#[derive(Debug, Clone, Default)]
pub struct CpuUsage {
    previous: Option<CpuTimes>,
}

impl CpuUsage {
    /// Creates a tracker with no baseline.
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Creates a tracker primed with a previous sample.
    pub fn with_previous(previous: CpuTimes) -> Self {
        Self {
            previous: Some(previous),
        }
    }

    /// Records `current` and returns the busy percentage since the previous sample.
    ///
    /// Fails with [`RateError::Baseline`] on the first sample and with
    /// [`RateError::NoElapsedTicks`] when no jiffies elapsed. The sample is
    /// recorded either way.
    pub fn update(&mut self, current: CpuTimes) -> Result<f64, RateError> {
        let previous = self.previous.replace(current).ok_or(RateError::Baseline)?;

        let total_delta = current.total().saturating_sub(previous.total());
        let idle_delta = current.idle_total().saturating_sub(previous.idle_total());

        if total_delta == 0 {
            return Err(RateError::NoElapsedTicks);
        }

        let used = total_delta.saturating_sub(idle_delta);
        Ok(used as f64 * 100.0 / total_delta as f64)
    }

    /// Forgets the baseline; the next sample is [`RateError::Baseline`] again.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(user: u64, idle: u64) -> CpuTimes {
        CpuTimes {
            user,
            idle,
            ..Default::default()
        }
    }

    #[test]
    fn test_fully_busy_interval() {
        let mut cpu = CpuUsage::with_previous(times(100, 100));
        assert_eq!(cpu.update(times(200, 100)).unwrap(), 100.0);
    }

    #[test]
    fn test_fully_idle_interval() {
        let mut cpu = CpuUsage::with_previous(times(100, 100));
        assert_eq!(cpu.update(times(100, 200)).unwrap(), 0.0);
    }

    #[test]
    fn test_iowait_counts_as_idle() {
        let mut cpu = CpuUsage::with_previous(times(0, 0));
        let current = CpuTimes {
            user: 25,
            idle: 50,
            iowait: 25,
            ..Default::default()
        };
        assert_eq!(cpu.update(current).unwrap(), 25.0);
    }

    #[test]
    fn test_first_sample_is_baseline() {
        let mut cpu = CpuUsage::new();
        assert!(matches!(cpu.update(times(5, 5)), Err(RateError::Baseline)));
        assert_eq!(cpu.update(times(10, 10)).unwrap(), 50.0);
    }

    #[test]
    fn test_reset_requires_new_baseline() {
        let mut cpu = CpuUsage::with_previous(times(0, 0));
        cpu.reset();
        assert!(matches!(
            cpu.update(times(9000, 10)),
            Err(RateError::Baseline)
        ));
        assert_eq!(cpu.update(times(9000, 20)).unwrap(), 0.0);
    }

    #[test]
    fn test_no_elapsed_ticks() {
        let mut cpu = CpuUsage::with_previous(times(10, 10));
        assert!(matches!(
            cpu.update(times(10, 10)),
            Err(RateError::NoElapsedTicks)
        ));
    }

    #[test]
    fn test_counter_reset_recovers_next_sample() {
        let mut cpu = CpuUsage::with_previous(times(1000, 1000));
        assert!(cpu.update(times(10, 10)).is_err());
        assert_eq!(cpu.update(times(20, 10)).unwrap(), 100.0);
    }
}
