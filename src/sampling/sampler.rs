//! The sampling loop.

use std::collections::HashSet;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Instant;

use super::{CycleReport, MetricOutcome, SampleError};

use crate::config::{ActivationFlags, Reconfigurator, ReloadOutcome};
use crate::metrics::{Metric, MetricsRegistry};
use crate::procfs::{bytes_to_mb, KernelStats, StatSource};
use crate::rates::{BandwidthMeter, CpuUsage, DiskThroughput};

/// Block device sampled when none is configured.
pub const DEFAULT_DISK_DEVICE: &str = "sda";

/// Reads every enabled statistic and publishes it, once per interval.
///
/// The sampler is the only writer of the metrics hub. It owns one rate
/// tracker per rate-based statistic and the config controller, which it
/// consults before each cycle and reloads after it. Statistics are read
/// strictly one after another.
pub struct Sampler<S> {
    stats: KernelStats<S>,
    hub: Arc<MetricsRegistry>,
    controller: Reconfigurator,
    disk_device: String,
    cpu: CpuUsage,
    disk: DiskThroughput,
    bandwidth: BandwidthMeter,
    /// Metrics whose last attempt failed, so failures are logged once.
    failing: HashSet<Metric>,
}

impl<S: StatSource> Sampler<S> {
    /// Creates a sampler with fresh rate trackers.
    pub fn new(
        source: S,
        hub: Arc<MetricsRegistry>,
        controller: Reconfigurator,
        disk_device: impl Into<String>,
    ) -> Self {
        Self {
            stats: KernelStats::new(source),
            hub,
            controller,
            disk_device: disk_device.into(),
            cpu: CpuUsage::new(),
            disk: DiskThroughput::new(),
            bandwidth: BandwidthMeter::new(),
            failing: HashSet::new(),
        }
    }

    /// Returns the metrics hub this sampler publishes to.
    pub fn hub(&self) -> &Arc<MetricsRegistry> {
        &self.hub
    }

    /// Returns the config controller.
    pub fn controller(&self) -> &Reconfigurator {
        &self.controller
    }

    /// Returns the activation flags the next cycle will use.
    pub fn flags(&self) -> ActivationFlags {
        self.controller.flags()
    }

    /// Reloads the config file.
    pub fn reconfigure(&mut self) -> ReloadOutcome {
        self.controller.reload()
    }

    /// Runs one cycle: sample and publish every enabled metric, then reload the config.
    ///
    /// Gated metrics whose flag is off are skipped, not zeroed, and their
    /// rate baseline is dropped so re-enabling them starts a fresh interval.
    pub fn cycle(&mut self) -> CycleReport {
        let flags = self.controller.flags();
        let mut outcomes = Vec::with_capacity(Metric::ALL.len());

        for metric in Metric::ALL {
            if metric.gate().is_some_and(|gate| !flags.is_enabled(gate)) {
                self.forget_baseline(metric);
                outcomes.push((metric, MetricOutcome::Skipped));
                continue;
            }

            let outcome = match self.sample(metric) {
                Ok(value) => {
                    if self.failing.remove(&metric) {
                        tracing::info!(metric = %metric, "Metric recovered");
                    }
                    match self.hub.publish(metric, value) {
                        Ok(()) => MetricOutcome::Published(value),
                        Err(e) => MetricOutcome::Failed(e.to_string()),
                    }
                }
                Err(e) => {
                    self.report_failure(metric, &e);
                    MetricOutcome::Failed(e.to_string())
                }
            };
            outcomes.push((metric, outcome));
        }

        let reload = self.controller.reload();
        let report = CycleReport { outcomes, reload };

        tracing::debug!(
            published = report.published(),
            failed = report.failed(),
            "Sampling cycle complete"
        );
        report
    }

    /// Runs `cycles` cycles back to back without sleeping.
    ///
    /// The config is loaded once up front, as [`run`](Self::run) does.
    pub fn run_cycles(&mut self, cycles: usize) -> Vec<CycleReport> {
        self.reconfigure();
        (0..cycles).map(|_| self.cycle()).collect()
    }

    /// Samples until a message arrives on `stop` or its sender is dropped.
    ///
    /// Sleeps for the configured interval between cycles; the interval is
    /// re-read after every cycle.
    pub fn run(&mut self, stop: &Receiver<()>) {
        self.reconfigure();
        tracing::info!(
            interval_secs = self.controller.interval().as_secs(),
            disk_device = %self.disk_device,
            "Sampling started"
        );

        loop {
            self.cycle();
            match stop.recv_timeout(self.controller.interval()) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        tracing::info!("Sampling stopped");
    }

    fn sample(&mut self, metric: Metric) -> Result<f64, SampleError> {
        let stats = &self.stats;
        let value = match metric {
            Metric::BandwidthUsage => {
                let bytes = stats.net_bytes()?;
                self.bandwidth.update(bytes, Instant::now())?
            }
            Metric::CpuUsage => self.cpu.update(stats.cpu_times()?)?,
            Metric::DiskUsage => self.disk.update(stats.disk_sectors(&self.disk_device)?),
            Metric::MemoryUsage => memory_percent(stats)?,
            Metric::NetworkUsage => bytes_to_mb(stats.net_bytes()?.total()),
            Metric::MajorPageFaults => stats.major_page_faults()? as f64,
            Metric::MinorPageFaults => stats.minor_page_faults()? as f64,
            Metric::MemoryAvailable => stats.memory_available_kb()? as f64,
            Metric::MemoryTotal => stats.memory_total_kb()? as f64,
            Metric::MemoryUsage2 => memory_percent(stats)? / 100.0,
            Metric::DiskStats => stats.disk_sectors(&self.disk_device)?.total() as f64,
            Metric::TotalProcesses => stats.total_processes()? as f64,
            Metric::ChangeContexts => stats.context_switches()? as f64,
        };
        Ok(value)
    }

    fn forget_baseline(&mut self, metric: Metric) {
        match metric {
            Metric::BandwidthUsage => self.bandwidth.reset(),
            Metric::CpuUsage => self.cpu.reset(),
            Metric::DiskUsage => self.disk.reset(),
            _ => {}
        }
    }

    fn report_failure(&mut self, metric: Metric, error: &SampleError) {
        if error.is_warmup() {
            tracing::debug!(metric = %metric, error = %error, "Metric not ready");
        } else if self.failing.insert(metric) {
            tracing::warn!(metric = %metric, error = %error, "Failed to sample metric");
        } else {
            tracing::debug!(metric = %metric, error = %error, "Metric still failing");
        }
    }
}

fn memory_percent<S: StatSource>(stats: &KernelStats<S>) -> Result<f64, SampleError> {
    stats
        .memory()?
        .used_percent()
        .ok_or(SampleError::ZeroMemoryTotal)
}
