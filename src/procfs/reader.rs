//! One reader per statistic family.

use super::parser::{self, CpuTimes, DiskSectors, MemInfo, NetBytes};
use super::{ProcFile, ReadError, StatSource};

/// Reads kernel statistics from a [`StatSource`].
///
/// Every call re-reads its pseudo-file; nothing is cached between calls.
/// Rate conversion lives in [`crate::rates`], not here.
#[derive(Debug, Clone)]
pub struct KernelStats<S> {
    source: S,
}

impl<S: StatSource> KernelStats<S> {
    /// Creates a reader over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Cumulative CPU jiffies from the aggregate `cpu` line.
    pub fn cpu_times(&self) -> Result<CpuTimes, ReadError> {
        parser::parse_cpu_times(&self.source.read(ProcFile::Stat)?)
    }

    /// `MemTotal` and `MemAvailable` in a single pass.
    pub fn memory(&self) -> Result<MemInfo, ReadError> {
        parser::parse_meminfo(&self.source.read(ProcFile::Meminfo)?)
    }

    /// Total memory in kB.
    pub fn memory_total_kb(&self) -> Result<u64, ReadError> {
        parser::parse_meminfo_field(&self.source.read(ProcFile::Meminfo)?, "MemTotal")
    }

    /// Available memory in kB.
    pub fn memory_available_kb(&self) -> Result<u64, ReadError> {
        parser::parse_meminfo_field(&self.source.read(ProcFile::Meminfo)?, "MemAvailable")
    }

    /// Sectors read and written by `device` since boot.
    pub fn disk_sectors(&self, device: &str) -> Result<DiskSectors, ReadError> {
        parser::parse_disk_sectors(&self.source.read(ProcFile::Diskstats)?, device)
    }

    /// Bytes received and transmitted over all interfaces since boot.
    pub fn net_bytes(&self) -> Result<NetBytes, ReadError> {
        parser::parse_net_bytes(&self.source.read(ProcFile::NetDev)?)
    }

    /// Minor page faults since boot (`pgfault`).
    pub fn minor_page_faults(&self) -> Result<u64, ReadError> {
        self.counter(ProcFile::Vmstat, "pgfault")
    }

    /// Major page faults since boot (`pgmajfault`).
    pub fn major_page_faults(&self) -> Result<u64, ReadError> {
        self.counter(ProcFile::Vmstat, "pgmajfault")
    }

    /// Context switches since boot (`ctxt`).
    pub fn context_switches(&self) -> Result<u64, ReadError> {
        self.counter(ProcFile::Stat, "ctxt")
    }

    /// Processes created since boot (`processes`).
    pub fn total_processes(&self) -> Result<u64, ReadError> {
        self.counter(ProcFile::Stat, "processes")
    }

    fn counter(&self, file: ProcFile, label: &str) -> Result<u64, ReadError> {
        parser::parse_labeled_counter(&self.source.read(file)?, file, label)
    }
}
