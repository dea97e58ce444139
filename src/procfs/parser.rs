//! Parsers for kernel pseudo-file text.
//!
//! These are pure functions over the file content so they can be tested
//! with string inputs. A label that never appears is reported the same way
//! as an unreadable file: as a recoverable [`ReadError`].

use super::{ProcFile, ReadError};

/// Cumulative CPU time counters from the aggregate `cpu` line of `/proc/stat`.
///
/// All values are in jiffies since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    /// Normal processes in user mode.
    pub user: u64,
    /// Niced processes in user mode.
    pub nice: u64,
    /// Kernel mode.
    pub system: u64,
    /// Idle.
    pub idle: u64,
    /// Idle while waiting for I/O.
    pub iowait: u64,
    /// Servicing interrupts.
    pub irq: u64,
    /// Servicing softirqs.
    pub softirq: u64,
    /// Stolen by the hypervisor.
    pub steal: u64,
}

impl CpuTimes {
    /// Time spent doing nothing, including waiting on I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Time spent doing work.
    pub fn busy_total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// All accounted time.
    pub fn total(&self) -> u64 {
        self.idle_total().saturating_add(self.busy_total())
    }
}

/// `MemTotal` and `MemAvailable` from `/proc/meminfo`, in kB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    /// `MemTotal`.
    pub total_kb: u64,
    /// `MemAvailable`.
    pub available_kb: u64,
}

impl MemInfo {
    /// Percentage of memory in use: `100 * (total - available) / total`.
    ///
    /// Returns `None` when the kernel reports zero total memory.
    pub fn used_percent(&self) -> Option<f64> {
        if self.total_kb == 0 {
            return None;
        }
        let used = self.total_kb.saturating_sub(self.available_kb);
        Some(used as f64 * 100.0 / self.total_kb as f64)
    }
}

/// Sector counters for a block device from `/proc/diskstats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskSectors {
    /// Sectors read.
    pub read: u64,
    /// Sectors written.
    pub written: u64,
}

impl DiskSectors {
    /// Sectors read plus written.
    pub fn total(&self) -> u64 {
        self.read.saturating_add(self.written)
    }
}

/// Byte counters summed over every interface in `/proc/net/dev`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetBytes {
    /// Bytes received.
    pub received: u64,
    /// Bytes transmitted.
    pub transmitted: u64,
}

impl NetBytes {
    /// Bytes received plus transmitted.
    pub fn total(&self) -> u64 {
        self.received.saturating_add(self.transmitted)
    }
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
///
/// Format: `cpu  user nice system idle iowait irq softirq steal [guest guest_nice]`
pub fn parse_cpu_times(content: &str) -> Result<CpuTimes, ReadError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ReadError::missing(ProcFile::Stat, "cpu"))?;

    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| ReadError::malformed(ProcFile::Stat, line))?;

    if values.len() < 8 {
        return Err(ReadError::malformed(ProcFile::Stat, line));
    }

    Ok(CpuTimes {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values[7],
    })
}

/// Extracts a `label value` counter, as found in `/proc/stat` and `/proc/vmstat`.
///
/// The label must match the first token of the line exactly, so `pgfault`
/// never matches `pgfault_file`.
pub fn parse_labeled_counter(content: &str, file: ProcFile, label: &str) -> Result<u64, ReadError> {
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some(label) {
            continue;
        }
        return fields
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ReadError::malformed(file, line));
    }
    Err(ReadError::missing(file, label))
}

/// Extracts a single `Key:   value kB` entry from `/proc/meminfo`.
pub fn parse_meminfo_field(content: &str, key: &str) -> Result<u64, ReadError> {
    for line in content.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        return rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ReadError::malformed(ProcFile::Meminfo, line));
    }
    Err(ReadError::missing(ProcFile::Meminfo, key))
}

/// Parses `MemTotal` and `MemAvailable`; fails if either is missing.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ReadError> {
    Ok(MemInfo {
        total_kb: parse_meminfo_field(content, "MemTotal")?,
        available_kb: parse_meminfo_field(content, "MemAvailable")?,
    })
}

/// Sums sectors read and written over every `/proc/diskstats` line for `device`.
///
/// Line format: `major minor name reads merged sectors_read ms writes merged sectors_written ...`
pub fn parse_disk_sectors(content: &str, device: &str) -> Result<DiskSectors, ReadError> {
    let mut totals = DiskSectors::default();
    let mut matched = false;

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.get(2) != Some(&device) {
            continue;
        }
        let read: u64 = fields
            .get(5)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ReadError::malformed(ProcFile::Diskstats, line))?;
        let written: u64 = fields
            .get(9)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ReadError::malformed(ProcFile::Diskstats, line))?;

        totals.read = totals.read.saturating_add(read);
        totals.written = totals.written.saturating_add(written);
        matched = true;
    }

    if !matched {
        return Err(ReadError::missing(ProcFile::Diskstats, device));
    }
    Ok(totals)
}

/// Sums received and transmitted bytes over every interface in `/proc/net/dev`.
///
/// The first two lines are column headers. Interface lines look like
/// `  eth0: rx_bytes rx_packets ... (8 receive columns) tx_bytes ...`;
/// lines that do not match are skipped.
pub fn parse_net_bytes(content: &str) -> Result<NetBytes, ReadError> {
    let mut lines = content.lines();
    if lines.next().is_none() || lines.next().is_none() {
        return Err(ReadError::malformed(ProcFile::NetDev, content.trim()));
    }

    let mut totals = NetBytes::default();
    for line in lines {
        let Some((_iface, counters)) = line.split_once(':') else {
            continue;
        };
        let fields: Vec<&str> = counters.split_whitespace().collect();
        let rx = fields.first().and_then(|v| v.parse::<u64>().ok());
        let tx = fields.get(8).and_then(|v| v.parse::<u64>().ok());
        if let (Some(rx), Some(tx)) = (rx, tx) {
            totals.received = totals.received.saturating_add(rx);
            totals.transmitted = totals.transmitted.saturating_add(tx);
        }
    }
    Ok(totals)
}
