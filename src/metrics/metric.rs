//! The fixed gauge vocabulary.

use std::fmt;

use crate::config::Gate;

/// Every statistic the agent exposes, one gauge each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Network MB/s since the previous sample. Gated.
    BandwidthUsage,
    /// CPU busy percentage since the previous sample. Gated.
    CpuUsage,
    /// Disk MB read and written since the previous sample. Gated.
    DiskUsage,
    /// Memory in use, percent.
    MemoryUsage,
    /// Network MB since boot.
    NetworkUsage,
    /// Major page faults since boot.
    MajorPageFaults,
    /// Minor page faults since boot.
    MinorPageFaults,
    /// Available memory, kB.
    MemoryAvailable,
    /// Total memory, kB.
    MemoryTotal,
    /// Memory in use as a fraction.
    MemoryUsage2,
    /// Disk sectors read and written since boot.
    DiskStats,
    /// Processes created since boot.
    TotalProcesses,
    /// Context switches since boot. Gated.
    ChangeContexts,
}

impl Metric {
    /// All metrics, in the order a sampling cycle publishes them.
    pub const ALL: [Metric; 13] = [
        Metric::BandwidthUsage,
        Metric::CpuUsage,
        Metric::DiskUsage,
        Metric::MemoryUsage,
        Metric::NetworkUsage,
        Metric::MajorPageFaults,
        Metric::MinorPageFaults,
        Metric::MemoryAvailable,
        Metric::MemoryTotal,
        Metric::MemoryUsage2,
        Metric::DiskStats,
        Metric::TotalProcesses,
        Metric::ChangeContexts,
    ];

    /// Gauge name as exposed on the metrics endpoint.
    pub fn name(self) -> &'static str {
        match self {
            Metric::BandwidthUsage => "bandwidth_usage",
            Metric::CpuUsage => "cpu_usage_percentage",
            Metric::DiskUsage => "disk_usage_percentage",
            Metric::MemoryUsage => "memory_usage_percentage",
            Metric::NetworkUsage => "network_usage",
            Metric::MajorPageFaults => "major_page_faults",
            Metric::MinorPageFaults => "minor_page_faults",
            Metric::MemoryAvailable => "memory_available",
            Metric::MemoryTotal => "memory_total",
            Metric::MemoryUsage2 => "memory_usage_2",
            Metric::DiskStats => "disk_stats",
            Metric::TotalProcesses => "total_processes",
            Metric::ChangeContexts => "change_contexts",
        }
    }

    /// Help text for the gauge.
    pub fn help(self) -> &'static str {
        match self {
            Metric::BandwidthUsage => "Average network bandwidth since the previous sample in MB/s",
            Metric::CpuUsage => "CPU busy percentage since the previous sample",
            Metric::DiskUsage => "MB read and written on the disk device since the previous sample",
            Metric::MemoryUsage => "Memory usage percentage",
            Metric::NetworkUsage => "MB received and transmitted on all interfaces since boot",
            Metric::MajorPageFaults => "Major page faults since boot",
            Metric::MinorPageFaults => "Minor page faults since boot",
            Metric::MemoryAvailable => "Available memory in kB",
            Metric::MemoryTotal => "Total memory in kB",
            Metric::MemoryUsage2 => "Memory usage as a fraction between 0 and 1",
            Metric::DiskStats => "Sectors read and written on the disk device since boot",
            Metric::TotalProcesses => "Processes created since boot",
            Metric::ChangeContexts => "Context switches since boot",
        }
    }

    /// The activation flag controlling this metric, or `None` if it is always sampled.
    pub fn gate(self) -> Option<Gate> {
        match self {
            Metric::BandwidthUsage => Some(Gate::Bandwidth),
            Metric::CpuUsage => Some(Gate::Cpu),
            Metric::DiskUsage => Some(Gate::Disk),
            Metric::ChangeContexts => Some(Gate::ChangeContext),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), Metric::ALL.len());
    }

    #[test]
    fn test_exactly_four_gated_metrics() {
        let gated: Vec<_> = Metric::ALL.iter().filter(|m| m.gate().is_some()).collect();
        assert_eq!(gated.len(), 4);
        assert_eq!(Metric::MemoryUsage.gate(), None);
        assert_eq!(Metric::CpuUsage.gate(), Some(Gate::Cpu));
    }

    #[test]
    fn test_gate_config_names_match_gauge_names() {
        for metric in Metric::ALL {
            if let Some(gate) = metric.gate() {
                assert_eq!(gate.config_name(), metric.name());
            }
        }
    }
}
