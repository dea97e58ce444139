//! Prometheus gauges and the scrape endpoint.
//!
//! This module owns the mapping from statistic to gauge, performs the
//! guarded write for every published value, and serves all gauges in the
//! Prometheus text format over HTTP.
//!
//! # Metrics Exposed
//!
//! ## Gated by configuration
//! - `bandwidth_usage` - Network bandwidth since the previous sample (MB/s)
//! - `cpu_usage_percentage` - CPU busy percentage since the previous sample
//! - `disk_usage_percentage` - MB read and written since the previous sample
//! - `change_contexts` - Context switches since boot
//!
//! ## Always sampled
//! - `memory_usage_percentage` - Memory in use (%)
//! - `memory_usage_2` - Memory in use as a fraction
//! - `memory_total` / `memory_available` - Memory totals (kB)
//! - `network_usage` - MB received and transmitted since boot
//! - `major_page_faults` / `minor_page_faults` - Page faults since boot
//! - `total_processes` - Processes created since boot
//! - `disk_stats` - Sectors read and written since boot
//!
//! Gated metrics that are switched off keep their last published value.
//!
//! # Example
//!
//! ```no_run
//! use host_metrics_agent::metrics::{Metric, MetricsRegistry};
//!
//! let registry = MetricsRegistry::new();
//! registry.publish(Metric::MemoryUsage, 42.0).unwrap();
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;
mod metric;
mod server;

pub use collector::{MetricsError, MetricsRegistry, PublishError};
pub use metric::Metric;
pub use server::{MetricsServer, MetricsServerConfig, ServerError, DEFAULT_PORT};
