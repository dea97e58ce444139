//! Host Metrics Agent Library
//!
//! Periodically samples Linux kernel counters (CPU, memory, disk, network,
//! page faults, context switches, process count) and republishes them as
//! Prometheus gauges over HTTP. Which optional metrics are sampled, and how
//! often, is controlled by a JSON file that is re-read every cycle.
//!
//! # Architecture
//!
//! ```text
//! config ──flags/interval──▶ sampling ──▶ procfs ──▶ rates
//!                               │
//!                               ▼
//!                      metrics (hub) ◀── HTTP scrapes
//! ```
//!
//! Exactly two units of work run concurrently: the [`sampling::Sampler`]
//! loop, which is the only writer of the gauges, and the
//! [`metrics::MetricsServer`], which renders them for any number of
//! concurrent scrapes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use host_metrics_agent::{
//!     config::Reconfigurator,
//!     metrics::MetricsRegistry,
//!     procfs::ProcFs,
//!     sampling::Sampler,
//! };
//!
//! let hub = Arc::new(MetricsRegistry::new());
//! let mut sampler = Sampler::new(
//!     ProcFs::default(),
//!     Arc::clone(&hub),
//!     Reconfigurator::new("config.json"),
//!     "sda",
//! );
//!
//! // Two cycles back to back, then render what was published
//! sampler.run_cycles(2);
//! println!("{}", hub.encode().unwrap());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod procfs;
pub mod rates;
pub mod sampling;

// Re-export commonly used types at crate root
pub use config::{ActivationFlags, ConfigDocument, Gate, Reconfigurator};
pub use metrics::{Metric, MetricsRegistry, MetricsServer, MetricsServerConfig};
pub use procfs::{KernelStats, ProcFs, StatSource, StaticSource};
pub use rates::{BandwidthMeter, CounterDelta, CpuUsage, DiskThroughput};
pub use sampling::{CycleReport, MetricOutcome, Sampler};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
