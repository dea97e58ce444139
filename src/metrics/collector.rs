//! Gauge registry and the guarded publish path.

use std::collections::HashMap;

use prometheus::{Encoder, Gauge, Registry, TextEncoder};
use thiserror::Error;

use super::Metric;

/// Errors that can occur while encoding metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Gathering or text encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Reasons a value was not published.
///
/// The previously published value stays exposed in both cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PublishError {
    /// The value was negative, infinite or NaN.
    #[error("rejected {value} for {metric}: value must be finite and non-negative")]
    InvalidValue {
        /// Metric the value was meant for.
        metric: Metric,
        /// The rejected value.
        value: f64,
    },
    /// The gauge failed to register at startup.
    #[error("gauge {0} is not registered")]
    Unregistered(Metric),
}

/// Holds one Prometheus gauge per [`Metric`].
///
/// This is the single metrics hub shared between the sampling loop (the
/// only writer) and the HTTP endpoint (any number of readers). Each gauge
/// stores its value in an atomic slot, so a scrape never sees a torn value
/// and never waits on the writer.
pub struct MetricsRegistry {
    registry: Registry,
    gauges: HashMap<Metric, Gauge>,
}

impl MetricsRegistry {
    /// Creates a registry with every metric registered.
    ///
    /// A gauge that fails to register is logged and left out; the agent
    /// keeps running and that metric is never published.
    pub fn new() -> Self {
        let registry = Registry::new();
        let mut gauges = HashMap::with_capacity(Metric::ALL.len());

        for metric in Metric::ALL {
            match register_gauge(&registry, metric) {
                Ok(gauge) => {
                    gauges.insert(metric, gauge);
                }
                Err(e) => {
                    tracing::warn!(metric = %metric, error = %e, "Failed to register gauge");
                }
            }
        }

        Self { registry, gauges }
    }

    /// Publishes `value` for `metric`.
    ///
    /// Negative and non-finite values are rejected with a warning and
    /// leave the previous value in place. Never panics.
    pub fn publish(&self, metric: Metric, value: f64) -> Result<(), PublishError> {
        if !value.is_finite() || value < 0.0 {
            tracing::warn!(metric = %metric, value, "Rejected invalid metric value");
            return Err(PublishError::InvalidValue { metric, value });
        }

        let gauge = self.gauges.get(&metric).ok_or_else(|| {
            tracing::warn!(metric = %metric, "Cannot publish to unregistered gauge");
            PublishError::Unregistered(metric)
        })?;

        gauge.set(value);
        tracing::trace!(metric = %metric, value, "Published metric");
        Ok(())
    }

    /// Returns the currently published value of `metric`.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.gauges.get(&metric).map(Gauge::get)
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn register_gauge(registry: &Registry, metric: Metric) -> Result<Gauge, prometheus::Error> {
    let gauge = Gauge::new(metric.name(), metric.help())?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_all_metrics_registered() {
        let registry = MetricsRegistry::new();
        for metric in Metric::ALL {
            assert_eq!(registry.value(metric), Some(0.0), "{metric}");
        }
    }

    #[test]
    fn test_publish_sets_value() {
        let registry = MetricsRegistry::new();
        registry.publish(Metric::MemoryUsage, 60.0).unwrap();

        assert_eq!(registry.value(Metric::MemoryUsage), Some(60.0));
        let output = registry.encode().unwrap();
        assert!(output.contains("memory_usage_percentage 60"));
    }

    #[test]
    fn test_invalid_value_keeps_previous() {
        let registry = MetricsRegistry::new();
        registry.publish(Metric::CpuUsage, 12.5).unwrap();

        assert_eq!(
            registry.publish(Metric::CpuUsage, -1.0),
            Err(PublishError::InvalidValue {
                metric: Metric::CpuUsage,
                value: -1.0
            })
        );
        assert!(registry.publish(Metric::CpuUsage, f64::NAN).is_err());
        assert!(registry.publish(Metric::CpuUsage, f64::INFINITY).is_err());
        assert_eq!(registry.value(Metric::CpuUsage), Some(12.5));
    }

    #[test]
    fn test_encode_lists_every_gauge() {
        let registry = MetricsRegistry::new();
        let output = registry.encode().unwrap();

        for metric in Metric::ALL {
            assert!(output.contains(metric.name()), "missing {metric}");
        }
        assert!(output.contains("# TYPE disk_stats gauge"));
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_values() {
        const A: f64 = 1.234_567_890_123e15;
        const B: f64 = 9.876_543_210_987e-3;

        let registry = Arc::new(MetricsRegistry::new());
        registry.publish(Metric::NetworkUsage, A).unwrap();
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let value = registry.value(Metric::NetworkUsage).unwrap();
                        assert!(value == A || value == B, "torn value {value}");
                    }
                })
            })
            .collect();

        for i in 0..100_000 {
            let value = if i % 2 == 0 { B } else { A };
            registry.publish(Metric::NetworkUsage, value).unwrap();
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
