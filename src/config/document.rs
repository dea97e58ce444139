//! The JSON configuration document.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::ConfigError;

/// Default path of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Longest accepted sampling interval.
pub const MAX_SAMPLING_INTERVAL_SECS: u64 = 3600;

/// A parsed configuration document.
///
/// Fields are kept as raw JSON so each one can be validated on its own:
/// a bad `sampling_interval` does not prevent `metrics` from applying.
///
/// ```json
/// { "sampling_interval": 5, "metrics": ["cpu_usage_percentage", "bandwidth_usage"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    sampling_interval: Option<Value>,
    #[serde(default)]
    metrics: Option<Value>,
}

impl ConfigDocument {
    /// Loads a document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read(path.as_ref()).map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_slice(&content)
    }

    /// Parses a document from JSON bytes. The top level must be an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Returns the string entries of the `metrics` array.
    ///
    /// Non-string entries are logged and skipped.
    pub fn metric_names(&self) -> Result<Vec<&str>, ConfigError> {
        let entries = match &self.metrics {
            None | Some(Value::Null) => return Err(ConfigError::MissingMetrics),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(ConfigError::MetricsNotArray),
        };

        Ok(entries
            .iter()
            .filter_map(|entry| {
                let name = entry.as_str();
                if name.is_none() {
                    tracing::warn!(entry = %entry, "Ignoring non-string entry in metrics list");
                }
                name
            })
            .collect())
    }

    /// Returns the validated sampling interval.
    ///
    /// Only integers in `1..=MAX_SAMPLING_INTERVAL_SECS` are accepted.
    pub fn sampling_interval(&self) -> Result<Duration, ConfigError> {
        let value = match &self.sampling_interval {
            None | Some(Value::Null) => return Err(ConfigError::MissingInterval),
            Some(value) => value,
        };

        match value.as_u64() {
            Some(secs @ 1..=MAX_SAMPLING_INTERVAL_SECS) => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidInterval(value.to_string())),
        }
    }
}
