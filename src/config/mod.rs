//! Hot-reloaded agent configuration.
//!
//! The config file is a JSON object re-read once per sampling cycle. It
//! names which of the four gated metrics to sample and how long to sleep
//! between cycles. Invalid content never disturbs the running agent; the
//! last good settings stay in effect.

mod controller;
mod document;
mod flags;

pub use controller::{Reconfigurator, ReloadOutcome, DEFAULT_SAMPLING_INTERVAL};
pub use document::{ConfigDocument, DEFAULT_CONFIG_PATH, MAX_SAMPLING_INTERVAL_SECS};
pub use flags::{ActivationFlags, Gate};

/// Configuration loading and validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid JSON.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    /// The top-level JSON value is not an object.
    #[error("config document must be a JSON object")]
    NotAnObject,
    /// No `metrics` field, or it is null.
    #[error("`metrics` field is missing")]
    MissingMetrics,
    /// `metrics` is present but not an array.
    #[error("`metrics` field must be an array")]
    MetricsNotArray,
    /// No `sampling_interval` field, or it is null.
    #[error("`sampling_interval` field is missing")]
    MissingInterval,
    /// `sampling_interval` is not an integer in the accepted range.
    #[error("invalid sampling interval {0} (must be an integer from 1 to 3600 seconds)")]
    InvalidInterval(String),
}
