//! Poll-based hot reload of activation flags and sampling interval.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{ActivationFlags, ConfigDocument, ConfigError, Gate};

/// Interval used until a config file provides a valid one.
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_secs(1);

/// What a reload changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadOutcome {
    /// The metrics list was valid and the flags were re-derived from it.
    pub flags_applied: bool,
    /// The sampling interval was valid and applied.
    pub interval_applied: bool,
}

/// Owns the activation flags and the sampling interval.
///
/// Every [`reload`](Self::reload) resets all flags and sets exactly the
/// ones named in the document, so reloading the same file twice is a
/// no-op. Anything invalid leaves the previous values in place.
#[derive(Debug)]
pub struct Reconfigurator {
    path: PathBuf,
    flags: ActivationFlags,
    interval: Duration,
    /// Last reported failure per concern, to avoid repeating it every cycle.
    load_error: Option<String>,
    metrics_error: Option<String>,
    interval_error: Option<String>,
}

impl Reconfigurator {
    /// Creates a controller reading `path`, with all flags off and a 1 second interval.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flags: ActivationFlags::default(),
            interval: DEFAULT_SAMPLING_INTERVAL,
            load_error: None,
            metrics_error: None,
            interval_error: None,
        }
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current activation flags.
    pub fn flags(&self) -> ActivationFlags {
        self.flags
    }

    /// Returns the current sampling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Re-reads the config file and applies it.
    ///
    /// A missing or unparseable file keeps the current flags and interval.
    pub fn reload(&mut self) -> ReloadOutcome {
        match ConfigDocument::from_file(&self.path) {
            Ok(doc) => {
                if self.load_error.take().is_some() {
                    tracing::info!(path = %self.path.display(), "Config file readable again");
                }
                self.apply(&doc)
            }
            Err(e) => {
                if is_new_failure(&mut self.load_error, &e) {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to load config, keeping previous settings"
                    );
                } else {
                    tracing::debug!(
                        path = %self.path.display(),
                        error = %e,
                        "Config still unusable"
                    );
                }
                ReloadOutcome::default()
            }
        }
    }

    /// Applies a parsed document. Flags and interval are validated independently.
    pub fn apply(&mut self, doc: &ConfigDocument) -> ReloadOutcome {
        ReloadOutcome {
            flags_applied: self.apply_metrics(doc),
            interval_applied: self.apply_interval(doc),
        }
    }

    fn apply_metrics(&mut self, doc: &ConfigDocument) -> bool {
        let names = match doc.metric_names() {
            Ok(names) => names,
            Err(e) => {
                if is_new_failure(&mut self.metrics_error, &e) {
                    tracing::warn!(error = %e, "Keeping previous activation flags");
                } else {
                    tracing::debug!(error = %e, "Metrics list still invalid");
                }
                return false;
            }
        };
        self.metrics_error = None;

        // Reset, then set whatever the document names.
        let mut flags = ActivationFlags::default();
        for name in names {
            match Gate::from_config_name(name) {
                Some(gate) => flags.set(gate, true),
                None => tracing::warn!(metric = name, "Unknown metric in config"),
            }
        }

        if flags != self.flags {
            tracing::info!(enabled = ?flags.enabled_names(), "Activation flags changed");
        }
        self.flags = flags;
        true
    }

    fn apply_interval(&mut self, doc: &ConfigDocument) -> bool {
        match doc.sampling_interval() {
            Ok(interval) => {
                self.interval_error = None;
                if interval != self.interval {
                    tracing::info!(seconds = interval.as_secs(), "Sampling interval changed");
                }
                self.interval = interval;
                true
            }
            Err(e) => {
                let seconds = self.interval.as_secs();
                if is_new_failure(&mut self.interval_error, &e) {
                    tracing::warn!(error = %e, seconds, "Keeping previous sampling interval");
                } else {
                    tracing::debug!(error = %e, seconds, "Sampling interval still invalid");
                }
                false
            }
        }
    }
}

/// Records `error` as the latest failure in `slot`.
///
/// Returns false when it repeats the failure already recorded there.
fn is_new_failure(slot: &mut Option<String>, error: &ConfigError) -> bool {
    let message = error.to_string();
    if slot.as_deref() == Some(message.as_str()) {
        return false;
    }
    *slot = Some(message);
    true
}
