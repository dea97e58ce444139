//! Activation flags for the configurable metrics.

use std::fmt;

/// A metric that can be switched on and off from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// `bandwidth_usage`
    Bandwidth,
    /// `cpu_usage_percentage`
    Cpu,
    /// `disk_usage_percentage`
    Disk,
    /// `change_contexts`
    ChangeContext,
}

impl Gate {
    /// Every gate.
    pub const ALL: [Gate; 4] = [Gate::Bandwidth, Gate::Cpu, Gate::Disk, Gate::ChangeContext];

    /// Name used in the config file's `metrics` array.
    pub fn config_name(self) -> &'static str {
        match self {
            Gate::Bandwidth => "bandwidth_usage",
            Gate::Cpu => "cpu_usage_percentage",
            Gate::Disk => "disk_usage_percentage",
            Gate::ChangeContext => "change_contexts",
        }
    }

    /// Looks up a gate by its config name.
    pub fn from_config_name(name: &str) -> Option<Gate> {
        Gate::ALL.into_iter().find(|gate| gate.config_name() == name)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Which gated metrics are sampled. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationFlags {
    /// Sample `bandwidth_usage`.
    pub bandwidth: bool,
    /// Sample `cpu_usage_percentage`.
    pub cpu: bool,
    /// Sample `disk_usage_percentage`.
    pub disk: bool,
    /// Sample `change_contexts`.
    pub change_context: bool,
}

impl ActivationFlags {
    /// Builds flags with exactly the given gates switched on.
    pub fn from_gates(gates: impl IntoIterator<Item = Gate>) -> Self {
        let mut flags = Self::default();
        for gate in gates {
            flags.set(gate, true);
        }
        flags
    }

    /// Returns true if `gate` is switched on.
    pub fn is_enabled(&self, gate: Gate) -> bool {
        match gate {
            Gate::Bandwidth => self.bandwidth,
            Gate::Cpu => self.cpu,
            Gate::Disk => self.disk,
            Gate::ChangeContext => self.change_context,
        }
    }

    /// Switches `gate` on or off.
    pub fn set(&mut self, gate: Gate, enabled: bool) {
        let slot = match gate {
            Gate::Bandwidth => &mut self.bandwidth,
            Gate::Cpu => &mut self.cpu,
            Gate::Disk => &mut self.disk,
            Gate::ChangeContext => &mut self.change_context,
        };
        *slot = enabled;
    }

    /// Config names of the enabled gates.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        Gate::ALL
            .into_iter()
            .filter(|gate| self.is_enabled(*gate))
            .map(Gate::config_name)
            .collect()
    }
}
