//! Simulation configuration and input validation.
//!
//! Callers describe a run with a [`SimulationConfig`] plus a list of [`ProcessSpec`]s.
//! Validation happens in one place, before any engine state exists, and turns the raw
//! signed inputs into a typed [`Policy`] and the record arena the engine will own.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::process::{ProcessRecord, ProcessSpec};
use crate::scheduler::{AdaptiveGrain, Policy, PreemptiveSjf, PriorityAging, RoundRobin};

/// Numeric priority value that aging never goes below.
pub const DEFAULT_PRIORITY_FLOOR: i64 = 1;

/// Scheduling policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Preemptive shortest-job-first (shortest remaining time first).
    #[default]
    Sjf,
    RoundRobin,
    /// Priority scheduling with aging.
    Priority,
    /// Adaptive-grain hybrid with per-process quantums.
    Ag,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Sjf,
        PolicyKind::RoundRobin,
        PolicyKind::Priority,
        PolicyKind::Ag,
    ];

    /// Human-readable label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            PolicyKind::Sjf => "Preemptive SJF",
            PolicyKind::RoundRobin => "Round Robin",
            PolicyKind::Priority => "Priority (aging)",
            PolicyKind::Ag => "AG",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PolicyKind::Sjf => "sjf",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::Priority => "priority",
            PolicyKind::Ag => "ag",
        };
        write!(f, "{label}")
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sjf" | "srtf" | "preemptive-sjf" | "preemptive_sjf" => Ok(PolicyKind::Sjf),
            "rr" | "round-robin" | "round_robin" | "roundrobin" => Ok(PolicyKind::RoundRobin),
            "priority" | "prio" | "priority-aging" => Ok(PolicyKind::Priority),
            "ag" | "adaptive" | "adaptive-grain" => Ok(PolicyKind::Ag),
            _ => Err(value.to_string()),
        }
    }
}

/// Parameters of one simulation run.
///
/// Only the parameters relevant to the selected policy are consulted; the rest are
/// ignored. Values stay signed until [`SimulationConfig::validate`] checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub policy: PolicyKind,
    /// Ticks charged whenever the CPU changes hands.
    #[serde(default, alias = "context_switch")]
    pub context_switch: i64,
    /// Round-robin time quantum.
    #[serde(default, alias = "rrQuantum")]
    pub time_quantum: Option<i64>,
    /// Ticks of waiting after which a ready process's priority value drops by one.
    #[serde(default)]
    pub aging_interval: Option<i64>,
    /// Lowest priority value aging may reach.
    #[serde(default = "default_priority_floor")]
    pub priority_floor: i64,
}

fn default_priority_floor() -> i64 {
    DEFAULT_PRIORITY_FLOOR
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            context_switch: 0,
            time_quantum: None,
            aging_interval: None,
            priority_floor: DEFAULT_PRIORITY_FLOOR,
        }
    }
}

impl SimulationConfig {
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn sjf() -> Self {
        Self::new(PolicyKind::Sjf)
    }

    pub fn round_robin(time_quantum: i64) -> Self {
        Self::new(PolicyKind::RoundRobin).with_time_quantum(time_quantum)
    }

    pub fn priority(aging_interval: i64) -> Self {
        Self::new(PolicyKind::Priority).with_aging_interval(aging_interval)
    }

    pub fn ag() -> Self {
        Self::new(PolicyKind::Ag)
    }

    pub fn with_context_switch(mut self, ticks: i64) -> Self {
        self.context_switch = ticks;
        self
    }

    pub fn with_time_quantum(mut self, quantum: i64) -> Self {
        self.time_quantum = Some(quantum);
        self
    }

    pub fn with_aging_interval(mut self, interval: i64) -> Self {
        self.aging_interval = Some(interval);
        self
    }

    pub fn with_priority_floor(mut self, floor: i64) -> Self {
        self.priority_floor = floor;
        self
    }

    /// Context-switch cost once validated.
    pub fn context_switch_ticks(&self) -> Result<u64, ConfigError> {
        u64::try_from(self.context_switch).map_err(|_| ConfigError::NegativeContextSwitch {
            value: self.context_switch,
        })
    }

    /// Check parameters and process definitions, producing the typed policy and the
    /// record arena for a run. Nothing is simulated here.
    pub fn validate(
        &self,
        specs: &[ProcessSpec],
    ) -> Result<(Policy, Vec<ProcessRecord>), ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyProcessList);
        }
        self.context_switch_ticks()?;

        let policy = match self.policy {
            PolicyKind::Sjf => Policy::PreemptiveSjf(PreemptiveSjf),
            PolicyKind::RoundRobin => {
                let value = self.time_quantum.ok_or(ConfigError::MissingTimeQuantum)?;
                if value <= 0 {
                    return Err(ConfigError::InvalidTimeQuantum { value });
                }
                Policy::RoundRobin(RoundRobin::new(value as u64))
            }
            PolicyKind::Priority => {
                let value = self.aging_interval.ok_or(ConfigError::MissingAgingInterval)?;
                if value <= 0 {
                    return Err(ConfigError::InvalidAgingInterval { value });
                }
                let floor = u32::try_from(self.priority_floor).map_err(|_| {
                    ConfigError::InvalidPriorityFloor {
                        value: self.priority_floor,
                    }
                })?;
                Policy::PriorityAging(PriorityAging::new(value as u64, floor))
            }
            PolicyKind::Ag => Policy::AdaptiveGrain(AdaptiveGrain),
        };

        let mut seen = HashSet::with_capacity(specs.len());
        let mut records = Vec::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    name: spec.name.clone(),
                });
            }
            records.push(self.build_record(spec)?);
        }

        Ok((policy, records))
    }

    fn build_record(&self, spec: &ProcessSpec) -> Result<ProcessRecord, ConfigError> {
        let arrival = non_negative(spec, "arrival", spec.arrival)?;
        let burst = non_negative(spec, "burst", spec.burst)?;
        if burst == 0 {
            return Err(ConfigError::ZeroBurst {
                process: spec.name.clone(),
            });
        }
        let priority = narrow(spec, "priority", non_negative(spec, "priority", spec.priority)?)?;

        if self.policy != PolicyKind::Ag {
            return Ok(ProcessRecord::new(&spec.name, arrival, burst, priority));
        }

        let seed = spec.quantum.ok_or_else(|| ConfigError::MissingSeedQuantum {
            process: spec.name.clone(),
        })?;
        if seed <= 0 {
            return Err(ConfigError::InvalidSeedQuantum {
                process: spec.name.clone(),
                value: seed,
            });
        }
        let quantum = narrow(spec, "quantum", seed as u64)?;
        Ok(ProcessRecord::with_quantum(
            &spec.name, arrival, burst, priority, quantum,
        ))
    }
}

fn non_negative(spec: &ProcessSpec, field: &'static str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::NegativeField {
        process: spec.name.clone(),
        field,
        value,
    })
}

fn narrow(spec: &ProcessSpec, field: &'static str, value: u64) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|_| ConfigError::FieldOutOfRange {
        process: spec.name.clone(),
        field,
        value: value as i64,
    })
}
