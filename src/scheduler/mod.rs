//! Scheduling policies and the simulation entry points.
//!
//! Every policy drives the shared [`engine::Engine`]: the engine owns the clock, the
//! record arena and the bookkeeping, the policy owns its ready structure and decides who
//! runs next. [`Policy`] is the closed set of policies a [`SimulationConfig`] can select.

pub mod engine;

mod ag;
mod priority_aging;
mod round_robin;
mod sjf;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use ag::{
    exhausted_quantum, preempted_quantum, zone_limits, AdaptiveGrain, Zone, EXHAUSTION_INCREMENT,
};
pub use engine::Engine;
pub use priority_aging::PriorityAging;
pub use round_robin::RoundRobin;
pub use sjf::PreemptiveSjf;

use crate::config::{PolicyKind, SimulationConfig};
use crate::error::ConfigError;
use crate::execution_log::ExecutionLog;
use crate::metrics::{MetricsCalculator, MetricsSummary, TimelineStats};
use crate::process::{ProcessRecord, ProcessSpec};

/// A scheduling algorithm that runs an engine until every process has completed.
pub trait SchedulingPolicy {
    fn kind(&self) -> PolicyKind;

    /// Drive `engine` to completion. Called once per engine.
    fn run(&self, engine: &mut Engine);
}

/// Validated policy together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    PreemptiveSjf(PreemptiveSjf),
    RoundRobin(RoundRobin),
    PriorityAging(PriorityAging),
    AdaptiveGrain(AdaptiveGrain),
}

impl SchedulingPolicy for Policy {
    fn kind(&self) -> PolicyKind {
        match self {
            Policy::PreemptiveSjf(policy) => policy.kind(),
            Policy::RoundRobin(policy) => policy.kind(),
            Policy::PriorityAging(policy) => policy.kind(),
            Policy::AdaptiveGrain(policy) => policy.kind(),
        }
    }

    fn run(&self, engine: &mut Engine) {
        match self {
            Policy::PreemptiveSjf(policy) => policy.run(engine),
            Policy::RoundRobin(policy) => policy.run(engine),
            Policy::PriorityAging(policy) => policy.run(engine),
            Policy::AdaptiveGrain(policy) => policy.run(engine),
        }
    }
}

/// A validated run waiting to execute.
#[derive(Debug, Clone)]
pub struct Simulation {
    policy: Policy,
    engine: Engine,
}

impl Simulation {
    /// Validate `specs` against `config`. No simulated time passes here.
    pub fn new(specs: &[ProcessSpec], config: &SimulationConfig) -> Result<Self, ConfigError> {
        let (policy, records) = config.validate(specs)?;
        let engine = Engine::new(records, config.context_switch_ticks()?);
        Ok(Self { policy, engine })
    }

    /// Run the policy to completion and collect the results.
    pub fn run(self) -> SimulationReport {
        let Simulation { policy, mut engine } = self;
        info!(
            policy = %policy.kind(),
            processes = engine.len(),
            context_switch = engine.context_switch_cost(),
            "simulation started"
        );

        policy.run(&mut engine);

        let (records, execution_order, stats) = engine.into_parts();
        let summary = MetricsCalculator::summarize(&records, &stats);
        info!(
            policy = %policy.kind(),
            makespan = stats.makespan,
            context_switches = stats.context_switches,
            avg_waiting = summary.average_waiting_time,
            avg_turnaround = summary.average_turnaround_time,
            "simulation finished"
        );

        SimulationReport {
            policy: policy.kind(),
            records,
            execution_order,
            stats,
            summary,
        }
    }
}

/// Validate and run in one step. The same inputs always produce the same report.
pub fn simulate(
    specs: &[ProcessSpec],
    config: &SimulationConfig,
) -> Result<SimulationReport, ConfigError> {
    Ok(Simulation::new(specs, config)?.run())
}

/// Outcome of a finished run. Records stay in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub policy: PolicyKind,
    pub records: Vec<ProcessRecord>,
    pub execution_order: ExecutionLog,
    pub stats: TimelineStats,
    pub summary: MetricsSummary,
}

impl SimulationReport {
    /// Look up a finished record by process name.
    pub fn record(&self, name: &str) -> Option<&ProcessRecord> {
        self.records.iter().find(|record| record.name() == name)
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn execution_order(&self) -> &ExecutionLog {
        &self.execution_order
    }

    pub fn stats(&self) -> &TimelineStats {
        &self.stats
    }

    pub fn summary(&self) -> &MetricsSummary {
        &self.summary
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.summary.average_waiting_time
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.summary.average_turnaround_time
    }
}
