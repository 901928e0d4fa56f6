pub mod config;
pub mod error;
pub mod execution_log;
pub mod fixture;
pub mod metrics;
pub mod process;
pub mod report;
pub mod scheduler;

// Re-export for easier testing
pub use config::{PolicyKind, SimulationConfig};
pub use error::{ConfigError, FixtureError};
pub use execution_log::ExecutionLog;
pub use fixture::{Fixture, FixtureOutcome};
pub use metrics::{MetricsSummary, TimelineStats};
pub use process::{ProcessId, ProcessRecord, ProcessSpec};
pub use scheduler::{simulate, Policy, SchedulingPolicy, Simulation, SimulationReport};
