//! JSON scenario fixtures: an input workload plus the results a policy is expected to
//! produce for it.
//!
//! `expectedOutput` comes in two shapes. A single-policy fixture holds the expectation
//! directly; a shared fixture keys one expectation per policy label (`"SJF"`, `"RR"`,
//! `"Priority"`, `"AG"`).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{PolicyKind, SimulationConfig};
use crate::error::FixtureError;
use crate::process::ProcessSpec;
use crate::scheduler::{simulate, SimulationReport};

/// Largest accepted difference between expected and actual averages.
pub const AVERAGE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub name: Option<String>,
    pub input: FixtureInput,
    #[serde(default)]
    pub expected_output: Option<ExpectedOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureInput {
    #[serde(default)]
    pub context_switch: i64,
    #[serde(default)]
    pub rr_quantum: Option<i64>,
    #[serde(default)]
    pub aging_interval: Option<i64>,
    pub processes: Vec<ProcessSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedOutput {
    Single(Expectation),
    PerPolicy(BTreeMap<String, Expectation>),
}

/// Results one policy must reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    pub execution_order: Vec<String>,
    pub process_results: Vec<ExpectedProcess>,
    #[serde(default)]
    pub average_waiting_time: Option<f64>,
    #[serde(default)]
    pub average_turnaround_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedProcess {
    pub name: String,
    pub waiting_time: u64,
    pub turnaround_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_history: Option<Vec<u32>>,
}

/// One difference between a report and its expectation.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// No expectation recorded for the policy that ran.
    NoExpectation { policy: PolicyKind },
    ExecutionOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    MissingProcess { name: String },
    WaitingTime {
        process: String,
        expected: u64,
        actual: Option<u64>,
    },
    TurnaroundTime {
        process: String,
        expected: u64,
        actual: Option<u64>,
    },
    QuantumHistory {
        process: String,
        expected: Vec<u32>,
        actual: Vec<u32>,
    },
    AverageWaitingTime { expected: f64, actual: f64 },
    AverageTurnaroundTime { expected: f64, actual: f64 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExpectation { policy } => {
                write!(f, "no expected output for policy `{policy}`")
            }
            Self::ExecutionOrder { expected, actual } => write!(
                f,
                "execution order: expected [{}], got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
            Self::MissingProcess { name } => write!(f, "process `{name}` missing from report"),
            Self::WaitingTime {
                process,
                expected,
                actual,
            } => write!(f, "{process}: waiting time expected {expected}, got {actual:?}"),
            Self::TurnaroundTime {
                process,
                expected,
                actual,
            } => write!(
                f,
                "{process}: turnaround time expected {expected}, got {actual:?}"
            ),
            Self::QuantumHistory {
                process,
                expected,
                actual,
            } => write!(
                f,
                "{process}: quantum history expected {expected:?}, got {actual:?}"
            ),
            Self::AverageWaitingTime { expected, actual } => write!(
                f,
                "average waiting time expected {expected:.2}, got {actual:.2}"
            ),
            Self::AverageTurnaroundTime { expected, actual } => write!(
                f,
                "average turnaround time expected {expected:.2}, got {actual:.2}"
            ),
        }
    }
}

/// Result of comparing a report against a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureOutcome {
    pub policy: PolicyKind,
    /// False when the fixture carries no `expectedOutput` at all.
    pub compared: bool,
    pub mismatches: Vec<Mismatch>,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for FixtureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.compared {
            return write!(f, "{}: no expected output to compare", self.policy.label());
        }
        if self.passed() {
            return write!(f, "{}: PASS", self.policy.label());
        }
        write!(
            f,
            "{}: FAIL ({} mismatches)",
            self.policy.label(),
            self.mismatches.len()
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n  - {mismatch}")?;
        }
        Ok(())
    }
}

impl ExpectedOutput {
    /// Expectation recorded for `policy`, if any.
    pub fn for_policy(&self, policy: PolicyKind) -> Option<&Expectation> {
        match self {
            ExpectedOutput::Single(expectation) => Some(expectation),
            ExpectedOutput::PerPolicy(by_label) => by_label
                .iter()
                .find(|(label, _)| label.parse::<PolicyKind>().ok() == Some(policy))
                .map(|(_, expectation)| expectation),
        }
    }
}

impl Fixture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading fixture");
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed fixture")
    }

    /// Simulation parameters this fixture implies for `policy`.
    pub fn config(&self, policy: PolicyKind) -> SimulationConfig {
        SimulationConfig {
            policy,
            context_switch: self.input.context_switch,
            time_quantum: self.input.rr_quantum,
            aging_interval: self.input.aging_interval,
            ..SimulationConfig::default()
        }
    }

    pub fn run(&self, policy: PolicyKind) -> Result<SimulationReport, FixtureError> {
        Ok(simulate(&self.input.processes, &self.config(policy))?)
    }

    /// Compare `report` against the expectation for the policy that produced it.
    pub fn check(&self, report: &SimulationReport) -> FixtureOutcome {
        let policy = report.policy;
        let Some(expected_output) = &self.expected_output else {
            return FixtureOutcome {
                policy,
                compared: false,
                mismatches: Vec::new(),
            };
        };
        let mismatches = match expected_output.for_policy(policy) {
            Some(expectation) => compare(expectation, report),
            None => vec![Mismatch::NoExpectation { policy }],
        };
        debug!(
            fixture = self.label(),
            policy = %policy,
            mismatches = mismatches.len(),
            "fixture checked"
        );
        FixtureOutcome {
            policy,
            compared: true,
            mismatches,
        }
    }
}

fn compare(expectation: &Expectation, report: &SimulationReport) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    if *report.execution_order() != *expectation.execution_order.as_slice() {
        mismatches.push(Mismatch::ExecutionOrder {
            expected: expectation.execution_order.clone(),
            actual: report.execution_order().entries().to_vec(),
        });
    }

    for expected in &expectation.process_results {
        let Some(record) = report.record(&expected.name) else {
            mismatches.push(Mismatch::MissingProcess {
                name: expected.name.clone(),
            });
            continue;
        };
        if record.waiting_time() != Some(expected.waiting_time) {
            mismatches.push(Mismatch::WaitingTime {
                process: expected.name.clone(),
                expected: expected.waiting_time,
                actual: record.waiting_time(),
            });
        }
        if record.turnaround_time() != Some(expected.turnaround_time) {
            mismatches.push(Mismatch::TurnaroundTime {
                process: expected.name.clone(),
                expected: expected.turnaround_time,
                actual: record.turnaround_time(),
            });
        }
        if let Some(history) = &expected.quantum_history {
            if record.quantum_history() != history.as_slice() {
                mismatches.push(Mismatch::QuantumHistory {
                    process: expected.name.clone(),
                    expected: history.clone(),
                    actual: record.quantum_history().to_vec(),
                });
            }
        }
    }

    if let Some(expected) = expectation.average_waiting_time {
        let actual = report.average_waiting_time();
        if (expected - actual).abs() > AVERAGE_TOLERANCE {
            mismatches.push(Mismatch::AverageWaitingTime { expected, actual });
        }
    }
    if let Some(expected) = expectation.average_turnaround_time {
        let actual = report.average_turnaround_time();
        if (expected - actual).abs() > AVERAGE_TOLERANCE {
            mismatches.push(Mismatch::AverageTurnaroundTime { expected, actual });
        }
    }

    mismatches
}
