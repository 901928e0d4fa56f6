//! Process definitions and the per-process state mutated by a simulation run.

use serde::{Deserialize, Serialize};

/// Raw process definition as supplied by a caller (CLI input, fixture file).
///
/// Fields are signed so that negative values survive parsing and can be reported as
/// configuration errors by [`crate::config::SimulationConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: String,
    #[serde(alias = "arrivalTime", alias = "arrival_time")]
    pub arrival: i64,
    #[serde(alias = "burstTime", alias = "burst_time")]
    pub burst: i64,
    #[serde(default)]
    pub priority: i64,
    /// Initial quantum, required only by the AG policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
}

impl ProcessSpec {
    /// Definition without a seed quantum (SJF, round robin, priority).
    pub fn new(name: impl Into<String>, arrival: i64, burst: i64, priority: i64) -> Self {
        ProcessSpec {
            name: name.into(),
            arrival,
            burst,
            priority,
            quantum: None,
        }
    }

    /// Attach the seed quantum used by the AG policy.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }
}

/// Index of a record inside the engine's owned record arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub(crate) usize);

impl ProcessId {
    /// Position of the record in input order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Mutable state of one simulated process.
///
/// Identity and workload (`name`, `arrival_time`, `burst_time`) never change after
/// construction. `remaining_time` only decreases; the process is complete once it reaches
/// zero, at which point the engine stamps the completion metrics exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    name: String,
    arrival_time: u64,
    burst_time: u64,
    pub(crate) remaining_time: u64,
    pub(crate) priority: u32,
    pub(crate) quantum: u32,
    pub(crate) quantum_history: Vec<u32>,
    pub(crate) start_time: Option<u64>,
    pub(crate) completion_time: Option<u64>,
    pub(crate) turnaround_time: Option<u64>,
    pub(crate) waiting_time: Option<u64>,
}

impl ProcessRecord {
    /// Fresh record with `remaining_time == burst_time` and no quantum bookkeeping.
    pub fn new(name: impl Into<String>, arrival_time: u64, burst_time: u64, priority: u32) -> Self {
        ProcessRecord {
            name: name.into(),
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            priority,
            quantum: 0,
            quantum_history: Vec::new(),
            start_time: None,
            completion_time: None,
            turnaround_time: None,
            waiting_time: None,
        }
    }

    /// Record seeded with an AG quantum; the seed is the first history entry.
    pub fn with_quantum(
        name: impl Into<String>,
        arrival_time: u64,
        burst_time: u64,
        priority: u32,
        quantum: u32,
    ) -> Self {
        let mut record = ProcessRecord::new(name, arrival_time, burst_time, priority);
        record.quantum = quantum;
        record.quantum_history.push(quantum);
        record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    /// Current priority value (lower is more urgent). Aging may have lowered it.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Current AG quantum; zero once the process has completed.
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    pub fn quantum_history(&self) -> &[u32] {
        &self.quantum_history
    }

    /// First tick at which the process held the CPU.
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<u64> {
        self.completion_time
    }

    pub fn turnaround_time(&self) -> Option<u64> {
        self.turnaround_time
    }

    pub fn waiting_time(&self) -> Option<u64> {
        self.waiting_time
    }

    /// Delay between arrival and first dispatch.
    pub fn response_time(&self) -> Option<u64> {
        self.start_time.map(|start| start - self.arrival_time)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    pub(crate) fn has_arrived(&self, now: u64) -> bool {
        self.arrival_time <= now
    }

    /// Consume `ticks` units of CPU time. Callers never ask for more than remains.
    pub(crate) fn run_for(&mut self, ticks: u64) {
        debug_assert!(ticks <= self.remaining_time, "run past completion");
        self.remaining_time -= ticks.min(self.remaining_time);
    }

    pub(crate) fn mark_started(&mut self, now: u64) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    /// Replace the AG quantum and append it to the history.
    pub(crate) fn assign_quantum(&mut self, quantum: u32) {
        self.quantum = quantum;
        self.quantum_history.push(quantum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_with_full_remaining_time() {
        let record = ProcessRecord::new("P1", 3, 7, 2);
        assert_eq!(record.remaining_time(), 7);
        assert!(!record.is_complete());
        assert!(record.quantum_history().is_empty());
        assert_eq!(record.completion_time(), None);
    }

    #[test]
    fn ag_record_seeds_history() {
        let mut record = ProcessRecord::with_quantum("P1", 0, 5, 1, 4);
        assert_eq!(record.quantum_history(), &[4]);
        record.assign_quantum(6);
        assert_eq!(record.quantum(), 6);
        assert_eq!(record.quantum_history(), &[4, 6]);
    }

    #[test]
    fn start_time_is_set_once() {
        let mut record = ProcessRecord::new("P1", 1, 3, 1);
        record.mark_started(4);
        record.mark_started(9);
        assert_eq!(record.start_time(), Some(4));
        assert_eq!(record.response_time(), Some(3));
    }

    #[test]
    fn spec_accepts_fixture_field_names() {
        let spec: ProcessSpec = serde_json::from_str(
            r#"{"name":"P2","arrival":1,"burst":6,"priority":3,"quantum":4}"#,
        )
        .expect("fixture process");
        assert_eq!(spec, ProcessSpec::new("P2", 1, 6, 3).with_quantum(4));
    }
}
