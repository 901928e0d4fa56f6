//! Per-process timing metrics and whole-run statistics.
//!
//! The engine calls [`MetricsCalculator::finalize`] at the exact tick a process completes.
//! Once a run is over, [`MetricsCalculator::summarize`] folds the finished records and the
//! engine's [`TimelineStats`] into a [`MetricsSummary`] for reports and fixtures.

use serde::{Deserialize, Serialize};

use crate::process::ProcessRecord;

/// Tick accounting maintained by the engine while the clock advances.
///
/// Every clock advance is classified as busy, idle, or context-switch time, so
/// `makespan == busy_ticks + idle_ticks + context_switch_ticks` holds after every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStats {
    /// Ticks during which some process executed.
    pub busy_ticks: u64,
    /// Ticks during which nothing was ready to run.
    pub idle_ticks: u64,
    /// Ticks spent on context-switch overhead.
    pub context_switch_ticks: u64,
    /// Number of context switches charged (including zero-cost ones).
    pub context_switches: u64,
    /// Running processes displaced by a better ready process.
    #[serde(default)]
    pub preemptions: u64,
    /// Slices that ended because the quantum ran out before the burst did.
    #[serde(default)]
    pub quantum_expirations: u64,
    /// Clock value when the last process completed.
    pub makespan: u64,
}

impl TimelineStats {
    /// Sum of all classified ticks; equals `makespan` for a finished run.
    pub fn accounted_ticks(&self) -> u64 {
        self.busy_ticks + self.idle_ticks + self.context_switch_ticks
    }
}

/// Aggregate metrics over the finished records of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub process_count: usize,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    /// Fraction of the makespan spent executing processes.
    pub cpu_utilization: f64,
    /// Completed processes per tick of makespan.
    pub throughput: f64,
}

/// Derives waiting and turnaround time from completion time.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Stamp completion metrics on a record that just reached `remaining_time == 0`.
    ///
    /// `turnaround = completion - arrival`, `waiting = turnaround - burst`. A record is
    /// finalized exactly once; later calls leave the first stamp in place.
    pub fn finalize(record: &mut ProcessRecord, completion_time: u64) {
        debug_assert!(record.is_complete(), "finalize on unfinished process");
        if record.completion_time.is_some() {
            return;
        }
        let turnaround = completion_time - record.arrival_time();
        record.completion_time = Some(completion_time);
        record.turnaround_time = Some(turnaround);
        record.waiting_time = Some(turnaround - record.burst_time());
    }

    /// Average waiting time over finished records (0.0 for an empty slice).
    pub fn average_waiting_time(records: &[ProcessRecord]) -> f64 {
        Self::average(records, ProcessRecord::waiting_time)
    }

    /// Average turnaround time over finished records (0.0 for an empty slice).
    pub fn average_turnaround_time(records: &[ProcessRecord]) -> f64 {
        Self::average(records, ProcessRecord::turnaround_time)
    }

    pub fn summarize(records: &[ProcessRecord], stats: &TimelineStats) -> MetricsSummary {
        let makespan = stats.makespan as f64;
        let (cpu_utilization, throughput) = if stats.makespan == 0 {
            (0.0, 0.0)
        } else {
            (
                stats.busy_ticks as f64 / makespan,
                records.len() as f64 / makespan,
            )
        };
        MetricsSummary {
            process_count: records.len(),
            average_waiting_time: Self::average_waiting_time(records),
            average_turnaround_time: Self::average_turnaround_time(records),
            average_response_time: Self::average(records, ProcessRecord::response_time),
            cpu_utilization,
            throughput,
        }
    }

    fn average(records: &[ProcessRecord], metric: impl Fn(&ProcessRecord) -> Option<u64>) -> f64 {
        if records.is_empty() {
            return 0.0;
        }
        let total: u64 = records.iter().filter_map(|r| metric(r)).sum();
        total as f64 / records.len() as f64
    }
}
