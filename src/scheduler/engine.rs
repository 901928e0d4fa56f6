//! Discrete-time engine shared by every scheduling policy.
//!
//! The engine owns the record arena and the logical clock for one run. Policies keep their
//! own ready structures and decide *who* runs and *when* to preempt; the engine does the
//! bookkeeping that must be identical across policies:
//!
//! 1. Admit arrivals (`arrival_time <= now`) in arrival order, ties by input order
//! 2. Advance the clock as busy, idle, or context-switch time
//! 3. Record dispatches in the execution log
//! 4. Stamp completion metrics the instant `remaining_time` reaches zero

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::execution_log::ExecutionLog;
use crate::metrics::{MetricsCalculator, TimelineStats};
use crate::process::{ProcessId, ProcessRecord};

/// State of a single simulation run.
#[derive(Debug, Clone)]
pub struct Engine {
    records: Vec<ProcessRecord>,
    /// Record ids sorted by arrival time (stable, so input order breaks ties).
    arrival_order: Vec<ProcessId>,
    /// Index into `arrival_order` of the first process not yet admitted.
    next_arrival: usize,
    clock: u64,
    completed: usize,
    context_switch: u64,
    /// Process that most recently executed at least one tick.
    last_run: Option<ProcessId>,
    log: ExecutionLog,
    stats: TimelineStats,
}

impl Engine {
    /// Build an engine over validated records. `context_switch` is charged per switch.
    pub fn new(records: Vec<ProcessRecord>, context_switch: u64) -> Self {
        let mut arrival_order: Vec<ProcessId> = (0..records.len()).map(ProcessId).collect();
        arrival_order.sort_by_key(|id| records[id.index()].arrival_time());
        Self {
            records,
            arrival_order,
            next_arrival: 0,
            clock: 0,
            completed: 0,
            context_switch,
            last_run: None,
            log: ExecutionLog::new(),
            stats: TimelineStats::default(),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> u64 {
        self.clock
    }

    pub fn record(&self, id: ProcessId) -> &ProcessRecord {
        &self.records[id.index()]
    }

    pub(crate) fn record_mut(&mut self, id: ProcessId) -> &mut ProcessRecord {
        &mut self.records[id.index()]
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn execution_log(&self) -> &ExecutionLog {
        &self.log
    }

    pub fn stats(&self) -> &TimelineStats {
        &self.stats
    }

    pub fn context_switch_cost(&self) -> u64 {
        self.context_switch
    }

    /// Total processes in the run.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True once every process has completed.
    pub fn is_finished(&self) -> bool {
        self.completed == self.records.len()
    }

    /// Whether handing the CPU to `id` changes the identity of the last process that ran.
    /// The very first dispatch of a run never counts as a change.
    pub fn is_switch_to(&self, id: ProcessId) -> bool {
        matches!(self.last_run, Some(last) if last != id)
    }

    /// Append every process with `arrival_time <= now` that has not been admitted yet to
    /// the tail of `ready`. Returns how many were admitted.
    pub fn admit_arrivals(&mut self, ready: &mut VecDeque<ProcessId>) -> usize {
        let mut admitted = 0;
        while let Some(&id) = self.arrival_order.get(self.next_arrival) {
            if !self.records[id.index()].has_arrived(self.clock) {
                break;
            }
            trace!(process = self.records[id.index()].name(), at = self.clock, "arrival");
            ready.push_back(id);
            self.next_arrival += 1;
            admitted += 1;
        }
        admitted
    }

    /// Arrival time of the next process not yet admitted.
    pub fn next_arrival_time(&self) -> Option<u64> {
        self.arrival_order
            .get(self.next_arrival)
            .map(|id| self.records[id.index()].arrival_time())
    }

    /// Jump the clock straight to the next arrival, counting the gap as idle time.
    ///
    /// Returns `false` when no arrival is pending (nothing to wait for).
    pub fn idle_until_next_arrival(&mut self) -> bool {
        let Some(next) = self.next_arrival_time() else {
            return false;
        };
        if next > self.clock {
            trace!(from = self.clock, to = next, "idle");
            self.stats.idle_ticks += next - self.clock;
            self.clock = next;
        }
        true
    }

    /// Advance the clock by a single idle tick.
    pub fn idle_tick(&mut self) {
        trace!(at = self.clock, "idle tick");
        self.stats.idle_ticks += 1;
        self.clock += 1;
    }

    /// Charge one context switch. Returns the ticks charged.
    pub fn context_switch(&mut self) -> u64 {
        self.stats.context_switches += 1;
        self.stats.context_switch_ticks += self.context_switch;
        self.clock += self.context_switch;
        trace!(cost = self.context_switch, at = self.clock, "context switch");
        self.context_switch
    }

    pub(crate) fn count_preemption(&mut self) {
        self.stats.preemptions += 1;
    }

    pub(crate) fn count_quantum_expiry(&mut self) {
        self.stats.quantum_expirations += 1;
    }

    /// Hand the CPU to `id`: record it in the execution log.
    pub fn dispatch(&mut self, id: ProcessId) {
        let record = &self.records[id.index()];
        if self.log.record(record.name()) {
            debug!(
                process = record.name(),
                at = self.clock,
                remaining = record.remaining_time(),
                "dispatch"
            );
        }
    }

    /// Run `id` for `ticks` units. Returns `true` if the process completed, in which case
    /// its completion metrics are stamped at the new clock value.
    pub fn execute(&mut self, id: ProcessId, ticks: u64) -> bool {
        let now = self.clock;
        let record = &mut self.records[id.index()];
        let ticks = ticks.min(record.remaining_time());
        record.mark_started(now);
        record.run_for(ticks);
        self.clock += ticks;
        self.stats.busy_ticks += ticks;
        self.last_run = Some(id);
        trace!(
            process = record.name(),
            from = now,
            to = self.clock,
            remaining = record.remaining_time(),
            "execute"
        );

        if !record.is_complete() {
            return false;
        }
        MetricsCalculator::finalize(record, self.clock);
        self.completed += 1;
        self.stats.makespan = self.clock;
        debug!(
            process = record.name(),
            at = self.clock,
            turnaround = ?record.turnaround_time(),
            waiting = ?record.waiting_time(),
            "complete"
        );
        true
    }

    /// Release the finished run's records, execution log, and statistics.
    pub fn into_parts(self) -> (Vec<ProcessRecord>, ExecutionLog, TimelineStats) {
        (self.records, self.log, self.stats)
    }
}
