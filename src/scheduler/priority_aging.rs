//! Preemptive priority scheduling with aging.
//!
//! Lower priority values are more urgent. Every tick a process spends in the ready set
//! (execution ticks of another process and context-switch ticks alike) adds one to its
//! wait counter; when the counter reaches `aging_interval` the priority value drops by one,
//! never below `priority_floor`, and the counter restarts. The running process does not
//! accumulate wait.
//!
//! Algorithm, once per tick:
//! 1. Admit arrivals with a fresh wait counter
//! 2. Select the best ready process (lowest priority value, then earliest arrival, then
//!    input order)
//! 3. If the CPU is free, dispatch it, charging a context switch when it differs from the
//!    last process that ran; if it is strictly better than the running process, preempt
//! 4. Execute one tick (or idle one tick) and age the ready set

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::engine::Engine;
use super::SchedulingPolicy;
use crate::config::PolicyKind;
use crate::process::ProcessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAging {
    aging_interval: u64,
    priority_floor: u32,
}

/// Wait counters of processes in the ready set, keyed by record id.
type AgingTable = HashMap<ProcessId, u64>;

impl PriorityAging {
    /// `aging_interval` must be positive; [`crate::config::SimulationConfig`] guarantees it.
    pub fn new(aging_interval: u64, priority_floor: u32) -> Self {
        debug_assert!(aging_interval > 0);
        Self {
            aging_interval,
            priority_floor,
        }
    }

    fn best(engine: &Engine, ready: &VecDeque<ProcessId>) -> Option<usize> {
        ready
            .iter()
            .enumerate()
            .min_by_key(|&(_, id)| {
                let record = engine.record(*id);
                (record.priority(), record.arrival_time(), *id)
            })
            .map(|(position, _)| position)
    }

    /// Let `ticks` ticks of waiting pass for every ready process.
    fn age(
        &self,
        engine: &mut Engine,
        ready: &VecDeque<ProcessId>,
        waits: &mut AgingTable,
        ticks: u64,
    ) {
        for &id in ready {
            let counter = waits.entry(id).or_insert(0);
            *counter += ticks;
            while *counter >= self.aging_interval {
                *counter -= self.aging_interval;
                let floor = self.priority_floor;
                let record = engine.record_mut(id);
                if record.priority > floor {
                    record.priority -= 1;
                    debug!(
                        process = record.name(),
                        priority = record.priority,
                        "aged"
                    );
                }
            }
        }
    }

    /// Charge a context switch; processes already waiting age through it.
    fn switch(
        &self,
        engine: &mut Engine,
        ready: &VecDeque<ProcessId>,
        waits: &mut AgingTable,
    ) {
        let cost = engine.context_switch();
        if cost > 0 {
            self.age(engine, ready, waits, cost);
        }
    }
}

impl SchedulingPolicy for PriorityAging {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Priority
    }

    fn run(&self, engine: &mut Engine) {
        let mut ready: VecDeque<ProcessId> = VecDeque::new();
        let mut waits = AgingTable::new();
        let mut current: Option<ProcessId> = None;

        while !engine.is_finished() {
            let before = ready.len();
            engine.admit_arrivals(&mut ready);
            for &id in ready.iter().skip(before) {
                waits.insert(id, 0);
            }

            if let Some(position) = Self::best(engine, &ready) {
                let candidate = ready[position];
                match current {
                    None => {
                        ready.remove(position);
                        if engine.is_switch_to(candidate) {
                            self.switch(engine, &ready, &mut waits);
                        }
                        current = Some(candidate);
                    }
                    Some(running)
                        if engine.record(candidate).priority()
                            < engine.record(running).priority() =>
                    {
                        debug!(
                            preempted = engine.record(running).name(),
                            by = engine.record(candidate).name(),
                            at = engine.now(),
                            "preempt"
                        );
                        engine.count_preemption();
                        ready.remove(position);
                        ready.push_back(running);
                        self.switch(engine, &ready, &mut waits);
                        current = Some(candidate);
                    }
                    Some(_) => {}
                }
            }

            let Some(running) = current else {
                engine.idle_tick();
                continue;
            };

            engine.dispatch(running);
            let finished = engine.execute(running, 1);
            self.age(engine, &ready, &mut waits, 1);
            if finished {
                waits.remove(&running);
                current = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessRecord;

    fn run(records: Vec<ProcessRecord>, interval: u64, cs: u64) -> Engine {
        let mut engine = Engine::new(records, cs);
        PriorityAging::new(interval, 1).run(&mut engine);
        engine
    }

    #[test]
    fn aging_to_a_tie_does_not_preempt_but_strictly_better_does() {
        let engine = run(
            vec![
                ProcessRecord::new("P1", 0, 5, 2),
                ProcessRecord::new("P2", 0, 5, 3),
            ],
            2,
            0,
        );
        // P2 reaches priority 2 at t=2 (tie, no preemption) and 1 at t=4 (preempts).
        assert_eq!(engine.execution_log().entries(), &["P1", "P2", "P1"]);
        let p1 = engine.record(ProcessId(0));
        let p2 = engine.record(ProcessId(1));
        assert_eq!(p2.completion_time(), Some(9));
        assert_eq!(p2.priority(), 1);
        assert_eq!(p1.completion_time(), Some(10));
        assert_eq!(p1.waiting_time(), Some(5));
        assert_eq!(p1.priority(), 1);
    }

    #[test]
    fn better_priority_arrival_preempts_and_charges_switch() {
        let engine = run(
            vec![
                ProcessRecord::new("low", 0, 4, 5),
                ProcessRecord::new("high", 1, 2, 1),
            ],
            100,
            1,
        );
        // low [0,1) | cs | high [2,4) | cs | low [5,8)
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(4));
        assert_eq!(engine.record(ProcessId(0)).completion_time(), Some(8));
        assert_eq!(engine.stats().context_switches, 2);
        assert_eq!(engine.stats().preemptions, 1);
        assert_eq!(engine.execution_log().entries(), &["low", "high", "low"]);
    }

    #[test]
    fn dispatch_after_idle_gap_charges_switch() {
        let engine = run(
            vec![ProcessRecord::new("P1", 0, 2, 1), ProcessRecord::new("P2", 5, 1, 1)],
            100,
            2,
        );
        // P1 [0,2) | idle [2,5) | cs [5,7) | P2 [7,8)
        assert_eq!(engine.stats().idle_ticks, 3);
        assert_eq!(engine.stats().context_switches, 1);
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(8));
    }

    #[test]
    fn waiting_through_switch_ticks_ages() {
        let engine = run(
            vec![
                ProcessRecord::new("A", 0, 1, 1),
                ProcessRecord::new("B", 0, 1, 2),
                ProcessRecord::new("W", 0, 1, 5),
            ],
            3,
            2,
        );
        // W waits 1 tick behind A, then 2 switch ticks before B: three ticks, one step.
        let w = engine.record(ProcessId(2));
        assert_eq!(w.priority(), 4);
        assert_eq!(w.completion_time(), Some(7));
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(4));
    }

    #[test]
    fn wait_counter_survives_a_dispatch() {
        let engine = run(
            vec![
                ProcessRecord::new("X", 0, 2, 1),
                ProcessRecord::new("L", 0, 5, 4),
                ProcessRecord::new("H", 3, 2, 1),
            ],
            3,
            0,
        );
        // L waits 2 ticks, runs 1, is preempted by H and ages on its first tick back in line.
        assert_eq!(engine.execution_log().entries(), &["X", "L", "H", "L"]);
        let l = engine.record(ProcessId(1));
        assert_eq!(l.priority(), 3);
        assert_eq!(l.completion_time(), Some(9));
        assert_eq!(engine.record(ProcessId(2)).completion_time(), Some(5));
    }

    #[test]
    fn idle_ticks_advance_one_at_a_time() {
        let engine = run(vec![ProcessRecord::new("P1", 3, 2, 1)], 1, 0);
        assert_eq!(engine.stats().idle_ticks, 3);
        assert_eq!(engine.record(ProcessId(0)).completion_time(), Some(5));
    }

    #[test]
    fn priority_never_drops_below_floor() {
        let mut engine = Engine::new(
            vec![
                ProcessRecord::new("runner", 0, 10, 0),
                ProcessRecord::new("waiter", 0, 1, 3),
            ],
            0,
        );
        PriorityAging::new(1, 2).run(&mut engine);
        assert_eq!(engine.record(ProcessId(1)).priority(), 2);
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(11));
    }
}
