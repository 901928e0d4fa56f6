//! Preemptive Shortest Job First (shortest remaining time first).
//!
//! Algorithm:
//! 1. Admit arrivals; if the CPU is idle and nothing is ready, jump to the next arrival
//! 2. If the CPU is free, pick the ready process with the least remaining time
//!    (ties: earliest arrival, then input order), charging a context switch first when
//!    it differs from the last process that ran
//! 3. Execute one tick, then admit arrivals at the new time
//! 4. On completion free the CPU; otherwise preempt if some ready process now has
//!    strictly less remaining time

use std::collections::VecDeque;

use tracing::debug;

use super::engine::Engine;
use super::SchedulingPolicy;
use crate::config::PolicyKind;
use crate::process::ProcessId;

/// Shortest-remaining-time-first policy. It has no parameters of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreemptiveSjf;

impl PreemptiveSjf {
    /// Position in `ready` of the process with the least remaining time.
    fn shortest(engine: &Engine, ready: &VecDeque<ProcessId>) -> Option<usize> {
        ready
            .iter()
            .enumerate()
            .min_by_key(|&(_, id)| {
                let record = engine.record(*id);
                (record.remaining_time(), record.arrival_time(), *id)
            })
            .map(|(position, _)| position)
    }
}

impl SchedulingPolicy for PreemptiveSjf {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Sjf
    }

    fn run(&self, engine: &mut Engine) {
        let mut ready: VecDeque<ProcessId> = VecDeque::new();
        let mut current: Option<ProcessId> = None;

        while !engine.is_finished() {
            engine.admit_arrivals(&mut ready);

            if current.is_none() && ready.is_empty() {
                if !engine.idle_until_next_arrival() {
                    break;
                }
                continue;
            }

            let running = match current {
                Some(id) => id,
                None => {
                    // Arrivals during the switch compete for the CPU too.
                    let pending = Self::shortest(engine, &ready).map(|pos| ready[pos]);
                    if pending.is_some_and(|id| engine.is_switch_to(id)) {
                        engine.context_switch();
                        engine.admit_arrivals(&mut ready);
                    }
                    let Some(position) = Self::shortest(engine, &ready) else {
                        continue;
                    };
                    let Some(id) = ready.remove(position) else {
                        continue;
                    };
                    engine.dispatch(id);
                    current = Some(id);
                    id
                }
            };

            if engine.execute(running, 1) {
                current = None;
                continue;
            }
            engine.admit_arrivals(&mut ready);

            let remaining = engine.record(running).remaining_time();
            if let Some(position) = Self::shortest(engine, &ready) {
                let challenger = ready[position];
                if engine.record(challenger).remaining_time() < remaining {
                    debug!(
                        preempted = engine.record(running).name(),
                        by = engine.record(challenger).name(),
                        at = engine.now(),
                        "preempt"
                    );
                    engine.count_preemption();
                    ready.push_back(running);
                    current = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessRecord;

    fn run(records: Vec<ProcessRecord>, cs: u64) -> Engine {
        let mut engine = Engine::new(records, cs);
        PreemptiveSjf.run(&mut engine);
        engine
    }

    #[test]
    fn shorter_arrival_preempts_running_process() {
        let engine = run(
            vec![
                ProcessRecord::new("P1", 0, 4, 1),
                ProcessRecord::new("P2", 1, 2, 1),
            ],
            0,
        );
        let p1 = engine.record(ProcessId(0));
        let p2 = engine.record(ProcessId(1));
        assert_eq!(p1.completion_time(), Some(6));
        assert_eq!(p1.waiting_time(), Some(2));
        assert_eq!(p2.completion_time(), Some(3));
        assert_eq!(p2.waiting_time(), Some(0));
        assert_eq!(engine.execution_log().entries(), &["P1", "P2", "P1"]);
        assert_eq!(engine.stats().preemptions, 1);
    }

    #[test]
    fn equal_remaining_time_does_not_preempt() {
        let engine = run(
            vec![
                ProcessRecord::new("P1", 0, 3, 1),
                ProcessRecord::new("P2", 1, 2, 1),
            ],
            0,
        );
        assert_eq!(engine.execution_log().entries(), &["P1", "P2"]);
        assert_eq!(engine.record(ProcessId(0)).completion_time(), Some(3));
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(5));
        assert_eq!(engine.stats().preemptions, 0);
    }

    #[test]
    fn ties_break_by_arrival_time() {
        let engine = run(
            vec![
                ProcessRecord::new("late", 1, 3, 1),
                ProcessRecord::new("early", 0, 1, 1),
                ProcessRecord::new("first", 0, 3, 1),
            ],
            0,
        );
        // At t=1 both "late" and "first" have 3 ticks left; "first" arrived earlier.
        assert_eq!(engine.execution_log().entries(), &["early", "first", "late"]);
    }

    #[test]
    fn idle_gap_jumps_to_next_arrival_and_charges_switch() {
        let engine = run(
            vec![
                ProcessRecord::new("P1", 0, 2, 1),
                ProcessRecord::new("P2", 5, 2, 1),
            ],
            1,
        );
        let stats = engine.stats();
        assert_eq!(stats.idle_ticks, 3);
        assert_eq!(stats.context_switch_ticks, 1);
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(8));
        assert_eq!(stats.makespan, stats.accounted_ticks());
    }

    #[test]
    fn context_switch_charged_on_preemption() {
        let engine = run(
            vec![
                ProcessRecord::new("P1", 0, 4, 1),
                ProcessRecord::new("P2", 1, 2, 1),
            ],
            1,
        );
        // P1 [0,1) | cs | P2 [2,4) | cs | P1 [5,8)
        assert_eq!(engine.record(ProcessId(1)).completion_time(), Some(4));
        assert_eq!(engine.record(ProcessId(0)).completion_time(), Some(8));
        assert_eq!(engine.stats().context_switches, 2);
    }
}
