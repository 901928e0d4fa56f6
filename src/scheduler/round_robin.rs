//! Round Robin with a fixed time quantum.
//!
//! The ready set is a FIFO queue. Each dispatch runs the head process for
//! `min(time_quantum, remaining)` ticks in one slice. Arrivals that happen during the
//! context switch or the slice are queued *before* the sliced process rejoins the tail,
//! so a newcomer arriving exactly at a slice boundary runs ahead of it.
//!
//! A context switch is charged before every dispatch except the very first of the run,
//! including re-dispatching the same process and leaving an idle gap. An idle CPU
//! advances one tick at a time until the next arrival.

use std::collections::VecDeque;

use tracing::debug;

use super::engine::Engine;
use super::SchedulingPolicy;
use crate::config::PolicyKind;
use crate::process::ProcessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobin {
    time_quantum: u64,
}

impl RoundRobin {
    /// `time_quantum` must be positive; [`crate::config::SimulationConfig`] guarantees it.
    pub fn new(time_quantum: u64) -> Self {
        debug_assert!(time_quantum > 0);
        Self { time_quantum }
    }
}

impl SchedulingPolicy for RoundRobin {
    fn kind(&self) -> PolicyKind {
        PolicyKind::RoundRobin
    }

    fn run(&self, engine: &mut Engine) {
        let mut ready: VecDeque<ProcessId> = VecDeque::new();
        let mut dispatched_once = false;

        while !engine.is_finished() {
            engine.admit_arrivals(&mut ready);

            // Nothing ready means an arrival is still pending.
            let Some(id) = ready.pop_front() else {
                if engine.next_arrival_time().is_none() {
                    break;
                }
                engine.idle_tick();
                continue;
            };

            if dispatched_once {
                engine.context_switch();
                engine.admit_arrivals(&mut ready);
            }
            dispatched_once = true;
            engine.dispatch(id);

            let slice = self.time_quantum.min(engine.record(id).remaining_time());
            let finished = engine.execute(id, slice);
            engine.admit_arrivals(&mut ready);

            if !finished {
                debug!(
                    process = engine.record(id).name(),
                    at = engine.now(),
                    remaining = engine.record(id).remaining_time(),
                    "quantum expired"
                );
                engine.count_quantum_expiry();
                ready.push_back(id);
            }
        }
    }
}
