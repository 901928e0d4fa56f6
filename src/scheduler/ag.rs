//! Adaptive-Grain (AG) hybrid scheduler.
//!
//! Every process carries its own quantum `q`. While a process runs, the time it has spent
//! on the CPU since its last dispatch (`elapsed`) selects one of three zones:
//!
//! | Zone | Range                                 | Behaviour                                   |
//! |------|---------------------------------------|---------------------------------------------|
//! | 1    | `elapsed < ceil(q/4)`                 | non-preemptive execution                    |
//! | 2    | `ceil(q/4) <= elapsed < ceil(q/2)`    | preempt for a strictly better priority      |
//! | 3    | `elapsed >= ceil(q/2)`                | preempt for strictly less remaining time    |
//!
//! Quantum updates (each appended to the process's quantum history):
//! - zone 2 preemption: `q + ceil((q - elapsed) / 2)`
//! - zone 3 preemption: `q + (q - elapsed)`
//! - quantum exhausted without finishing: `q + 2`
//! - completion: `0`
//!
//! Candidates are scanned in ready-queue order and only a strictly better one replaces
//! the current best, so exact ties go to the process that has waited in the queue longest.

use std::collections::VecDeque;

use tracing::debug;

use super::engine::Engine;
use super::SchedulingPolicy;
use crate::config::PolicyKind;
use crate::process::ProcessId;

/// Quantum growth granted when a process uses its whole quantum without finishing.
pub const EXHAUSTION_INCREMENT: u32 = 2;

/// Adaptive-grain hybrid policy. Per-process quantums live on the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptiveGrain;

/// Execution zone of the running process, derived from its quantum and elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Pure execution, no preemption checks.
    NonPreemptive,
    /// Priority-based preemption.
    Priority,
    /// Shortest-remaining-time preemption.
    ShortestRemaining,
}

impl Zone {
    /// Classify `elapsed` ticks against quantum `q` using ceiling boundaries.
    pub fn of(quantum: u32, elapsed: u32) -> Zone {
        let (limit25, limit50) = zone_limits(quantum);
        if elapsed < limit25 {
            Zone::NonPreemptive
        } else if elapsed < limit50 {
            Zone::Priority
        } else {
            Zone::ShortestRemaining
        }
    }
}

/// `(ceil(q * 0.25), ceil(q * 0.50))` in integer arithmetic.
pub fn zone_limits(quantum: u32) -> (u32, u32) {
    (quantum.div_ceil(4), quantum.div_ceil(2))
}

/// Quantum assigned to a process preempted in `zone` after `elapsed` ticks of quantum `q`.
pub fn preempted_quantum(zone: Zone, quantum: u32, elapsed: u32) -> u32 {
    let unused = quantum.saturating_sub(elapsed);
    match zone {
        Zone::Priority => quantum.saturating_add(unused.div_ceil(2)),
        Zone::ShortestRemaining => quantum.saturating_add(unused),
        Zone::NonPreemptive => quantum,
    }
}

/// Quantum assigned to a process that used all of quantum `q` without finishing.
pub fn exhausted_quantum(quantum: u32) -> u32 {
    quantum.saturating_add(EXHAUSTION_INCREMENT)
}

impl AdaptiveGrain {
    /// First ready process with the lowest priority value.
    fn best_priority(engine: &Engine, ready: &VecDeque<ProcessId>) -> Option<usize> {
        Self::first_minimum(ready, |id| u64::from(engine.record(id).priority()))
    }

    /// First ready process with the least remaining time.
    fn shortest(engine: &Engine, ready: &VecDeque<ProcessId>) -> Option<usize> {
        Self::first_minimum(ready, |id| engine.record(id).remaining_time())
    }

    /// Scan in queue order, replacing the best only on a strictly smaller key.
    fn first_minimum(
        ready: &VecDeque<ProcessId>,
        key: impl Fn(ProcessId) -> u64,
    ) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (position, &id) in ready.iter().enumerate() {
            let value = key(id);
            match best {
                Some((_, current)) if value >= current => {}
                _ => best = Some((position, value)),
            }
        }
        best.map(|(position, _)| position)
    }

    /// Challenger position if the running process must yield in `zone`.
    fn challenger(
        engine: &Engine,
        ready: &VecDeque<ProcessId>,
        running: ProcessId,
        zone: Zone,
    ) -> Option<usize> {
        let current = engine.record(running);
        match zone {
            Zone::NonPreemptive => None,
            Zone::Priority => Self::best_priority(engine, ready)
                .filter(|&pos| engine.record(ready[pos]).priority() < current.priority()),
            Zone::ShortestRemaining => Self::shortest(engine, ready).filter(|&pos| {
                engine.record(ready[pos]).remaining_time() < current.remaining_time()
            }),
        }
    }
}

impl SchedulingPolicy for AdaptiveGrain {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Ag
    }

    fn run(&self, engine: &mut Engine) {
        let mut ready: VecDeque<ProcessId> = VecDeque::new();
        let mut current: Option<ProcessId> = None;
        // Ticks the current process has run since it was last dispatched.
        let mut elapsed: u32 = 0;

        while !engine.is_finished() {
            // ================================================================
            // STEP 1: Fold arrivals into the ready queue, claim a free CPU
            // ================================================================
            engine.admit_arrivals(&mut ready);

            let running = match current {
                Some(id) => id,
                None => {
                    let Some(id) = ready.pop_front() else {
                        if !engine.idle_until_next_arrival() {
                            break;
                        }
                        continue;
                    };
                    engine.dispatch(id);
                    elapsed = 0;
                    current = Some(id);
                    id
                }
            };

            // ================================================================
            // STEP 2: Zone check; a preemption swaps processes and ends the tick
            // ================================================================
            let quantum = engine.record(running).quantum();
            let zone = Zone::of(quantum, elapsed);
            if let Some(position) = Self::challenger(engine, &ready, running, zone) {
                let next_quantum = preempted_quantum(zone, quantum, elapsed);
                let Some(incoming) = ready.remove(position) else {
                    continue;
                };
                debug!(
                    preempted = engine.record(running).name(),
                    by = engine.record(incoming).name(),
                    zone = ?zone,
                    elapsed,
                    quantum = next_quantum,
                    at = engine.now(),
                    "preempt"
                );
                engine.count_preemption();
                engine.record_mut(running).assign_quantum(next_quantum);
                ready.push_back(running);
                engine.dispatch(incoming);
                current = Some(incoming);
                elapsed = 0;
                engine.context_switch();
                continue;
            }

            // ================================================================
            // STEP 3: Execute one tick, then completion or quantum exhaustion
            // ================================================================
            let finished = engine.execute(running, 1);
            elapsed += 1;

            if finished {
                engine.record_mut(running).assign_quantum(0);
                current = None;
                if !ready.is_empty() && !engine.is_finished() {
                    engine.context_switch();
                }
            } else if elapsed == quantum {
                let next_quantum = exhausted_quantum(quantum);
                debug!(
                    process = engine.record(running).name(),
                    quantum = next_quantum,
                    at = engine.now(),
                    "quantum exhausted"
                );
                engine.count_quantum_expiry();
                engine.record_mut(running).assign_quantum(next_quantum);
                ready.push_back(running);
                current = None;
                engine.context_switch();
            }
        }
    }
}
