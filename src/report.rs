//! Plain-text rendering of a finished run.

use std::fmt;

use crate::config::PolicyKind;
use crate::process::ProcessRecord;
use crate::scheduler::SimulationReport;

const NAME_WIDTH: usize = 8;

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn history(record: &ProcessRecord) -> String {
    let entries: Vec<String> = record
        .quantum_history()
        .iter()
        .map(u32::to_string)
        .collect();
    format!("[{}]", entries.join(", "))
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show_quantum = self.policy == PolicyKind::Ag;
        let name_width = self
            .records
            .iter()
            .map(|r| r.name().len())
            .max()
            .unwrap_or(0)
            .max(NAME_WIDTH);

        writeln!(f, "Policy: {}", self.policy.label())?;
        write!(
            f,
            "{:<name_width$} {:>7} {:>6} {:>8} {:>8} {:>10} {:>10}",
            "Process", "Arrival", "Burst", "Priority", "Waiting", "Turnaround", "Completion"
        )?;
        if show_quantum {
            write!(f, "  Quantum history")?;
        }
        writeln!(f)?;

        for record in &self.records {
            write!(
                f,
                "{:<name_width$} {:>7} {:>6} {:>8} {:>8} {:>10} {:>10}",
                record.name(),
                record.arrival_time(),
                record.burst_time(),
                record.priority(),
                optional(record.waiting_time()),
                optional(record.turnaround_time()),
                optional(record.completion_time()),
            )?;
            if show_quantum {
                write!(f, "  {}", history(record))?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "Execution order: {}", self.execution_order)?;
        writeln!(
            f,
            "Average waiting time: {:.2}",
            self.summary.average_waiting_time
        )?;
        writeln!(
            f,
            "Average turnaround time: {:.2}",
            self.summary.average_turnaround_time
        )?;
        writeln!(
            f,
            "Average response time: {:.2}",
            self.summary.average_response_time
        )?;
        write!(
            f,
            "Makespan: {} (busy {}, idle {}, context switch {} over {} switches), ",
            self.stats.makespan,
            self.stats.busy_ticks,
            self.stats.idle_ticks,
            self.stats.context_switch_ticks,
            self.stats.context_switches,
        )?;
        write!(
            f,
            "CPU utilization {:.1}%",
            self.summary.cpu_utilization * 100.0
        )
    }
}
