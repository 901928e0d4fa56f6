//! Dispatch trace recorded while a simulation runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered process names that held the CPU, with adjacent duplicates collapsed.
///
/// A process that keeps running (or is re-dispatched with nobody in between) keeps its
/// slot, so the log reads as a sequence of CPU ownership changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionLog {
    entries: Vec<String>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless it is already the last entry.
    ///
    /// Returns `true` when a new entry was added.
    pub fn record(&mut self, name: &str) -> bool {
        if self.entries.last().map(String::as_str) == Some(name) {
            return false;
        }
        self.entries.push(name.to_string());
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ExecutionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.join(" -> "))
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for ExecutionLog {
    fn eq(&self, other: &[S]) -> bool {
        self.entries.len() == other.len()
            && self
                .entries
                .iter()
                .zip(other)
                .all(|(a, b)| a.as_str() == b.as_ref())
    }
}
