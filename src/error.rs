//! Error types for simulation setup and fixture handling.
//!
//! A simulation itself cannot fail once it starts: every failure mode is a
//! configuration problem detected by validation before the engine exists.
//! Both enums are `#[non_exhaustive]`; callers should keep a fallback arm.

use std::fmt;
use std::io;

/// Rejected process list or scheduling parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No processes were supplied.
    EmptyProcessList,
    /// Two processes share the same name.
    DuplicateName { name: String },
    /// A per-process integer field is negative.
    NegativeField {
        process: String,
        field: &'static str,
        value: i64,
    },
    /// A per-process field does not fit the simulator's integer range.
    FieldOutOfRange {
        process: String,
        field: &'static str,
        value: i64,
    },
    /// A process asks for no CPU time at all.
    ZeroBurst { process: String },
    /// Context-switch cost is negative.
    NegativeContextSwitch { value: i64 },
    /// Round robin selected without a time quantum.
    MissingTimeQuantum,
    /// Round-robin time quantum is zero or negative.
    InvalidTimeQuantum { value: i64 },
    /// Priority scheduling selected without an aging interval.
    MissingAgingInterval,
    /// Aging interval is zero or negative.
    InvalidAgingInterval { value: i64 },
    /// AG selected but a process carries no seed quantum.
    MissingSeedQuantum { process: String },
    /// AG seed quantum is zero or negative.
    InvalidSeedQuantum { process: String, value: i64 },
    /// Priority floor used by aging is negative.
    InvalidPriorityFloor { value: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyProcessList => write!(f, "process list is empty"),
            Self::DuplicateName { name } => write!(f, "duplicate process name `{name}`"),
            Self::NegativeField {
                process,
                field,
                value,
            } => write!(f, "process `{process}`: {field} must be >= 0, got {value}"),
            Self::FieldOutOfRange {
                process,
                field,
                value,
            } => write!(f, "process `{process}`: {field} {value} is out of range"),
            Self::ZeroBurst { process } => {
                write!(f, "process `{process}`: burst time must be positive")
            }
            Self::NegativeContextSwitch { value } => {
                write!(f, "context switch time must be >= 0, got {value}")
            }
            Self::MissingTimeQuantum => write!(f, "round robin requires a time quantum"),
            Self::InvalidTimeQuantum { value } => {
                write!(f, "round robin time quantum must be positive, got {value}")
            }
            Self::MissingAgingInterval => {
                write!(f, "priority scheduling requires an aging interval")
            }
            Self::InvalidAgingInterval { value } => {
                write!(f, "aging interval must be positive, got {value}")
            }
            Self::MissingSeedQuantum { process } => {
                write!(f, "process `{process}`: AG scheduling requires a quantum")
            }
            Self::InvalidSeedQuantum { process, value } => {
                write!(f, "process `{process}`: AG quantum must be positive, got {value}")
            }
            Self::InvalidPriorityFloor { value } => {
                write!(f, "priority floor must be >= 0, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while loading or running a JSON fixture.
#[derive(Debug)]
#[non_exhaustive]
pub enum FixtureError {
    /// Reading the fixture file failed.
    Io(io::Error),
    /// The fixture is not valid JSON or does not match the expected shape.
    Parse(serde_json::Error),
    /// The fixture describes an invalid simulation.
    Config(ConfigError),
    /// Policy label could not be recognised.
    UnknownPolicy { label: String },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Parse(err) => write!(f, "fixture parse error: {err}"),
            Self::Config(err) => write!(f, "invalid fixture: {err}"),
            Self::UnknownPolicy { label } => write!(
                f,
                "unknown policy `{label}` (expected one of sjf, rr, priority, ag)"
            ),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::UnknownPolicy { .. } => None,
        }
    }
}

impl From<io::Error> for FixtureError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ConfigError> for FixtureError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
