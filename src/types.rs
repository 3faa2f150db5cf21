//! This module defines the core data structures and types shared by the engine: symbols,
//! head directions, engine statuses, step outcomes, and the library error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::validator::ValidationFailure;

/// A single tape cell value.
pub type Symbol = char;

/// The reserved blank symbol. It is always part of the tape alphabet and can never be
/// declared, removed, or duplicated by an editor.
pub const BLANK_SYMBOL: Symbol = '_';

/// Represents the possible directions the head can move after a transition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    #[default]
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Short code used when rendering a transition table.
    pub fn code(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Supports '<' or 'L' for Left, '>' or 'R' for Right, and '-', 'S' or 'N' for Stay.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "L" | "l" => Ok(Direction::Left),
            ">" | "R" | "r" => Ok(Direction::Right),
            "-" | "S" | "s" | "N" | "n" => Ok(Direction::Stay),
            other => Err(TuringMachineError::InvalidDirection(other.to_string())),
        }
    }
}

/// Why a run ended in the reject status.
///
/// Both variants render under the same `REJECT` label, but callers can tell a declared
/// rejection from a missing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A rule moved the machine into the declared reject state.
    RejectState,
    /// No rule exists for the current state and the symbol under the head.
    UndefinedTransition { state: String, symbol: Symbol },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RejectState => write!(f, "Reached the reject state"),
            Rejection::UndefinedTransition { state, symbol } => write!(
                f,
                "No transition defined for state {state} and symbol {symbol}"
            ),
        }
    }
}

/// Engine-level status of a run instance. This is distinct from the user-defined
/// Turing machine states.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Status {
    /// Constructed or reset, not yet validated or run.
    #[default]
    Idle,
    /// The transition table passed validation.
    Validated,
    /// Steps are being applied.
    Running,
    /// The current state is the accept state.
    Accepted,
    /// The current state is the reject state, or no rule matched.
    Rejected(Rejection),
    /// Validation failed, or a step met a partially defined rule.
    Errored(ValidationFailure),
}

impl Status {
    /// The label a front-end shows for this status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "IDLE",
            Status::Validated => "VALIDATED",
            Status::Running => "RUNNING",
            Status::Accepted => "HALT",
            Status::Rejected(_) => "REJECT",
            Status::Errored(_) => "ERROR",
        }
    }

    /// Whether no further step can change the machine.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Accepted | Status::Rejected(_) | Status::Errored(_)
        )
    }

    /// Whether `step()` will apply a transition from this status.
    pub fn can_step(&self) -> bool {
        matches!(self, Status::Idle | Status::Validated | Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents the outcome of a single `step()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied and the machine can keep going.
    Continue,
    /// The machine is in a terminal status.
    Halt(Halt),
}

/// The terminal outcome reported by [`Step::Halt`].
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    Accept,
    Reject(Rejection),
    Error(ValidationFailure),
}

/// Represents errors caused by misusing the engine: malformed definitions and edits,
/// or failing to read definitions and settings supplied by a front-end.
///
/// Data-driven conditions (an incomplete table, a missing rule while running) are never
/// reported through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A label that is not a declared state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A state label was declared twice.
    #[error("Duplicate state: {0}")]
    DuplicateState(String),
    /// A state label is empty or blank.
    #[error("State labels must not be empty")]
    EmptyState,
    /// A terminal label overlaps another terminal label or a normal state.
    #[error("Terminal state conflict: {0}")]
    TerminalConflict(String),
    /// The start state is missing or not a normal state.
    #[error("Invalid start state: {0}")]
    InvalidStartState(String),
    /// No start state is selected.
    #[error("No start state selected")]
    MissingStartState,
    /// No normal states were declared.
    #[error("At least one normal state is required")]
    NoStates,
    /// Every machine needs at least one normal state.
    #[error("Cannot remove the last normal state: {0}")]
    LastState(String),
    /// A symbol that is not part of the declared alphabet.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(Symbol),
    /// A symbol was declared twice.
    #[error("Duplicate symbol: {0:?}")]
    DuplicateSymbol(Symbol),
    /// The blank symbol is implicit and cannot be edited.
    #[error("The blank symbol {0:?} is reserved")]
    ReservedBlank(Symbol),
    /// A direction code that is not one of L, R or S.
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),
    /// A definition or settings document could not be decoded.
    #[error("Program parsing error: {0}")]
    ParseError(String),
    /// No built-in program matches the requested index or name.
    #[error("Program not found: {0}")]
    ProgramNotFound(String),
    /// An error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{RuleField, ValidationReason};

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let stay: Direction = serde_json::from_str("\"Stay\"").unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_direction_from_code() {
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(">".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::Stay);
        assert_eq!("S".parse::<Direction>().unwrap(), Direction::Stay);

        let error = "X".parse::<Direction>().unwrap_err();
        assert_eq!(error, TuringMachineError::InvalidDirection("X".into()));
    }

    #[test]
    fn test_direction_defaults_to_right() {
        assert_eq!(Direction::default(), Direction::Right);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Idle.label(), "IDLE");
        assert_eq!(Status::Accepted.to_string(), "HALT");

        let declared = Status::Rejected(Rejection::RejectState);
        let undefined = Status::Rejected(Rejection::UndefinedTransition {
            state: "q0".into(),
            symbol: '1',
        });
        assert_eq!(declared.label(), undefined.label());
        assert_ne!(declared, undefined);
    }

    #[test]
    fn test_terminal_statuses() {
        let failure = ValidationFailure {
            state: "q0".into(),
            symbol: BLANK_SYMBOL,
            reason: ValidationReason::MissingField(RuleField::Write),
        };

        assert!(Status::Accepted.is_terminal());
        assert!(Status::Errored(failure).is_terminal());
        assert!(!Status::Running.is_terminal());
        assert!(Status::Validated.can_step());
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::UndefinedTransition {
            state: "q1".into(),
            symbol: '0',
        };
        assert_eq!(
            rejection.to_string(),
            "No transition defined for state q1 and symbol 0"
        );
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::InvalidState("q9".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid state"));
        assert!(error_msg.contains("q9"));
    }
}
