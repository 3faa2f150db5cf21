//! This module checks a transition table for totality and well-formedness over the declared
//! states and tape alphabet before a machine is allowed to run.
//!
//! The check is short-circuiting: cells are visited in declaration order and the first
//! offending `(state, symbol)` pair is reported.

use std::fmt;
use thiserror::Error;

use crate::table::{Rule, TransitionTable};
use crate::types::{Symbol, BLANK_SYMBOL};

/// A rule field that must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Write,
    NextState,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleField::Write => "write symbol",
            RuleField::NextState => "next state",
        })
    }
}

/// The failure category of a single transition table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// No rule exists for the cell.
    MissingTransition,
    /// The rule exists but one of its fields is unset.
    MissingField(RuleField),
    /// The rule moves to a label outside the full state set.
    UnknownNextState(String),
    /// The rule writes a symbol outside the tape alphabet.
    UnknownWriteSymbol(Symbol),
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::MissingTransition => write!(f, "missing transition"),
            ValidationReason::MissingField(field) => write!(f, "missing {field}"),
            ValidationReason::UnknownNextState(state) => write!(f, "invalid next state {state}"),
            ValidationReason::UnknownWriteSymbol(symbol) => {
                write!(f, "invalid write symbol {symbol}")
            }
        }
    }
}

/// The first offending cell found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} for state {state}, symbol {}", describe_symbol(.symbol))]
pub struct ValidationFailure {
    pub state: String,
    pub symbol: Symbol,
    pub reason: ValidationReason,
}

fn describe_symbol(symbol: &Symbol) -> String {
    if *symbol == BLANK_SYMBOL {
        format!("blank ({BLANK_SYMBOL})")
    } else {
        symbol.to_string()
    }
}

/// Validates `table` over every `(state, symbol)` pair of `normal_states × alphabet`.
///
/// # Arguments
///
/// * `table` - The transition table to check. It is never mutated.
/// * `normal_states` - Source states in declaration order. Terminal states are not keys.
/// * `alphabet` - The tape alphabet in check order, blank first.
/// * `states` - The full state set (normal, accept and reject) allowed as next states.
///
/// # Returns
///
/// * `Ok(())` if every cell holds a complete, well-formed rule.
/// * `Err(ValidationFailure)` describing the first offending cell.
pub fn validate(
    table: &TransitionTable,
    normal_states: &[String],
    alphabet: &[Symbol],
    states: &[String],
) -> Result<(), ValidationFailure> {
    for state in normal_states {
        for &symbol in alphabet {
            check_cell(table.rule(state, symbol), alphabet, states).map_err(|reason| {
                ValidationFailure {
                    state: state.clone(),
                    symbol,
                    reason,
                }
            })?;
        }
    }

    Ok(())
}

/// Runs the per-cell checks in order: the rule exists, its fields are present, its next
/// state is known, and its write symbol belongs to the alphabet. The direction is a typed
/// value and always one of Left, Right or Stay.
fn check_cell(
    rule: Option<&Rule>,
    alphabet: &[Symbol],
    states: &[String],
) -> Result<(), ValidationReason> {
    let rule = rule.ok_or(ValidationReason::MissingTransition)?;
    let (write, next_state) = check_fields(rule)?;

    if !states.iter().any(|s| s == next_state) {
        return Err(ValidationReason::UnknownNextState(next_state.to_string()));
    }

    if !alphabet.contains(&write) {
        return Err(ValidationReason::UnknownWriteSymbol(write));
    }

    Ok(())
}

/// Returns the write symbol and next state of `rule`, or the first unset field.
pub(crate) fn check_fields(rule: &Rule) -> Result<(Symbol, &str), ValidationReason> {
    let write = rule
        .write
        .ok_or(ValidationReason::MissingField(RuleField::Write))?;
    let next_state = rule
        .next_state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationReason::MissingField(RuleField::NextState))?;

    Ok((write, next_state))
}
