//! This module defines the `TuringMachine` run instance: one tape, one head and one current
//! state, advanced one transition at a time against a [`Program`] it borrows per call.

use tracing::{debug, trace};

use crate::program::Program;
use crate::tape::Tape;
use crate::types::{Halt, Rejection, Status, Step, TuringMachineError};
use crate::validator::{check_fields, ValidationFailure};

/// Represents a single-tape Turing machine run.
///
/// The machine does not own its definition. Every operation that consults the transition
/// table takes the [`Program`] by reference, so a front-end can keep editing the definition
/// between runs.
#[derive(Debug, Clone, Default)]
pub struct TuringMachine {
    state: String,
    tape: Tape,
    head: usize,
    status: Status,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine prepared with `input` for `program`.
    pub fn new(program: &Program, input: &str) -> Result<Self, TuringMachineError> {
        let mut machine = Self::default();
        machine.prepare(program, input)?;
        Ok(machine)
    }

    /// Resets the run: the tape becomes `[blank] + trim(input) + [blank; 3]`, the head sits on
    /// the first input character, the state is the start state and the status is `Idle`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::MissingStartState)` if the program has no start state
    ///   selected. The machine is left untouched in that case.
    pub fn prepare(&mut self, program: &Program, input: &str) -> Result<(), TuringMachineError> {
        let start = program
            .initial_state()
            .ok_or(TuringMachineError::MissingStartState)?;

        self.tape = Tape::from_input(input);
        self.head = 1;
        self.state = start.to_string();
        self.status = Status::Idle;
        self.step_count = 0;

        debug!(state = %self.state, tape = %self.tape, "prepared machine");
        Ok(())
    }

    /// Validates the program's transition table and records the outcome.
    ///
    /// Success moves an `Idle` machine to `Validated`; failure moves any machine that has not
    /// halted to `Errored` carrying the failure. A halted machine keeps its status, so the
    /// outcome of a finished run is never reopened; call [`TuringMachine::prepare`] first to
    /// start over. Neither the table nor the tape is modified.
    pub fn validate(&mut self, program: &Program) -> Result<(), ValidationFailure> {
        let result = program.validate();
        if self.status.is_terminal() {
            return result;
        }

        match result {
            Ok(()) => {
                debug!(program = %program.name, "transition table is complete");
                if self.status == Status::Idle {
                    self.status = Status::Validated;
                }
                Ok(())
            }
            Err(failure) => {
                debug!(program = %program.name, %failure, "transition table is incomplete");
                self.status = Status::Errored(failure.clone());
                Err(failure)
            }
        }
    }

    /// Marks a validated machine as running. Has no effect from any other status.
    pub fn start(&mut self) -> bool {
        if self.status == Status::Validated {
            self.status = Status::Running;
            true
        } else {
            false
        }
    }

    /// Executes a single transition.
    ///
    /// Reads the symbol under the head and looks up `(state, symbol)`. A missing rule halts the
    /// machine with [`Rejection::UndefinedTransition`]. Otherwise the rule's symbol is written,
    /// the head moves (growing the tape by at most one cell), and the state advances.
    /// Reaching the accept or reject state halts the machine.
    ///
    /// Once the status is terminal, further calls change nothing and report the halt again.
    pub fn step(&mut self, program: &Program) -> Step {
        if let Some(halt) = self.halt() {
            return Step::Halt(halt);
        }

        let symbol = self.tape.read(self.head);
        let Some(rule) = program.rule(&self.state, symbol) else {
            let rejection = Rejection::UndefinedTransition {
                state: self.state.clone(),
                symbol,
            };
            debug!(%rejection, "machine rejected");
            self.status = Status::Rejected(rejection.clone());
            return Step::Halt(Halt::Reject(rejection));
        };

        let (write, next_state) = match check_fields(rule) {
            Ok(fields) => fields,
            Err(reason) => {
                let failure = ValidationFailure {
                    state: self.state.clone(),
                    symbol,
                    reason,
                };
                debug!(%failure, "partial rule reached while running");
                self.status = Status::Errored(failure.clone());
                return Step::Halt(Halt::Error(failure));
            }
        };

        trace!(state = %self.state, %symbol, head = self.head, %write, next = %next_state, "step");

        self.tape.write(self.head, write);
        self.head = self.tape.move_and_grow(self.head, rule.direction);
        self.state = next_state.to_string();
        self.step_count += 1;

        if self.state == program.accept_state() {
            self.status = Status::Accepted;
        } else if self.state == program.reject_state() {
            self.status = Status::Rejected(Rejection::RejectState);
        } else {
            self.status = Status::Running;
            return Step::Continue;
        }

        debug!(state = %self.state, steps = self.step_count, "machine halted");
        self.halt().map_or(Step::Continue, Step::Halt)
    }

    /// The terminal outcome, if the status is terminal.
    pub fn halt(&self) -> Option<Halt> {
        match &self.status {
            Status::Accepted => Some(Halt::Accept),
            Status::Rejected(rejection) => Some(Halt::Reject(rejection.clone())),
            Status::Errored(failure) => Some(Halt::Error(failure.clone())),
            _ => None,
        }
    }

    /// Returns the current user-defined state.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.read(self.head)
    }

    /// Returns the total number of transitions applied since the last `prepare`.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_halted(&self) -> bool {
        self.status.is_terminal()
    }

    /// The validation failure to show when the status is `Errored`.
    pub fn validation_error(&self) -> Option<&ValidationFailure> {
        match &self.status {
            Status::Errored(failure) => Some(failure),
            _ => None,
        }
    }

    /// A human-readable note on why the machine stopped, if it did.
    pub fn message(&self) -> Option<String> {
        match &self.status {
            Status::Accepted => Some(format!("Accepted in state {}", self.state)),
            Status::Rejected(rejection) => Some(rejection.to_string()),
            Status::Errored(failure) => Some(failure.to_string()),
            _ => None,
        }
    }

    /// Returns to `Idle` without touching the tape, e.g. after the definition was edited.
    pub(crate) fn invalidate(&mut self) {
        self.status = Status::Idle;
    }
}
