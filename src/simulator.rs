//! The surface a front-end drives: one owned definition, one run instance, the last input, and
//! the advisory step delay.
//!
//! Every edit drops the run back to `Idle`, so a `Validated` or `Running` status always refers
//! to the table as it currently is.

use crate::config::RunConfig;
use crate::machine::TuringMachine;
use crate::program::{Program, StateRemoval};
use crate::table::{Rule, RuleUpdate};
use crate::tape::Tape;
use crate::types::{Status, Step, Symbol, TuringMachineError};
use crate::validator::ValidationFailure;

#[derive(Debug, Clone)]
pub struct Simulator {
    program: Program,
    machine: TuringMachine,
    input: String,
    config: RunConfig,
}

impl Simulator {
    /// Creates a simulator prepared with the program's suggested input.
    pub fn new(program: Program) -> Result<Self, TuringMachineError> {
        Self::with_config(program, RunConfig::default())
    }

    pub fn with_config(program: Program, config: RunConfig) -> Result<Self, TuringMachineError> {
        program.check()?;
        let input = program.input.clone();
        let machine = TuringMachine::new(&program, &input)?;

        Ok(Self {
            program,
            machine,
            input,
            config,
        })
    }

    // -- Editing --

    pub fn add_state(&mut self, state: impl Into<String>) -> Result<(), TuringMachineError> {
        self.program.add_state(state)?;
        self.machine.invalidate();
        Ok(())
    }

    /// Removes a normal state. When it was the start state, the caller has to select a new one
    /// with [`Simulator::set_initial_state`] before the machine can be prepared again.
    pub fn remove_state(&mut self, state: &str) -> Result<StateRemoval, TuringMachineError> {
        let removal = self.program.remove_state(state)?;
        self.machine.invalidate();
        Ok(removal)
    }

    pub fn rename_state(&mut self, old: &str, new: impl Into<String>) -> Result<(), TuringMachineError> {
        self.program.rename_state(old, new)?;
        self.machine.invalidate();
        Ok(())
    }

    pub fn set_initial_state(&mut self, state: &str) -> Result<(), TuringMachineError> {
        self.program.set_initial_state(state)?;
        self.machine.invalidate();
        Ok(())
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<(), TuringMachineError> {
        self.program.add_symbol(symbol)?;
        self.machine.invalidate();
        Ok(())
    }

    pub fn remove_symbol(&mut self, symbol: Symbol) -> Result<(), TuringMachineError> {
        self.program.remove_symbol(symbol)?;
        self.machine.invalidate();
        Ok(())
    }

    pub fn rename_symbol(&mut self, old: Symbol, new: Symbol) -> Result<(), TuringMachineError> {
        self.program.rename_symbol(old, new)?;
        self.machine.invalidate();
        Ok(())
    }

    /// Merges a partial rule into the table.
    pub fn set_rule(
        &mut self,
        state: &str,
        symbol: Symbol,
        update: RuleUpdate,
    ) -> Result<&Rule, TuringMachineError> {
        let rule = self.program.set_rule(state, symbol, update)?;
        self.machine.invalidate();
        Ok(rule)
    }

    // -- Running --

    /// Validates the current table. See [`TuringMachine::validate`].
    pub fn validate(&mut self) -> Result<(), ValidationFailure> {
        self.machine.validate(&self.program)
    }

    /// Prepares a fresh run with `input` and remembers it for [`Simulator::reset`].
    pub fn prepare(&mut self, input: &str) -> Result<(), TuringMachineError> {
        self.machine.prepare(&self.program, input)?;
        self.input = input.to_string();
        Ok(())
    }

    /// Prepares a fresh run with the last-used input.
    pub fn reset(&mut self) -> Result<(), TuringMachineError> {
        self.machine.prepare(&self.program, &self.input)
    }

    /// Prepares with the last-used input, validates, and enters `Running` so an external
    /// loop can keep calling [`Simulator::step`].
    ///
    /// # Returns
    ///
    /// * `Ok(Ok(()))` once the machine is running.
    /// * `Ok(Err(failure))` when validation failed; the status is `Errored`.
    /// * `Err(_)` when no start state is selected; the status is left untouched.
    pub fn run(&mut self) -> Result<Result<(), ValidationFailure>, TuringMachineError> {
        self.reset()?;
        if let Err(failure) = self.validate() {
            return Ok(Err(failure));
        }
        self.machine.start();
        Ok(Ok(()))
    }

    /// Applies one transition. See [`TuringMachine::step`].
    pub fn step(&mut self) -> Step {
        self.machine.step(&self.program)
    }

    /// Steps until the status leaves `Running`, or until `max_steps` transitions were applied.
    /// Returns the last step outcome.
    pub fn run_to_completion(&mut self) -> Step {
        let mut last = Step::Continue;
        for _ in 0..self.config.max_steps {
            last = self.step();
            if !matches!(last, Step::Continue) {
                break;
            }
        }
        last
    }

    /// Sets the advisory inter-step delay, clamped to the supported range.
    pub fn set_step_delay_ms(&mut self, delay_ms: u64) {
        self.config.set_step_delay_ms(delay_ms);
    }

    // -- Observing --

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn machine(&self) -> &TuringMachine {
        &self.machine
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tape(&self) -> &Tape {
        self.machine.tape()
    }

    pub fn head(&self) -> usize {
        self.machine.head()
    }

    pub fn state(&self) -> &str {
        self.machine.state()
    }

    pub fn status(&self) -> &Status {
        self.machine.status()
    }

    pub fn validation_error(&self) -> Option<&ValidationFailure> {
        self.machine.validation_error()
    }
}
