//! This crate provides the core logic for a single-tape Turing machine simulator.
//! It includes modules for defining and editing machines, validating their transition tables,
//! stepping their execution over a growable tape, and loading definitions from JSON.

pub mod config;
pub mod loader;
pub mod machine;
pub mod program;
pub mod programs;
pub mod simulator;
pub mod table;
pub mod tape;
pub mod types;
pub mod validator;

/// Re-exports the run settings from the config module.
pub use config::RunConfig;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the machine definition from the program module.
pub use program::{Program, StateRemoval};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
pub use simulator::Simulator;
pub use table::{Rule, RuleUpdate, TransitionTable};
pub use tape::Tape;
/// Re-exports various types related to execution from the types module.
pub use types::{
    Direction, Halt, Rejection, Status, Step, Symbol, TuringMachineError, BLANK_SYMBOL,
};
/// Re-exports the table validator.
pub use validator::{validate, RuleField, ValidationFailure, ValidationReason};
