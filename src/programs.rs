//! Built-in machine definitions a front-end can offer without any files on disk.

use tracing::warn;

use crate::program::Program;
use crate::table::{Rule, TransitionTable};
use crate::types::{Direction, TuringMachineError, BLANK_SYMBOL};

use crate::types::Direction::{Left, Right, Stay};

const B: char = BLANK_SYMBOL;

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = builtin_programs();
}

type Row<'a> = (&'a str, char, char, &'a str, Direction);

fn build(
    name: &str,
    states: &[&str],
    symbols: &[char],
    input: &str,
    rows: &[Row<'_>],
) -> Result<Program, TuringMachineError> {
    let rules = rows
        .iter()
        .fold(TransitionTable::new(), |table, &(state, read, write, next, dir)| {
            table.with_rule(state, read, Rule::new(write, next, dir))
        });

    Ok(Program::new(
        name,
        states.iter().map(|s| s.to_string()).collect(),
        symbols.to_vec(),
        "halt",
        "reject",
        states[0],
        rules,
    )?
    .with_input(input))
}

fn builtin_programs() -> Vec<Program> {
    let definitions = [
        build(
            "Unary marker",
            &["q0"],
            &['1', 'X'],
            "1111",
            &[
                ("q0", '1', 'X', "q0", Right),
                ("q0", 'X', 'X', "reject", Right),
                ("q0", B, B, "halt", Right),
            ],
        ),
        build(
            "First zero",
            &["q0"],
            &['0', '1'],
            "110",
            &[
                ("q0", '1', '1', "q0", Right),
                ("q0", '0', '0', "halt", Stay),
                ("q0", B, B, "reject", Stay),
            ],
        ),
        build(
            "Binary increment",
            &["scan", "carry"],
            &['0', '1'],
            "1011",
            &[
                ("scan", '0', '0', "scan", Right),
                ("scan", '1', '1', "scan", Right),
                ("scan", B, B, "carry", Left),
                ("carry", '1', '0', "carry", Left),
                ("carry", '0', '1', "halt", Stay),
                ("carry", B, '1', "halt", Stay),
            ],
        ),
        build(
            "Even parity",
            &["even", "odd"],
            &['0', '1'],
            "1001",
            &[
                ("even", '0', '0', "even", Right),
                ("even", '1', '1', "odd", Right),
                ("even", B, B, "halt", Stay),
                ("odd", '0', '0', "odd", Right),
                ("odd", '1', '1', "even", Right),
                ("odd", B, B, "reject", Stay),
            ],
        ),
    ];

    definitions
        .into_iter()
        .filter_map(|program| match program {
            Ok(program) => Some(program),
            Err(e) => {
                warn!(error = %e, "failed to build a built-in program");
                None
            }
        })
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::ProgramNotFound(format!("index {} out of range", index))
        })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string()))
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state().map(str::to_string),
            input: program.input.clone(),
            state_count: program.states().len(),
            symbol_count: program.symbols().len(),
            transition_count: program.rules().len(),
        })
    }

    /// Search for programs by name, ignoring case. An empty query matches every program.
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: Option<String>,
    pub input: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub transition_count: usize,
}
