//! The machine definition: declared states and symbols, the terminal and start labels, and
//! the transition table, together with the editing entry points a front-end drives.

use serde::{Deserialize, Serialize};

use crate::table::{Rule, RuleUpdate, TransitionTable};
use crate::types::{Symbol, TuringMachineError, BLANK_SYMBOL};
use crate::validator::{self, ValidationFailure};

/// Represents a single-tape Turing machine definition.
///
/// The table may be incomplete at any time; [`Program::validate`] decides whether it can run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the machine.
    pub name: String,
    /// Normal (non-terminal) states in declaration order.
    states: Vec<String>,
    /// Declared tape symbols in declaration order, blank excluded.
    symbols: Vec<Symbol>,
    accept_state: String,
    reject_state: String,
    /// The start state. `None` after the start state was removed, until a new one is picked.
    initial_state: Option<String>,
    /// Suggested input for a first run.
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    rules: TransitionTable,
}

/// What happened to the start state when a state was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRemoval {
    /// The start state is unchanged.
    Removed,
    /// The removed state was the start state; a new one has to be selected.
    StartStateCleared,
}

impl Program {
    /// Creates a definition, rejecting malformed construction arguments.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name.
    /// * `states` - Normal states, at least one.
    /// * `symbols` - Declared tape symbols; the blank symbol is implicit.
    /// * `accept_state`, `reject_state` - Distinct terminal labels, not among `states`.
    /// * `initial_state` - The start state, one of `states`.
    /// * `rules` - A transition table, possibly incomplete.
    pub fn new(
        name: impl Into<String>,
        states: Vec<String>,
        symbols: Vec<Symbol>,
        accept_state: impl Into<String>,
        reject_state: impl Into<String>,
        initial_state: impl Into<String>,
        rules: TransitionTable,
    ) -> Result<Self, TuringMachineError> {
        let program = Self {
            name: name.into(),
            states,
            symbols,
            accept_state: accept_state.into(),
            reject_state: reject_state.into(),
            initial_state: Some(initial_state.into()),
            input: String::new(),
            rules,
        };

        program.check()?;
        Ok(program)
    }

    /// Sets the suggested input.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Checks the construction invariants: labels are non-empty and unique, terminals are
    /// disjoint from each other and from normal states, the blank is never declared, and the
    /// start state (if selected) is a normal state.
    pub fn check(&self) -> Result<(), TuringMachineError> {
        if self.states.is_empty() {
            return Err(TuringMachineError::NoStates);
        }

        for (i, state) in self.states.iter().enumerate() {
            check_label(state)?;
            if self.states[..i].contains(state) {
                return Err(TuringMachineError::DuplicateState(state.clone()));
            }
        }

        check_label(&self.accept_state)?;
        check_label(&self.reject_state)?;
        if self.accept_state == self.reject_state {
            return Err(TuringMachineError::TerminalConflict(format!(
                "accept and reject are both {}",
                self.accept_state
            )));
        }
        for terminal in [&self.accept_state, &self.reject_state] {
            if self.states.contains(terminal) {
                return Err(TuringMachineError::TerminalConflict(format!(
                    "{terminal} is declared as a normal state"
                )));
            }
        }

        for (i, &symbol) in self.symbols.iter().enumerate() {
            if symbol == BLANK_SYMBOL {
                return Err(TuringMachineError::ReservedBlank(symbol));
            }
            if self.symbols[..i].contains(&symbol) {
                return Err(TuringMachineError::DuplicateSymbol(symbol));
            }
        }

        if let Some(start) = &self.initial_state {
            if !self.is_normal_state(start) {
                return Err(TuringMachineError::InvalidStartState(start.clone()));
            }
        }

        Ok(())
    }

    /// Validates the transition table over the declared states and the full tape alphabet.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        validator::validate(
            &self.rules,
            &self.states,
            &self.alphabet(),
            &self.all_states(),
        )
    }

    /// Normal states in declaration order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Declared symbols in declaration order, blank excluded.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The full tape alphabet: blank first, then declared symbols.
    pub fn alphabet(&self) -> Vec<Symbol> {
        std::iter::once(BLANK_SYMBOL)
            .chain(self.symbols.iter().copied())
            .collect()
    }

    /// The full state set: normal states, then accept and reject.
    pub fn all_states(&self) -> Vec<String> {
        let mut states = self.states.clone();
        states.push(self.accept_state.clone());
        states.push(self.reject_state.clone());
        states
    }

    pub fn accept_state(&self) -> &str {
        &self.accept_state
    }

    pub fn reject_state(&self) -> &str {
        &self.reject_state
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn rules(&self) -> &TransitionTable {
        &self.rules
    }

    pub fn rule(&self, state: &str, symbol: Symbol) -> Option<&Rule> {
        self.rules.rule(state, symbol)
    }

    pub fn is_normal_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    pub fn is_terminal_state(&self, state: &str) -> bool {
        state == self.accept_state || state == self.reject_state
    }

    /// Declares a new normal state at the end of the list.
    pub fn add_state(&mut self, state: impl Into<String>) -> Result<(), TuringMachineError> {
        let state = state.into();
        self.check_new_state(&state)?;
        self.states.push(state);
        Ok(())
    }

    /// Removes a normal state and its table row.
    ///
    /// Removing the start state clears the selection rather than picking a replacement; the
    /// caller must select a new start state with [`Program::set_initial_state`].
    pub fn remove_state(&mut self, state: &str) -> Result<StateRemoval, TuringMachineError> {
        let index = self
            .states
            .iter()
            .position(|s| s == state)
            .ok_or_else(|| TuringMachineError::InvalidState(state.to_string()))?;
        if self.states.len() == 1 {
            return Err(TuringMachineError::LastState(state.to_string()));
        }

        self.states.remove(index);
        self.rules.remove_state(state);

        if self.initial_state.as_deref() == Some(state) {
            self.initial_state = None;
            Ok(StateRemoval::StartStateCleared)
        } else {
            Ok(StateRemoval::Removed)
        }
    }

    /// Renames a normal state in place. Its row, rules targeting it, and the start selection
    /// follow the new label.
    pub fn rename_state(&mut self, old: &str, new: impl Into<String>) -> Result<(), TuringMachineError> {
        let new = new.into();
        let index = self
            .states
            .iter()
            .position(|s| s == old)
            .ok_or_else(|| TuringMachineError::InvalidState(old.to_string()))?;
        if new == old {
            return Ok(());
        }
        self.check_new_state(&new)?;

        self.rules.rename_state(old, &new);
        if self.initial_state.as_deref() == Some(old) {
            self.initial_state = Some(new.clone());
        }
        self.states[index] = new;
        Ok(())
    }

    /// Selects the start state. It must be a normal state.
    pub fn set_initial_state(&mut self, state: &str) -> Result<(), TuringMachineError> {
        if !self.is_normal_state(state) {
            return Err(TuringMachineError::InvalidStartState(state.to_string()));
        }
        self.initial_state = Some(state.to_string());
        Ok(())
    }

    /// Declares a new tape symbol. The blank symbol is implicit and refused.
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<(), TuringMachineError> {
        self.check_new_symbol(symbol)?;
        self.symbols.push(symbol);
        Ok(())
    }

    /// Removes a declared symbol and its table column.
    pub fn remove_symbol(&mut self, symbol: Symbol) -> Result<(), TuringMachineError> {
        if symbol == BLANK_SYMBOL {
            return Err(TuringMachineError::ReservedBlank(symbol));
        }
        let index = self
            .symbols
            .iter()
            .position(|&s| s == symbol)
            .ok_or(TuringMachineError::InvalidSymbol(symbol))?;

        self.symbols.remove(index);
        self.rules.remove_symbol(symbol);
        Ok(())
    }

    /// Replaces a declared symbol in place; its column follows.
    pub fn rename_symbol(&mut self, old: Symbol, new: Symbol) -> Result<(), TuringMachineError> {
        if old == BLANK_SYMBOL {
            return Err(TuringMachineError::ReservedBlank(old));
        }
        let index = self
            .symbols
            .iter()
            .position(|&s| s == old)
            .ok_or(TuringMachineError::InvalidSymbol(old))?;
        if new == old {
            return Ok(());
        }
        self.check_new_symbol(new)?;

        self.rules.rename_symbol(old, new);
        self.symbols[index] = new;
        Ok(())
    }

    /// Merges a partial rule into the table at `(state, symbol)`.
    ///
    /// Only normal states and alphabet symbols address cells. The rule's contents are not
    /// checked here; that is the validator's job.
    pub fn set_rule(
        &mut self,
        state: &str,
        symbol: Symbol,
        update: RuleUpdate,
    ) -> Result<&Rule, TuringMachineError> {
        if !self.is_normal_state(state) {
            return Err(TuringMachineError::InvalidState(state.to_string()));
        }
        if symbol != BLANK_SYMBOL && !self.symbols.contains(&symbol) {
            return Err(TuringMachineError::InvalidSymbol(symbol));
        }
        Ok(self.rules.set(state, symbol, update))
    }

    fn check_new_state(&self, state: &str) -> Result<(), TuringMachineError> {
        check_label(state)?;
        if self.is_terminal_state(state) {
            return Err(TuringMachineError::TerminalConflict(format!(
                "{state} is a terminal state"
            )));
        }
        if self.is_normal_state(state) {
            return Err(TuringMachineError::DuplicateState(state.to_string()));
        }
        Ok(())
    }

    fn check_new_symbol(&self, symbol: Symbol) -> Result<(), TuringMachineError> {
        if symbol == BLANK_SYMBOL {
            return Err(TuringMachineError::ReservedBlank(symbol));
        }
        if self.symbols.contains(&symbol) {
            return Err(TuringMachineError::DuplicateSymbol(symbol));
        }
        Ok(())
    }
}

fn check_label(label: &str) -> Result<(), TuringMachineError> {
    if label.trim().is_empty() {
        return Err(TuringMachineError::EmptyState);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use crate::validator::ValidationReason;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn two_state_program() -> Program {
        Program::new(
            "Test Program",
            labels(&["q0", "q1"]),
            vec!['0', '1'],
            "halt",
            "reject",
            "q0",
            TransitionTable::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_alphabet_puts_blank_first() {
        let program = two_state_program();
        assert_eq!(program.alphabet(), vec![BLANK_SYMBOL, '0', '1']);
        assert_eq!(
            program.all_states(),
            labels(&["q0", "q1", "halt", "reject"])
        );
    }

    #[test]
    fn test_construction_rejects_start_outside_normal_states() {
        let result = Program::new(
            "Bad",
            labels(&["q0"]),
            vec!['0'],
            "halt",
            "reject",
            "halt",
            TransitionTable::new(),
        );
        assert_eq!(
            result.unwrap_err(),
            TuringMachineError::InvalidStartState("halt".into())
        );
    }

    #[test]
    fn test_construction_rejects_terminal_conflicts() {
        let same = Program::new(
            "Bad",
            labels(&["q0"]),
            vec![],
            "end",
            "end",
            "q0",
            TransitionTable::new(),
        );
        assert!(matches!(same, Err(TuringMachineError::TerminalConflict(_))));

        let overlapping = Program::new(
            "Bad",
            labels(&["q0", "halt"]),
            vec![],
            "halt",
            "reject",
            "q0",
            TransitionTable::new(),
        );
        assert!(matches!(
            overlapping,
            Err(TuringMachineError::TerminalConflict(_))
        ));
    }

    #[test]
    fn test_construction_rejects_declared_blank() {
        let result = Program::new(
            "Bad",
            labels(&["q0"]),
            vec!['0', BLANK_SYMBOL],
            "halt",
            "reject",
            "q0",
            TransitionTable::new(),
        );
        assert_eq!(
            result.unwrap_err(),
            TuringMachineError::ReservedBlank(BLANK_SYMBOL)
        );
    }

    #[test]
    fn test_add_state_rejects_duplicates_and_terminals() {
        let mut program = two_state_program();
        program.add_state("q2").unwrap();
        assert_eq!(program.states(), labels(&["q0", "q1", "q2"]));

        assert_eq!(
            program.add_state("q1"),
            Err(TuringMachineError::DuplicateState("q1".into()))
        );
        assert!(matches!(
            program.add_state("reject"),
            Err(TuringMachineError::TerminalConflict(_))
        ));
        assert_eq!(program.add_state(" "), Err(TuringMachineError::EmptyState));
    }

    #[test]
    fn test_removing_start_state_clears_selection() {
        let mut program = two_state_program();
        program
            .set_rule("q0", '0', RuleUpdate::new().write('1'))
            .unwrap();

        assert_eq!(
            program.remove_state("q0").unwrap(),
            StateRemoval::StartStateCleared
        );
        assert_eq!(program.initial_state(), None);
        assert!(program.rule("q0", '0').is_none());

        program.set_initial_state("q1").unwrap();
        assert_eq!(program.initial_state(), Some("q1"));
    }

    #[test]
    fn test_removing_other_state_keeps_start() {
        let mut program = two_state_program();
        assert_eq!(program.remove_state("q1").unwrap(), StateRemoval::Removed);
        assert_eq!(program.initial_state(), Some("q0"));
    }

    #[test]
    fn test_last_state_cannot_be_removed() {
        let mut program = two_state_program();
        program.remove_state("q1").unwrap();
        assert_eq!(
            program.remove_state("q0"),
            Err(TuringMachineError::LastState("q0".into()))
        );
    }

    #[test]
    fn test_rename_state_updates_start_and_rules() {
        let mut program = two_state_program();
        program
            .set_rule("q1", '0', RuleUpdate::new().next_state("q0"))
            .unwrap();

        program.rename_state("q0", "scan").unwrap();

        assert_eq!(program.initial_state(), Some("scan"));
        assert_eq!(program.states(), labels(&["scan", "q1"]));
        assert_eq!(
            program.rule("q1", '0').unwrap().next_state.as_deref(),
            Some("scan")
        );
    }

    #[test]
    fn test_blank_symbol_is_reserved() {
        let mut program = two_state_program();
        assert_eq!(
            program.add_symbol(BLANK_SYMBOL),
            Err(TuringMachineError::ReservedBlank(BLANK_SYMBOL))
        );
        assert_eq!(
            program.remove_symbol(BLANK_SYMBOL),
            Err(TuringMachineError::ReservedBlank(BLANK_SYMBOL))
        );
        assert_eq!(
            program.add_symbol('0'),
            Err(TuringMachineError::DuplicateSymbol('0'))
        );
    }

    #[test]
    fn test_remove_symbol_drops_column() {
        let mut program = two_state_program();
        program
            .set_rule("q0", '1', RuleUpdate::new().write('0'))
            .unwrap();

        program.remove_symbol('1').unwrap();

        assert_eq!(program.symbols(), &['0']);
        assert!(program.rule("q0", '1').is_none());
        assert_eq!(
            program.remove_symbol('1'),
            Err(TuringMachineError::InvalidSymbol('1'))
        );
    }

    #[test]
    fn test_rename_symbol() {
        let mut program = two_state_program();
        program
            .set_rule("q0", '1', RuleUpdate::new().write('1'))
            .unwrap();

        program.rename_symbol('1', 'X').unwrap();

        assert_eq!(program.symbols(), &['0', 'X']);
        assert!(program.rule("q0", 'X').is_some());
    }

    #[test]
    fn test_set_rule_addresses_only_known_cells() {
        let mut program = two_state_program();
        assert!(program
            .set_rule("q0", BLANK_SYMBOL, RuleUpdate::new().write('1'))
            .is_ok());
        assert_eq!(
            program
                .set_rule("halt", '0', RuleUpdate::new())
                .unwrap_err(),
            TuringMachineError::InvalidState("halt".into())
        );
        assert_eq!(
            program.set_rule("q0", '7', RuleUpdate::new()).unwrap_err(),
            TuringMachineError::InvalidSymbol('7')
        );
    }

    #[test]
    fn test_validate_walks_declared_cells() {
        let mut program = two_state_program();
        let failure = program.validate().unwrap_err();
        assert_eq!(failure.state, "q0");
        assert_eq!(failure.symbol, BLANK_SYMBOL);
        assert_eq!(failure.reason, ValidationReason::MissingTransition);

        for state in ["q0", "q1"] {
            for symbol in program.alphabet() {
                program
                    .set_rule(
                        state,
                        symbol,
                        Rule::new(symbol, "halt", Direction::Right).into(),
                    )
                    .unwrap();
            }
        }
        assert!(program.validate().is_ok());
    }
}
