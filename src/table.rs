//! The transition table: a mapping from `(state, symbol)` to a possibly partial rule.
//!
//! The table is tolerant of missing and partial entries at all times so it can be edited one
//! field at a time. Completeness is checked on demand by [`crate::validator`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Direction, Symbol};

/// A single transition rule, triggered by the current state and the symbol under the head.
///
/// `write` and `next_state` stay unset until an editor supplies them; `direction` is
/// `Right` from the moment the rule is created.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The symbol written under the head.
    #[serde(default)]
    pub write: Option<Symbol>,
    /// The state the machine moves to.
    #[serde(default)]
    pub next_state: Option<String>,
    /// Where the head moves after writing.
    #[serde(default)]
    pub direction: Direction,
}

impl Rule {
    /// A fully specified rule.
    pub fn new(write: Symbol, next_state: impl Into<String>, direction: Direction) -> Self {
        Self {
            write: Some(write),
            next_state: Some(next_state.into()),
            direction,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.write.is_some() && self.next_state.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The fields an editor changes in one update. Fields left untouched keep their current
/// value; on first creation of a key they take the [`Rule::default`] value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleUpdate {
    write: Option<Option<Symbol>>,
    next_state: Option<Option<String>>,
    direction: Option<Direction>,
}

impl RuleUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(mut self, symbol: Symbol) -> Self {
        self.write = Some(Some(symbol));
        self
    }

    /// Unsets the write symbol, e.g. when an editor field is emptied.
    pub fn clear_write(mut self) -> Self {
        self.write = Some(None);
        self
    }

    pub fn next_state(mut self, state: impl Into<String>) -> Self {
        self.next_state = Some(Some(state.into()));
        self
    }

    pub fn clear_next_state(mut self) -> Self {
        self.next_state = Some(None);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    fn apply(self, rule: &mut Rule) {
        if let Some(write) = self.write {
            rule.write = write;
        }
        if let Some(next_state) = self.next_state {
            rule.next_state = next_state;
        }
        if let Some(direction) = self.direction {
            rule.direction = direction;
        }
    }
}

impl From<Rule> for RuleUpdate {
    fn from(rule: Rule) -> Self {
        Self {
            write: Some(rule.write),
            next_state: Some(rule.next_state),
            direction: Some(rule.direction),
        }
    }
}

/// Rules keyed by source state, then by the symbol read.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<Symbol, Rule>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point lookup. Absence is a normal answer, not an error.
    pub fn rule(&self, state: &str, symbol: Symbol) -> Option<&Rule> {
        self.rules.get(state).and_then(|row| row.get(&symbol))
    }

    /// Merges `update` into the rule at `(state, symbol)`, creating the rule first if the
    /// key is new. Returns the rule as stored after the merge.
    pub fn set(&mut self, state: &str, symbol: Symbol, update: RuleUpdate) -> &Rule {
        let rule = self
            .rules
            .entry(state.to_string())
            .or_default()
            .entry(symbol)
            .or_default();
        update.apply(rule);
        rule
    }

    /// Builder-style variant of [`TransitionTable::set`].
    pub fn with_rule(mut self, state: &str, symbol: Symbol, rule: Rule) -> Self {
        self.set(state, symbol, rule.into());
        self
    }

    /// Drops the rule at `(state, symbol)` if one exists.
    pub fn remove(&mut self, state: &str, symbol: Symbol) -> Option<Rule> {
        let row = self.rules.get_mut(state)?;
        let removed = row.remove(&symbol);
        if row.is_empty() {
            self.rules.remove(state);
        }
        removed
    }

    /// Drops every rule whose source is `state`.
    pub fn remove_state(&mut self, state: &str) {
        self.rules.remove(state);
    }

    /// Drops every rule that reads `symbol`.
    pub fn remove_symbol(&mut self, symbol: Symbol) {
        for row in self.rules.values_mut() {
            row.remove(&symbol);
        }
        self.rules.retain(|_, row| !row.is_empty());
    }

    /// Moves the row of `old` to `new` and retargets every rule pointing at `old`.
    pub fn rename_state(&mut self, old: &str, new: &str) {
        if let Some(row) = self.rules.remove(old) {
            self.rules.insert(new.to_string(), row);
        }
        for rule in self.rules.values_mut().flat_map(|row| row.values_mut()) {
            if rule.next_state.as_deref() == Some(old) {
                rule.next_state = Some(new.to_string());
            }
        }
    }

    /// Moves the column of `old` to `new`. Write symbols are left for the validator to flag.
    pub fn rename_symbol(&mut self, old: Symbol, new: Symbol) {
        for row in self.rules.values_mut() {
            if let Some(rule) = row.remove(&old) {
                row.insert(new, rule);
            }
        }
    }

    /// Number of stored rules, partial ones included.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
