//! The fixed transition table of the increment machine.
//!
//! The table is built once into a process-wide static and never mutated. Engines borrow it,
//! so any number of them can share it without synchronization.

use crate::types::{State, Transition};
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// The increment machine's rules, keyed by `(state, symbol)`.
    pub static ref INCREMENT_TABLE: TransitionTable = TransitionTable::increment();
}

/// An immutable mapping from `(state, symbol)` to the transition to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<(State, char), Transition>,
}

impl TransitionTable {
    fn increment() -> Self {
        use crate::types::Direction::{Halt, Right};
        use crate::types::State::{Q0, Q1, Q2, Q3, Q4};

        let rules = [
            ((Q0, '0'), Transition::new(Q1, '!', Right)),
            ((Q0, '1'), Transition::new(Q2, '!', Right)),
            ((Q0, '!'), Transition::new(Q4, '!', Halt)),
            ((Q1, '!'), Transition::new(Q3, '0', Halt)),
            ((Q2, '!'), Transition::new(Q3, '1', Halt)),
            // q3 and q4 hold whatever they read and stop.
            ((Q3, '0'), Transition::new(Q3, '0', Halt)),
            ((Q3, '1'), Transition::new(Q3, '1', Halt)),
            ((Q3, '!'), Transition::new(Q3, '!', Halt)),
            ((Q4, '0'), Transition::new(Q4, '0', Halt)),
            ((Q4, '1'), Transition::new(Q4, '1', Halt)),
            ((Q4, '!'), Transition::new(Q4, '!', Halt)),
        ];

        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Returns the shared increment table.
    pub fn shared() -> &'static TransitionTable {
        &INCREMENT_TABLE
    }

    /// Finds the transition for `state` reading `symbol`.
    ///
    /// # Returns
    ///
    /// * `Some(&Transition)` if the pair is in the table.
    /// * `None` if no rule exists, including for symbols outside the alphabet.
    pub fn lookup(&self, state: State, symbol: char) -> Option<&Transition> {
        self.rules.get(&(state, symbol))
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over all rules as `((state, symbol), transition)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&(State, char), &Transition)> {
        self.rules.iter()
    }
}
