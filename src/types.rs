//! This module defines the core data structures and types used by the increment machine,
//! including states, transitions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The symbols the machine's transition table is defined over.
pub const ALPHABET: [char; 3] = ['0', '1', '!'];
/// The symbol that terminates the binary digit on the input tape.
pub const TERMINATOR: char = '!';
/// The exact length of an accepted input line.
pub const INPUT_LENGTH: usize = 2;
/// The maximum number of steps to execute before the run is aborted.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A control state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Initial state, reading the binary digit.
    Q0,
    /// A `0` was read.
    Q1,
    /// A `1` was read.
    Q2,
    /// The digit has been written.
    Q3,
    /// The tape held no digit.
    Q4,
}

impl State {
    /// The state every run starts in.
    pub const INITIAL: State = State::Q0;

    pub fn name(&self) -> &'static str {
        match self {
            State::Q0 => "q0",
            State::Q1 => "q1",
            State::Q2 => "q2",
            State::Q3 => "q3",
            State::Q4 => "q4",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents the possible head movements after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the right.
    Right,
    /// Leave the head where it is and end the run.
    Halt,
}

impl Direction {
    /// Returns the single-character notation used in transition tables.
    pub fn notation(&self) -> char {
        match self {
            Direction::Right => 'R',
            Direction::Halt => '-',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// Represents a single transition rule.
///
/// The machine applies it when it is in the rule's source state and reads the rule's
/// source symbol; both are the key under which the rule is stored in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine transitions to.
    pub next_state: State,
    /// The symbol written to the cell under the head.
    pub write: char,
    /// What the head does after the write.
    pub direction: Direction,
}

impl Transition {
    pub const fn new(next_state: State, write: char, direction: Direction) -> Self {
        Self {
            next_state,
            write,
            direction,
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the head moved right.
    Continue,
    /// The run is over.
    Halt(Halt),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// A transition with the halt direction was applied.
    Halted,
    /// The head moved past the last tape cell.
    EndOfTape,
    /// The table has no rule for the current state and the symbol under the head.
    NoTransition { state: State, symbol: char },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Halted => write!(f, "halted"),
            Halt::EndOfTape => write!(f, "reached the end of the tape"),
            Halt::NoTransition { state, symbol } => write!(
                f,
                "no transition defined for symbol '{}' in state {}",
                symbol, state
            ),
        }
    }
}

/// Lifecycle of the engine itself, independent of the simulated machine's state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// No tape has been loaded yet.
    #[default]
    Unloaded,
    /// A tape is loaded and no step has been taken.
    Loaded,
    /// At least one step has been taken and the run is not over.
    Running,
    /// The run is over; a new `load` or `reset` is needed to run again.
    Halted,
}

/// Represents various errors that can occur while validating input or running the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// The input line does not have the form `<binary digit>!`.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// An attempt was made to load a tape with no cells.
    #[error("Cannot load an empty tape")]
    EmptyTape,
    /// The engine was asked to run before a tape was loaded.
    #[error("No tape loaded")]
    NotLoaded,
    /// The engine was asked to run again after halting.
    #[error("Machine already halted in state {0}; load a tape to run again")]
    AlreadyHalted(State),
    /// The run exceeded the configured step ceiling.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
}
