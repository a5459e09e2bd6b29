//! This crate provides a single-tape Turing machine that increments a one-digit binary number.
//! It includes the machine's fixed transition table, the engine that runs it, and validation
//! of the console input line.

pub mod input;
pub mod machine;
pub mod table;
pub mod types;

/// Re-exports the input line validator from the input module.
pub use input::parse_input;
/// Re-exports the engine and its run records from the machine module.
pub use machine::{MachineEngine, RunReport, TraceRecord};
/// Re-exports the transition table and its shared instance from the table module.
pub use table::{TransitionTable, INCREMENT_TABLE};
/// Re-exports the machine's types and constants from the types module.
pub use types::{
    Direction, Halt, State, Status, Step, Transition, TuringMachineError, ALPHABET,
    INPUT_LENGTH, MAX_EXECUTION_STEPS, TERMINATOR,
};
