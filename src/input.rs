//! Validation of the input line typed by the user.
//!
//! The engine accepts any non-empty tape; this module is the stricter gate the console
//! driver applies first, so rejected lines never reach a machine.

use crate::types::{TuringMachineError, INPUT_LENGTH, TERMINATOR};

/// Parses a line of the form `<binary digit>!` into tape symbols.
///
/// A trailing line ending is ignored. Any other whitespace is part of the input.
///
/// # Returns
///
/// * `Ok(Vec<char>)` with exactly two symbols if the line is valid.
/// * `Err(TuringMachineError::InvalidInput)` describing the first problem found otherwise.
pub fn parse_input(line: &str) -> Result<Vec<char>, TuringMachineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let symbols: Vec<char> = line.chars().collect();

    if symbols.len() != INPUT_LENGTH {
        return Err(TuringMachineError::InvalidInput(format!(
            "expected {} characters, got {} in {:?}",
            INPUT_LENGTH,
            symbols.len(),
            line
        )));
    }

    if !matches!(symbols[0], '0' | '1') {
        return Err(TuringMachineError::InvalidInput(format!(
            "'{}' is not a binary digit",
            symbols[0]
        )));
    }

    if symbols[1] != TERMINATOR {
        return Err(TuringMachineError::InvalidInput(format!(
            "the digit must be followed by '{}', found '{}'",
            TERMINATOR, symbols[1]
        )));
    }

    Ok(symbols)
}
