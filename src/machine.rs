//! This module defines the `MachineEngine` struct, which runs the increment machine over a
//! single fixed-length tape. It owns the tape, the head position, the current state and the
//! record of everything the run did.

use crate::table::TransitionTable;
use crate::types::{
    Direction, Halt, State, Status, Step, TuringMachineError, MAX_EXECUTION_STEPS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// One applied transition: the state entered, the symbol written and the head movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub state: State,
    pub write: char,
    pub direction: Direction,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entered state {}, wrote '{}', moved {}",
            self.state, self.write, self.direction
        )
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The tape as it was loaded.
    pub input: String,
    pub outcome: Halt,
    pub final_state: State,
    /// Every state entered, starting with the initial one.
    pub history: Vec<State>,
    pub trace: Vec<TraceRecord>,
    /// The tape after the run.
    pub tape: String,
}

impl RunReport {
    /// Returns the state history joined as `q0 -> q1 -> q3`.
    pub fn path(&self) -> String {
        self.history
            .iter()
            .map(State::name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Halt::NoTransition { .. } = self.outcome {
            writeln!(f, "Stopped: {}", self.outcome)?;
        }
        writeln!(f, "Final state: {}", self.final_state)?;
        writeln!(f, "State path: {}", self.path())?;
        write!(f, "Tape: {}", self.tape)
    }
}

/// Runs the increment machine.
///
/// The engine moves through `Unloaded -> Loaded -> Running -> Halted`. A halted engine
/// refuses to run again until a tape is loaded or the current one is reset.
#[derive(Debug, Clone)]
pub struct MachineEngine {
    table: &'static TransitionTable,
    status: Status,
    state: State,
    input: Vec<char>,
    tape: Vec<char>,
    head: usize,
    history: Vec<State>,
    trace: Vec<TraceRecord>,
    outcome: Option<Halt>,
    step_limit: usize,
}

impl Default for MachineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineEngine {
    /// Creates an unloaded engine over the shared increment table.
    pub fn new() -> Self {
        Self {
            table: TransitionTable::shared(),
            status: Status::Unloaded,
            state: State::INITIAL,
            input: Vec::new(),
            tape: Vec::new(),
            head: 0,
            history: Vec::new(),
            trace: Vec::new(),
            outcome: None,
            step_limit: MAX_EXECUTION_STEPS,
        }
    }

    /// Sets the number of transitions a run may apply before it fails with
    /// `TuringMachineError::StepLimitExceeded`.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Loads `input` onto the tape and prepares a fresh run.
    ///
    /// Symbols outside the alphabet are accepted; the table has no rules for them, so a run
    /// that reads one stops with `Halt::NoTransition`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the tape was loaded.
    /// * `Err(TuringMachineError::EmptyTape)` if `input` is empty. The engine is left untouched.
    pub fn load(&mut self, input: &[char]) -> Result<(), TuringMachineError> {
        if input.is_empty() {
            return Err(TuringMachineError::EmptyTape);
        }

        self.input = input.to_vec();
        self.restart();
        debug!(tape = %self.tape_string(), "tape loaded");

        Ok(())
    }

    /// Loads the characters of `input` onto the tape. See [`MachineEngine::load`].
    pub fn load_str(&mut self, input: &str) -> Result<(), TuringMachineError> {
        self.load(&input.chars().collect::<Vec<_>>())
    }

    /// Restores the last loaded tape so it can be run again.
    pub fn reset(&mut self) -> Result<(), TuringMachineError> {
        if self.status == Status::Unloaded {
            return Err(TuringMachineError::NotLoaded);
        }

        self.restart();
        debug!(tape = %self.tape_string(), "machine reset");

        Ok(())
    }

    fn restart(&mut self) {
        self.tape = self.input.clone();
        self.head = 0;
        self.state = State::INITIAL;
        self.history = vec![State::INITIAL];
        self.trace.clear();
        self.outcome = None;
        self.status = Status::Loaded;
    }

    /// Executes a single step: reads the symbol under the head, applies the matching
    /// transition and moves the head.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was applied and the head moved right.
    /// * `Ok(Step::Halt(_))` if the run ended with this step.
    /// * `Err(TuringMachineError)` if the engine is not in a runnable status or the step
    ///   ceiling is reached.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        match self.status {
            Status::Unloaded => return Err(TuringMachineError::NotLoaded),
            Status::Halted => return Err(TuringMachineError::AlreadyHalted(self.state)),
            Status::Loaded => self.status = Status::Running,
            Status::Running => {}
        }

        if self.head >= self.tape.len() {
            return Ok(self.halt(Halt::EndOfTape));
        }

        let symbol = self.tape[self.head];
        let transition = match self.table.lookup(self.state, symbol) {
            Some(t) => *t,
            None => {
                warn!(state = %self.state, %symbol, "no transition defined");
                return Ok(self.halt(Halt::NoTransition {
                    state: self.state,
                    symbol,
                }));
            }
        };

        if self.step_count() >= self.step_limit {
            warn!(limit = self.step_limit, "step limit exceeded");
            self.status = Status::Halted;
            return Err(TuringMachineError::StepLimitExceeded(self.step_limit));
        }

        self.tape[self.head] = transition.write;
        self.state = transition.next_state;
        self.history.push(self.state);

        let record = TraceRecord {
            state: self.state,
            write: transition.write,
            direction: transition.direction,
        };
        info!(
            state = %record.state,
            write = %record.write,
            direction = %record.direction,
            head = self.head,
            "transition applied"
        );
        self.trace.push(record);

        match transition.direction {
            Direction::Right => {
                self.head += 1;
                Ok(Step::Continue)
            }
            Direction::Halt => Ok(self.halt(Halt::Halted)),
        }
    }

    fn halt(&mut self, reason: Halt) -> Step {
        self.status = Status::Halted;
        self.outcome = Some(reason);
        Step::Halt(reason)
    }

    /// Runs the machine until it halts.
    ///
    /// The loop itself is unbounded; only the step ceiling stops a run that never halts.
    pub fn run(&mut self) -> Result<Halt, TuringMachineError> {
        loop {
            if let Step::Halt(halt) = self.step()? {
                return Ok(halt);
            }
        }
    }

    /// Returns the current state of the simulated machine.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the engine's lifecycle status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the head position. It equals the tape length once the head runs off the end.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns every state entered so far, including the initial one.
    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    /// Returns the number of transitions applied in the current run.
    pub fn step_count(&self) -> usize {
        self.trace.len()
    }

    /// Returns why the last run ended, if it ended normally.
    pub fn outcome(&self) -> Option<Halt> {
        self.outcome
    }

    /// Returns a copy of the tape contents.
    pub fn tape_snapshot(&self) -> Vec<char> {
        self.tape.clone()
    }

    pub fn tape_string(&self) -> String {
        self.tape.iter().collect()
    }

    /// Builds a report of the finished run, or `None` while the run is not over
    /// or was aborted by the step ceiling.
    pub fn report(&self) -> Option<RunReport> {
        let outcome = self.outcome?;

        Some(RunReport {
            input: self.input.iter().collect(),
            outcome,
            final_state: self.state,
            history: self.history.clone(),
            trace: self.trace.clone(),
            tape: self.tape_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> MachineEngine {
        let mut machine = MachineEngine::new();
        machine.load_str(input).unwrap();
        machine.run().unwrap();
        machine
    }

    #[test]
    fn test_increment_zero() {
        let machine = run("0!");

        assert_eq!(machine.tape_string(), "!0");
        assert_eq!(machine.state(), State::Q3);
        assert_eq!(machine.history(), &[State::Q0, State::Q1, State::Q3]);
        assert_eq!(machine.outcome(), Some(Halt::Halted));
        assert_eq!(machine.head(), 1);
    }

    #[test]
    fn test_increment_one() {
        let machine = run("1!");

        assert_eq!(machine.tape_string(), "!1");
        assert_eq!(machine.state(), State::Q3);
        assert_eq!(machine.history(), &[State::Q0, State::Q2, State::Q3]);
    }

    #[test]
    fn test_no_digit() {
        let machine = run("!!");

        assert_eq!(machine.tape_string(), "!!");
        assert_eq!(machine.state(), State::Q4);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_trace_records() {
        let machine = run("1!");

        assert_eq!(
            machine.trace(),
            &[
                TraceRecord {
                    state: State::Q2,
                    write: '!',
                    direction: Direction::Right,
                },
                TraceRecord {
                    state: State::Q3,
                    write: '1',
                    direction: Direction::Halt,
                },
            ]
        );
        assert_eq!(
            machine.trace()[0].to_string(),
            "entered state q2, wrote '!', moved R"
        );
    }

    #[test]
    fn test_history_length_matches_steps() {
        for input in ["0!", "1!", "!!", "00", "0", "x!"] {
            let machine = run(input);
            assert_eq!(machine.history().len(), machine.step_count() + 1);
        }
    }

    #[test]
    fn test_no_transition_within_alphabet() {
        let mut machine = MachineEngine::new();
        machine.load_str("00").unwrap();

        let halt = machine.run().unwrap();

        assert_eq!(
            halt,
            Halt::NoTransition {
                state: State::Q1,
                symbol: '0',
            }
        );
        assert_eq!(machine.state(), State::Q1);
        assert_eq!(machine.tape_string(), "!0");
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.status(), Status::Halted);
    }

    #[test]
    fn test_no_transition_outside_alphabet() {
        let mut machine = MachineEngine::new();
        machine.load(&['2', '!']).unwrap();

        let halt = machine.run().unwrap();

        assert_eq!(
            halt,
            Halt::NoTransition {
                state: State::Q0,
                symbol: '2',
            }
        );
        assert_eq!(machine.tape_snapshot(), vec!['2', '!']);
        assert_eq!(machine.history(), &[State::Q0]);
        assert!(machine.trace().is_empty());
    }

    #[test]
    fn test_run_off_end_of_tape() {
        let machine = run("0");

        assert_eq!(machine.outcome(), Some(Halt::EndOfTape));
        assert_eq!(machine.state(), State::Q1);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.tape_string(), "!");
    }

    #[test]
    fn test_step_by_step() {
        let mut machine = MachineEngine::new();
        machine.load_str("0!").unwrap();
        assert_eq!(machine.status(), Status::Loaded);

        assert_eq!(machine.step(), Ok(Step::Continue));
        assert_eq!(machine.status(), Status::Running);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.state(), State::Q1);

        assert_eq!(machine.step(), Ok(Step::Halt(Halt::Halted)));
        assert_eq!(machine.status(), Status::Halted);
    }

    #[test]
    fn test_run_before_load() {
        let mut machine = MachineEngine::new();

        assert_eq!(machine.run(), Err(TuringMachineError::NotLoaded));
        assert_eq!(machine.status(), Status::Unloaded);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_run_twice() {
        let mut machine = run("0!");

        assert_eq!(
            machine.run(),
            Err(TuringMachineError::AlreadyHalted(State::Q3))
        );
        assert_eq!(machine.tape_string(), "!0");
        assert_eq!(machine.history().len(), 3);
    }

    #[test]
    fn test_load_empty_tape() {
        let mut machine = run("1!");

        assert_eq!(machine.load(&[]), Err(TuringMachineError::EmptyTape));
        assert_eq!(machine.status(), Status::Halted);
        assert_eq!(machine.tape_string(), "!1");
    }

    #[test]
    fn test_reload_after_halt() {
        let mut machine = run("0!");

        machine.load_str("1!").unwrap();
        assert_eq!(machine.status(), Status::Loaded);
        assert_eq!(machine.state(), State::Q0);
        assert_eq!(machine.history(), &[State::Q0]);
        assert_eq!(machine.head(), 0);

        machine.run().unwrap();
        assert_eq!(machine.tape_string(), "!1");
    }

    #[test]
    fn test_reset() {
        let mut machine = run("1!");

        machine.reset().unwrap();
        assert_eq!(machine.tape_string(), "1!");
        assert_eq!(machine.status(), Status::Loaded);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.outcome(), None);

        machine.run().unwrap();
        assert_eq!(machine.tape_string(), "!1");
    }

    #[test]
    fn test_reset_before_load() {
        let mut machine = MachineEngine::new();
        assert_eq!(machine.reset(), Err(TuringMachineError::NotLoaded));
    }

    #[test]
    fn test_step_limit() {
        let mut machine = MachineEngine::new().with_step_limit(1);
        machine.load_str("0!").unwrap();

        assert_eq!(machine.run(), Err(TuringMachineError::StepLimitExceeded(1)));
        assert_eq!(machine.step_count(), 1);
        assert_eq!(machine.status(), Status::Halted);
        assert!(machine.report().is_none());
    }

    #[test]
    fn test_step_limit_not_reached() {
        let mut machine = MachineEngine::new().with_step_limit(2);
        machine.load_str("0!").unwrap();

        assert_eq!(machine.run(), Ok(Halt::Halted));
    }

    #[test]
    fn test_tape_snapshot_is_side_effect_free() {
        let machine = run("0!");

        let first = machine.tape_snapshot();
        let second = machine.tape_snapshot();
        let third = machine.tape_snapshot();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_engines_do_not_share_state() {
        let mut a = MachineEngine::new();
        let mut b = MachineEngine::new();
        a.load_str("0!").unwrap();
        b.load_str("1!").unwrap();

        a.run().unwrap();

        assert_eq!(b.tape_string(), "1!");
        assert_eq!(b.status(), Status::Loaded);
    }

    #[test]
    fn test_report() {
        let machine = run("0!");
        let report = machine.report().unwrap();

        assert_eq!(report.input, "0!");
        assert_eq!(report.tape, "!0");
        assert_eq!(report.path(), "q0 -> q1 -> q3");
        assert_eq!(
            report.to_string(),
            "Final state: q3\nState path: q0 -> q1 -> q3\nTape: !0"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["final_state"], "q3");
        assert_eq!(json["outcome"], "Halted");
    }

    #[test]
    fn test_report_mentions_stuck_symbol() {
        let report = run("00").report().unwrap();
        assert!(report
            .to_string()
            .starts_with("Stopped: no transition defined for symbol '0' in state q1"));
    }

    #[test]
    fn test_no_report_while_loaded() {
        let mut machine = MachineEngine::new();
        machine.load_str("0!").unwrap();
        assert!(machine.report().is_none());
    }
}
