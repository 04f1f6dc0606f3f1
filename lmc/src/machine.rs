//! # LMC machine
//! Represents a fully functional [Little Man Computer](https://en.wikipedia.org/wiki/Little_man_computer).
//!
//! Every cycle goes through the same steps:
//! 1. fetch a word, from memory or typed at the console depending on the [`Mode`]
//! 2. let the [debugger](crate::debugger) look at the machine when debugging
//! 3. decode the word into an [`Instruction`]
//! 4. stop on `HLT`
//! 5. advance the counter, and stop if it ran past the last mailbox
//! 6. execute the instruction
//!
//! The counter moves *before* the instruction executes, so that branches simply
//! overwrite it.
//!
//! Execution can be driven one cycle at a time using [`LmcMachine::step`], or until
//! the end using [`LmcMachine::run`].
//! ```rust
//! # use lmc::*;
//! let memory = LmcMemory::from_words(&[901, 902, 0]).unwrap();
//! let mut machine = LmcMachine::new(memory).with_input([42]);
//! let report = machine.run(Mode::Memory, &mut ScriptedConsole::default()).unwrap();
//! assert_eq!(report.outcome, Outcome::Halted);
//! assert_eq!(report.output, [42]);
//! ```

use std::collections::VecDeque;

use crate::{
    console::LmcConsole,
    debugger::{self, DebugAction},
    error::LmcError,
    instruction::Instruction,
    memory::{LmcMemory, MAILBOXES},
    Word,
};

const INSTRUCTION_PROMPT: &str = "Instruction: ";

/// Where instructions come from, and whether the debugger is watching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Instructions are fetched from the mailbox the counter points to.
    #[default]
    Memory,
    /// Instructions are typed at the console, one per cycle. Memory is still
    /// used for data.
    Interactive,
    /// Same as [`Mode::Memory`], but the debugger stops the machine before
    /// every cycle.
    Debug,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A `HLT` instruction was reached.
    Halted,
    /// The counter went past the last mailbox.
    Overflow,
    /// The user quit from the debugger.
    Terminated,
    /// The console ran out of typed instructions in [`Mode::Interactive`].
    InputClosed,
}

/// Result of a complete run. The output is always reported, whatever stopped
/// the machine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RunReport {
    pub outcome: Outcome,
    pub output: Vec<Word>,
}

/// Result of a single cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// An instruction was executed, and the next cycle should use `mode`.
    Executed { instruction: Instruction, mode: Mode },
    /// The run is over, no instruction was executed during this cycle.
    Finished(Outcome),
}

/// The Little Man Computer, owning everything a program can touch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LmcMachine {
    memory: LmcMemory,
    accumulator: Word,
    counter: usize,
    input: VecDeque<Word>,
    output: Vec<Word>,
}
impl LmcMachine {
    pub fn new(memory: LmcMemory) -> Self {
        Self {
            memory,
            ..Self::default()
        }
    }

    /// Queues values to be read by `INP`, first to last.
    pub fn with_input<I: IntoIterator<Item = Word>>(mut self, input: I) -> Self {
        self.input.extend(input);
        self
    }

    pub fn memory(&self) -> &LmcMemory {
        &self.memory
    }
    pub fn accumulator(&self) -> Word {
        self.accumulator
    }
    pub fn counter(&self) -> usize {
        self.counter
    }
    /// Input values that have not been read yet.
    pub fn input(&self) -> impl ExactSizeIterator<Item = &Word> {
        self.input.iter()
    }
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// Runs cycles until the machine halts, overflows, is stopped by the user, or
    /// runs out of typed instructions.
    pub fn run<C: LmcConsole>(
        &mut self,
        mut mode: Mode,
        console: &mut C,
    ) -> Result<RunReport, LmcError> {
        log::debug!("starting run in {mode:?} mode");
        loop {
            match self.step(mode, console)? {
                Step::Executed {
                    mode: next_mode, ..
                } => {
                    if next_mode != mode {
                        log::debug!("switching from {mode:?} to {next_mode:?} mode");
                    }
                    mode = next_mode
                }
                Step::Finished(outcome) => {
                    match outcome {
                        Outcome::Halted => log::info!("halted at mailbox {}", self.counter),
                        Outcome::Overflow => log::warn!("counter overflowed past mailbox 99"),
                        Outcome::Terminated => log::info!("run terminated by the user"),
                        Outcome::InputClosed => log::info!("console closed, no more instructions"),
                    }
                    return Ok(RunReport {
                        outcome,
                        output: self.output.clone(),
                    });
                }
            }
        }
    }

    /// Runs a single fetch-decode-execute cycle.
    pub fn step<C: LmcConsole>(&mut self, mode: Mode, console: &mut C) -> Result<Step, LmcError> {
        if mode == Mode::Interactive {
            return match Self::read_instruction(console)? {
                Some(instruction) => self.cycle(instruction, mode),
                None => Ok(Step::Finished(Outcome::InputClosed)),
            };
        }

        if self.counter >= MAILBOXES {
            return Ok(Step::Finished(Outcome::Overflow));
        }
        let word = self.memory.get(self.counter)?;

        let mode = if mode == Mode::Debug {
            match debugger::intercept(self, console)? {
                DebugAction::Resume(mode) => mode,
                DebugAction::Quit => return Ok(Step::Finished(Outcome::Terminated)),
            }
        } else {
            mode
        };

        let instruction =
            Instruction::decode(word).map_err(|reason| LmcError::InvalidInstruction {
                word,
                counter: self.counter,
                reason,
            })?;
        self.cycle(instruction, mode)
    }

    /// Everything that happens once an instruction has been decoded.
    fn cycle(&mut self, instruction: Instruction, mode: Mode) -> Result<Step, LmcError> {
        if instruction == Instruction::Halt {
            return Ok(Step::Finished(Outcome::Halted));
        }

        log::trace!("{:02}: {instruction}", self.counter);
        // Branches overwrite the counter, so it has to move first.
        self.counter += 1;
        if self.counter >= MAILBOXES && mode != Mode::Interactive {
            return Ok(Step::Finished(Outcome::Overflow));
        }

        self.execute(instruction)?;
        Ok(Step::Executed { instruction, mode })
    }

    /// Executes a single instruction on the machine state, without any of the
    /// cycle bookkeeping: the counter only changes if the instruction branches.
    ///
    /// `HLT` does nothing here, stopping the machine is up to the cycle.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), LmcError> {
        match instruction {
            Instruction::Halt => {}
            Instruction::Add(address) => {
                let value = self.memory.get(address.into())?;
                self.accumulator = self.accumulator.wrapping_add(value)
            }
            Instruction::Subtract(address) => {
                let value = self.memory.get(address.into())?;
                self.accumulator = self.accumulator.wrapping_sub(value)
            }
            Instruction::Store(address) => *self.memory.get_mut(address.into())? = self.accumulator,
            Instruction::Load(address) => self.accumulator = self.memory.get(address.into())?,
            Instruction::Branch(address) => self.counter = address.into(),
            Instruction::BranchIfNotPositive(address) => {
                if self.accumulator <= 0 {
                    self.counter = address.into()
                }
            }
            Instruction::BranchIfNonZero(address) => {
                if self.accumulator != 0 {
                    self.counter = address.into()
                }
            }
            Instruction::Input => {
                // Reading past the end of the input leaves the accumulator as is.
                if let Some(value) = self.input.pop_front() {
                    self.accumulator = value
                }
            }
            Instruction::Output => self.output.push(self.accumulator),
        }
        Ok(())
    }

    /// Asks the console for an instruction until it types a valid one.
    fn read_instruction<C: LmcConsole>(console: &mut C) -> Result<Option<Instruction>, LmcError> {
        while let Some(line) = console.read_line(INSTRUCTION_PROMPT)? {
            let decoded = line
                .trim()
                .parse::<Word>()
                .map_err(|e| e.to_string())
                .and_then(|word| Instruction::decode(word).map_err(|e| e.to_string()));
            match decoded {
                Ok(instruction) => return Ok(Some(instruction)),
                Err(reason) => {
                    log::warn!("rejected typed instruction {line:?}: {reason}");
                    console.write_line(&format!("Invalid instruction {:?}: {reason}", line.trim()))?
                }
            }
        }
        Ok(None)
    }
}
