//! # LMC: the Little Man Computer
//! An implementation of the [Little Man Computer](https://en.wikipedia.org/wiki/Little_man_computer),
//! a teaching machine with a single accumulator, a hundred mailboxes and nine
//! instructions.
//!
//! The machine talks to the outside world through an [`LmcConsole`](console::LmcConsole),
//! which makes it easy to embed: the same engine drives a terminal session, a
//! scripted test, or anything in between.
//!
//! The source is also designed to be as readable as possible, since the whole point
//! of the LMC is to show how instructions get executed.

pub mod console;
pub mod debugger;
pub mod error;
pub mod instruction;
pub mod machine;
pub mod memory;

pub use console::{LmcConsole, ScriptedConsole, StdConsole};
pub use error::LmcError;
pub use instruction::Instruction;
pub use machine::{LmcMachine, Mode, Outcome, RunReport, Step};
pub use memory::{LmcMemory, MAILBOXES};

/// Every value the machine handles (mailboxes, accumulator, input and output)
/// is a signed word.
pub type Word = i32;

#[cfg(test)]
mod test;
