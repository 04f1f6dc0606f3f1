//! # Machine errors
//! Failures that abort a run. Running off the end of memory, reading from an
//! empty input queue and quitting from the debugger are not errors: they are
//! regular [`Outcome`](crate::machine::Outcome)s or defined behaviour.

use thiserror::Error;

use crate::{instruction::DecodeError, Word};

#[derive(Debug, Error)]
pub enum LmcError {
    /// An access referenced a mailbox outside of `0..100`.
    #[error("address {address} is out of range, mailboxes go from 0 to 99")]
    AddressOutOfRange { address: usize },
    /// The word fetched at `counter` does not decode to any instruction.
    #[error("invalid instruction {word} in mailbox {counter}")]
    InvalidInstruction {
        word: Word,
        counter: usize,
        #[source]
        reason: DecodeError,
    },
    /// A program does not fit in memory.
    #[error("program has {len} words but memory only holds 100")]
    ProgramTooLong { len: usize },
    /// Reading from or writing to the console failed.
    #[error("console failure")]
    Console(#[from] std::io::Error),
}
