//! # LMC memory
//! A hundred mailboxes of signed words. Code and data share the same storage:
//! whether a word is an instruction or an operand only depends on how the machine
//! happens to reach it.

use core::fmt::{self, Display};

use crate::{error::LmcError, instruction::Instruction, Word};

/// Number of mailboxes, addressable from `0` to `99`.
pub const MAILBOXES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LmcMemory {
    cells: [Word; MAILBOXES],
}
impl Default for LmcMemory {
    fn default() -> Self {
        Self::new()
    }
}
impl LmcMemory {
    /// Returns a memory where every mailbox holds `0`.
    pub const fn new() -> Self {
        Self {
            cells: [0; MAILBOXES],
        }
    }

    /// Fills mailboxes from `0` onwards with the given words, leaving the rest
    /// at `0`.
    pub fn from_words(words: &[Word]) -> Result<Self, LmcError> {
        if words.len() > MAILBOXES {
            return Err(LmcError::ProgramTooLong { len: words.len() });
        }
        let mut memory = Self::new();
        memory.cells[..words.len()].copy_from_slice(words);
        Ok(memory)
    }

    /// Reads the content of the mailbox at the given address.
    pub fn get(&self, address: usize) -> Result<Word, LmcError> {
        self.cells
            .get(address)
            .copied()
            .ok_or(LmcError::AddressOutOfRange { address })
    }

    /// Returns a mutable reference to the mailbox at the given address.
    pub fn get_mut(&mut self, address: usize) -> Result<&mut Word, LmcError> {
        self.cells
            .get_mut(address)
            .ok_or(LmcError::AddressOutOfRange { address })
    }

    pub fn cells(&self) -> &[Word; MAILBOXES] {
        &self.cells
    }
}

/// One line per mailbox: address, raw word and its disassembly.
impl Display for LmcMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, &word) in self.cells.iter().enumerate() {
            write_mailbox(f, address, word)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Writes a single mailbox as `AA: WORD  MNEMONIC`, falling back to `DAT` when
/// the word is not an instruction.
pub(crate) fn write_mailbox<W: fmt::Write>(f: &mut W, address: usize, word: Word) -> fmt::Result {
    match Instruction::decode(word) {
        Ok(instruction) => write!(f, "{address:02}: {word:>5}  {instruction}"),
        Err(_) => write!(f, "{address:02}: {word:>5}  DAT"),
    }
}
