//! # LMC instructions
//! Instructions are plain decimal words. The leading digit selects the operation
//! and the two digits that follow are the mailbox it works on, e.g. `512` loads
//! mailbox 12. The `9` family is the exception: `901` and `902` are keyed on the
//! whole word and take no address.
//!
//! | **Word** | **Mnemonic** | **Effect** |
//! | -------- | ------------ | ---------- |
//! | `000` | `HLT` | stop the machine |
//! | `1xx` | `ADD` | `acc += mem[xx]` |
//! | `2xx` | `SUB` | `acc -= mem[xx]` |
//! | `3xx` | `STO` | `mem[xx] = acc` |
//! | `5xx` | `LDA` | `acc = mem[xx]` |
//! | `6xx` | `BRA` | `counter = xx` |
//! | `7xx` | `BRZ` | `counter = xx` if `acc <= 0` |
//! | `8xx` | `BRP` | `counter = xx` if `acc != 0` |
//! | `901` | `INP` | pop the next input into `acc` |
//! | `902` | `OUT` | push `acc` to the output |
//!
//! Two-digit words decode the same way with a single address digit (`15` is
//! `ADD 05`), which is how the decimal text of a word has always been read.

use core::fmt::{self, Display};

use thiserror::Error;

use crate::Word;

const ADD: Word = 1;
const SUB: Word = 2;
const STO: Word = 3;
const LDA: Word = 5;
const BRA: Word = 6;
const BRZ: Word = 7;
const BRP: Word = 8;
const IO: Word = 9;
const INP: Word = 901;
const OUT: Word = 902;

/// A decoded LMC instruction. Addresses are always in `0..100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Halt,
    Add(u8),
    Subtract(u8),
    Store(u8),
    Load(u8),
    Branch(u8),
    /// `BRZ`: branches when the accumulator is zero *or negative*.
    BranchIfNotPositive(u8),
    /// `BRP`: branches when the accumulator is positive *or negative*, i.e.
    /// whenever it is not zero.
    BranchIfNonZero(u8),
    Input,
    Output,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("negative words are not instructions")]
    Negative,
    #[error("words above 999 are not instructions")]
    TooLarge,
    #[error("instruction has no address digits")]
    MissingAddress,
    #[error("unknown opcode {0}")]
    UnknownOpcode(Word),
}

impl Instruction {
    /// Decodes a word into an instruction.
    ///
    /// Only words up to `999` are instructions. Reading the decimal text of a
    /// longer word would take its second and third digits as the address (`1234`
    /// as `ADD 23`); such words are rejected with [`DecodeError::TooLarge`]
    /// instead.
    pub fn decode(word: Word) -> Result<Self, DecodeError> {
        let (opcode, address) = match word {
            0 => return Ok(Self::Halt),
            _ if word < 0 => return Err(DecodeError::Negative),
            1..=9 => return Err(DecodeError::MissingAddress),
            10..=99 => (word / 10, word % 10),
            100..=999 => (word / 100, word % 100),
            _ => return Err(DecodeError::TooLarge),
        };
        // Always fits: at most two decimal digits.
        let address = address as u8;

        Ok(match opcode {
            ADD => Self::Add(address),
            SUB => Self::Subtract(address),
            STO => Self::Store(address),
            LDA => Self::Load(address),
            BRA => Self::Branch(address),
            BRZ => Self::BranchIfNotPositive(address),
            BRP => Self::BranchIfNonZero(address),
            IO => match word {
                INP => Self::Input,
                OUT => Self::Output,
                _ => return Err(DecodeError::UnknownOpcode(word)),
            },
            _ => return Err(DecodeError::UnknownOpcode(opcode)),
        })
    }

    /// Encodes this instruction back to its three digit word.
    pub fn encode(self) -> Word {
        let with_address = |opcode: Word, address: u8| opcode * 100 + Word::from(address);
        match self {
            Self::Halt => 0,
            Self::Add(address) => with_address(ADD, address),
            Self::Subtract(address) => with_address(SUB, address),
            Self::Store(address) => with_address(STO, address),
            Self::Load(address) => with_address(LDA, address),
            Self::Branch(address) => with_address(BRA, address),
            Self::BranchIfNotPositive(address) => with_address(BRZ, address),
            Self::BranchIfNonZero(address) => with_address(BRP, address),
            Self::Input => INP,
            Self::Output => OUT,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HLT",
            Self::Add(_) => "ADD",
            Self::Subtract(_) => "SUB",
            Self::Store(_) => "STO",
            Self::Load(_) => "LDA",
            Self::Branch(_) => "BRA",
            Self::BranchIfNotPositive(_) => "BRZ",
            Self::BranchIfNonZero(_) => "BRP",
            Self::Input => "INP",
            Self::Output => "OUT",
        }
    }

    /// Mailbox this instruction works on, if any.
    pub fn address(self) -> Option<u8> {
        match self {
            Self::Add(address)
            | Self::Subtract(address)
            | Self::Store(address)
            | Self::Load(address)
            | Self::Branch(address)
            | Self::BranchIfNotPositive(address)
            | Self::BranchIfNonZero(address) => Some(address),
            Self::Halt | Self::Input | Self::Output => None,
        }
    }
}
impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(address) => write!(f, "{} {address:02}", self.mnemonic()),
            None => write!(f, "{}", self.mnemonic()),
        }
    }
}
impl TryFrom<Word> for Instruction {
    type Error = DecodeError;

    fn try_from(word: Word) -> Result<Self, Self::Error> {
        Self::decode(word)
    }
}
