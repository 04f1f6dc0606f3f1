//! # LmcLoad
//! Loader for [Little Man Computer](https://en.wikipedia.org/wiki/Little_man_computer)
//! program files.
//!
//! Meant as a companion to the `lmc` crate. The format is as simple as it gets: one signed
//! decimal word per line, line *i* going to mailbox *i*.
//! ```text
//! 901
//! 902
//! 0
//! ```
//! Mailboxes past the end of the file are left at zero by the machine.
//!
//! Programs are held in a [`heapless::Vec`] sized after the machine's memory, so a
//! program that would not fit is rejected while loading instead of being
//! truncated.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use heapless::Vec;
use thiserror::Error;


/// Number of words a program can hold, one per mailbox.
pub const PROGRAM_CAPACITY: usize = 100;

/// A loaded program, ready to be copied into memory.
pub type Program = Vec<i32, PROGRAM_CAPACITY>;

type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    /// `line` is 1-based.
    #[error("line {line} is not a valid word: {text:?}")]
    InvalidWord { line: usize, text: String },
    #[error("program does not fit in {limit} mailboxes")]
    ProgramTooLong { limit: usize },
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read program")]
    Read(#[from] io::Error),
}

/// Parses a single line of a program file.
fn parse_word(line_number: usize, line: &str) -> LoadResult<i32> {
    line.trim().parse().map_err(|_| LoadError::InvalidWord {
        line: line_number,
        text: line.to_owned(),
    })
}

/// Pushes a word at the end of the program, failing once every mailbox is taken.
fn push_word(program: &mut Program, word: i32) -> LoadResult<()> {
    program.push(word).map_err(|_| LoadError::ProgramTooLong {
        limit: PROGRAM_CAPACITY,
    })
}

/// Loads a program from a string, one word per line.
pub fn parse_program(source: &str) -> LoadResult<Program> {
    load_program(source.as_bytes())
}

/// Loads a program line by line from any buffered reader.
pub fn load_program<R: BufRead>(reader: R) -> LoadResult<Program> {
    let mut program = Program::new();
    for (index, line) in reader.lines().enumerate() {
        push_word(&mut program, parse_word(index + 1, &line?)?)?;
    }
    log::debug!("loaded a program of {} words", program.len());
    Ok(program)
}

/// Loads the program file at the given path.
pub fn load_file<P: AsRef<Path>>(path: P) -> LoadResult<Program> {
    let path = path.as_ref();
    let io_error = |source| LoadError::Io {
        path: path.to_owned(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    log::info!("loading program from {}", path.display());
    match load_program(BufReader::new(file)) {
        Err(LoadError::Read(source)) => Err(io_error(source)),
        result => result,
    }
}
