//! # LMC console
//! The LMC interacts with a user through a console. It is implementation defined
//! in the form of a trait that satisfies:
//! - reading a line of text after showing a prompt
//! - writing a line of text
//!
//! The machine only needs the console for interactive instruction entry and for
//! the debugger. Input and output values of a program go through the machine's own
//! queues, not through the console.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

pub trait LmcConsole {
    // Required methods
    /// Shows `prompt` and reads one line, without its line terminator. Returns
    /// `None` once the user has nothing more to say (end of file).
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    // Provided methods
    fn write_block(&mut self, block: &str) -> io::Result<()> {
        block.lines().try_for_each(|line| self.write_line(line))
    }
}

/// Console backed by any reader and writer, usually the process' standard streams.
#[derive(Debug)]
pub struct StdConsole<R, W> {
    reader: R,
    writer: W,
}
impl StdConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}
impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
impl<R: BufRead, W: Write> LmcConsole for StdConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}

/// Console replaying a fixed list of answers and recording everything shown to
/// the user. Handy for tests and for driving the machine from another program.
#[derive(Clone, Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: String,
    prompts: usize,
}
impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything written to the console so far, prompts and answers included.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Number of prompts shown so far.
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    /// Answers that were never read.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().map(String::as_str)
    }
}
impl LmcConsole for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts += 1;
        self.transcript.push_str(prompt);
        let answer = self.answers.pop_front();
        if let Some(answer) = &answer {
            self.transcript.push_str(answer);
        }
        self.transcript.push('\n');
        Ok(answer)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push_str(line);
        self.transcript.push('\n');
        Ok(())
    }
}
