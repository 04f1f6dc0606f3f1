//! # LMC debugger
//! When a machine runs in [`Mode::Debug`], the debugger stops it before every
//! cycle, dumps the whole machine state to the console and waits for a command:
//!
//! | **Command** | **Effect** |
//! | ----------- | ---------- |
//! | `s` | execute one instruction and stop again |
//! | `c` | continue without the debugger |
//! | `q` | stop the run altogether |
//! | `h` | show the list of commands |
//!
//! Anything else is ignored and the prompt is shown again. The debugger only
//! ever looks at the machine: it has no way to modify its state.

use core::fmt::{self, Display};

use crate::{
    console::LmcConsole,
    error::LmcError,
    machine::{LmcMachine, Mode},
    memory::write_mailbox,
};

const PROMPT: &str = "> ";
const HELP: &str = "\
s: Step to next instruction
c: Continue execution, disable debug
q: Quit the program
h: Show this help message";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DebugCommand {
    Step,
    Continue,
    Quit,
    Help,
}
impl DebugCommand {
    /// Parses the first word of a line typed at the debugger prompt.
    pub fn parse(line: &str) -> Option<Self> {
        match line.split_whitespace().next()? {
            "s" | "step" => Some(Self::Step),
            "c" | "continue" => Some(Self::Continue),
            "q" | "quit" => Some(Self::Quit),
            "h" | "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// What the machine should do once the debugger lets go of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DebugAction {
    /// Execute the current cycle, then keep running in the given mode.
    Resume(Mode),
    /// End the run right away.
    Quit,
}

/// Stops the machine until the user picks a command that lets it move on.
///
/// Reaching the end of the console input counts as quitting.
pub fn intercept<C: LmcConsole>(
    machine: &LmcMachine,
    console: &mut C,
) -> Result<DebugAction, LmcError> {
    loop {
        console.write_block(&render(machine))?;
        let Some(line) = console.read_line(PROMPT)? else {
            log::debug!("console closed at the debugger prompt");
            return Ok(DebugAction::Quit);
        };

        match DebugCommand::parse(&line) {
            Some(DebugCommand::Step) => return Ok(DebugAction::Resume(Mode::Debug)),
            Some(DebugCommand::Continue) => {
                log::debug!("debugger detached at mailbox {}", machine.counter());
                return Ok(DebugAction::Resume(Mode::Memory));
            }
            Some(DebugCommand::Quit) => return Ok(DebugAction::Quit),
            Some(DebugCommand::Help) => console.write_block(HELP)?,
            None => log::debug!("ignoring debugger command {line:?}"),
        }
    }
}

/// Renders the machine state the way the debugger shows it: every mailbox with
/// the counter marked, followed by the registers and both queues.
pub fn render(machine: &LmcMachine) -> String {
    MachineDump(machine).to_string()
}

struct MachineDump<'a>(&'a LmcMachine);
impl Display for MachineDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine = self.0;
        writeln!(f, "Memory")?;
        for (address, &word) in machine.memory().cells().iter().enumerate() {
            let marker = if address == machine.counter() { "> " } else { "  " };
            write!(f, "{marker}")?;
            write_mailbox(f, address, word)?;
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "Counter: {}", machine.counter())?;
        writeln!(f, "Accumulator: {}", machine.accumulator())?;
        for value in machine.input() {
            writeln!(f, "Input: {value}")?;
        }
        for value in machine.output() {
            writeln!(f, "Output: {value}")?;
        }
        writeln!(f)?;
        writeln!(f, "Debugger stopped the program")
    }
}
