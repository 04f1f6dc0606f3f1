use std::{
    error::Error,
    ffi::OsString,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser};
use lmc::{LmcMachine, LmcMemory, Mode, Outcome, RunReport, StdConsole};

/// Runs a Little Man Computer program.
///
/// Without any flag, runs an all-zero memory (which halts right away) with no input.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Type instructions at the console instead of fetching them from memory
    #[arg(long, conflicts_with = "debug")]
    cli: bool,

    /// Program to load, one word per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Values read by INP, first to last
    #[arg(short, long = "input", num_args = 0.., allow_negative_numbers = true)]
    input: Vec<i32>,

    /// Stop before every instruction and wait for a debugger command
    #[arg(long)]
    debug: bool,

    /// Log more about what the machine does, repeat for more details
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}
impl Arguments {
    fn mode(&self) -> Mode {
        if self.cli {
            Mode::Interactive
        } else if self.debug {
            Mode::Debug
        } else {
            Mode::Memory
        }
    }
}

/// The historical interface spelled long flags with a single dash (`-file`),
/// which clap would read as a bundle of short flags.
fn legacy_arguments<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-cli" || arg == "-file" || arg == "-debug" {
                let mut long = OsString::from("-");
                long.push(&arg);
                long
            } else {
                arg
            }
        })
        .collect()
}

fn init_logger(verbosity: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

/// Prints an error along with everything that caused it.
fn report(error: &dyn Error) {
    eprintln!("error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn load_memory(file: Option<&Path>) -> Result<LmcMemory, Box<dyn Error>> {
    let Some(path) = file else {
        log::info!("no program file given, starting from an empty memory");
        return Ok(LmcMemory::new());
    };
    let program = lmcload::load_file(path)?;
    Ok(LmcMemory::from_words(&program)?)
}

fn main() -> ExitCode {
    let args = Arguments::parse_from(legacy_arguments(std::env::args_os()));
    init_logger(args.verbose);

    let memory = match load_memory(args.file.as_deref()) {
        Ok(memory) => memory,
        Err(error) => {
            report(error.as_ref());
            return ExitCode::from(2);
        }
    };

    let mode = args.mode();
    let mut machine = LmcMachine::new(memory).with_input(args.input);
    let run = match machine.run(mode, &mut StdConsole::stdio()) {
        Ok(run) => run,
        Err(error) => {
            report(&error);
            return ExitCode::from(2);
        }
    };

    match print_report(&run, &mut io::stdout().lock()) {
        Ok(status) => ExitCode::from(status),
        Err(error) => {
            report(&error);
            ExitCode::from(2)
        }
    }
}

/// Prints how the run ended followed by its output, and returns the exit status.
///
/// Quitting from the debugger prints nothing and fails.
fn print_report<W: Write>(run: &RunReport, out: &mut W) -> io::Result<u8> {
    match run.outcome {
        Outcome::Terminated => return Ok(1),
        Outcome::Halted => writeln!(out, "Halting the program")?,
        Outcome::Overflow => writeln!(out, "Counter overflow error")?,
        Outcome::InputClosed => writeln!(out, "No more instructions")?,
    }
    for value in &run.output {
        writeln!(out, "Output {value}")?;
    }
    Ok(0)
}
