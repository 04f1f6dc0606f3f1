use lmcload::parse_program;

use crate::{
    debugger::{self, DebugCommand},
    instruction::DecodeError,
    *,
};

/// Multiplies the first two inputs together.
const MULTIPLY: &[Word] = &[
    901, 716, 399, 397, 901, 716, 398, 598, 218, 398, 715, 599, 197, 399, 607, 599, 902, 0, 1,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn machine_from_words(words: &[Word], input: &[Word]) -> LmcMachine {
    init_logger();
    LmcMachine::new(LmcMemory::from_words(words).unwrap()).with_input(input.iter().copied())
}
fn run_words(words: &[Word], input: &[Word]) -> (LmcMachine, RunReport) {
    let mut machine = machine_from_words(words, input);
    let report = machine
        .run(Mode::Memory, &mut ScriptedConsole::default())
        .unwrap();
    (machine, report)
}
fn assert_output(words: &[Word], input: &[Word], expected_output: &[Word]) {
    let (_, report) = run_words(words, input);
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(report.output, expected_output)
}

#[test]
fn test_multiply_program() {
    assert_output(MULTIPLY, &[5, 6], &[30]);
    assert_output(MULTIPLY, &[7, 1], &[7]);
    assert_output(MULTIPLY, &[0, 9], &[0]);
}

#[test]
fn test_runs_are_deterministic() {
    let (first_machine, first) = run_words(MULTIPLY, &[12, 3]);
    let (second_machine, second) = run_words(MULTIPLY, &[12, 3]);
    assert_eq!(first, second);
    assert_eq!(first_machine, second_machine);
}

#[test]
fn test_program_from_source() {
    let program = parse_program("901\n902\n901\n902\n0\n").unwrap();
    assert_output(&program, &[4, -2], &[4, -2]);
}

#[test]
fn test_halt_stops_immediately() {
    let (machine, report) = run_words(&[0, 902], &[]);
    assert_eq!(report.outcome, Outcome::Halted);
    assert!(report.output.is_empty());
    assert_eq!(machine.counter(), 0);
}

#[test]
fn test_empty_memory_halts() {
    assert_output(&[], &[], &[]);
}

#[test]
fn test_add_and_sub() {
    // LDA 10, ADD 11, SUB 12, OUT, HLT
    let mut program = [0; 13];
    program[..5].copy_from_slice(&[510, 111, 212, 902, 0]);
    program[10..].copy_from_slice(&[40, 2, 50]);
    assert_output(&program, &[], &[-8]);
}

#[test]
fn test_store_and_load() {
    // INP, STO 20, LDA 21, LDA 20, OUT, HLT
    let (machine, report) = run_words(&[901, 320, 521, 520, 902, 0], &[77]);
    assert_eq!(report.output, [77]);
    assert_eq!(machine.memory().get(20).unwrap(), 77);
}

#[test]
fn test_self_modifying_code() {
    // Stores OUT over the halt at mailbox 3, then stops on the halt at 4.
    let (machine, report) = run_words(&[901, 509, 303, 0, 0, 0, 0, 0, 0, 902], &[5]);
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(report.output, [902]);
    assert_eq!(machine.memory().get(3).unwrap(), 902);
}

#[test]
fn test_input_on_empty_queue() {
    let mut machine = machine_from_words(&[7], &[]);
    machine.execute(Instruction::Load(0)).unwrap();
    machine.execute(Instruction::Input).unwrap();
    assert_eq!(machine.accumulator(), 7);
    assert!(machine.output().is_empty());

    // INP, INP, OUT, HLT: the second read leaves 9 in place.
    let (machine, report) = run_words(&[901, 901, 902, 0], &[9]);
    assert_eq!(report.output, [9]);
    assert_eq!(machine.accumulator(), 9);
    assert_eq!(machine.input().len(), 0);
}

/// Loads `accumulator` from mailbox 10 and runs the given branch towards
/// mailbox 5. Returns whether the branch was taken.
fn branches(branch: Instruction, accumulator: Word) -> bool {
    let mut program = [0; 11];
    // LDA 10, <branch 05>, OUT, HLT, HLT, HLT
    program[0] = 510;
    program[1] = branch.encode();
    program[2] = 902;
    program[10] = accumulator;
    let (machine, report) = run_words(&program, &[]);
    assert_eq!(report.outcome, Outcome::Halted);
    // Halting leaves the counter on the halt instruction.
    match machine.counter() {
        5 => true,
        3 => false,
        counter => panic!("unexpected counter {counter}"),
    }
}

#[test]
fn test_brz_branches_when_not_positive() {
    let brz = Instruction::BranchIfNotPositive(5);
    assert!(branches(brz, 0));
    assert!(branches(brz, -5));
    assert!(!branches(brz, 1));
}

#[test]
fn test_brp_branches_when_not_zero() {
    let brp = Instruction::BranchIfNonZero(5);
    assert!(!branches(brp, 0));
    assert!(branches(brp, -3));
    assert!(branches(brp, 7));
}

#[test]
fn test_branch_lands_on_target() {
    let mut program = [0; 12];
    program[0] = 610;
    program[10] = 902;
    program[11] = 902;
    let mut machine = machine_from_words(&program, &[]);
    let mut console = ScriptedConsole::default();

    assert_eq!(
        machine.step(Mode::Memory, &mut console).unwrap(),
        Step::Executed {
            instruction: Instruction::Branch(10),
            mode: Mode::Memory
        }
    );
    assert_eq!(machine.counter(), 10);
    assert_eq!(
        machine.step(Mode::Memory, &mut console).unwrap(),
        Step::Executed {
            instruction: Instruction::Output,
            mode: Mode::Memory
        }
    );
    assert_eq!(machine.counter(), 11);
}

#[test]
fn test_overflow_keeps_output() {
    // INP, OUT, then BRA 98 which holds OUT followed by one more word.
    let mut program = [0; 100];
    program[..3].copy_from_slice(&[901, 902, 698]);
    program[98] = 902;
    program[99] = 902;
    let (machine, report) = run_words(&program, &[3]);
    assert_eq!(report.outcome, Outcome::Overflow);
    // The instruction in the last mailbox never runs.
    assert_eq!(report.output, [3, 3]);
    assert_eq!(machine.counter(), 100);
}

#[test]
fn test_invalid_instruction_aborts() {
    let mut machine = machine_from_words(&[902, 412], &[]);
    let error = machine
        .run(Mode::Memory, &mut ScriptedConsole::default())
        .unwrap_err();
    assert!(matches!(
        error,
        LmcError::InvalidInstruction {
            word: 412,
            counter: 1,
            reason: DecodeError::UnknownOpcode(4)
        }
    ));
    assert_eq!(machine.output(), [0]);
}

#[test]
fn test_decode() {
    assert_eq!(Instruction::decode(0), Ok(Instruction::Halt));
    assert_eq!(Instruction::decode(105), Ok(Instruction::Add(5)));
    assert_eq!(Instruction::decode(299), Ok(Instruction::Subtract(99)));
    assert_eq!(Instruction::decode(342), Ok(Instruction::Store(42)));
    assert_eq!(Instruction::decode(500), Ok(Instruction::Load(0)));
    assert_eq!(Instruction::decode(15), Ok(Instruction::Add(5)));
    assert_eq!(Instruction::decode(901), Ok(Instruction::Input));
    assert_eq!(Instruction::decode(902), Ok(Instruction::Output));
    assert_eq!(Instruction::decode(903), Err(DecodeError::UnknownOpcode(903)));
    assert_eq!(Instruction::decode(95), Err(DecodeError::UnknownOpcode(95)));
    assert_eq!(Instruction::decode(450), Err(DecodeError::UnknownOpcode(4)));
    assert_eq!(Instruction::decode(7), Err(DecodeError::MissingAddress));
    assert_eq!(Instruction::decode(-5), Err(DecodeError::Negative));
    assert_eq!(Instruction::decode(1000), Err(DecodeError::TooLarge));
    assert_eq!(Instruction::decode(1234), Err(DecodeError::TooLarge));
}

#[test]
fn test_disassembly() {
    assert_eq!(Instruction::BranchIfNotPositive(7).to_string(), "BRZ 07");
    assert_eq!(Instruction::Output.to_string(), "OUT");
    for word in [0, 101, 250, 399, 512, 600, 716, 898, 901, 902] {
        assert_eq!(Instruction::decode(word).unwrap().encode(), word);
    }
}

#[test]
fn test_memory_bounds() {
    let memory = LmcMemory::from_words(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(memory.cells()[..5], [1, 2, 3, 4, 5]);
    assert!(memory.cells()[5..].iter().all(|&word| word == 0));
    assert!(matches!(
        memory.get(100),
        Err(LmcError::AddressOutOfRange { address: 100 })
    ));
    assert!(matches!(
        LmcMemory::from_words(&[0; 101]),
        Err(LmcError::ProgramTooLong { len: 101 })
    ));
}

#[test]
fn test_interactive_mode() {
    // Memory only serves as data here: mailbox 50 holds 8.
    let mut program = [0; 51];
    program[50] = 8;
    let mut machine = machine_from_words(&program, &[2]);
    let mut console = ScriptedConsole::new(["901", "150", "902", "0", "902"]);
    let report = machine.run(Mode::Interactive, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(report.output, [10]);
    assert_eq!(console.remaining().collect::<Vec<_>>(), ["902"]);
}

#[test]
fn test_interactive_mode_reprompts() {
    let mut machine = machine_from_words(&[], &[6]);
    let mut console = ScriptedConsole::new(["hello", "404", " 901 ", "902"]);
    let report = machine.run(Mode::Interactive, &mut console).unwrap();
    // Running out of typed instructions ends the run, keeping the output.
    assert_eq!(report.outcome, Outcome::InputClosed);
    assert_eq!(report.output, [6]);
    assert_eq!(console.prompts(), 5);
    assert!(console.transcript().contains("Invalid instruction \"hello\""));
    assert!(console.transcript().contains("Invalid instruction \"404\""));
    assert_eq!(machine.counter(), 2);
}

#[test]
fn test_interactive_mode_closed_console_keeps_output() {
    let mut machine = machine_from_words(&[], &[5]);
    let mut console = ScriptedConsole::new(["901", "902"]);
    let report = machine.run(Mode::Interactive, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::InputClosed);
    assert_ne!(report.outcome, Outcome::Terminated);
    assert_eq!(report.output, [5]);
}

#[test]
fn test_interactive_mode_ignores_counter_overflow() {
    // BRA 99 then OUT: in memory this would overflow, typed it just runs.
    let mut machine = machine_from_words(&[], &[]);
    let mut console = ScriptedConsole::new(["699", "902", "902", "0"]);
    let report = machine.run(Mode::Interactive, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(report.output, [0, 0]);
    assert_eq!(machine.counter(), 101);
}

#[test]
fn test_debugger_quit() {
    let mut machine = machine_from_words(MULTIPLY, &[5, 6]);
    let mut console = ScriptedConsole::new(["s", "s", "q", "c"]);
    let report = machine.run(Mode::Debug, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Terminated);
    assert!(report.output.is_empty());
    // Two instructions ran, the third was never executed.
    assert_eq!(machine.counter(), 2);
    assert_eq!(machine.accumulator(), 5);
    assert_eq!(console.remaining().collect::<Vec<_>>(), ["c"]);
}

#[test]
fn test_debugger_quit_on_first_prompt() {
    let mut machine = machine_from_words(MULTIPLY, &[5, 6]);
    let mut console = ScriptedConsole::new(["q"]);
    let report = machine.run(Mode::Debug, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Terminated);
    assert_eq!(machine.counter(), 0);
    assert_eq!(machine.input().len(), 2);
}

#[test]
fn test_debugger_continue() {
    let mut machine = machine_from_words(MULTIPLY, &[5, 6]);
    let mut console = ScriptedConsole::new(["s", "c"]);
    let report = machine.run(Mode::Debug, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(report.output, [30]);
    assert_eq!(console.prompts(), 2);
}

#[test]
fn test_debugger_step_switches_modes() {
    let mut machine = machine_from_words(&[901, 902, 0], &[1]);
    let mut console = ScriptedConsole::new(["s", "c"]);
    assert_eq!(
        machine.step(Mode::Debug, &mut console).unwrap(),
        Step::Executed {
            instruction: Instruction::Input,
            mode: Mode::Debug
        }
    );
    assert_eq!(
        machine.step(Mode::Debug, &mut console).unwrap(),
        Step::Executed {
            instruction: Instruction::Output,
            mode: Mode::Memory
        }
    );
}

#[test]
fn test_debugger_help_and_unknown_commands() {
    let mut machine = machine_from_words(&[0], &[]);
    let mut console = ScriptedConsole::new(["h", "x", "", "step"]);
    let report = machine.run(Mode::Debug, &mut console).unwrap();
    assert_eq!(report.outcome, Outcome::Halted);
    assert_eq!(console.prompts(), 4);
    let transcript = console.transcript();
    assert!(transcript.contains("c: Continue execution, disable debug"));
    assert_eq!(transcript.matches("Debugger stopped the program").count(), 4);
}

#[test]
fn test_debugger_closed_console_quits() {
    let mut machine = machine_from_words(&[902, 0], &[]);
    let report = machine
        .run(Mode::Debug, &mut ScriptedConsole::default())
        .unwrap();
    assert_eq!(report.outcome, Outcome::Terminated);
    assert!(machine.output().is_empty());
}

#[test]
fn test_debugger_dump() {
    let mut machine = machine_from_words(&[901, 902, 0], &[4, 8]);
    machine.execute(Instruction::Input).unwrap();
    machine.execute(Instruction::Output).unwrap();
    let dump = debugger::render(&machine);
    assert!(dump.starts_with("Memory\n> 00:   901  INP\n  01:   902  OUT\n  02:     0  HLT\n"));
    assert!(dump.contains("\nCounter: 0\nAccumulator: 4\nInput: 8\nOutput: 4\n"));
    assert_eq!(dump.lines().filter(|line| line.contains(": ")).count(), 104);
}

#[test]
fn test_debug_command_parsing() {
    assert_eq!(DebugCommand::parse("s"), Some(DebugCommand::Step));
    assert_eq!(DebugCommand::parse("  c  "), Some(DebugCommand::Continue));
    assert_eq!(DebugCommand::parse("quit now"), Some(DebugCommand::Quit));
    assert_eq!(DebugCommand::parse("h"), Some(DebugCommand::Help));
    assert_eq!(DebugCommand::parse("sc"), None);
    assert_eq!(DebugCommand::parse(""), None);
}

#[test]
fn test_std_console() {
    let mut console = StdConsole::new(&b"first\r\nsecond"[..], Vec::new());
    assert_eq!(console.read_line("? ").unwrap().as_deref(), Some("first"));
    assert_eq!(console.read_line("? ").unwrap().as_deref(), Some("second"));
    assert_eq!(console.read_line("? ").unwrap(), None);
    console.write_line("done").unwrap();
    let (_, written) = console.into_inner();
    assert_eq!(written, b"? ? ? done\n");
}
