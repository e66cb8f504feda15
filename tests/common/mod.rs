// Shared helpers for running programs against a scripted console

#![allow(dead_code)]

use chipos::config::RuntimeConfig;
use chipos::interpreter::{Interpreter, Outcome};
use chipos::storage::{FileSlots, MemoryStorage};
use chipos::symbols::encode;
use chipos::terminal::{MockTerminal, ScriptedInput};

pub type TestInterpreter = Interpreter<MemoryStorage, MockTerminal>;

/// Encode `source` and store it as `name`.
pub fn install(storage: &mut MemoryStorage, name: &str, source: &str) {
    let code = encode(source).expect("Encoding failed");
    storage
        .install_program(name.as_bytes(), &code)
        .expect("Installing program failed");
}

/// Run `source` as program `MAIN` with the given console and config.
pub fn run_with(
    storage: MemoryStorage,
    source: &str,
    terminal: MockTerminal,
    config: RuntimeConfig,
) -> (Outcome, TestInterpreter) {
    let mut storage = storage;
    install(&mut storage, "MAIN", source);
    let mut interpreter = Interpreter::with_config(storage, terminal, config);
    let outcome = interpreter
        .run_program("MAIN")
        .expect("Program not found");
    (outcome, interpreter)
}

/// Run `source` with no input and return the outcome and printed lines.
pub fn run_source(source: &str) -> (Outcome, Vec<String>) {
    run_with_inputs(source, [])
}

pub fn run_with_inputs(
    source: &str,
    inputs: impl IntoIterator<Item = ScriptedInput>,
) -> (Outcome, Vec<String>) {
    let (outcome, interpreter) = run_with(
        MemoryStorage::new(),
        source,
        MockTerminal::with_inputs(inputs),
        seeded(),
    );
    (outcome, interpreter.console().get_output())
}

/// Default limits with a fixed random seed
pub fn seeded() -> RuntimeConfig {
    RuntimeConfig::default().with_seed(42)
}

/// Run a program that must finish and return its output.
pub fn output_of(source: &str) -> Vec<String> {
    let (outcome, output) = run_source(source);
    assert_eq!(outcome, Outcome::Finished, "Program output: {:?}", output);
    output
}
