mod common;

use chipos::interpreter::{ErrorKind, Outcome};
use chipos::storage::{FileSlots, MemoryStorage};
use chipos::terminal::MockTerminal;
use common::{install, output_of, run_source, run_with, seeded};

fn failure_kind(source: &str) -> ErrorKind {
    match run_source(source).0 {
        Outcome::Failed(error) => error.kind,
        other => panic!("Expected {:?} to fail, got {:?}", source, other),
    }
}

#[test]
fn test_file_lifecycle() {
    let source = "fCreate:\"NOTES\"\nfWrite:\"NOTES\",\"hello\"\nprint:fSize:\"NOTES\"\nprint:fRead:\"NOTES\",1,3\nfSetName:\"NOTES\",\"MEMO\"\nprint:fExists:\"NOTES\"\nprint:fExists:\"MEMO\"\nfDelete:\"MEMO\"\nprint:fExists:\"MEMO\"";
    assert_eq!(output_of(source), vec!["5", "ell", "0", "1", "0"]);
}

#[test]
fn test_files_outlive_the_program() {
    let (outcome, interpreter) = run_with(
        MemoryStorage::new(),
        "fCreate:\"SAVE\"\nfWrite:\"SAVE\",\"42\"",
        MockTerminal::new(),
        seeded(),
    );
    assert_eq!(outcome, Outcome::Finished);

    let (storage, _) = interpreter.into_parts();
    let slot = storage.find_file(b"SAVE").expect("File missing");
    assert_eq!(storage.read_file(slot, 0, 2).unwrap(), b"42".to_vec());

    let (outcome, interpreter) = run_with(
        storage,
        "print:(num:fRead:\"SAVE\",0,fSize:\"SAVE\")+1",
        MockTerminal::new(),
        seeded(),
    );
    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(interpreter.console().get_output(), vec!["43"]);
}

#[test]
fn test_import_defines_functions() {
    let mut storage = MemoryStorage::new();
    install(&mut storage, "LIB", "func:DOUBLE,X\nret:X*2\nend;\nLOADED=1");
    let (outcome, interpreter) = run_with(
        storage,
        "fImport:\"LIB\"\nprint:DOUBLE:21\nprint:LOADED",
        MockTerminal::new(),
        seeded(),
    );
    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(interpreter.console().get_output(), vec!["42", "1"]);
}

#[test]
fn test_listing_shows_program_and_files() {
    let (_, interpreter) = run_with(
        MemoryStorage::new(),
        "fCreate:\"DATA\"\nfWrite:\"DATA\",\"abc\"",
        MockTerminal::new(),
        seeded(),
    );
    let entries = interpreter.storage().list_files();
    let names: Vec<String> = entries.iter().map(|entry| entry.name_lossy()).collect();
    assert_eq!(names, vec!["MAIN", "DATA"]);
    assert_eq!(entries[1].size, 3);
}

#[test]
fn test_file_errors() {
    assert_eq!(failure_kind("fDelete:\"NOPE\""), ErrorKind::MissingFile);
    assert_eq!(failure_kind("fCreate:\"A\"\nfCreate:\"A\""), ErrorKind::FileExists);
    assert_eq!(
        failure_kind("fCreate:\"ABCDEFGHIJKLMNOPQ\""),
        ErrorKind::NameTooLong
    );
    assert_eq!(
        failure_kind("fCreate:\"A\"\nfWrite:\"A\",\"xy\"\nprint:fRead:\"A\",2,1"),
        ErrorKind::BadIndex
    );
    assert_eq!(
        failure_kind("fCreate:\"A\"\nfWrite:\"A\",\"xy\"\nprint:fRead:\"A\",0,3"),
        ErrorKind::BadAmount
    );
    assert_eq!(
        failure_kind("fCreate:\"A\"\nfWrite:\"A\",\"abcdef\"\nprint:fRead:\"A\",1,9999999999"),
        ErrorKind::BadAmount
    );
    assert_eq!(failure_kind("print:fExists:5"), ErrorKind::BadArgumentType);
}

#[test]
fn test_storage_fills_up() {
    let source = "I=0\nwhile:1\nfCreate:\"F\"+(str:I)\nI+=1\nend;";
    assert_eq!(failure_kind(source), ErrorKind::StorageFull);
}
