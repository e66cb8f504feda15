mod common;

use chipos::interpreter::{ErrorKind, Outcome};
use common::{output_of, run_source};

fn failure_kind(source: &str) -> ErrorKind {
    match run_source(source).0 {
        Outcome::Failed(error) => error.kind,
        other => panic!("Expected {:?} to fail, got {:?}", source, other),
    }
}

#[test]
fn test_string_concatenation() {
    let output = output_of("A=\"ab\"+\"cd\"\nprint:len:A\nprint:A\nA+=\"!\"\nprint:A");
    assert_eq!(output, vec!["4", "abcd", "abcd!"]);
}

#[test]
fn test_string_escapes() {
    let output = output_of("print:\"a\\Nb\"\nprint:'\\''\nprint:len:\"\\\"\"");
    assert_eq!(output, vec!["a", "b", "39", "1"]);
}

#[test]
fn test_string_comparison() {
    let output = output_of("A=\"x\"\nprint:A==\"x\"\nprint:A!=\"x\"\nprint:A==\"y\"");
    assert_eq!(output, vec!["1", "0", "0"]);
}

#[test]
fn test_insert_and_remove_restore_a_list() {
    let output = output_of("L=[1,2,3]\nins:L,1,9\nprint:L[1]\nprint:len:L\nrem:L,1\nprint:L[1]\nprint:len:L");
    assert_eq!(output, vec!["9", "4", "2", "3"]);
}

#[test]
fn test_remove_then_insert_restores_content() {
    let source = "S=\"abc\"\nC=S[1]\nrem:S,1\nprint:S\nins:S,1,C\nprint:S\nL=[\"x\",2]\nV=L[0]\nrem:L,0\nins:L,0,V\nprint:L[0]\nprint:len:L";
    assert_eq!(output_of(source), vec!["ac", "abc", "x", "2"]);
}

#[test]
fn test_subsequences() {
    let source = "S=\"hello\"\nprint:sub:S,1,3\nT=\"ad\"\ninsSub:T,1,\"bc\"\nprint:T\nremSub:T,1,3\nprint:T\nL=[1,2,3,4]\nM=sub:L,2,4\nprint:M[0]+M[1]";
    assert_eq!(output_of(source), vec!["el", "abcd", "ad", "7"]);
}

#[test]
fn test_shared_references_and_copies() {
    let source = "A=[1]\nB=A\nC=copy:A\nprint:equRef:A,B\nprint:equRef:A,C\nB[0]=5\nprint:A[0]\nprint:C[0]";
    assert_eq!(output_of(source), vec!["1", "0", "5", "1"]);
}

#[test]
fn test_string_characters() {
    let output = output_of("S=\"cat\"\nS[0]='b'\nprint:S\nprint:S[1]\nS[2]+=1\nprint:S");
    assert_eq!(output, vec!["bat", "97", "bau"]);
}

#[test]
fn test_nested_lists() {
    let output = output_of("L=[[1,2],[3,[4,5]]]\nprint:L[1][1][0]\nL[0][1]=\"x\"\nprint:L[0][1]\nprint:type:L[1]");
    assert_eq!(output, vec!["4", "x", "3"]);
}

#[test]
fn test_sequence_errors() {
    assert_eq!(failure_kind("L=[1,2]\nprint:L[2]"), ErrorKind::BadIndex);
    assert_eq!(failure_kind("L=[1,2]\nprint:L[-1]"), ErrorKind::BadIndex);
    assert_eq!(failure_kind("print:sub:\"abc\",2,1"), ErrorKind::BadIndex);
    assert_eq!(failure_kind("A=5\nprint:A[0]"), ErrorKind::BadOperandType);
    assert_eq!(failure_kind("print:\"a\"+1"), ErrorKind::BadOperandType);
    assert_eq!(failure_kind("S=\"a\"\nS[0]=\"b\""), ErrorKind::BadOperandType);
    assert_eq!(failure_kind("print:[1]"), ErrorKind::BadArgumentType);
    assert_eq!(failure_kind("print:len:5"), ErrorKind::BadArgumentType);
    assert_eq!(failure_kind("print:equRef:[1],\"a\""), ErrorKind::BadArgumentType);
}
