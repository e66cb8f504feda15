mod common;

use chipos::config::RuntimeConfig;
use chipos::interpreter::{ErrorKind, Outcome};
use chipos::storage::MemoryStorage;
use chipos::terminal::MockTerminal;
use common::{output_of, run_source, run_with};

fn failure_kind(source: &str) -> ErrorKind {
    match run_source(source).0 {
        Outcome::Failed(error) => error.kind,
        other => panic!("Expected {:?} to fail, got {:?}", source, other),
    }
}

#[test]
fn test_if_elif_else_chain() {
    let program = |x: i32| {
        format!(
            "X={}\nif:X==1\nprint:\"one\"\nelif:X==2\nprint:\"two\"\nelse;\nprint:\"other\"\nend;\nprint:\"done\"",
            x
        )
    };
    assert_eq!(output_of(&program(1)), vec!["one", "done"]);
    assert_eq!(output_of(&program(2)), vec!["two", "done"]);
    assert_eq!(output_of(&program(3)), vec!["other", "done"]);
}

#[test]
fn test_nested_blocks_are_skipped_whole() {
    let source = "if:0\nif:1\nprint:\"inner\"\nend;\nwhile:1\nend;\nelse;\nprint:\"else\"\nend;";
    assert_eq!(output_of(source), vec!["else"]);
}

#[test]
fn test_while_loop_counts() {
    let output = output_of("A=1\nwhile:A<=3\nprint:A\nA+=1\nend;");
    assert_eq!(output, vec!["1", "2", "3"]);
}

#[test]
fn test_break_and_continue() {
    let source = "I=0\nS=0\nwhile:1\nI+=1\nif:I>10\nbreak;\nend;\nif:I%2==0\ncont;\nend;\nS+=I\nend;\nprint:S\nprint:I";
    assert_eq!(output_of(source), vec!["25", "11"]);
}

#[test]
fn test_functions_and_recursion() {
    let source = "func:FACT,N\nif:N<=1\nret:1\nend;\nret:N*FACT:N-1\nend;\nprint:FACT:5";
    assert_eq!(output_of(source), vec!["120"]);
}

#[test]
fn test_function_parameters_are_local() {
    let source = "X=1\nfunc:SET,X\nX=5\nY=2\nend;\nSET:9\nprint:X";
    assert_eq!(output_of(source), vec!["1"]);
    assert_eq!(
        failure_kind("func:SET\nY=2\nend;\nSET;\nprint:Y"),
        ErrorKind::MissingValue
    );
}

#[test]
fn test_function_without_ret_returns_nothing() {
    assert_eq!(output_of("func:NOP\nend;\nNOP;\nprint:\"after\""), vec!["after"]);
    assert_eq!(failure_kind("func:NOP\nend;\nprint:NOP;"), ErrorKind::MissingValue);
}

#[test]
fn test_functions_are_values() {
    let source = "func:TWICE,F,X\nret:F:(F:X)\nend;\nfunc:INC,X\nret:X+1\nend;\nprint:TWICE:INC,5\nprint:type:INC";
    assert_eq!(output_of(source), vec!["7", "4"]);
}

#[test]
fn test_deep_recursion_fails() {
    let source = "func:F,N\nret:F:N+1\nend;\nF:0";
    assert!(matches!(run_source(source).0, Outcome::Failed(_)));
}

#[test]
fn test_nesting_limit() {
    let config = RuntimeConfig::default().with_seed(1).with_max_depth(8);
    let (outcome, _) = run_with(
        MemoryStorage::new(),
        "print:((((((((((1))))))))))",
        MockTerminal::new(),
        config,
    );
    match outcome {
        Outcome::Failed(error) => assert_eq!(error.kind, ErrorKind::ExpressionTooComplex),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[test]
fn test_block_errors() {
    assert_eq!(failure_kind("end;"), ErrorKind::BadEndStatement);
    assert_eq!(failure_kind("break;"), ErrorKind::BadBreakStatement);
    assert_eq!(failure_kind("cont;"), ErrorKind::BadContinueStatement);
    assert_eq!(failure_kind("A=if:1"), ErrorKind::NotTopLevel);
    assert_eq!(failure_kind("if:\"x\"\nend;"), ErrorKind::BadArgumentType);
}

#[test]
fn test_syntax_errors() {
    assert_eq!(failure_kind("print:(1+2"), ErrorKind::MissingParenthesis);
    assert_eq!(failure_kind("print:\"abc"), ErrorKind::MissingQuotationMark);
    assert_eq!(failure_kind("print:'a"), ErrorKind::MissingApostrophe);
    assert_eq!(failure_kind("A=[1,2"), ErrorKind::MissingBracket);
    assert_eq!(failure_kind("print:pow:2"), ErrorKind::MissingComma);
    assert_eq!(failure_kind("print:)"), ErrorKind::BadStartOfExpression);
    assert_eq!(failure_kind("print:UNSET"), ErrorKind::MissingValue);
    assert_eq!(failure_kind("ABCDEFGHIJKLMNOP=1"), ErrorKind::VariableNameTooLong);
    assert_eq!(failure_kind("print:123456789012345678901"), ErrorKind::NumberLiteralTooLong);
}
