mod common;

use chipos::interpreter::{ErrorKind, Outcome};
use common::{output_of, run_source};
use std::fs;
use std::path::Path;

#[test]
fn test_precedence_and_grouping() {
    let output = output_of("print:2+3*4\nprint:(2+3)*4\nprint:10-4-3\nprint:1+2==3\nprint:1==1&&0");
    assert_eq!(output, vec!["14", "20", "3", "1", "0"]);
}

#[test]
fn test_division_and_formatting() {
    let output = output_of("print:7/2\nprint:1/3\nprint:-6/3\nprint:100000000");
    assert_eq!(output, vec!["3.5", "0.3333", "-2", "1.0000e8"]);
}

#[test]
fn test_integer_operators() {
    let output = output_of("print:7%3\nprint:6&3\nprint:6|3\nprint:6^3\nprint:1<<4\nprint:~0");
    assert_eq!(output, vec!["1", "2", "7", "5", "16", "-1"]);
}

#[test]
fn test_boolean_operators() {
    let output = output_of("print:2&&0\nprint:2||0\nprint:1^^1\nprint:!5\nprint:!0");
    assert_eq!(output, vec!["0", "1", "0", "0", "1"]);
}

#[test]
fn test_compound_assignment() {
    let output = output_of("A=10\nA-=3\nA*=2\nprint:A\nA%=5\nprint:A\nA<<=3\nprint:A");
    assert_eq!(output, vec!["14", "4", "32"]);
}

#[test]
fn test_increment_and_decrement() {
    let output = output_of("A=5\nB=A++\nprint:B\nprint:A\nprint:++A\nprint:--A\nprint:-A");
    assert_eq!(output, vec!["5", "6", "7", "6", "-6"]);
}

#[test]
fn test_number_string_conversion() {
    assert_eq!(output_of("print:num:str:(num:\"3.5\")"), vec!["3.5"]);
    let output = output_of("print:(num:\"12.5\")+1\nprint:str:(3/4)\nprint:num:\"abc\"\nprint:type:str:1");
    assert_eq!(output, vec!["13.5", "0.75", "0", "2"]);
}

#[test]
fn test_math_functions() {
    let output = output_of(
        "print:abs:-3\nprint:round:2.5\nprint:floor:-1.5\nprint:ceil:1.2\nprint:sqrt:16\nprint:pow:2,10\nprint:log:8,2",
    );
    assert_eq!(output, vec!["3", "3", "-2", "2", "4", "1024", "3"]);
}

#[test]
fn test_random_numbers_stay_in_range() {
    let output = output_of("I=0\nwhile:I<50\nR=randInt:3,5\nif:R<3||R>5\nprint:R\nend;\nX=rand;\nif:X<0||X>=1\nprint:X\nend;\nI+=1\nend;");
    assert!(output.is_empty(), "Out of range: {:?}", output);
}

#[test]
fn test_divide_by_zero() {
    for source in ["print:1/0", "print:5%0", "A=1\nA/=0"] {
        let (outcome, _) = run_source(source);
        match outcome {
            Outcome::Failed(error) => assert_eq!(error.kind, ErrorKind::DivideByZero, "{}", source),
            other => panic!("Expected failure for {:?}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_fizzbuzz_demo() {
    let path = Path::new("demos/fizzbuzz.chp");
    let source = fs::read_to_string(path).expect("Failed to read demo file");
    let output = output_of(&source);

    println!("Interpreter output:\n{}", output.join("\n"));

    assert_eq!(output.len(), 15);
    assert_eq!(output[2], "Fizz");
    assert_eq!(output[4], "Buzz");
    assert_eq!(output[14], "FizzBuzz");
    assert_eq!(output[6], "7");
}
