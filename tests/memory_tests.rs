mod common;

use chipos::config::RuntimeConfig;
use chipos::interpreter::{ErrorKind, Outcome};
use chipos::storage::MemoryStorage;
use chipos::terminal::MockTerminal;
use common::{output_of, run_with};

#[test]
fn test_garbage_is_collected_in_long_loops() {
    // Far more allocations than fit in the region at once
    let source = "I=0\nwhile:I<300\nS=\"abcdefghij\"+\"klmnop\"\nL=[S,S,[I]]\nI+=1\nend;\nprint:I\nprint:len:S";
    assert_eq!(output_of(source), vec!["300", "16"]);
}

#[test]
fn test_values_survive_collection() {
    let source = "K=[\"keep\",[1,2]]\nI=0\nwhile:I<100\nT=\"tmp\"+\"tmp\"\nI+=1\nend;\nprint:K[0]\nprint:K[1][1]";
    assert_eq!(output_of(source), vec!["keep", "2"]);
}

#[test]
fn test_function_locals_survive_collection() {
    let source = "func:BUILD,N\nL=[]\nI=0\nwhile:I<N\nins:L,0,\"item\"+(str:I)\nI+=1\nend;\nret:L\nend;\nR=BUILD:10\nprint:len:R\nprint:R[0]";
    assert_eq!(output_of(source), vec!["10", "item9"]);
}

#[test]
fn test_collision_with_small_region() {
    let config = RuntimeConfig::default()
        .with_seed(3)
        .with_region_size(300);
    let source = "L=[]\nwhile:1\nins:L,0,\"xxxxxxxxxx\"\nend;";
    let (outcome, interpreter) = run_with(MemoryStorage::new(), source, MockTerminal::new(), config);
    match outcome {
        Outcome::Failed(error) => assert_eq!(error.kind, ErrorKind::StackHeapCollision),
        other => panic!("Expected a collision, got {:?}", other),
    }
    let output = interpreter.console().get_output();
    assert_eq!(output[0], "ERROR: Stack-");
    assert_eq!(output[1], "heap collision.");
    assert_eq!(output[2], "ins:L,0,\"xxxxxxxxxx\"");
}

#[test]
fn test_memory_is_released_after_run() {
    let (outcome, interpreter) = run_with(
        MemoryStorage::new(),
        "A=[1,2,3]\nB=\"text\"",
        MockTerminal::new(),
        common::seeded(),
    );
    assert_eq!(outcome, Outcome::Finished);
    assert!(interpreter.memory().heap().is_empty());
    assert_eq!(interpreter.memory().free_bytes(), interpreter.memory().size());
}
