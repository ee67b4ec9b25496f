use weft::select;
use weft::time::sleep;

use std::time::Duration;

#[weft::test]
async fn test_select_single_future() {
    let result = select! {
        async { 42 } => |v| v * 2,
    };

    assert_eq!(result, 84);
}

#[weft::test]
async fn test_select_two_futures_first_ready() {
    let result = select! {
        async { 10 } => |v| v,
        async { 20 } => |v| v,
    };

    assert!(result == 10 || result == 20);
}

#[weft::test]
async fn test_select_two_futures_different_types() {
    let result = select! {
        async { 42i32 } => |v| format!("number: {}", v),
        async { "hello" } => |v| format!("string: {}", v),
    };

    assert!(result == "number: 42" || result == "string: hello");
}

#[weft::test]
async fn test_select_prefers_ready_branch() {
    let result = select! {
        async {
            sleep(Duration::from_millis(100)).await;
            "slow"
        } => |v| v,
        async { "fast" } => |v| v,
    };

    assert_eq!(result, "fast");
}

#[weft::test]
async fn test_select_with_captured_values() {
    let multiplier = 10;

    let result = select! {
        async { 5 } => |v| v * multiplier,
        async { 3 } => |v| v * multiplier,
    };

    assert!(result == 50 || result == 30);
}

#[weft::test]
async fn test_select_pattern_binding() {
    let result = select! {
        async { (1, 2) } => |(a, b)| a + b,
        async { (3, 4) } => |(a, b)| a * b,
    };

    assert!(result == 3 || result == 12);
}
