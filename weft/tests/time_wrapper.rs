use weft::time::instrumented;
use weft::time::sleep;
use std::time::Duration;

#[weft::test]
async fn test_time_wrapper_with_sleep() {
    let (_, elapsed) = instrumented(sleep(Duration::from_millis(50))).await;

    assert!(
        elapsed >= Duration::from_millis(50),
        "Time wrapper should measure at least the sleep duration"
    );
}

#[weft::test]
async fn test_time_wrapper_passes_output_through() {
    let (value, elapsed) = instrumented(async { 42 }).await;

    assert_eq!(value, 42);
    assert!(elapsed < Duration::from_millis(10));
}
