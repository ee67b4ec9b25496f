use weft::task;
use weft::time::{Elapsed, sleep, timeout};

use std::time::Duration;

#[weft::test]
async fn test_timeout_completes_before_deadline() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(10)).await;
        Ok(123)
    });

    let result = timeout(Duration::from_millis(50), handle).await;

    assert!(
        matches!(result, Ok(Ok(v)) if v == 123),
        "Timeout should return the coroutine's value"
    );
}

#[weft::test]
async fn test_timeout_expires() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(100)).await;
        Ok(456)
    });
    let result = timeout(Duration::from_millis(20), handle).await;

    assert_eq!(
        result,
        Err(Elapsed),
        "Timeout should report an elapsed deadline"
    );
}

#[weft::test]
async fn test_timeout_over_plain_sleep() {
    let result = timeout(Duration::from_millis(10), sleep(Duration::from_millis(60))).await;

    assert_eq!(result, Err(Elapsed));
}
