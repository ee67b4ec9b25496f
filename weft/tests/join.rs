use weft::time::sleep;
use weft::{RuntimeBuilder, join};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[test]
fn test_join_single_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let a = join!(async { 42 });
        a
    });

    assert_eq!(result, 42);
}

#[test]
fn test_join_two_futures() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let (a, b) = join!(async { 10 }, async { 20 });
        (a, b)
    });

    assert_eq!(result, (10, 20));
}

#[test]
fn test_join_three_futures_different_types() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let (a, b, c) = join!(async { "hello" }, async { 42 }, async { true });
        (a, b, c)
    });

    assert_eq!(result, ("hello", 42, true));
}

#[test]
fn test_join_concurrent_execution() {
    let rt = RuntimeBuilder::new().build();
    let counter = Arc::new(AtomicUsize::new(0));

    let c1 = counter.clone();
    let c2 = counter.clone();
    let c3 = counter.clone();

    rt.block_on(async move {
        join!(
            async move {
                c1.fetch_add(1, Ordering::SeqCst);
            },
            async move {
                c2.fetch_add(10, Ordering::SeqCst);
            },
            async move {
                c3.fetch_add(100, Ordering::SeqCst);
            }
        );
    });

    assert_eq!(counter.load(Ordering::SeqCst), 111);
}

#[test]
fn test_join_overlaps_sleeps() {
    let rt = RuntimeBuilder::new().build();

    let elapsed = rt.block_on(async {
        let start = Instant::now();

        join!(
            sleep(Duration::from_millis(30)),
            sleep(Duration::from_millis(30)),
            sleep(Duration::from_millis(30))
        );

        start.elapsed()
    });

    assert!(elapsed >= Duration::from_millis(30));
    assert!(
        elapsed < Duration::from_millis(80),
        "joined sleeps should overlap, took {:?}",
        elapsed
    );
}

#[test]
fn test_join_with_captured_values() {
    let rt = RuntimeBuilder::new().build();
    let value = 50;
    let multiplier = 2;

    let result = rt.block_on(async move {
        let (a, b) = join!(async move { value * multiplier }, async move {
            value + multiplier
        });
        (a, b)
    });

    assert_eq!(result, (100, 52));
}

#[test]
fn test_join_with_result_types() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let (ok_result, err_result) = join!(async { Ok::<i32, &str>(100) }, async {
            Err::<i32, &str>("error")
        });
        (ok_result, err_result)
    });

    assert_eq!(result.0, Ok(100));
    assert_eq!(result.1, Err("error"));
}
