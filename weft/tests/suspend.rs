use weft::Error;
use weft::suspend::{Completion, suspend};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Waker};
use std::thread;
use std::time::Duration;

/// Stand-in for an external callback-style API: runs some work on its
/// own thread and reports through a single-shot callback.
fn async_operation<T, F>(delay: Duration, produce: F, completion: Completion<T>)
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    thread::spawn(move || {
        thread::sleep(delay);
        completion.resolve(produce());
    });
}

#[weft::test]
async fn test_suspend_delivers_callback_value() {
    let value = suspend(|completion| {
        async_operation(
            Duration::from_millis(10),
            || Ok(String::from("payload")),
            completion,
        );
    })
    .await;

    assert_eq!(value.unwrap(), "payload");
}

#[weft::test]
async fn test_suspend_synchronous_completion() {
    let value = suspend(|completion| completion.succeed(7)).await;

    assert_eq!(value, Ok(7));
}

#[weft::test]
async fn test_suspend_failure_reaches_error_path() {
    let result: Result<Vec<u8>, Error> = suspend(|completion| {
        async_operation(
            Duration::from_millis(5),
            || Err(Error::operation("connection reset")),
            completion,
        );
    })
    .await;

    // The error-handling path runs; no partial value leaks downstream.
    let data: Vec<u8> = match result {
        Ok(_) => panic!("failed operation must not produce a value"),
        Err(error) => {
            assert_eq!(error, Error::Operation("connection reset".into()));
            Vec::new()
        }
    };

    assert!(data.is_empty());
}

#[weft::test]
async fn test_suspend_dropped_completion_fails() {
    let result: Result<u8, Error> = suspend(|completion| {
        drop(completion);
    })
    .await;

    assert_eq!(result, Err(Error::Unresolved));
}

#[weft::test]
async fn test_suspend_sequential_calls() {
    let mut collected = Vec::new();

    for i in 0..3 {
        let value = suspend(move |completion| {
            async_operation(Duration::from_millis(2), move || Ok(i), completion);
        })
        .await
        .unwrap();

        collected.push(value);
    }

    assert_eq!(collected, vec![0, 1, 2]);
}

#[test]
#[should_panic(expected = "outside of a runtime")]
fn test_suspend_outside_runtime_panics() {
    let mut future = suspend(|completion: Completion<i32>| completion.succeed(1));

    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);

    let _ = Pin::new(&mut future).poll(&mut cx);
}
