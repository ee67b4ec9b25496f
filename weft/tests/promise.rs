use weft::time::{instrumented, sleep};
use weft::{Error, Promise, RuntimeBuilder};

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_promise_completion_is_idempotent() {
    let (promise, deferred) = Promise::new();

    assert!(promise.succeed(5));
    assert!(!promise.succeed(6));
    assert!(!promise.fail(Error::operation("too late")));

    // The first terminal value sticks.
    assert_eq!(deferred.try_result(), Some(Ok(5)));
}

#[test]
fn test_deferred_pending_peek() {
    let (_promise, deferred) = Promise::<i32>::new();

    assert_eq!(deferred.try_result(), None);
}

#[weft::test]
async fn test_deferred_repeatable_read() {
    let (promise, deferred) = Promise::new();
    promise.succeed(31);

    let first = deferred.clone().await;
    let second = deferred.clone().await;
    let third = deferred.await;

    assert_eq!(first, Ok(31));
    assert_eq!(second, Ok(31));
    assert_eq!(third, Ok(31));
}

#[weft::test]
async fn test_deferred_await_suspends_until_settled() {
    let (promise, deferred) = Promise::new();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        promise.succeed(8);
    });

    assert_eq!(deferred.await, Ok(8));
}

#[weft::test]
async fn test_deferred_observed_by_many_waiters() {
    let (promise, deferred) = Promise::new();

    let first = weft::task::spawn({
        let deferred = deferred.clone();
        async move { deferred.await }
    });
    let second = weft::task::spawn({
        let deferred = deferred.clone();
        async move { deferred.await }
    });

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        promise.succeed("shared");
    });

    assert_eq!(first.await.unwrap(), Ok("shared"));
    assert_eq!(second.await.unwrap(), Ok("shared"));
}

#[test]
fn test_on_complete_fires_at_transition() {
    let (promise, deferred) = Promise::new();

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();

    deferred.on_complete(move |result| {
        *sink.lock().unwrap() = Some(result.clone());
    });

    assert!(seen.lock().unwrap().is_none());

    promise.succeed("done");

    assert_eq!(*seen.lock().unwrap(), Some(Ok("done")));
}

#[test]
fn test_on_complete_fires_immediately_when_settled() {
    let (promise, deferred) = Promise::new();
    promise.fail(Error::operation("failed early"));

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();

    deferred.on_complete(move |result| {
        *sink.lock().unwrap() = Some(result.clone());
    });

    assert_eq!(
        *seen.lock().unwrap(),
        Some(Err::<i32, _>(Error::Operation("failed early".into())))
    );
}

#[test]
fn test_dropped_promise_settles_unresolved() {
    let (promise, deferred) = Promise::<u32>::new();
    drop(promise);

    assert_eq!(deferred.try_result(), Some(Err(Error::Unresolved)));
}

#[test]
fn test_eager_futures_awaited_sequentially_take_max_time() {
    let rt = RuntimeBuilder::new().build();
    let background = rt.dispatcher();

    rt.block_on(async move {
        // Settled by an external callback after ~40ms.
        let first = {
            let (promise, deferred) = Promise::new();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(40));
                promise.succeed(75);
            });
            deferred
        };

        // Computed by an eagerly-launched coroutine taking ~60ms.
        let second = background.launch_deferred(async {
            sleep(Duration::from_millis(60)).await;
            Ok(24)
        });

        let (sum, elapsed) = instrumented(async move {
            first.await.unwrap() + second.await.unwrap()
        })
        .await;

        assert_eq!(sum, 99);
        assert!(elapsed >= Duration::from_millis(55));
        assert!(
            elapsed < Duration::from_millis(95),
            "sequential awaits of eagerly-started futures should take \
             the max of their times, not the sum; took {:?}",
            elapsed
        );
    });
}
