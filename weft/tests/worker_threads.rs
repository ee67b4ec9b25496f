use weft::task::spawn;
use weft::{Error, RuntimeBuilder};

use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_single_worker_thread() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, 42);
}

#[test]
fn test_multiple_worker_threads() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let result = rt.block_on(async { 100 });
    assert_eq!(result, 100);
}

#[test]
fn test_worker_threads_parallel_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let counter = Arc::new(Mutex::new(0));
    let results = Arc::new(Mutex::new(Vec::new()));

    let counter_clone = counter.clone();
    let results_clone = results.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let counter = counter_clone.clone();
                let results = results_clone.clone();

                spawn(async move {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                    drop(c);

                    results.lock().unwrap().push(i);
                    Ok(i * 2)
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.await;
        }
    });

    assert_eq!(*counter.lock().unwrap(), 10);
    assert_eq!(results.lock().unwrap().len(), 10);
}

#[test]
fn test_worker_threads_stress() {
    let rt = RuntimeBuilder::new().worker_threads(8).build();

    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let counter = counter_clone.clone();
                spawn(async move {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.await;
        }
    });

    assert_eq!(*counter.lock().unwrap(), 100);
}

#[test]
fn test_worker_threads_chain_spawn() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let result = rt.block_on(async {
        let handle1 = spawn(async {
            let handle2 = spawn(async {
                let handle3 = spawn(async { Ok(10) });
                Ok(handle3.await? + 20)
            });
            Ok(handle2.await? + 30)
        });
        handle1.await.map(|v| v + 40)
    });

    assert_eq!(result, Ok(100));
}

#[test]
fn test_dispatcher_launch_from_main_thread() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();

    let handle = rt.dispatcher().launch(async { Ok(11) });
    let result = rt.block_on(async move { handle.await });

    assert_eq!(result, Ok(11));
}

#[test]
fn test_failed_coroutine_reports_error() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();

    let outcome = rt.block_on(async {
        let handle = spawn(async { Err::<(), _>(Error::operation("boom")) });
        handle.await
    });

    assert_eq!(outcome, Err(Error::Operation("boom".into())));

    // A failed coroutine must not take the runtime down with it.
    assert_eq!(rt.block_on(async { 2 + 2 }), 4);
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0).build();
}

#[test]
#[should_panic(expected = "within the context of a runtime")]
fn test_spawn_outside_runtime_panics() {
    let _ = spawn(async { Ok(()) });
}

#[test]
fn test_worker_threads_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().worker_threads(n).build();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, n * 10);
        drop(rt);
    }
}

#[test]
fn test_worker_threads_max_parallelism() {
    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let rt = RuntimeBuilder::new().worker_threads(num_threads).build();

    let result = rt.block_on(async {
        let sum = Arc::new(Mutex::new(0));
        let handles: Vec<_> = (1..=10)
            .map(|i| {
                let sum = sum.clone();
                spawn(async move {
                    *sum.lock().unwrap() += i;
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.await;
        }

        *sum.lock().unwrap()
    });

    assert_eq!(result, 55);
}
