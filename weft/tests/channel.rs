use weft::Channel;
use weft::channel::{SendError, TryRecvError, TrySendError};
use weft::task::spawn;
use weft::time::sleep;
use weft::{Error, RuntimeBuilder};

use std::time::Duration;

#[test]
fn test_try_send_try_recv_roundtrip() {
    let channel = Channel::new(2);

    channel.try_send(1).unwrap();
    channel.try_send(2).unwrap();

    assert_eq!(channel.try_recv(), Ok(1));
    assert_eq!(channel.try_recv(), Ok(2));
    assert_eq!(channel.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn test_capacity_invariant() {
    let channel = Channel::new(3);

    for i in 0..3 {
        channel.try_send(i).unwrap();
        assert!(channel.len() <= channel.capacity());
    }

    // The buffer never grows past its capacity: the fourth value is
    // refused, not queued.
    assert_eq!(channel.try_send(99), Err(TrySendError::Full(99)));
    assert_eq!(channel.len(), 3);
}

#[test]
fn test_try_send_after_close() {
    let channel = Channel::new(1);
    channel.close();

    assert_eq!(channel.try_send(5), Err(TrySendError::Closed(5)));
}

#[test]
fn test_close_is_idempotent() {
    let channel = Channel::<i32>::new(1);

    assert!(channel.close());
    assert!(!channel.close());
    assert!(channel.is_closed());
}

#[test]
fn test_recv_after_close_drains_then_ends() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let channel = Channel::new(4);

        channel.send(1).await.unwrap();
        channel.send(2).await.unwrap();
        channel.close();

        // Buffered values first, then a clean end-of-stream.
        assert_eq!(channel.recv().await, Some(1));
        assert_eq!(channel.recv().await, Some(2));
        assert_eq!(channel.recv().await, None);
        assert_eq!(channel.try_recv(), Err(TryRecvError::Closed));
    });
}

#[test]
fn test_send_suspends_when_full() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let channel = Channel::new(1);
        channel.send(1).await.unwrap();

        let producer = channel.clone();
        let parked = spawn(async move {
            // Buffer is full: parks until the receive below makes room.
            producer.send(2).await.unwrap();
            Ok(())
        });

        sleep(Duration::from_millis(10)).await;
        assert_eq!(channel.len(), 1);

        assert_eq!(channel.recv().await, Some(1));
        parked.await.unwrap();
        assert_eq!(channel.recv().await, Some(2));
    });
}

#[test]
fn test_close_wakes_parked_sender() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let channel = Channel::new(1);
        channel.send(1).await.unwrap();

        let producer = channel.clone();
        let parked = spawn(async move { Ok(producer.send(2).await) });

        // Let the sender park on the full buffer, then close.
        sleep(Duration::from_millis(10)).await;
        channel.close();

        // The sender wakes with the closed error, its value handed back.
        assert_eq!(parked.await.unwrap(), Err(SendError(2)));

        // The accepted value still drains before end-of-stream.
        assert_eq!(channel.recv().await, Some(1));
        assert_eq!(channel.recv().await, None);
    });
}

#[test]
fn test_rendezvous_channel_hands_off() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let channel = Channel::new(0);

        // No buffer room ever exists on a rendezvous channel.
        assert_eq!(channel.try_send(7), Err(TrySendError::Full(7)));

        let producer = channel.clone();
        let sender = spawn(async move { Ok(producer.send(7).await) });

        assert_eq!(channel.recv().await, Some(7));
        assert_eq!(sender.await.unwrap(), Ok(()));
        assert_eq!(channel.len(), 0);
    });
}

#[test]
fn test_single_producer_order_preserved() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let channel = Channel::new(3);

        let producer = channel.clone();
        let _feeder = spawn(async move {
            for i in 0..20 {
                producer.send(i).await.unwrap();
            }
            producer.close();
            Ok(())
        });

        let mut received = Vec::new();
        while let Some(value) = channel.recv().await {
            received.push(value);
        }

        assert_eq!(received, (0..20).collect::<Vec<_>>());
    });
}

#[test]
fn test_capacity_one_stream_delivers_in_order() {
    let rt = RuntimeBuilder::new().build();

    // A channel whose buffer can store only one element: a producer
    // sending 0..9 with a delay between sends, a consumer iterating
    // until end-of-stream.
    rt.block_on(async {
        let channel = Channel::new(1);

        let producer = channel.clone();
        let feeder = spawn(async move {
            for i in 0..9 {
                sleep(Duration::from_millis(3)).await;
                producer.send(i).await.unwrap();
            }
            producer.close();
            Ok(())
        });

        let consumer = channel.clone();
        let collector = spawn(async move {
            let mut received = Vec::new();
            while let Some(value) = consumer.recv().await {
                assert!(consumer.len() <= 1, "buffer exceeded its capacity");
                received.push(value);
            }
            Ok(received)
        });

        let received = collector.await.unwrap();
        feeder.await.unwrap();

        assert_eq!(received, (0..9).collect::<Vec<_>>());

        // The stream is exhausted for good.
        assert_eq!(channel.recv().await, None);
    });
}

#[test]
fn test_producer_and_consumer_on_different_contexts() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let serial = rt.serial("consumer");
    let pool = rt.dispatcher();

    let channel = Channel::new(2);

    let producer = channel.clone();
    let _feeder = pool.launch(async move {
        for i in 0..10 {
            producer.send(i).await.map_err(|_| Error::operation("send failed"))?;
        }
        producer.close();
        Ok(())
    });

    let consumer = channel.clone();
    let collector = serial.launch(async move {
        let mut received = Vec::new();
        while let Some(value) = consumer.recv().await {
            received.push(value);
        }
        Ok(received)
    });

    let received = rt.block_on(async move { collector.await }).unwrap();
    assert_eq!(received, (0..10).collect::<Vec<_>>());
}
