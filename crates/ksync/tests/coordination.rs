//! Cross-thread coordination through the table, flags, and queue together.

use std::sync::mpsc;
use std::time::Duration;

use ksync::{EventFlags, MessageQueue, ThreadPriority, ThreadSpec, ThreadTable, Timeout};

const GO: u32 = 1 << 0;

#[test]
fn barrier_releases_every_registered_thread() {
    let flags = EventFlags::new();
    let (tx, rx) = mpsc::channel();

    let mut builder = ThreadTable::builder();
    for name in ["waiter-a", "waiter-b", "waiter-c"] {
        let flags = flags.clone();
        let tx = tx.clone();
        builder = builder
            .register(ThreadSpec::new(
                name,
                ThreadPriority(3),
                Box::new(move || {
                    flags.wait(GO, false, Timeout::Forever);
                    tx.send(name).unwrap();
                }),
            ))
            .unwrap();
    }
    let handles = builder.build().spawn().unwrap();

    // Nobody passes the barrier before it opens.
    assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());

    flags.set(GO);
    let mut released = Vec::new();
    for _ in 0..3 {
        released.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    released.sort_unstable();
    assert_eq!(released, vec!["waiter-a", "waiter-b", "waiter-c"]);

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn producer_feeds_consumer_through_the_queue() {
    let queue: MessageQueue<u32> = MessageQueue::new();
    let (tx, rx) = mpsc::channel();

    let producer_queue = queue.clone();
    let consumer_queue = queue.clone();
    let handles = ThreadTable::builder()
        .register(ThreadSpec::new(
            "consumer",
            ThreadPriority(5),
            Box::new(move || {
                for _ in 0..10 {
                    let item = consumer_queue.get(Timeout::Forever).unwrap();
                    tx.send(item).unwrap();
                }
            }),
        ))
        .unwrap()
        .register(ThreadSpec::new(
            "producer",
            ThreadPriority(3),
            Box::new(move || {
                for sequence in 0..10 {
                    producer_queue.put(sequence);
                }
            }),
        ))
        .unwrap()
        .build()
        .spawn()
        .unwrap();

    let drained: Vec<u32> = (0..10)
        .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
        .collect();
    assert_eq!(drained, (0..10).collect::<Vec<_>>());

    for handle in handles {
        handle.join().unwrap();
    }
}
