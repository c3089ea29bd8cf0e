//! Message drain behavior through the public API
//!
//! Exercises FIFO ordering, drop-oldest overflow, and sender disconnection.

use std::thread;

use loupe_registry::MessageDrain;

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn drain_preserves_production_order() {
    let drain = MessageDrain::new(8);
    let sender = drain.sender();

    sender.push("first");
    sender.push("second");
    sender.push("third");

    assert_eq!(drain.drain(), vec!["first", "second", "third"]);
    // Consumed: nothing left for the next cycle
    assert!(drain.drain().is_empty());
}

#[test]
fn messages_span_drain_cycles_without_loss() {
    let drain = MessageDrain::new(8);
    let sender = drain.sender();

    sender.push("a");
    assert_eq!(drain.drain(), vec!["a"]);

    sender.push("b");
    sender.push("c");
    assert_eq!(drain.drain(), vec!["b", "c"]);
}

// =============================================================================
// Overflow
// =============================================================================

#[test]
fn overflow_discards_oldest_first() {
    let drain = MessageDrain::new(3);
    let sender = drain.sender();

    for i in 0..5 {
        sender.push(format!("m{i}"));
    }

    assert_eq!(drain.drain(), vec!["m2", "m3", "m4"]);
    assert_eq!(drain.dropped(), 2);
}

#[test]
fn push_never_blocks_at_capacity() {
    let drain = MessageDrain::new(1);
    let sender = drain.sender();

    // Producer runs to completion with no consumer draining
    let producer = thread::spawn(move || {
        for i in 0..1_000 {
            sender.push(format!("{i}"));
        }
    });
    producer.join().unwrap();

    assert_eq!(drain.drain(), vec!["999"]);
    assert_eq!(drain.dropped(), 999);
}

// =============================================================================
// Disconnection
// =============================================================================

#[test]
fn sender_outlives_drain_harmlessly() {
    let drain = MessageDrain::new(4);
    let sender = drain.sender();
    assert!(sender.is_connected());

    drop(drain);

    assert!(!sender.is_connected());
    sender.push("into the void");
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_producers_each_keep_their_order() {
    let drain = MessageDrain::new(1_024);

    let handles: Vec<_> = (0..4)
        .map(|producer| {
            let sender = drain.sender();
            thread::spawn(move || {
                for i in 0..50 {
                    sender.push(format!("{producer}:{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let messages = drain.drain();
    assert_eq!(messages.len(), 200);

    // Interleaving across producers is arbitrary, but each producer's own
    // messages must appear in the order it pushed them
    for producer in 0..4 {
        let prefix = format!("{producer}:");
        let mine: Vec<_> = messages
            .iter()
            .filter(|m| m.starts_with(&prefix))
            .collect();
        let expected: Vec<_> = (0..50).map(|i| format!("{producer}:{i}")).collect();
        assert_eq!(mine.len(), 50);
        for (got, want) in mine.iter().zip(&expected) {
            assert_eq!(*got, want);
        }
    }
}
