//! # Two-Thread Stress Tests
//!
//! One producer thread commits an increasing sequence while one consumer
//! thread polls. The consumer must only ever see committed values, in commit
//! order, and must end on the last one.
//!
//! Run with: cargo test -p trio_core --test concurrency --release

use std::thread;

use trio_core::{Coordinator, LockFree, Locked, Trio};

/// Commits `1..=last` on one thread and polls on another.
///
/// Returns every value the consumer saw with `changed == true`.
fn run_counter<C: Coordinator + 'static>(last: u64) -> Vec<u64> {
    let (mut producer, mut consumer) = Trio::<u64, C>::new().split();

    let writer = thread::spawn(move || {
        for i in 1..=last {
            let mut slot = producer.write();
            *slot = i;
            slot.commit();
        }
    });

    let mut seen = Vec::new();
    let mut previous = 0;
    while previous != last {
        let (value, changed) = consumer.read();
        if changed {
            assert!(*value > previous, "{} after {}", *value, previous);
            previous = *value;
            seen.push(previous);
        } else {
            assert_eq!(*value, previous);
            thread::yield_now();
        }
    }

    writer.join().expect("producer panicked");
    assert_eq!(consumer.read(), (&last, false));
    seen
}

#[test]
fn test_counter_to_25_lock_free() {
    for _ in 0..200 {
        let seen = run_counter::<LockFree>(25);
        assert_eq!(seen.last(), Some(&25));
    }
}

#[test]
fn test_counter_to_25_mutex() {
    for _ in 0..200 {
        let seen = run_counter::<Locked>(25);
        assert_eq!(seen.last(), Some(&25));
    }
}

#[test]
fn test_long_counter_lock_free() {
    let seen = run_counter::<LockFree>(200_000);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last(), Some(&200_000));
}

#[test]
fn test_long_counter_mutex() {
    let seen = run_counter::<Locked>(200_000);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last(), Some(&200_000));
}

/// Payload larger than a word: a torn read would break the checksum.
#[derive(Clone, Default)]
struct Frame {
    sequence: u64,
    samples: [u64; 16],
    checksum: u64,
}

impl Frame {
    fn fill(&mut self, sequence: u64) {
        self.sequence = sequence;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = sequence.wrapping_mul(31).wrapping_add(i as u64);
        }
        self.checksum = self.samples.iter().fold(sequence, |acc, s| acc ^ s);
    }

    fn is_consistent(&self) -> bool {
        self.samples.iter().fold(self.sequence, |acc, s| acc ^ s) == self.checksum
    }
}

#[test]
fn test_no_torn_frames() {
    const LAST: u64 = 50_000;
    let (mut producer, mut consumer) = Trio::<Frame>::new().split();

    let writer = thread::spawn(move || {
        for sequence in 1..=LAST {
            let mut frame = producer.write();
            frame.fill(sequence);
            frame.commit();
        }
    });

    let mut previous = 0;
    while previous != LAST {
        let (frame, changed) = consumer.read();
        assert!(frame.is_consistent(), "torn frame {}", frame.sequence);
        if changed {
            assert!(frame.sequence > previous);
            previous = frame.sequence;
        }
    }

    writer.join().expect("producer panicked");
}

#[test]
fn test_liveness_after_final_commit() {
    let (mut producer, mut consumer) = Trio::<u32>::new().split();

    let writer = thread::spawn(move || {
        producer.publish(42);
        producer
    });
    let producer = writer.join().expect("producer panicked");

    // The producer is idle; the very next read must pick up the commit.
    assert!(consumer.updated());
    assert_eq!(consumer.read(), (&42, true));
    assert!(producer.consumed());
}

#[test]
fn test_halves_are_send() {
    fn assert_send<S: Send>() {}
    assert_send::<trio_core::Producer<Vec<String>>>();
    assert_send::<trio_core::Consumer<Vec<String>>>();
    assert_send::<trio_core::Producer<Vec<String>, Locked>>();
    assert_send::<trio_core::Consumer<Vec<String>, Locked>>();
}

#[test]
fn test_halves_are_sync_only_for_sync_values() {
    use std::cell::Cell;
    use trio_core::{Consumer, Producer};

    fn assert_sync<S: Sync>() {}
    fn assert_send<S: Send>() {}

    assert_sync::<Consumer<u64>>();
    assert_sync::<Producer<u64>>();
    assert_send::<Consumer<Cell<u64>>>();

    // Resolves only if exactly one impl applies, i.e. the type is not `Sync`.
    trait AmbiguousIfSync<A> {
        fn some_item() {}
    }
    impl<T: ?Sized> AmbiguousIfSync<()> for T {}
    impl<T: ?Sized + Sync> AmbiguousIfSync<u8> for T {}

    <Consumer<Cell<u64>> as AmbiguousIfSync<_>>::some_item();
    <Consumer<Cell<u64>, Locked> as AmbiguousIfSync<_>>::some_item();
    <Producer<Cell<u64>> as AmbiguousIfSync<_>>::some_item();
}
