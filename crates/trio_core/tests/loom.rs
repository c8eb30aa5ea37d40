//! # Model-Checked Hand-off
//!
//! Explores every interleaving of one producer and one consumer with loom
//! atomics substituted for the hand-off word and loom cells for the slots.
//! Besides the values the consumer sees, loom checks every slot access: a
//! read and a write of the same slot with no happens-before edge between
//! them fails the model.
//!
//! Run with: cargo test -p trio_core --features loom --test loom --release

#![cfg(feature = "loom")]
#![allow(unsafe_code)]

use std::sync::atomic::Ordering;

use loom::sync::atomic::AtomicU8;
use trio_core::{AtomicWord, LockFree, Trio};

type ModelBackend = LockFree<AtomicU8>;

/// Producer commits `1..=LAST`; consumer reads until it sees `LAST`.
///
/// Changed reads must strictly increase. Stale reads must repeat the previous
/// value. A lost final commit shows up as a livelock report.
#[test]
fn test_commit_order_is_preserved() {
    const LAST: u32 = 3;

    loom::model(|| {
        let (mut producer, mut consumer) = Trio::<u32, ModelBackend>::new().split();

        let writer = loom::thread::spawn(move || {
            for i in 1..=LAST {
                producer.publish(i);
            }
        });

        let mut previous = 0;
        while previous != LAST {
            let (value, changed) = consumer.read();
            if changed {
                assert!(*value > previous);
                previous = *value;
            } else {
                assert_eq!(*value, previous);
                loom::thread::yield_now();
            }
        }

        writer.join().unwrap();
    });
}

#[test]
fn test_seeded_slots_never_resurface() {
    loom::model(|| {
        let (mut producer, mut consumer) =
            Trio::<u32, ModelBackend>::with_slots(100, 200, 0).split();

        let writer = loom::thread::spawn(move || {
            producer.publish(1);
            producer.publish(2);
        });

        loop {
            let (value, changed) = consumer.read();
            assert!(!changed || *value == 1 || *value == 2);
            if *value == 2 {
                break;
            }
            loom::thread::yield_now();
        }

        writer.join().unwrap();
    });
}

/// In-place writes through the guard, on slots the consumer has read before.
///
/// Both fields are written separately, so a slot shared by the two threads
/// would be a reported race as well as a visible tear.
#[test]
fn test_in_place_writes_do_not_race_reads() {
    loom::model(|| {
        let (mut producer, mut consumer) = Trio::<[u32; 2], ModelBackend>::new().split();

        let writer = loom::thread::spawn(move || {
            for i in 1..=3 {
                let mut slot = producer.write();
                slot[0] = i;
                slot[1] = i * 10;
                slot.commit();
            }
        });

        loop {
            let (value, _) = consumer.read();
            assert_eq!(value[1], value[0] * 10);
            if value[0] == 3 {
                break;
            }
            loom::thread::yield_now();
        }

        writer.join().unwrap();
    });
}

/// Loom atomic that ignores the requested ordering and always uses `Relaxed`.
///
/// Violates the [`AtomicWord`] contract on purpose, to check that the model
/// above would catch a hand-off that does not synchronize.
struct RelaxedWord(AtomicU8);

// SAFETY: deliberately unsound. Only used to show that loom reports the race.
unsafe impl AtomicWord for RelaxedWord {
    type Cell<T> = loom::cell::UnsafeCell<T>;

    fn new(bits: u8) -> Self {
        Self(AtomicU8::new(bits))
    }

    fn load(&self, _order: Ordering) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    fn swap(&self, bits: u8, _order: Ordering) -> u8 {
        self.0.swap(bits, Ordering::Relaxed)
    }
}

#[test]
#[should_panic]
fn test_relaxed_hand_off_is_reported_as_race() {
    loom::model(|| {
        let (mut producer, mut consumer) =
            Trio::<u32, LockFree<RelaxedWord>>::new().split();

        let writer = loom::thread::spawn(move || {
            producer.publish(1);
        });

        // The claimed slot was written by the producer with no release to
        // acquire from, so reading it is a data race.
        loop {
            let (_, changed) = consumer.read();
            if changed {
                break;
            }
            loom::thread::yield_now();
        }

        writer.join().unwrap();
    });
}
