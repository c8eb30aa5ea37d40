//! # TRIO Core
//!
//! Single-producer single-consumer triple buffer.
//!
//! One producer publishes whole-value snapshots of a `T`, one consumer reads the
//! latest published snapshot. Neither side ever blocks, and the consumer never
//! sees a half-written value.
//!
//! ## Architecture
//!
//! ```text
//!   Producer                                         Consumer
//!   (back slot)                                      (front slot)
//!      │  commit: swap(back | DIRTY)     read: swap(front)  │
//!      └──────────────►  Hand-off word  ◄───────────────────┘
//!                      (middle index + dirty bit)
//!                               │
//!                               ▼
//!                  [ Slot 0 | Slot 1 | Slot 2 ]   (cache-padded)
//! ```
//!
//! Roles (back / middle / front) rotate among the three slots. Only the
//! middle slot is ever contended, and only its index crosses threads.
//!
//! ## Backends
//!
//! | Coordinator            | Commit                | Read (no update) |
//! |------------------------|-----------------------|------------------|
//! | [`LockFree`] (default) | one `AcqRel` swap     | one relaxed load |
//! | [`Locked`]             | mutex + swap          | mutex            |
//!
//! ## Example
//!
//! ```rust
//! use trio_core::Trio;
//!
//! let (mut producer, mut consumer) = Trio::<u64>::new().split();
//!
//! let writer = std::thread::spawn(move || {
//!     for i in 1..=100 {
//!         let mut slot = producer.write();
//!         *slot = i;
//!         slot.commit();
//!     }
//! });
//!
//! writer.join().unwrap();
//! let (value, changed) = consumer.read();
//! assert_eq!((*value, changed), (100, true));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod arena;
mod consumer;
mod coordinator;
mod producer;
mod trio;
mod word;

// `LockFree<loom::sync::atomic::AtomicU8>` and its tracked slot cell under
// model checking.
#[cfg(feature = "loom")]
mod loom_word;

pub use arena::{SlotCell, SlotIndex};
pub use consumer::Consumer;
pub use coordinator::{Coordinator, LockFree, Locked};
pub use producer::{Producer, WriteGuard};
pub use trio::Trio;
pub use word::AtomicWord;
