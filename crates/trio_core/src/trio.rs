//! # Triple Buffer
//!
//! Construction, and the single-object surface used before (or instead of)
//! splitting into producer and consumer halves.

use std::sync::Arc;

use crate::arena::{SlotArena, SlotIndex};
use crate::consumer::Consumer;
use crate::coordinator::{Coordinator, LockFree};
use crate::producer::{Producer, WriteGuard};

/// State shared by the producer and consumer halves.
pub(crate) struct Shared<T, C: Coordinator> {
    pub(crate) arena: SlotArena<T, C::Cell<T>>,
    pub(crate) coordinator: C,
}

/// A triple buffer.
///
/// Owns both halves. Use it directly from one thread, or [`split`] it and
/// send the halves to the producer and consumer threads.
///
/// The backend is a type parameter, so switching it never touches call sites
/// beyond the type:
///
/// ```rust
/// use trio_core::{Locked, Trio};
///
/// let mut lock_free = Trio::<u32>::with_front(7);
/// let mut mutex = Trio::<u32, Locked>::with_front(7);
///
/// assert_eq!(lock_free.read(), (&7, false));
/// assert_eq!(mutex.read(), (&7, false));
/// ```
///
/// [`split`]: Trio::split
pub struct Trio<T, C: Coordinator = LockFree> {
    producer: Producer<T, C>,
    consumer: Consumer<T, C>,
}

impl<T: Default, C: Coordinator> Trio<T, C> {
    /// Creates a triple buffer with all three slots default-initialized.
    #[must_use]
    pub fn new() -> Self {
        Self::with_slots(T::default(), T::default(), T::default())
    }

    /// Creates a triple buffer whose consumer initially sees `front`.
    ///
    /// The back and middle slots are default-initialized.
    #[must_use]
    pub fn with_front(front: T) -> Self {
        Self::with_slots(T::default(), T::default(), front)
    }
}

impl<T: Default, C: Coordinator> Default for Trio<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Coordinator> Trio<T, C> {
    /// Creates a triple buffer with explicit initial values for every role.
    ///
    /// The producer starts writing into `back`, the consumer starts reading
    /// `front`, and `middle` is the hand-off slot.
    #[must_use]
    pub fn with_slots(back: T, middle: T, front: T) -> Self {
        let shared = Arc::new(Shared {
            arena: SlotArena::new(back, middle, front),
            coordinator: C::new(),
        });

        tracing::debug!(
            backend = C::NAME,
            slot_size = std::mem::size_of::<T>(),
            "triple buffer allocated"
        );

        Self {
            producer: Producer::new(Arc::clone(&shared), SlotIndex::INITIAL_BACK),
            consumer: Consumer::new(shared, SlotIndex::INITIAL_FRONT),
        }
    }

    /// Name of the coordinator backend.
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &'static str {
        C::NAME
    }

    /// Producer side: exclusive access to the back slot.
    ///
    /// See [`Producer::write`].
    #[inline]
    pub fn write(&mut self) -> WriteGuard<'_, T, C> {
        self.producer.write()
    }

    /// Producer side: publishes the back slot.
    ///
    /// See [`Producer::commit`].
    #[inline]
    pub fn commit(&mut self) {
        self.producer.commit();
    }

    /// Consumer side: the latest committed value and whether it is new.
    ///
    /// See [`Consumer::read`].
    #[inline]
    pub fn read(&mut self) -> (&T, bool) {
        self.consumer.read()
    }

    /// Splits into the producer and consumer halves.
    ///
    /// Each half is `Send` and can move to its own thread. The slots are
    /// released when both halves are dropped.
    #[must_use]
    pub fn split(self) -> (Producer<T, C>, Consumer<T, C>) {
        tracing::trace!(backend = C::NAME, "triple buffer split");
        (self.producer, self.consumer)
    }
}
