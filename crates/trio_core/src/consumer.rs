//! # Consumer Half
//!
//! Owns the front slot. [`Consumer::read`] claims the middle slot when it
//! holds a new commit, and otherwise returns the front slot as it was.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::sync::Arc;

use crate::arena::SlotIndex;
use crate::coordinator::{Coordinator, LockFree};
use crate::trio::Shared;

/// Consumer side of a triple buffer.
///
/// There is exactly one per buffer, and [`read`](Consumer::read) takes
/// `&mut self`, so a second concurrent consumer cannot exist.
///
/// [`peek`](Consumer::peek) hands out `&T` through `&self`, so the consumer is
/// `Sync` only when `T` is:
///
/// ```compile_fail
/// use std::cell::Cell;
/// use trio_core::Consumer;
///
/// fn assert_sync<S: Sync>() {}
/// assert_sync::<Consumer<Cell<u64>>>();
/// ```
pub struct Consumer<T, C: Coordinator = LockFree> {
    shared: Arc<Shared<T, C>>,
    front: SlotIndex,
    // See `Producer`: `Sync` must follow `T`, not the arena.
    _value: PhantomData<T>,
}

impl<T, C: Coordinator> Consumer<T, C> {
    pub(crate) fn new(shared: Arc<Shared<T, C>>, front: SlotIndex) -> Self {
        Self {
            shared,
            front,
            _value: PhantomData,
        }
    }

    /// Returns the latest committed value, and whether it was committed since
    /// the previous `read`.
    ///
    /// When nothing new was committed this is one relaxed load (lock-free
    /// backend) and the front value is returned unchanged. Otherwise the
    /// middle slot is claimed as the new front.
    ///
    /// The reference is valid until the next `read`.
    #[inline]
    pub fn read(&mut self) -> (&T, bool) {
        let changed = match self.shared.coordinator.claim(self.front) {
            Some(front) => {
                self.front = front;
                true
            }
            None => false,
        };
        (self.front_ref(), changed)
    }

    /// The front value, without checking for a newer commit.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> &T {
        self.front_ref()
    }

    /// Whether a commit is waiting to be claimed by [`read`](Consumer::read).
    #[inline]
    #[must_use]
    pub fn updated(&self) -> bool {
        self.shared.coordinator.is_dirty()
    }

    #[inline]
    fn front_ref(&self) -> &T {
        // SAFETY: the consumer holds the front role for `self.front`; the
        // producer never touches a slot in that role.
        unsafe { self.shared.arena.get(self.front) }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Locked, Trio};

    #[test]
    fn test_stale_read_repeats_value() {
        let (mut producer, mut consumer) = Trio::<u32>::new().split();
        producer.publish(4);

        assert_eq!(consumer.read(), (&4, true));
        assert_eq!(consumer.read(), (&4, false));
        assert_eq!(consumer.read(), (&4, false));
    }

    #[test]
    fn test_only_last_commit_is_observed() {
        let (mut producer, mut consumer) = Trio::<u32, Locked>::new().split();
        for i in 1..=5 {
            producer.publish(i);
        }
        assert_eq!(consumer.read(), (&5, true));
        assert_eq!(consumer.read(), (&5, false));
    }

    #[test]
    fn test_updated_and_peek_do_not_claim() {
        let (mut producer, mut consumer) = Trio::<u32>::with_front(1).split();
        producer.publish(2);

        assert!(consumer.updated());
        assert_eq!(*consumer.peek(), 1);
        assert!(consumer.updated());

        assert_eq!(consumer.read(), (&2, true));
        assert!(!consumer.updated());
        assert_eq!(*consumer.peek(), 2);
    }
}
