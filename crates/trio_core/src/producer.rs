//! # Producer Half
//!
//! Owns the back slot. Writes go straight into it with no synchronization;
//! [`Producer::commit`] trades it for the middle slot.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::arena::SlotIndex;
use crate::coordinator::{Coordinator, LockFree};
use crate::trio::Shared;

/// Producer side of a triple buffer.
///
/// There is exactly one per buffer, and every operation takes `&mut self`,
/// so a second concurrent producer cannot exist.
///
/// `Send` when `T: Send`, and `Sync` only when `T` is also `Sync`.
pub struct Producer<T, C: Coordinator = LockFree> {
    shared: Arc<Shared<T, C>>,
    back: SlotIndex,
    // The arena is `Sync` for any `T: Send`; this keeps shared borrows of a
    // half from leaking `&T` to other threads unless `T: Sync`.
    _value: PhantomData<T>,
}

impl<T, C: Coordinator> Producer<T, C> {
    pub(crate) fn new(shared: Arc<Shared<T, C>>, back: SlotIndex) -> Self {
        Self {
            shared,
            back,
            _value: PhantomData,
        }
    }

    /// Opens the back slot for writing.
    ///
    /// The slot still holds whatever it held when the producer last received
    /// it: a value committed two or more commits ago, or an initial value.
    /// Overwrite it or update it in place, then call [`WriteGuard::commit`].
    ///
    /// The guard borrows the producer, so no reference into the back slot can
    /// survive the commit that hands the slot away.
    #[inline]
    pub fn write(&mut self) -> WriteGuard<'_, T, C> {
        WriteGuard { producer: self }
    }

    /// Publishes the back slot as the latest value.
    ///
    /// Never blocks with the lock-free backend. If the consumer has not read
    /// since the previous commit, that value is superseded and never
    /// observed.
    #[inline]
    pub fn commit(&mut self) {
        self.back = self.shared.coordinator.commit(self.back);
    }

    /// Overwrites the back slot with `value` and commits it.
    #[inline]
    pub fn publish(&mut self, value: T) {
        *self.back_mut() = value;
        self.commit();
    }

    /// Whether the consumer has claimed the most recent commit.
    ///
    /// Also true before the first commit.
    #[inline]
    #[must_use]
    pub fn consumed(&self) -> bool {
        !self.shared.coordinator.is_dirty()
    }

    #[inline]
    fn back_ref(&self) -> &T {
        // SAFETY: the producer holds the back role for `self.back`.
        unsafe { self.shared.arena.get(self.back) }
    }

    #[inline]
    fn back_mut(&mut self) -> &mut T {
        // SAFETY: the producer holds the back role for `self.back`, and the
        // returned borrow ties up `&mut self` until it ends, so no commit
        // can give the slot away meanwhile.
        unsafe { self.shared.arena.get_mut(self.back) }
    }
}

/// Write access to the back slot.
///
/// Dereferences to the value. Consume it with [`WriteGuard::commit`] to
/// publish; dropping it instead keeps the changes in the back slot, where
/// a later commit still publishes them.
#[must_use = "writes are not visible to the consumer until committed"]
pub struct WriteGuard<'a, T, C: Coordinator = LockFree> {
    producer: &'a mut Producer<T, C>,
}

impl<T, C: Coordinator> WriteGuard<'_, T, C> {
    /// Publishes the written value. Equivalent to [`Producer::commit`].
    #[inline]
    pub fn commit(self) {
        self.producer.commit();
    }
}

impl<T, C: Coordinator> Deref for WriteGuard<'_, T, C> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.producer.back_ref()
    }
}

impl<T, C: Coordinator> DerefMut for WriteGuard<'_, T, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        self.producer.back_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Locked, Trio};

    #[test]
    fn test_guard_commit_publishes() {
        let (mut producer, mut consumer) = Trio::<Vec<u8>>::new().split();

        let mut slot = producer.write();
        slot.clear();
        slot.extend_from_slice(b"frame");
        slot.commit();

        assert_eq!(consumer.read(), (&b"frame".to_vec(), true));
    }

    #[test]
    fn test_dropped_guard_keeps_pending_write() {
        let (mut producer, mut consumer) = Trio::<u32, Locked>::new().split();

        {
            let mut slot = producer.write();
            *slot = 3;
        }
        assert_eq!(consumer.read(), (&0, false));

        producer.commit();
        assert_eq!(consumer.read(), (&3, true));
    }

    #[test]
    fn test_consumed_tracks_claims() {
        let (mut producer, mut consumer) = Trio::<u32>::new().split();
        assert!(producer.consumed());

        producer.publish(1);
        assert!(!producer.consumed());

        let _ = consumer.read();
        assert!(producer.consumed());
    }

    #[test]
    fn test_back_slot_holds_stale_value_after_commit() {
        let (mut producer, mut consumer) = Trio::<u32>::with_slots(10, 20, 30).split();
        producer.publish(1);
        let _ = consumer.read();
        producer.publish(2);
        let _ = consumer.read();
        // The slot the consumer released on its first claim.
        assert_eq!(*producer.write(), 30);
    }
}
