//! # Slot Arena
//!
//! Three cache-padded storage cells, allocated once and never resized.
//!
//! The arena knows nothing about roles. Which slot is back, middle or front is
//! decided by the coordinator; the arena only hands out references by index.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::marker::PhantomData;

use crossbeam_utils::CachePadded;

/// Mask selecting the slot index bits of a packed word.
pub(crate) const INDEX_MASK: u8 = 0b011;

/// Identity of one of the three slots.
///
/// The index space is closed: only `0`, `1` and `2` are ever constructed by
/// this crate, and every access through the arena is bounds-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Slot holding the back role at construction.
    pub const INITIAL_BACK: Self = Self(0);
    /// Slot holding the middle role at construction.
    pub const INITIAL_MIDDLE: Self = Self(1);
    /// Slot holding the front role at construction.
    pub const INITIAL_FRONT: Self = Self(2);

    /// Returns the position of this slot in the arena.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self(bits & INDEX_MASK)
    }

    #[inline]
    pub(crate) const fn bits(self) -> u8 {
        self.0
    }
}

/// Interior-mutable storage for one slot.
///
/// [`UnsafeCell`] in normal builds. Model checkers substitute a cell that
/// records every access, so a slot touched by both threads without a
/// happens-before edge is reported as a data race.
///
/// # Safety
///
/// The cell must own its value the way [`UnsafeCell`] does: the pointers it
/// returns stay valid for as long as `&self`, and the cell may be sent and
/// shared across threads whenever the value may be sent.
pub unsafe trait SlotCell<T> {
    /// Wraps a value.
    fn new(value: T) -> Self;

    /// Pointer for shared access. Counts as a read.
    fn as_ptr(&self) -> *const T;

    /// Pointer for exclusive access. Counts as a write.
    fn as_mut_ptr(&self) -> *mut T;
}

// SAFETY: forwards to the standard library cell.
unsafe impl<T> SlotCell<T> for UnsafeCell<T> {
    #[inline]
    fn new(value: T) -> Self {
        UnsafeCell::new(value)
    }

    #[inline]
    fn as_ptr(&self) -> *const T {
        UnsafeCell::get(self).cast_const()
    }

    #[inline]
    fn as_mut_ptr(&self) -> *mut T {
        UnsafeCell::get(self)
    }
}

/// Fixed storage for the three slots.
///
/// Each slot sits on its own cache line so the producer mutating its back
/// slot never invalidates the line the consumer is reading.
pub(crate) struct SlotArena<T, S> {
    slots: [CachePadded<S>; 3],
    _value: PhantomData<T>,
}

impl<T, S: SlotCell<T>> SlotArena<T, S> {
    /// Seeds the slots in arena order (initial back, middle, front).
    pub(crate) fn new(back: T, middle: T, front: T) -> Self {
        Self {
            slots: [
                CachePadded::new(S::new(back)),
                CachePadded::new(S::new(middle)),
                CachePadded::new(S::new(front)),
            ],
            _value: PhantomData,
        }
    }

    /// Shared access to a slot.
    ///
    /// # Safety
    ///
    /// The caller must hold the back or front role for `index`, so that no
    /// other thread can obtain a mutable reference to it.
    #[inline]
    pub(crate) unsafe fn get(&self, index: SlotIndex) -> &T {
        &*self.slots[index.get()].as_ptr()
    }

    /// Exclusive access to a slot.
    ///
    /// # Safety
    ///
    /// The caller must hold the back role for `index`, and must not let the
    /// reference outlive that role.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn get_mut(&self, index: SlotIndex) -> &mut T {
        &mut *self.slots[index.get()].as_mut_ptr()
    }
}

// SAFETY: the arena owns three `T`s; moving it moves them.
unsafe impl<T: Send, S: SlotCell<T>> Send for SlotArena<T, S> {}

// SAFETY: Slot access is partitioned by role. A slot is touched by exactly one
// thread while it holds the back or front role, and ownership moves across
// threads only through the coordinator's acquire-release hand-off.
unsafe impl<T: Send, S: SlotCell<T>> Sync for SlotArena<T, S> {}
