//! # Hand-off Word
//!
//! The single contended value of the lock-free backend: the index of the
//! middle slot packed with a dirty bit.
//!
//! ```text
//!   bit:   7 6 5 4 3 | 2     | 1 0
//!          (unused)  | DIRTY | middle slot index
//! ```

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::arena::{SlotCell, SlotIndex, INDEX_MASK};

/// Set by a commit, cleared by the read that claims the middle slot.
const DIRTY: u8 = 0b100;

/// Decoded view of a hand-off word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HandoffWord(u8);

impl HandoffWord {
    /// Word naming `index` as middle, already observed by the consumer.
    #[inline]
    pub(crate) const fn clean(index: SlotIndex) -> Self {
        Self(index.bits())
    }

    /// Word naming `index` as middle, holding an unobserved commit.
    #[inline]
    pub(crate) const fn dirty(index: SlotIndex) -> Self {
        Self(index.bits() | DIRTY)
    }

    #[inline]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self(bits & (INDEX_MASK | DIRTY))
    }

    #[inline]
    pub(crate) const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> SlotIndex {
        SlotIndex::from_bits(self.0)
    }

    #[inline]
    pub(crate) const fn is_dirty(self) -> bool {
        self.0 & DIRTY != 0
    }
}

/// Atomic byte capability the lock-free coordinator is built on.
///
/// The default implementation is [`AtomicU8`]. Model checkers substitute an
/// instrumented atomic to explore thread interleavings (see the `loom`
/// feature), together with an instrumented [`Cell`](AtomicWord::Cell) for the
/// slots so that races on slot contents are caught as well.
///
/// # Safety
///
/// Implementations must behave as a single atomic memory location: `swap` is
/// one indivisible read-modify-write, and both operations honour the memory
/// ordering they are given. The coordinator's role exclusivity, and with it
/// the absence of data races on slot contents, rests on this.
pub unsafe trait AtomicWord: Send + Sync {
    /// Slot storage paired with this word.
    type Cell<T>: SlotCell<T>;

    /// Creates the word with an initial value.
    fn new(bits: u8) -> Self;

    /// Loads the current value.
    fn load(&self, order: Ordering) -> u8;

    /// Stores `bits` and returns the previous value, atomically.
    fn swap(&self, bits: u8, order: Ordering) -> u8;
}

// SAFETY: forwards to the standard library atomic.
unsafe impl AtomicWord for AtomicU8 {
    type Cell<T> = UnsafeCell<T>;

    #[inline]
    fn new(bits: u8) -> Self {
        AtomicU8::new(bits)
    }

    #[inline]
    fn load(&self, order: Ordering) -> u8 {
        AtomicU8::load(self, order)
    }

    #[inline]
    fn swap(&self, bits: u8, order: Ordering) -> u8 {
        AtomicU8::swap(self, bits, order)
    }
}
