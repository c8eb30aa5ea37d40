//! # Lock-Free Coordinator
//!
//! One atomic byte holds the middle slot index and the dirty bit. Commit is a
//! single `AcqRel` swap. Read is a relaxed load, plus one `AcqRel` swap only
//! when the dirty bit is set.
//!
//! ## Ordering
//!
//! - The release half of the producer's swap publishes its writes into the
//!   committed slot; the acquire half of the consumer's claiming swap makes
//!   them visible before the slot is read.
//! - The acquire half of the producer's swap pairs with the release half of
//!   the consumer's claiming swap, so a slot handed back by the consumer is
//!   never rewritten while the consumer may still be reading it.
//!
//! Both swaps stay `AcqRel` on every target. A relaxed swap would let the
//! producer reuse a slot before the consumer's release of it is visible.
//!
//! The dirty-bit check in [`Coordinator::claim`] may be relaxed: it only
//! decides whether to swap, and the swap itself carries the ordering.

use std::sync::atomic::{AtomicU8, Ordering};

use crossbeam_utils::CachePadded;

use super::{private, Coordinator};
use crate::arena::SlotIndex;
use crate::word::{AtomicWord, HandoffWord};

/// Lock-free coordinator over an [`AtomicWord`].
///
/// `W` defaults to [`AtomicU8`]. Model checkers plug in an instrumented word.
pub struct LockFree<W: AtomicWord = AtomicU8> {
    /// Middle slot index and dirty bit, on its own cache line.
    word: CachePadded<W>,
}

impl<W: AtomicWord> private::Sealed for LockFree<W> {}

impl<W: AtomicWord> Coordinator for LockFree<W> {
    const NAME: &'static str = "lock_free";

    type Cell<T> = W::Cell<T>;

    #[inline]
    fn new() -> Self {
        Self {
            word: CachePadded::new(W::new(
                HandoffWord::clean(SlotIndex::INITIAL_MIDDLE).bits(),
            )),
        }
    }

    #[inline]
    fn commit(&self, back: SlotIndex) -> SlotIndex {
        let previous = self
            .word
            .swap(HandoffWord::dirty(back).bits(), Ordering::AcqRel);
        HandoffWord::from_bits(previous).index()
    }

    #[inline]
    fn claim(&self, front: SlotIndex) -> Option<SlotIndex> {
        if !self.is_dirty() {
            return None;
        }

        let previous = HandoffWord::from_bits(
            self.word
                .swap(HandoffWord::clean(front).bits(), Ordering::AcqRel),
        );
        // Only the consumer clears the bit, so it is still set.
        debug_assert!(previous.is_dirty());
        Some(previous.index())
    }

    #[inline]
    fn is_dirty(&self) -> bool {
        HandoffWord::from_bits(self.word.load(Ordering::Relaxed)).is_dirty()
    }
}
