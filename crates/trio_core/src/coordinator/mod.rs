//! # Coordinators
//!
//! A coordinator decides which slot holds the middle role and whether it
//! carries an unobserved commit. The producer and consumer each keep their
//! own slot index; the coordinator trades it for the middle one.
//!
//! ```text
//!   commit(back)  ──► old middle becomes back,  back becomes middle (dirty)
//!   claim(front)  ──► if dirty: old middle becomes front, front becomes middle (clean)
//!                     else:     nothing moves
//! ```
//!
//! Two backends ship with the crate:
//!
//! - [`LockFree`]: one atomic word, generic over [`AtomicWord`](crate::AtomicWord)
//! - [`Locked`]: a `parking_lot` mutex around the same state, used as a
//!   reference implementation and as a portable fallback

mod lock_free;
mod locked;

pub use lock_free::LockFree;
pub use locked::Locked;

use crate::arena::{SlotCell, SlotIndex};

mod private {
    /// Prevents coordinators outside this crate.
    pub trait Sealed {}
}

/// Role rotation protocol shared by every backend.
///
/// The trait is sealed: the slot indices it hands back are what keeps the
/// producer and consumer off each other's slot, so only the backends in this
/// crate implement it. Swap the atomic primitive through
/// [`AtomicWord`](crate::AtomicWord) instead.
pub trait Coordinator: private::Sealed + Send + Sync {
    /// Backend name, for logs and benchmark labels.
    const NAME: &'static str;

    /// Slot storage used by buffers built on this backend.
    type Cell<T>: SlotCell<T>;

    /// Creates the coordinator with slot 1 in the middle role and no pending
    /// commit.
    fn new() -> Self;

    /// Publishes `back` as the new middle slot and returns the slot the
    /// producer now owns.
    ///
    /// Never fails. Any commit not yet claimed by the consumer is superseded.
    fn commit(&self, back: SlotIndex) -> SlotIndex;

    /// Trades `front` for the middle slot if it holds an unobserved commit.
    ///
    /// Returns the new front slot, or `None` when nothing was committed since
    /// the last successful claim.
    fn claim(&self, front: SlotIndex) -> Option<SlotIndex>;

    /// Whether a commit is waiting to be claimed.
    fn is_dirty(&self) -> bool;
}
