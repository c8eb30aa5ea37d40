//! # Mutex Coordinator
//!
//! Reference backend: the middle index and the dirty flag behind one
//! `parking_lot` mutex. Externally indistinguishable from [`LockFree`], and
//! the critical section is a couple of field swaps.
//!
//! [`LockFree`]: super::LockFree

use std::cell::UnsafeCell;
use std::mem;

use parking_lot::Mutex;

use super::{private, Coordinator};
use crate::arena::SlotIndex;

/// State guarded by the lock.
struct MiddleState {
    middle: SlotIndex,
    dirty: bool,
}

/// Mutex-protected coordinator.
pub struct Locked {
    state: Mutex<MiddleState>,
}

impl private::Sealed for Locked {}

impl Coordinator for Locked {
    const NAME: &'static str = "mutex";

    type Cell<T> = UnsafeCell<T>;

    fn new() -> Self {
        Self {
            state: Mutex::new(MiddleState {
                middle: SlotIndex::INITIAL_MIDDLE,
                dirty: false,
            }),
        }
    }

    fn commit(&self, back: SlotIndex) -> SlotIndex {
        let mut state = self.state.lock();
        state.dirty = true;
        mem::replace(&mut state.middle, back)
    }

    fn claim(&self, front: SlotIndex) -> Option<SlotIndex> {
        let mut state = self.state.lock();
        if !state.dirty {
            return None;
        }
        state.dirty = false;
        Some(mem::replace(&mut state.middle, front))
    }

    fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }
}
