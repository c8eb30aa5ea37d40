//! Instrumented hand-off word and slot cell for loom model checking.
//!
//! Pairing the loom atomic with `loom::cell::UnsafeCell` lets the model
//! checker see both sides of every hand-off: the ordering on the word, and
//! the slot reads and writes it is supposed to separate.

#![allow(unsafe_code)]

use std::sync::atomic::Ordering;

use loom::cell::UnsafeCell;
use loom::sync::atomic::AtomicU8;

use crate::arena::SlotCell;
use crate::word::AtomicWord;

// SAFETY: loom's cell owns its value like the std one. Access is recorded when
// the pointer is taken, which is where a slot changes hands.
unsafe impl<T> SlotCell<T> for UnsafeCell<T> {
    fn new(value: T) -> Self {
        UnsafeCell::new(value)
    }

    fn as_ptr(&self) -> *const T {
        self.with(|ptr| ptr)
    }

    fn as_mut_ptr(&self) -> *mut T {
        self.with_mut(|ptr| ptr)
    }
}

// SAFETY: loom atomics model a single atomic location and honour orderings.
unsafe impl AtomicWord for AtomicU8 {
    type Cell<T> = UnsafeCell<T>;

    fn new(bits: u8) -> Self {
        AtomicU8::new(bits)
    }

    fn load(&self, order: Ordering) -> u8 {
        AtomicU8::load(self, order)
    }

    fn swap(&self, bits: u8, order: Ordering) -> u8 {
        AtomicU8::swap(self, bits, order)
    }
}
