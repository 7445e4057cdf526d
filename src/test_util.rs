//! Utilities to simplify testing of containers.

use std::cell::Cell;

thread_local! {
    static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    static LIVE: Cell<usize> = const { Cell::new(0) };
    static PANIC_ON_CLONE_OF: Cell<Option<i32>> = const { Cell::new(None) };
}

/// Leaf element that counts constructions and drops on the current thread.
///
/// Used to verify that containers construct and destroy elements exactly
/// as often as they should.
#[derive(Debug, PartialEq)]
pub struct Counted(pub i32);

impl Counted {
    pub fn new(value: i32) -> Counted {
        CONSTRUCTED.with(|c| c.set(c.get() + 1));
        LIVE.with(|c| c.set(c.get() + 1));
        Counted(value)
    }

    /// Reset the counters for the current thread.
    pub fn reset() {
        CONSTRUCTED.with(|c| c.set(0));
        LIVE.with(|c| c.set(0));
        PANIC_ON_CLONE_OF.with(|c| c.set(None));
    }

    /// Total constructions (including clones) since the last reset.
    pub fn constructed() -> usize {
        CONSTRUCTED.with(|c| c.get())
    }

    /// Values currently alive.
    pub fn live() -> usize {
        LIVE.with(|c| c.get())
    }

    /// Make the next clones of a value equal to `value` panic.
    pub fn panic_on_clone_of(value: i32) {
        PANIC_ON_CLONE_OF.with(|c| c.set(Some(value)));
    }
}

impl Clone for Counted {
    fn clone(&self) -> Counted {
        if PANIC_ON_CLONE_OF.with(|c| c.get()) == Some(self.0) {
            panic!("clone of {} failed", self.0);
        }
        Counted::new(self.0)
    }
}

impl Default for Counted {
    fn default() -> Counted {
        Counted::new(0)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        LIVE.with(|c| c.set(c.get() - 1));
    }
}

crate::leaf_element!(Counted);
