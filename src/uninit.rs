//! Helpers for constructing and destroying leaf values in raw storage.

use std::ptr;

/// Clone `len` values from `src` into the uninitialized slots at `dst`.
///
/// If a clone panics, the slots already written are dropped before the
/// panic continues.
///
/// # Safety
///
/// `src` must point to `len` live values, `dst` to `len` allocated
/// uninitialized slots, and the two ranges must not overlap.
pub(crate) unsafe fn clone_to_uninit<T: Clone>(src: *const T, dst: *mut T, len: usize) {
    struct Guard<T> {
        dst: *mut T,
        initialized: usize,
    }

    impl<T> Drop for Guard<T> {
        fn drop(&mut self) {
            // Safety: the first `initialized` slots hold live values.
            unsafe { drop_in_place_n(self.dst, self.initialized) };
        }
    }

    let mut guard = Guard { dst, initialized: 0 };
    for i in 0..len {
        unsafe { dst.add(i).write((*src.add(i)).clone()) };
        guard.initialized += 1;
    }
    std::mem::forget(guard);
}

/// Clone-assign `len` values from `src` over the live values at `dst`.
///
/// # Safety
///
/// `src` must point to `len` live values, `dst` to `len` live values, and
/// the two ranges must not overlap.
pub(crate) unsafe fn clone_assign<T: Clone>(src: *const T, dst: *mut T, len: usize) {
    for i in 0..len {
        unsafe { (*dst.add(i)).clone_from(&*src.add(i)) };
    }
}

/// Drop the `len` live values starting at `ptr`.
///
/// # Safety
///
/// `ptr` must point to `len` live values not accessed again afterwards.
pub(crate) unsafe fn drop_in_place_n<T>(ptr: *mut T, len: usize) {
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, len)) };
}

#[cfg(test)]
mod tests {
    use std::mem::MaybeUninit;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::clone_to_uninit;
    use crate::test_util::Counted;

    #[test]
    fn test_clone_to_uninit() {
        let src = vec![1i32, 2, 3];
        let mut dst = [MaybeUninit::<i32>::uninit(); 3];
        // Safety: 3 live values in `src`, 3 slots in `dst`.
        unsafe { clone_to_uninit(src.as_ptr(), dst.as_mut_ptr() as *mut i32, 3) };
        for (i, slot) in dst.iter().enumerate() {
            assert_eq!(unsafe { slot.assume_init() }, src[i]);
        }
    }

    #[test]
    fn test_clone_to_uninit_drops_on_panic() {
        Counted::reset();
        let src: Vec<Counted> = (0..4).map(Counted::new).collect();
        let mut dst: Vec<MaybeUninit<Counted>> = Vec::with_capacity(4);
        unsafe { dst.set_len(4) };

        Counted::panic_on_clone_of(2);
        let result = catch_unwind(AssertUnwindSafe(|| {
            // Safety: 4 live values in `src`, 4 slots in `dst`.
            unsafe { clone_to_uninit(src.as_ptr(), dst.as_mut_ptr() as *mut Counted, 4) };
        }));
        assert!(result.is_err());

        // The two clones made before the panic were dropped by the guard.
        assert_eq!(Counted::live(), 4);

        unsafe { dst.set_len(0) };
        drop(src);
        assert_eq!(Counted::live(), 0);
    }
}
