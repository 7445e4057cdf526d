//! Storage for the leaf scalars of a container.
//!
//! A buffer is a flat block of leaf values with no knowledge of the logical
//! shape laid over it; the owning container pairs it with a length and an
//! extent chain. Fixed-size chains live inline (on the stack when the
//! container does), dynamically-sized storage lives on the heap, and
//! [`UninitBuffer`] decouples allocation from element lifetime for growable
//! containers.

use std::mem::MaybeUninit;

use crate::errors::ReserveError;

/// A flat block of leaf values.
pub trait Buffer {
    /// Type of the stored leaf values.
    type Elem;

    /// Buffer kind obtained by wrapping a fixed dimension of size `M`
    /// around this one.
    ///
    /// Fixed chains stay inline; heap buffers absorb the extra dimension
    /// into the same allocation.
    type WithDim<const M: usize>: Buffer<Elem = Self::Elem>;

    /// Create a buffer of `len` default-constructed values.
    fn allocate(len: usize) -> Self
    where
        Self::Elem: Default;

    /// Create a new buffer holding clones of the first `len` values.
    fn duplicate(&self, len: usize) -> Self
    where
        Self::Elem: Clone;

    /// Pointer to the first value.
    fn as_ptr(&self) -> *const Self::Elem;

    /// Mutable pointer to the first value.
    fn as_mut_ptr(&mut self) -> *mut Self::Elem;
}

/// Inline storage for a single leaf value. The unit of a fixed chain.
#[repr(transparent)]
#[derive(Clone, Debug)]
pub struct LeafBuffer<T>(T);

impl<T> LeafBuffer<T> {
    pub(crate) fn new(value: T) -> LeafBuffer<T> {
        LeafBuffer(value)
    }

    pub(crate) fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Buffer for LeafBuffer<T> {
    type Elem = T;
    type WithDim<const M: usize> = FixedBuffer<LeafBuffer<T>, M>;

    fn allocate(len: usize) -> Self
    where
        T: Default,
    {
        debug_assert_eq!(len, 1);
        LeafBuffer(T::default())
    }

    fn duplicate(&self, len: usize) -> Self
    where
        T: Clone,
    {
        debug_assert_eq!(len, 1);
        LeafBuffer(self.0.clone())
    }

    fn as_ptr(&self) -> *const T {
        &self.0
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        &mut self.0
    }
}

/// Inline storage for a compile-time number of inner buffers.
///
/// The whole chain is `repr(transparent)` down to the leaf type, so a
/// nested `FixedBuffer<FixedBuffer<LeafBuffer<T>, N>, M>` is one contiguous
/// block of `M * N` values of `T`.
#[repr(transparent)]
#[derive(Clone, Debug)]
pub struct FixedBuffer<B, const N: usize>([B; N]);

impl<B, const N: usize> FixedBuffer<B, N> {
    pub(crate) fn from_parts(parts: [B; N]) -> FixedBuffer<B, N> {
        FixedBuffer(parts)
    }

    pub(crate) fn into_parts(self) -> [B; N] {
        self.0
    }
}

impl<B: Buffer, const N: usize> Buffer for FixedBuffer<B, N> {
    type Elem = B::Elem;
    type WithDim<const M: usize> = FixedBuffer<FixedBuffer<B, N>, M>;

    fn allocate(len: usize) -> Self
    where
        B::Elem: Default,
    {
        FixedBuffer(std::array::from_fn(|_| B::allocate(len / N)))
    }

    fn duplicate(&self, len: usize) -> Self
    where
        B::Elem: Clone,
    {
        FixedBuffer(std::array::from_fn(|i| self.0[i].duplicate(len / N)))
    }

    fn as_ptr(&self) -> *const B::Elem {
        // Safety: the chain is `repr(transparent)` down to `Elem`.
        self.0.as_ptr() as *const B::Elem
    }

    fn as_mut_ptr(&mut self) -> *mut B::Elem {
        self.0.as_mut_ptr() as *mut B::Elem
    }
}

/// Heap storage, allocated once at construction.
#[derive(Clone, Debug)]
pub struct HeapBuffer<T>(Box<[T]>);

impl<T> HeapBuffer<T> {
    /// Create a buffer with no storage.
    pub(crate) fn empty() -> HeapBuffer<T> {
        HeapBuffer(Vec::new().into_boxed_slice())
    }
}

impl<T> Buffer for HeapBuffer<T> {
    type Elem = T;

    // An extra fixed dimension just scales the allocation size.
    type WithDim<const M: usize> = HeapBuffer<T>;

    fn allocate(len: usize) -> Self
    where
        T: Default,
    {
        HeapBuffer((0..len).map(|_| T::default()).collect())
    }

    fn duplicate(&self, len: usize) -> Self
    where
        T: Clone,
    {
        debug_assert!(len <= self.0.len());
        HeapBuffer(self.0[..len].iter().cloned().collect())
    }

    fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }
}

/// Heap storage whose slots are allocated but not initialized.
///
/// The owner tracks which prefix of the slots holds live values and is
/// responsible for dropping them; dropping the buffer only releases the
/// allocation.
pub struct UninitBuffer<T> {
    data: Box<[MaybeUninit<T>]>,
}

impl<T> UninitBuffer<T> {
    /// Allocate `len` uninitialized slots.
    pub fn allocate(len: usize) -> UninitBuffer<T> {
        let mut data = Vec::with_capacity(len);
        // Safety: `MaybeUninit` does not require initialization.
        unsafe { data.set_len(len) };
        UninitBuffer {
            data: data.into_boxed_slice(),
        }
    }

    /// Fallible version of [`allocate`](UninitBuffer::allocate).
    pub fn try_allocate(len: usize) -> Result<UninitBuffer<T>, ReserveError> {
        let mut data: Vec<MaybeUninit<T>> = Vec::new();
        data.try_reserve_exact(len).map_err(|_| ReserveError {})?;
        // Safety: `MaybeUninit` does not require initialization.
        unsafe { data.set_len(len) };
        Ok(UninitBuffer {
            data: data.into_boxed_slice(),
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr() as *const T
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr() as *mut T
    }
}

#[cfg(test)]
mod tests {
    use super::{Buffer, FixedBuffer, HeapBuffer, LeafBuffer, UninitBuffer};

    #[test]
    fn test_fixed_chain_is_contiguous() {
        type Chain = FixedBuffer<FixedBuffer<LeafBuffer<i32>, 3>, 2>;
        let buf = Chain::allocate(6);
        let ptr = buf.as_ptr();
        for i in 0..6 {
            // Safety: 6 values allocated above.
            assert_eq!(unsafe { *ptr.add(i) }, 0);
        }
        assert_eq!(
            std::mem::size_of::<Chain>(),
            6 * std::mem::size_of::<i32>()
        );
    }

    #[test]
    fn test_heap_duplicate() {
        let mut buf = HeapBuffer::<i32>::allocate(4);
        // Safety: 4 values allocated above.
        unsafe {
            for i in 0..4 {
                *buf.as_mut_ptr().add(i) = i as i32;
            }
        }
        let copy = buf.duplicate(4);
        assert_ne!(buf.as_ptr(), copy.as_ptr());
        for i in 0..4 {
            assert_eq!(unsafe { *copy.as_ptr().add(i) }, i as i32);
        }
    }

    #[test]
    fn test_uninit_allocate() {
        let buf = UninitBuffer::<String>::allocate(8);
        assert_eq!(buf.len(), 8);

        let buf = UninitBuffer::<String>::try_allocate(8).unwrap();
        assert_eq!(buf.len(), 8);
    }
}
