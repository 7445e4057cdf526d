//! Iterators over the elements of a container or view.
//!
//! One iterator pair serves every container kind. The representation is a
//! base pointer, the element extent and a `start..end` index range;
//! positions are counted and compared by index, never by pointer, so
//! elements with a zero stride (an inner dimension of size zero) still
//! yield one position per outer slot.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::element::Element;
use crate::extent::Extent;

/// Iterator over shared references to the elements of a container.
pub struct Iter<'a, E: Element> {
    base: *const E::Base,
    extent: E::Extent,
    start: usize,
    end: usize,
    _marker: PhantomData<(&'a E, &'a [E::Base])>,
}

impl<'a, E: Element> Iter<'a, E> {
    /// Create an iterator over `len` elements starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to `len * extent.stride()` leaf values valid for
    /// reads, and unaliased by writes, for `'a`.
    pub(crate) unsafe fn new(base: *const E::Base, extent: E::Extent, len: usize) -> Iter<'a, E> {
        Iter {
            base,
            extent,
            start: 0,
            end: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, E: Element> Iterator for Iter<'a, E> {
    type Item = E::Ref<'a>;

    fn next(&mut self) -> Option<E::Ref<'a>> {
        if self.start == self.end {
            return None;
        }
        let offset = self.start * self.extent.stride();
        self.start += 1;
        // Safety: index was in range, so the element is within the block
        // the iterator was created over.
        Some(unsafe { E::make_ref(self.base.add(offset), self.extent) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<E::Ref<'a>> {
        if n >= self.end - self.start {
            self.start = self.end;
            return None;
        }
        self.start += n;
        self.next()
    }
}

impl<'a, E: Element> DoubleEndedIterator for Iter<'a, E> {
    fn next_back(&mut self) -> Option<E::Ref<'a>> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // Safety: as in `next`.
        Some(unsafe { E::make_ref(self.base.add(self.end * self.extent.stride()), self.extent) })
    }
}

impl<'a, E: Element> ExactSizeIterator for Iter<'a, E> {}
impl<'a, E: Element> FusedIterator for Iter<'a, E> {}

impl<'a, E: Element> Clone for Iter<'a, E> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

// Safety: same rules as std slice iterators.
unsafe impl<'a, E: Element> Send for Iter<'a, E> where E::Base: Sync {}
unsafe impl<'a, E: Element> Sync for Iter<'a, E> where E::Base: Sync {}

/// Iterator over mutable references to the elements of a container.
pub struct IterMut<'a, E: Element> {
    base: *mut E::Base,
    extent: E::Extent,
    start: usize,
    end: usize,
    _marker: PhantomData<(&'a E, &'a mut [E::Base])>,
}

impl<'a, E: Element> IterMut<'a, E> {
    /// Create an iterator over `len` elements starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to `len * extent.stride()` leaf values valid for
    /// reads and writes for `'a`, not accessed through any other pointer
    /// during `'a`.
    pub(crate) unsafe fn new(base: *mut E::Base, extent: E::Extent, len: usize) -> IterMut<'a, E> {
        IterMut {
            base,
            extent,
            start: 0,
            end: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, E: Element> Iterator for IterMut<'a, E> {
    type Item = E::RefMut<'a>;

    fn next(&mut self) -> Option<E::RefMut<'a>> {
        if self.start == self.end {
            return None;
        }
        let offset = self.start * self.extent.stride();
        self.start += 1;
        // Safety: index was in range, and the iterator hands out each
        // element at most once, so the references are disjoint.
        Some(unsafe { E::make_mut(self.base.add(offset), self.extent) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<E::RefMut<'a>> {
        if n >= self.end - self.start {
            self.start = self.end;
            return None;
        }
        self.start += n;
        self.next()
    }
}

impl<'a, E: Element> DoubleEndedIterator for IterMut<'a, E> {
    fn next_back(&mut self) -> Option<E::RefMut<'a>> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // Safety: as in `next`.
        Some(unsafe { E::make_mut(self.base.add(self.end * self.extent.stride()), self.extent) })
    }
}

impl<'a, E: Element> ExactSizeIterator for IterMut<'a, E> {}
impl<'a, E: Element> FusedIterator for IterMut<'a, E> {}

// Safety: same rules as std slice iterators.
unsafe impl<'a, E: Element> Send for IterMut<'a, E> where E::Base: Send {}
unsafe impl<'a, E: Element> Sync for IterMut<'a, E> where E::Base: Sync {}

#[cfg(test)]
mod tests {
    use crate::dynarray::DynArray;
    use crate::element::InnerDynArray;

    #[test]
    fn test_iter_counts_positions_not_pointers() {
        // Rows of length zero have stride zero, so every row starts at the
        // same address. Iteration must still visit each row once.
        let rows = DynArray::<InnerDynArray<i32>>::new(&[10, 0]);
        let iter = rows.iter();
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.count(), 10);
        for row in rows.iter() {
            assert!(row.is_empty());
        }
    }

    #[test]
    fn test_iter_rev_and_nth() {
        let mut a = DynArray::<i32>::new(&[5]);
        for (i, x) in a.iter_mut().enumerate() {
            *x = i as i32;
        }

        let rev: Vec<i32> = a.iter().rev().copied().collect();
        assert_eq!(rev, [4, 3, 2, 1, 0]);

        let mut iter = a.iter();
        assert_eq!(iter.nth(3), Some(&3));
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next(), None);
        // Fused after exhaustion.
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_mut_disjoint_writes() {
        let mut grid = DynArray::<InnerDynArray<i32>>::new(&[3, 2]);
        let mut v = 0;
        for row in grid.iter_mut() {
            for x in row {
                *x = v;
                v += 1;
            }
        }
        assert_eq!(grid.as_slice(), &[0, 1, 2, 3, 4, 5]);
    }
}
