//! Growable containers.

use std::fmt;
use std::ptr;
use std::slice;

use crate::buffer::UninitBuffer;
use crate::dynarray::{DynArrayRef, DynArrayRefMut};
use crate::element::{Element, ElementSource};
use crate::errors::ReserveError;
use crate::extent::{Extent, Shape};
use crate::iter::{Iter, IterMut};
use crate::uninit::{clone_to_uninit, drop_in_place_n};

/// A container whose top dimension grows, with amortized-doubling
/// reallocation.
///
/// Size and capacity are independent: the buffer holds uninitialized slots
/// of which the first `len * stride` leaf values are live. Only the top
/// dimension grows; nested levels keep the shape fixed when the vector was
/// created, and every pushed element must match it.
pub struct Vector<E: Element> {
    buf: UninitBuffer<E::Base>,
    len: usize,
    cap: usize,
    extents: E::Extent,
}

impl<E: Element> Vector<E> {
    /// Create an empty vector. Dynamically-sized nested levels get size
    /// zero; use [`with_dims`](Vector::with_dims) to choose them.
    pub fn new() -> Vector<E> {
        Vector {
            buf: UninitBuffer::allocate(0),
            len: 0,
            cap: 0,
            extents: <E::Extent as Default>::default(),
        }
    }

    /// Create an empty vector of elements with the given dynamic sizes,
    /// outermost first.
    ///
    /// Panics if the number of sizes does not match the element type.
    pub fn with_dims(dims: &[usize]) -> Vector<E> {
        assert_eq!(
            dims.len(),
            <E::Extent as Extent>::DYN_DIMS,
            "wrong number of dimension sizes"
        );
        Vector {
            buf: UninitBuffer::allocate(0),
            len: 0,
            cap: 0,
            extents: E::Extent::from_dims(dims),
        }
    }

    /// Create an empty vector with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Vector<E> {
        let mut v = Vector::new();
        v.reserve(capacity);
        v
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Extent chain of one element.
    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    /// Sizes of every dimension, outermost first.
    pub fn shape(&self) -> Shape {
        let mut shape = Shape::new();
        shape.push(self.len);
        self.extents.collect_shape(&mut shape);
        shape
    }

    /// Grow the buffer to hold at least `capacity` elements. No-op if it
    /// already does.
    ///
    /// The vector is only modified once the new allocation has succeeded.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.cap {
            return;
        }
        let new_buf = UninitBuffer::allocate(capacity * self.extents.stride());
        self.adopt(new_buf, capacity);
    }

    /// Fallible version of [`reserve`](Vector::reserve).
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), ReserveError> {
        if capacity <= self.cap {
            return Ok(());
        }
        let new_buf = UninitBuffer::try_allocate(capacity * self.extents.stride())?;
        self.adopt(new_buf, capacity);
        Ok(())
    }

    /// Move the live leaf values into `new_buf` and make it the backing
    /// storage.
    fn adopt(&mut self, mut new_buf: UninitBuffer<E::Base>, capacity: usize) {
        // Relocation is a bitwise move; the old slots simply stop being
        // treated as live.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_mut_ptr(), self.live_leafs());
        }
        self.buf = new_buf;
        self.cap = capacity;
    }

    fn grow_amortized(&mut self, min_capacity: usize) {
        self.reserve(min_capacity.max(self.cap * 2));
    }

    fn live_leafs(&self) -> usize {
        self.len * self.extents.stride()
    }

    /// Append an element.
    ///
    /// Leaf values are moved in; container views and references are
    /// deep-copied. Panics if the element's shape does not match the
    /// vector's element shape.
    pub fn push_back<S: ElementSource<E>>(&mut self, source: S) {
        assert!(
            source.source_extent() == self.extents,
            "element shape mismatch"
        );
        if self.len == self.cap {
            self.grow_amortized(self.len + 1);
        }
        let stride = self.extents.stride();
        // Safety: the slot past the live prefix is allocated and
        // uninitialized.
        unsafe { source.move_to(self.buf.as_mut_ptr().add(self.len * stride)) };
        self.len += 1;
    }

    /// Remove the last element. Panics if the vector is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop from empty vector");
        self.len -= 1;
        let stride = self.extents.stride();
        // Safety: the popped element's leafs are live and no longer
        // reachable.
        unsafe { drop_in_place_n(self.buf.as_mut_ptr().add(self.len * stride), stride) };
    }

    /// Insert an element at `index`, shifting later elements up.
    ///
    /// Panics if `index > len` or the element's shape does not match.
    pub fn insert<S: ElementSource<E>>(&mut self, index: usize, source: S) {
        assert!(
            index <= self.len,
            "index {} out of range for length {}",
            index,
            self.len
        );
        assert!(
            source.source_extent() == self.extents,
            "element shape mismatch"
        );
        if self.len == self.cap {
            self.grow_amortized(self.len + 1);
        }
        let stride = self.extents.stride();
        // Construct into the spare slot at the end, then rotate it into
        // place. The rotation cannot panic, so no partially-initialized
        // gap is ever observable.
        unsafe { source.move_to(self.buf.as_mut_ptr().add(self.len * stride)) };
        self.len += 1;
        self.live_slice_mut()[index * stride..].rotate_right(stride);
    }

    /// Insert every element produced by `iter` at `index`, preserving
    /// their order.
    pub fn insert_from_iter<S, I>(&mut self, index: usize, iter: I)
    where
        S: ElementSource<E>,
        I: IntoIterator<Item = S>,
    {
        assert!(
            index <= self.len,
            "index {} out of range for length {}",
            index,
            self.len
        );
        let old_len = self.len;
        for source in iter {
            self.push_back(source);
        }
        let inserted = self.len - old_len;
        let stride = self.extents.stride();
        self.live_slice_mut()[index * stride..].rotate_right(inserted * stride);
    }

    /// Replace the contents with `count` copies of `value`, reusing the
    /// buffer when it is large enough.
    pub fn assign_n<S: ElementSource<E>>(&mut self, count: usize, value: S) {
        assert!(
            value.source_extent() == self.extents,
            "element shape mismatch"
        );
        self.clear();
        self.reserve(count);
        let stride = self.extents.stride();
        for _ in 0..count {
            // Safety: the slot past the live prefix is allocated and
            // uninitialized.
            unsafe { value.write_to(self.buf.as_mut_ptr().add(self.len * stride)) };
            self.len += 1;
        }
    }

    /// Replace the contents with the elements produced by `iter`.
    pub fn assign_iter<S, I>(&mut self, iter: I)
    where
        S: ElementSource<E>,
        I: IntoIterator<Item = S>,
    {
        self.clear();
        for source in iter {
            self.push_back(source);
        }
    }

    /// Remove all elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shorten the vector to `len` elements. No-op if it is already short
    /// enough.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let stride = self.extents.stride();
        let dropped = (self.len - len) * stride;
        self.len = len;
        // Safety: the tail leafs are live and no longer reachable.
        unsafe { drop_in_place_n(self.buf.as_mut_ptr().add(len * stride), dropped) };
    }

    /// Shrink the buffer to exactly the current length.
    pub fn shrink_to_fit(&mut self) {
        if self.cap == self.len {
            return;
        }
        let new_buf = UninitBuffer::allocate(self.live_leafs());
        let len = self.len;
        self.adopt(new_buf, len);
    }

    /// Borrow the live elements as a view.
    pub fn view(&self) -> DynArrayRef<'_, E> {
        // Safety: the live prefix holds `len` elements borrowed for `'_`.
        unsafe { DynArrayRef::from_raw_parts(self.buf.as_ptr(), self.len, self.extents) }
    }

    /// Mutably borrow the live elements as a view.
    ///
    /// The view cannot change the vector's length.
    pub fn view_mut(&mut self) -> DynArrayRefMut<'_, E> {
        // Safety: as `view`, and `&mut self` makes the borrow exclusive.
        unsafe { DynArrayRefMut::from_raw_parts(self.buf.as_mut_ptr(), self.len, self.extents) }
    }

    /// Return the element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<E::Ref<'_>> {
        self.view().get(index)
    }

    /// Return the element at `index`. Panics if out of range.
    pub fn at(&self, index: usize) -> E::Ref<'_> {
        self.view().at(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<E::RefMut<'_>> {
        self.view_mut().into_mut(index)
    }

    /// Return the element at `index` mutably. Panics if out of range.
    pub fn at_mut(&mut self, index: usize) -> E::RefMut<'_> {
        let len = self.len;
        match self.get_mut(index) {
            Some(elem) => elem,
            None => panic!("index {} out of range for length {}", index, len),
        }
    }

    pub fn first(&self) -> Option<E::Ref<'_>> {
        self.view().first()
    }

    pub fn last(&self) -> Option<E::Ref<'_>> {
        self.view().last()
    }

    pub fn iter(&self) -> Iter<'_, E> {
        self.view().iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, E> {
        self.view_mut().into_iter()
    }

    /// All live leaf values in logical order.
    pub fn as_slice(&self) -> &[E::Base] {
        // Safety: the live prefix holds this many leaf values.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.live_leafs()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [E::Base] {
        self.live_slice_mut()
    }

    fn live_slice_mut(&mut self) -> &mut [E::Base] {
        // Safety: as `as_slice`, exclusively borrowed via `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.live_leafs()) }
    }

    /// Assign `value` to every element.
    pub fn fill<S: ElementSource<E>>(&mut self, value: S) {
        self.view_mut().fill(value);
    }

    pub(crate) fn eq_parts(&self) -> (usize, E::Extent, &[E::Base]) {
        (self.len, self.extents, self.as_slice())
    }
}

impl<E: Element> Drop for Vector<E> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<E: Element> Clone for Vector<E>
where
    E::Base: Clone,
{
    /// Deep-copy the live elements into a buffer of exactly the required
    /// size.
    fn clone(&self) -> Vector<E> {
        let live = self.live_leafs();
        let mut buf = UninitBuffer::allocate(live);
        // Safety: `live` values in `self`, `live` fresh slots in `buf`.
        unsafe { clone_to_uninit(self.buf.as_ptr(), buf.as_mut_ptr(), live) };
        Vector {
            buf,
            len: self.len,
            cap: self.len,
            extents: self.extents,
        }
    }
}

impl<E: Element> Default for Vector<E> {
    fn default() -> Vector<E> {
        Vector::new()
    }
}

impl<E: Element> fmt::Debug for Vector<E>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view().fmt(f)
    }
}

impl<E: Element, S: ElementSource<E>> Extend<S> for Vector<E> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for source in iter {
            self.push_back(source);
        }
    }
}

impl<E: Element, S: ElementSource<E>> FromIterator<S> for Vector<E> {
    /// Collect elements into a vector, adopting the extent of the first
    /// element. An empty iterator produces [`Vector::new`].
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Vector<E> {
        let mut iter = iter.into_iter();
        let mut v = match iter.next() {
            None => return Vector::new(),
            Some(first) => {
                let mut v = Vector {
                    buf: UninitBuffer::allocate(0),
                    len: 0,
                    cap: 0,
                    extents: first.source_extent(),
                };
                if let (_, Some(upper)) = iter.size_hint() {
                    v.reserve(upper + 1);
                }
                v.push_back(first);
                v
            }
        };
        v.extend(iter);
        v
    }
}

impl<'a, E: Element> IntoIterator for &'a Vector<E> {
    type Item = E::Ref<'a>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.view().iter()
    }
}

impl<'a, E: Element> IntoIterator for &'a mut Vector<E> {
    type Item = E::RefMut<'a>;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::Vector;
    use crate::dynarray::DynArray;
    use crate::element::InnerDynArray;
    use crate::test_util::Counted;

    fn iota_row(len: usize) -> DynArray<i32> {
        let mut row = DynArray::<i32>::new(&[len]);
        for (i, x) in row.iter_mut().enumerate() {
            *x = i as i32;
        }
        row
    }

    #[test]
    fn test_push_and_pop() {
        let mut v = Vector::<i32>::new();
        assert!(v.is_empty());

        v.push_back(5);
        v.push_back(7);
        v.push_back(9);
        assert_eq!(v.as_slice(), &[5, 7, 9]);
        assert_eq!(v.len(), 3);

        v.pop_back();
        v.push_back(10);
        assert_eq!(v.as_slice(), &[5, 7, 10]);
    }

    #[test]
    fn test_first_and_last() {
        let mut v = Vector::<i32>::new();
        assert_eq!(v.first(), None);
        assert_eq!(v.last(), None);

        for x in [5, 7, 9, 10] {
            v.push_back(x);
        }
        assert_eq!(v.first(), Some(&5));
        assert_eq!(v.last(), Some(&10));
        assert_eq!(v.len(), 4);

        v.pop_back();
        v.pop_back();
        assert_eq!(v.last(), Some(&7));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut v = Vector::<i32>::new();
        let mut caps = Vec::new();
        for i in 0..9 {
            v.push_back(i);
            caps.push(v.capacity());
        }
        assert_eq!(caps, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn test_reserve_is_exact_and_stable() {
        let mut v = Vector::<i32>::with_capacity(8);
        assert_eq!(v.capacity(), 8);
        let ptr = v.as_slice().as_ptr();
        for i in 0..8 {
            v.push_back(i);
        }
        // No reallocation happened.
        assert_eq!(v.as_slice().as_ptr(), ptr);
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn test_try_reserve() {
        let mut v = Vector::<i32>::new();
        assert!(v.try_reserve(16).is_ok());
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn test_reserve_then_push_constructs_each_element_once() {
        Counted::reset();
        let mut v = Vector::<Counted>::new();
        v.reserve(3);
        for i in 0..3 {
            v.push_back(Counted::new(i));
        }
        // Pushing into reserved space moves the values; nothing is
        // constructed beyond the three pushed elements.
        assert_eq!(Counted::constructed(), 3);
        assert_eq!(Counted::live(), 3);

        drop(v);
        assert_eq!(Counted::live(), 0);
    }

    #[test]
    fn test_truncate_and_clear_drop_elements() {
        Counted::reset();
        let mut v = Vector::<Counted>::new();
        for i in 0..5 {
            v.push_back(Counted::new(i));
        }
        v.truncate(2);
        assert_eq!(v.len(), 2);
        assert_eq!(Counted::live(), 2);

        let cap = v.capacity();
        v.clear();
        assert_eq!(Counted::live(), 0);
        assert_eq!(v.capacity(), cap);
    }

    #[test]
    fn test_insert() {
        struct Case {
            index: usize,
            value: i32,
            expected: &'static [i32],
        }

        let cases = [
            Case {
                index: 0,
                value: -1,
                expected: &[-1, 0, 10, 20, 30],
            },
            Case {
                index: 2,
                value: 99,
                expected: &[0, 10, 99, 20, 30],
            },
            Case {
                index: 4,
                value: 100,
                expected: &[0, 10, 20, 30, 100],
            },
        ];

        for case in cases {
            let mut v = Vector::<i32>::new();
            for i in 0..4 {
                v.push_back(i * 10);
            }
            v.insert(case.index, case.value);
            assert_eq!(v.as_slice(), case.expected);
        }
    }

    #[test]
    fn test_insert_from_iter_matches_rebuild() {
        struct Case {
            len: usize,
            index: usize,
            items: &'static [i32],
        }

        let cases = [
            Case {
                len: 6,
                index: 2,
                items: &[10, 11, 12],
            },
            Case {
                len: 6,
                index: 0,
                items: &[10, 11],
            },
            Case {
                len: 6,
                index: 6,
                items: &[10, 11],
            },
            Case {
                len: 6,
                index: 3,
                items: &[],
            },
            Case {
                len: 0,
                index: 0,
                items: &[10, 11, 12],
            },
            // More items than the doubled capacity can absorb at once.
            Case {
                len: 4,
                index: 1,
                items: &[50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61],
            },
        ];

        for case in cases {
            let mut v = Vector::<i32>::new();
            for i in 0..case.len as i32 {
                v.push_back(i);
            }
            v.insert_from_iter(case.index, case.items.iter().copied());

            let mut expected: Vec<i32> = (0..case.len as i32).collect();
            expected.splice(case.index..case.index, case.items.iter().copied());
            assert_eq!(v.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_nested_push() {
        let mut v = Vector::<InnerDynArray<i32>>::with_dims(&[4]);
        let row = iota_row(4);
        v.push_back(&row);
        v.push_back(row.view());
        assert_eq!(v.len(), 2);
        assert_eq!(v.at(1).as_slice(), &[0, 1, 2, 3]);
        assert_eq!(v.as_slice(), &[0, 1, 2, 3, 0, 1, 2, 3]);

        // Elements were deep-copied.
        let mut v2 = v.clone();
        *v2.at_mut(0).at_mut(0) = 9;
        assert_eq!(v.at(0).at(0), &0);
    }

    #[test]
    #[should_panic(expected = "element shape mismatch")]
    fn test_push_shape_mismatch() {
        let mut v = Vector::<InnerDynArray<i32>>::with_dims(&[4]);
        let row = iota_row(5);
        v.push_back(&row);
    }

    #[test]
    #[should_panic(expected = "pop from empty")]
    fn test_pop_empty() {
        let mut v = Vector::<i32>::new();
        v.pop_back();
    }

    #[test]
    fn test_assign() {
        let mut v = Vector::<i32>::new();
        v.push_back(1);
        v.assign_n(3, 7);
        assert_eq!(v.as_slice(), &[7, 7, 7]);

        v.assign_iter(0..5);
        assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shrink_to_fit() {
        let mut v = Vector::<i32>::with_capacity(16);
        for i in 0..5 {
            v.push_back(i);
        }
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 5);
        assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_from_iterator_adopts_first_extent() {
        let rows: Vec<DynArray<i32>> = (0..3).map(|_| iota_row(4)).collect();
        let v: Vector<InnerDynArray<i32>> = rows.iter().collect();
        assert_eq!(v.len(), 3);
        assert_eq!(v.extents().top_extent(), 4);

        let leafs: Vector<i32> = (0..4).collect();
        assert_eq!(leafs.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_eq_with_dynarray() {
        let row = iota_row(4);
        let mut v = Vector::<i32>::new();
        for i in 0..4 {
            v.push_back(i);
        }
        assert_eq!(v, row);
        assert_eq!(row, v);

        v.push_back(4);
        assert_ne!(v, row);
    }

    #[test]
    fn test_clone_across_growth() {
        let mut v = Vector::<String>::new();
        for i in 0..10 {
            v.push_back(format!("item {}", i));
        }
        let copy = v.clone();
        assert_eq!(copy, v);
        assert_eq!(copy.capacity(), copy.len());
    }

    #[test]
    fn test_zero_stride_elements() {
        let mut v = Vector::<InnerDynArray<i32>>::with_dims(&[0]);
        let empty = DynArray::<i32>::new(&[0]);
        for _ in 0..4 {
            v.push_back(&empty);
        }
        assert_eq!(v.len(), 4);
        assert_eq!(v.iter().count(), 4);
        v.pop_back();
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_debug() {
        let mut v = Vector::<i32>::new();
        v.push_back(1);
        v.push_back(2);
        assert_eq!(format!("{:?}", v), "[1, 2]");
    }
}
