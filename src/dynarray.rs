//! Construction-sized containers and their views.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::slice;

use crate::buffer::{Buffer, HeapBuffer};
use crate::element::{fmt_nested, Element, ElementSource, InnerDynArray};
use crate::extent::{DynExtent, Extent, Shape};
use crate::iter::{Iter, IterMut};
use crate::uninit::{clone_assign, clone_to_uninit};
use crate::vector::Vector;

/// A container whose top dimension is sized at construction and fixed
/// afterwards.
///
/// All leaf values live in one heap allocation; elements are addressed as
/// `index * stride` offsets into it.
pub struct DynArray<E: Element> {
    buf: HeapBuffer<E::Base>,
    len: usize,
    extents: E::Extent,
}

impl<E: Element> DynArray<E> {
    /// Create an array with every leaf value default-constructed.
    ///
    /// `dims` holds the top size followed by the sizes of the
    /// dynamically-sized nested levels, outermost first. Panics if the
    /// number of sizes does not match the element type.
    pub fn new(dims: &[usize]) -> DynArray<E>
    where
        E::Base: Default,
    {
        assert_eq!(
            dims.len(),
            1 + <E::Extent as Extent>::DYN_DIMS,
            "wrong number of dimension sizes"
        );
        let len = dims[0];
        let extents = E::Extent::from_dims(&dims[1..]);
        let buf = HeapBuffer::allocate(len * extents.stride());
        DynArray { buf, len, extents }
    }

    /// Number of elements in the top dimension.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
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

    /// Borrow the whole array as a view.
    pub fn view(&self) -> DynArrayRef<'_, E> {
        // Safety: the buffer holds `len` live elements borrowed for `'_`.
        unsafe { DynArrayRef::from_raw_parts(self.buf.as_ptr(), self.len, self.extents) }
    }

    /// Mutably borrow the whole array as a view.
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

    /// All leaf values in logical order.
    pub fn as_slice(&self) -> &[E::Base] {
        self.view().as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [E::Base] {
        let len = self.len * self.extents.stride();
        // Safety: the buffer holds `len` live leaf values.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), len) }
    }

    /// Assign `value` to every element.
    pub fn fill<S: ElementSource<E>>(&mut self, value: S) {
        self.view_mut().fill(value);
    }

    /// Deep-assign the elements of `src` over this array's elements.
    ///
    /// Panics if the lengths or element shapes differ.
    pub fn copy_from(&mut self, src: DynArrayRef<'_, E>)
    where
        E::Base: Clone,
    {
        self.view_mut().copy_from(src);
    }

    pub(crate) fn eq_parts(&self) -> (usize, E::Extent, &[E::Base]) {
        (self.len, self.extents, self.as_slice())
    }
}

impl<E: Element> Clone for DynArray<E>
where
    E::Base: Clone,
{
    fn clone(&self) -> DynArray<E> {
        DynArray {
            buf: self.buf.duplicate(self.len * self.extents.stride()),
            len: self.len,
            extents: self.extents,
        }
    }
}

impl<E: Element> Default for DynArray<E> {
    /// Create an empty array with all dynamic sizes zero.
    fn default() -> DynArray<E> {
        DynArray {
            buf: HeapBuffer::empty(),
            len: 0,
            extents: <E::Extent as Default>::default(),
        }
    }
}

impl<E: Element> fmt::Debug for DynArray<E>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view().fmt(f)
    }
}

impl<'a, E: Element> IntoIterator for &'a DynArray<E> {
    type Item = E::Ref<'a>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.view().iter()
    }
}

impl<'a, E: Element> IntoIterator for &'a mut DynArray<E> {
    type Item = E::RefMut<'a>;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        self.iter_mut()
    }
}

/// Shared view of a [`DynArray`], a [`Vector`] or a construction-sized
/// element nested in another container.
///
/// Copying the view aliases the same elements; it never copies data.
pub struct DynArrayRef<'a, E: Element> {
    ptr: *const E::Base,
    len: usize,
    extents: E::Extent,
    _marker: PhantomData<(&'a E, &'a [E::Base])>,
}

impl<'a, E: Element> DynArrayRef<'a, E> {
    /// Create a view of the `len` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len * extents.stride()` live leaf values valid
    /// for reads, and unaliased by writes, for `'a`.
    pub(crate) unsafe fn from_raw_parts(ptr: *const E::Base, len: usize, extents: E::Extent) -> Self {
        DynArrayRef {
            ptr,
            len,
            extents,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    pub fn shape(&self) -> Shape {
        let mut shape = Shape::new();
        shape.push(self.len);
        self.extents.collect_shape(&mut shape);
        shape
    }

    /// Return the element at `index`, or `None` if out of range.
    ///
    /// The returned reference borrows the underlying container, not the
    /// view, so accesses can be chained.
    pub fn get(&self, index: usize) -> Option<E::Ref<'a>> {
        if index < self.len {
            // Safety: `index` is in range, so the element lies within the
            // block the view was created over.
            Some(unsafe { E::make_ref(self.ptr.add(index * self.extents.stride()), self.extents) })
        } else {
            None
        }
    }

    /// Return the element at `index`. Panics if out of range.
    pub fn at(&self, index: usize) -> E::Ref<'a> {
        match self.get(index) {
            Some(elem) => elem,
            None => panic!("index {} out of range for length {}", index, self.len),
        }
    }

    /// Return the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `self.len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> E::Ref<'a> {
        unsafe { E::make_ref(self.ptr.add(index * self.extents.stride()), self.extents) }
    }

    pub fn first(&self) -> Option<E::Ref<'a>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<E::Ref<'a>> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> Iter<'a, E> {
        // Safety: the view's contract covers all `len` elements for `'a`.
        unsafe { Iter::new(self.ptr, self.extents, self.len) }
    }

    /// All leaf values in logical order.
    pub fn as_slice(&self) -> &'a [E::Base] {
        // Safety: the view points to this many live leaf values.
        unsafe { slice::from_raw_parts(self.ptr, self.len * self.extents.stride()) }
    }

    pub(crate) fn eq_parts(&self) -> (usize, E::Extent, &[E::Base]) {
        (self.len, self.extents, self.as_slice())
    }
}

impl<'a, E: Element> Clone for DynArrayRef<'a, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E: Element> Copy for DynArrayRef<'a, E> {}

impl<'a, E: Element> fmt::Debug for DynArrayRef<'a, E>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Safety: the view points to `len` live elements.
        unsafe { fmt_nested::<E>(self.ptr, self.len, self.extents, f) }
    }
}

impl<'a, E: Element> IntoIterator for DynArrayRef<'a, E> {
    type Item = E::Ref<'a>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

// Safety: same rules as `&[T]`.
unsafe impl<'a, E: Element> Send for DynArrayRef<'a, E> where E::Base: Sync {}
unsafe impl<'a, E: Element> Sync for DynArrayRef<'a, E> where E::Base: Sync {}

/// Mutable view of a [`DynArray`], a [`Vector`] or a construction-sized
/// element nested in another container.
pub struct DynArrayRefMut<'a, E: Element> {
    ptr: *mut E::Base,
    len: usize,
    extents: E::Extent,
    _marker: PhantomData<(&'a E, &'a mut [E::Base])>,
}

impl<'a, E: Element> DynArrayRefMut<'a, E> {
    /// Create a mutable view of the `len` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len * extents.stride()` live leaf values valid
    /// for reads and writes for `'a`, not accessed through any other
    /// pointer during `'a`.
    pub(crate) unsafe fn from_raw_parts(ptr: *mut E::Base, len: usize, extents: E::Extent) -> Self {
        DynArrayRefMut {
            ptr,
            len,
            extents,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    pub fn shape(&self) -> Shape {
        self.as_ref().shape()
    }

    /// Downgrade to a shared view borrowing from this one.
    pub fn as_ref(&self) -> DynArrayRef<'_, E> {
        // Safety: reborrows this view's elements for `'_`.
        unsafe { DynArrayRef::from_raw_parts(self.ptr, self.len, self.extents) }
    }

    pub fn get(&self, index: usize) -> Option<E::Ref<'_>> {
        self.as_ref().get(index)
    }

    pub fn at(&self, index: usize) -> E::Ref<'_> {
        self.as_ref().at(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<E::RefMut<'_>> {
        if index < self.len {
            // Safety: in range, and `&mut self` makes the access exclusive.
            Some(unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) })
        } else {
            None
        }
    }

    pub fn at_mut(&mut self, index: usize) -> E::RefMut<'_> {
        let len = self.len;
        match self.get_mut(index) {
            Some(elem) => elem,
            None => panic!("index {} out of range for length {}", index, len),
        }
    }

    /// Consume the view, returning the element at `index` with the full
    /// lifetime `'a`, or `None` if out of range.
    pub fn into_mut(self, index: usize) -> Option<E::RefMut<'a>> {
        if index < self.len {
            // Safety: in range, and the view is consumed so the access
            // stays exclusive for `'a`.
            Some(unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) })
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// `index` must be less than `self.len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> E::RefMut<'_> {
        unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) }
    }

    pub fn first(&self) -> Option<E::Ref<'_>> {
        self.as_ref().get(0)
    }

    pub fn last(&self) -> Option<E::Ref<'_>> {
        self.len.checked_sub(1).and_then(|i| self.as_ref().get(i))
    }

    pub fn iter(&self) -> Iter<'_, E> {
        self.as_ref().iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, E> {
        // Safety: `&mut self` keeps the elements exclusive for `'_`.
        unsafe { IterMut::new(self.ptr, self.extents, self.len) }
    }

    pub fn as_slice(&self) -> &[E::Base] {
        // Safety: the view points to this many live leaf values.
        unsafe { slice::from_raw_parts(self.ptr, self.len * self.extents.stride()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [E::Base] {
        // Safety: as `as_slice`, exclusively borrowed via `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len * self.extents.stride()) }
    }

    /// Assign `value` to every element.
    ///
    /// Panics if the element shapes differ.
    pub fn fill<S: ElementSource<E>>(&mut self, value: S) {
        assert!(
            value.source_extent() == self.extents,
            "element shape mismatch"
        );
        let stride = self.extents.stride();
        for i in 0..self.len {
            // Safety: each slot holds a live element; `value` cannot alias
            // them while the container is mutably borrowed.
            unsafe { value.assign_to(self.ptr.add(i * stride)) };
        }
    }

    /// Deep-assign the elements of `src` over this view's elements.
    ///
    /// Panics if the lengths or element shapes differ.
    pub fn copy_from(&mut self, src: DynArrayRef<'_, E>)
    where
        E::Base: Clone,
    {
        assert!(src.len == self.len, "length mismatch");
        assert!(src.extents == self.extents, "element shape mismatch");
        self.as_mut_slice().clone_from_slice(src.as_slice());
    }

    /// Exchange the contents of two equal-shaped views.
    pub fn swap_with(&mut self, other: &mut DynArrayRefMut<'_, E>) {
        assert!(other.len == self.len, "length mismatch");
        assert!(other.extents == self.extents, "element shape mismatch");
        let len = self.len * self.extents.stride();
        // Safety: two live mutable views cannot overlap.
        unsafe { ptr::swap_nonoverlapping(self.ptr, other.ptr, len) };
    }

    pub(crate) fn eq_parts(&self) -> (usize, E::Extent, &[E::Base]) {
        (self.len, self.extents, self.as_slice())
    }
}

impl<'a, E: Element> fmt::Debug for DynArrayRefMut<'a, E>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl<'a, E: Element> IntoIterator for DynArrayRefMut<'a, E> {
    type Item = E::RefMut<'a>;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        // Safety: consumes the exclusive view.
        unsafe { IterMut::new(self.ptr, self.extents, self.len) }
    }
}

// Safety: same rules as `&mut [T]`.
unsafe impl<'a, E: Element> Send for DynArrayRefMut<'a, E> where E::Base: Send {}
unsafe impl<'a, E: Element> Sync for DynArrayRefMut<'a, E> where E::Base: Sync {}

impl<'a, E: Element> ElementSource<InnerDynArray<E>> for DynArrayRef<'a, E>
where
    E::Base: Clone,
{
    fn source_extent(&self) -> DynExtent<E::Extent> {
        DynExtent {
            size: self.len,
            inner: self.extents,
        }
    }

    unsafe fn write_to(&self, dst: *mut E::Base) {
        unsafe { clone_to_uninit(self.ptr, dst, self.len * self.extents.stride()) };
    }

    unsafe fn assign_to(&self, dst: *mut E::Base) {
        unsafe { clone_assign(self.ptr, dst, self.len * self.extents.stride()) };
    }
}

impl<'a, E: Element> ElementSource<InnerDynArray<E>> for &'a DynArray<E>
where
    E::Base: Clone,
{
    fn source_extent(&self) -> DynExtent<E::Extent> {
        DynExtent {
            size: self.len,
            inner: self.extents,
        }
    }

    unsafe fn write_to(&self, dst: *mut E::Base) {
        unsafe { self.view().write_to(dst) };
    }

    unsafe fn assign_to(&self, dst: *mut E::Base) {
        unsafe { self.view().assign_to(dst) };
    }
}

impl<'a, E: Element> ElementSource<InnerDynArray<E>> for &'a Vector<E>
where
    E::Base: Clone,
{
    fn source_extent(&self) -> DynExtent<E::Extent> {
        DynExtent {
            size: self.len(),
            inner: self.extents(),
        }
    }

    unsafe fn write_to(&self, dst: *mut E::Base) {
        unsafe { self.view().write_to(dst) };
    }

    unsafe fn assign_to(&self, dst: *mut E::Base) {
        unsafe { self.view().assign_to(dst) };
    }
}

macro_rules! impl_dyn_eq {
    ($( ($($lt:lifetime),*) $lhs:ty => $rhs:ty ),+ $(,)?) => {
        $(
            impl<$($lt,)* E: Element> PartialEq<$rhs> for $lhs
            where
                E::Base: PartialEq,
            {
                fn eq(&self, other: &$rhs) -> bool {
                    let (al, ae, asl) = self.eq_parts();
                    let (bl, be, bsl) = other.eq_parts();
                    al == bl && ae == be && asl == bsl
                }
            }
        )+
    };
}

impl_dyn_eq!(
    () DynArray<E> => DynArray<E>,
    ('b) DynArray<E> => DynArrayRef<'b, E>,
    ('b) DynArray<E> => DynArrayRefMut<'b, E>,
    () DynArray<E> => Vector<E>,
    ('a) DynArrayRef<'a, E> => DynArray<E>,
    ('a, 'b) DynArrayRef<'a, E> => DynArrayRef<'b, E>,
    ('a, 'b) DynArrayRef<'a, E> => DynArrayRefMut<'b, E>,
    ('a) DynArrayRef<'a, E> => Vector<E>,
    ('a) DynArrayRefMut<'a, E> => DynArray<E>,
    ('a, 'b) DynArrayRefMut<'a, E> => DynArrayRef<'b, E>,
    ('a, 'b) DynArrayRefMut<'a, E> => DynArrayRefMut<'b, E>,
    ('a) DynArrayRefMut<'a, E> => Vector<E>,
    () Vector<E> => DynArray<E>,
    ('b) Vector<E> => DynArrayRef<'b, E>,
    ('b) Vector<E> => DynArrayRefMut<'b, E>,
    () Vector<E> => Vector<E>,
);

impl<E: Element> Eq for DynArray<E> where E::Base: Eq {}
impl<E: Element> Eq for Vector<E> where E::Base: Eq {}

#[cfg(test)]
mod tests {
    use super::DynArray;
    use crate::element::{InnerArray, InnerDynArray};

    fn iota_grid(rows: usize, cols: usize) -> DynArray<InnerDynArray<i32>> {
        let mut grid = DynArray::new(&[rows, cols]);
        for (i, x) in grid.as_mut_slice().iter_mut().enumerate() {
            *x = i as i32;
        }
        grid
    }

    #[test]
    fn test_new_and_index() {
        let grid = iota_grid(10, 6);
        assert_eq!(grid.len(), 10);
        assert_eq!(grid.shape().as_slice(), &[10, 6]);
        assert_eq!(grid.at(0).at(0), &0);
        assert_eq!(grid.at(9).at(5), &59);
        assert_eq!(grid.at(3).as_slice(), &[18, 19, 20, 21, 22, 23]);
        assert!(grid.get(10).is_none());
    }

    #[test]
    fn test_iterate_2d() {
        let grid = iota_grid(10, 6);
        let mut expected = 0;
        for row in grid.iter() {
            assert_eq!(row.len(), 6);
            for x in row {
                assert_eq!(*x, expected);
                expected += 1;
            }
        }
        assert_eq!(expected, 60);
    }

    #[test]
    fn test_zero_sized_rows() {
        let grid = DynArray::<InnerDynArray<i32>>::new(&[10, 0]);
        assert_eq!(grid.len(), 10);
        assert_eq!(grid.iter().len(), 10);
        assert_eq!(grid.iter().count(), 10);
        assert!(grid.at(9).is_empty());

        let empty = DynArray::<InnerDynArray<i32>>::new(&[0, 0]);
        assert_eq!(empty.iter().count(), 0);

        let no_rows = DynArray::<InnerDynArray<i32>>::new(&[0, 10]);
        assert_eq!(no_rows.iter().count(), 0);
    }

    #[test]
    fn test_eq_is_shape_sensitive() {
        let a = iota_grid(10, 6);
        let b = iota_grid(10, 6);
        assert_eq!(a, b);
        assert_eq!(a.view(), b);

        // Same flat data, different shape.
        let c = iota_grid(60, 1);
        assert_ne!(a, c);

        let d = iota_grid(10, 7);
        assert_ne!(a, d);

        // Rows of differently-shaped grids are unequal too, even where the
        // shorter one is a prefix of the longer.
        assert_eq!(a.at(0), b.at(0));
        assert_ne!(a.at(0), d.at(0));

        let e = iota_grid(11, 6);
        assert_ne!(a, e);
    }

    #[test]
    fn test_clone_is_deep() {
        let a = iota_grid(4, 3);
        let mut b = a.clone();
        *b.at_mut(0).at_mut(0) = 99;
        assert_eq!(a.at(0).at(0), &0);
        assert_eq!(b.at(0).at(0), &99);
    }

    #[test]
    fn test_swap_exchanges_storage() {
        let mut a = iota_grid(2, 3);
        let mut b = DynArray::<InnerDynArray<i32>>::new(&[5, 4]);
        let a_ptr = a.as_slice().as_ptr();
        let b_ptr = b.as_slice().as_ptr();

        std::mem::swap(&mut a, &mut b);
        assert_eq!(a.shape().as_slice(), &[5, 4]);
        assert_eq!(b.shape().as_slice(), &[2, 3]);
        // The allocations changed hands; nothing was copied.
        assert_eq!(a.as_slice().as_ptr(), b_ptr);
        assert_eq!(b.as_slice().as_ptr(), a_ptr);
    }

    #[test]
    fn test_take_steals_storage() {
        let mut a = iota_grid(2, 3);
        let a_ptr = a.as_slice().as_ptr();

        let b = std::mem::take(&mut a);
        assert_eq!(b.as_slice().as_ptr(), a_ptr);
        assert!(a.is_empty());
        assert_eq!(a.extents().top_extent(), 0);
    }

    #[test]
    fn test_fill_with_row() {
        let mut grid = DynArray::<InnerDynArray<i32>>::new(&[3, 4]);
        let mut row = DynArray::<i32>::new(&[4]);
        for (i, x) in row.iter_mut().enumerate() {
            *x = i as i32;
        }
        grid.fill(&row);
        assert_eq!(grid.as_slice(), &[0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_copy_from_row() {
        let mut grid = iota_grid(3, 4);
        let row = grid.at(2);
        let row_copy: Vec<i32> = row.as_slice().to_vec();

        let mut view = grid.view_mut();
        let mut iter = view.iter_mut();
        let mut first = iter.next().unwrap();
        let last = iter.nth(1).unwrap();
        first.copy_from(last.as_ref());
        assert_eq!(grid.at(0).as_slice(), row_copy.as_slice());
    }

    #[test]
    fn test_static_rows_in_dyn_array() {
        let mut grid = DynArray::<InnerArray<i32, 3>>::new(&[4]);
        assert_eq!(grid.shape().as_slice(), &[4, 3]);
        grid.at_mut(2).fill(5);
        assert_eq!(grid.as_slice(), &[0, 0, 0, 0, 0, 0, 5, 5, 5, 0, 0, 0]);
    }

    #[test]
    fn test_three_levels() {
        let mut cube = DynArray::<InnerDynArray<InnerDynArray<i32>>>::new(&[2, 3, 4]);
        assert_eq!(cube.shape().as_slice(), &[2, 3, 4]);
        assert_eq!(cube.as_slice().len(), 24);
        *cube.at_mut(1).at_mut(2).at_mut(3) = 7;
        assert_eq!(cube.as_slice()[23], 7);
        assert_eq!(cube.at(1).at(2).at(3), &7);
    }

    #[test]
    fn test_debug() {
        let grid = iota_grid(2, 2);
        assert_eq!(format!("{:?}", grid), "[[0, 1], [2, 3]]");
    }

    #[test]
    #[should_panic(expected = "element shape mismatch")]
    fn test_fill_shape_mismatch() {
        let mut grid = DynArray::<InnerDynArray<i32>>::new(&[3, 4]);
        let row = DynArray::<i32>::new(&[5]);
        grid.fill(&row);
    }
}
