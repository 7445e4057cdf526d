//! Fixed-size containers and their views.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::slice;

use crate::buffer::{Buffer, LeafBuffer};
use crate::element::{fmt_nested, Element, ElementSource, InnerArray};
use crate::extent::{Extent, Shape, StaticExtent, UnitExtent};
use crate::iter::{Iter, IterMut};
use crate::uninit::{clone_assign, clone_to_uninit};

/// Storage of an array of `N` elements of type `E`.
pub(crate) type ArrayBuffer<E, const N: usize> = <<E as Element>::Buffer as Buffer>::WithDim<N>;

/// A container whose top dimension is fixed at compile time.
///
/// All leaf values live in one buffer: inline when every nested level is
/// fixed-size, on the heap as soon as a dynamically-sized level appears.
/// Elements are addressed as `index * stride` offsets into that buffer.
pub struct Array<E: Element, const N: usize> {
    buf: ArrayBuffer<E, N>,
    extents: E::Extent,
}

impl<E: Element, const N: usize> Array<E, N> {
    /// Create an array with every leaf value default-constructed.
    ///
    /// `dims` holds the sizes of the dynamically-sized nested levels,
    /// outermost first. Panics if the number of sizes does not match the
    /// element type.
    pub fn new(dims: &[usize]) -> Array<E, N>
    where
        E::Base: Default,
    {
        assert_eq!(
            dims.len(),
            <E::Extent as Extent>::DYN_DIMS,
            "wrong number of dimension sizes"
        );
        let extents = E::Extent::from_dims(dims);
        let buf = <ArrayBuffer<E, N> as Buffer>::allocate(N * extents.stride());
        Array { buf, extents }
    }

    /// Number of elements in the top dimension.
    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Extent chain of one element.
    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    /// Sizes of every dimension, outermost first.
    pub fn shape(&self) -> Shape {
        let mut shape = Shape::new();
        shape.push(N);
        self.extents.collect_shape(&mut shape);
        shape
    }

    /// Borrow the whole array as a view.
    pub fn view(&self) -> ArrayRef<'_, E, N> {
        // Safety: the buffer holds `N` live elements borrowed for `'_`.
        unsafe { ArrayRef::from_raw_parts(self.buf.as_ptr(), self.extents) }
    }

    /// Mutably borrow the whole array as a view.
    pub fn view_mut(&mut self) -> ArrayRefMut<'_, E, N> {
        // Safety: as `view`, and `&mut self` makes the borrow exclusive.
        unsafe { ArrayRefMut::from_raw_parts(self.buf.as_mut_ptr(), self.extents) }
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
        let len = self.len();
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
        let len = N * self.extents.stride();
        // Safety: the buffer holds `len` live leaf values.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), len) }
    }

    /// Assign `value` to every element.
    pub fn fill<S: ElementSource<E>>(&mut self, value: S) {
        self.view_mut().fill(value);
    }

    /// Deep-assign the elements of `src` over this array's elements.
    ///
    /// Panics if the element shapes differ.
    pub fn copy_from(&mut self, src: ArrayRef<'_, E, N>)
    where
        E::Base: Clone,
    {
        self.view_mut().copy_from(src);
    }

    pub(crate) fn eq_parts(&self) -> (E::Extent, &[E::Base]) {
        (self.extents, self.as_slice())
    }
}

impl<T, const N: usize> Array<T, N>
where
    T: Element<Base = T, Extent = UnitExtent, Buffer = LeafBuffer<T>>,
{
    /// Convert a leaf array into a plain Rust array, e.g. to destructure
    /// it into named bindings.
    pub fn into_array(self) -> [T; N] {
        self.buf.into_parts().map(LeafBuffer::into_inner)
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T, N>
where
    T: Element<Base = T, Extent = UnitExtent, Buffer = LeafBuffer<T>>,
{
    fn from(values: [T; N]) -> Array<T, N> {
        Array {
            buf: crate::buffer::FixedBuffer::from_parts(values.map(LeafBuffer::new)),
            extents: UnitExtent,
        }
    }
}

impl<E: Element, const N: usize> Clone for Array<E, N>
where
    E::Base: Clone,
{
    fn clone(&self) -> Array<E, N> {
        Array {
            buf: self.buf.duplicate(N * self.extents.stride()),
            extents: self.extents,
        }
    }
}

impl<E: Element, const N: usize> Default for Array<E, N>
where
    E::Base: Default,
{
    /// Create an array whose dynamically-sized nested levels all have size
    /// zero.
    fn default() -> Array<E, N> {
        let extents = <E::Extent as Default>::default();
        let buf = <ArrayBuffer<E, N> as Buffer>::allocate(N * extents.stride());
        Array { buf, extents }
    }
}

impl<E: Element, const N: usize> fmt::Debug for Array<E, N>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view().fmt(f)
    }
}

impl<'a, E: Element, const N: usize> IntoIterator for &'a Array<E, N> {
    type Item = E::Ref<'a>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.view().iter()
    }
}

impl<'a, E: Element, const N: usize> IntoIterator for &'a mut Array<E, N> {
    type Item = E::RefMut<'a>;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        self.iter_mut()
    }
}

/// Shared view of an [`Array`] or of an array element nested in another
/// container.
///
/// Copying the view aliases the same elements; it never copies data.
pub struct ArrayRef<'a, E: Element, const N: usize> {
    ptr: *const E::Base,
    extents: E::Extent,
    _marker: PhantomData<(&'a E, &'a [E::Base])>,
}

impl<'a, E: Element, const N: usize> ArrayRef<'a, E, N> {
    /// Create a view of the `N` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `N * extents.stride()` live leaf values valid
    /// for reads, and unaliased by writes, for `'a`.
    pub(crate) unsafe fn from_raw_parts(ptr: *const E::Base, extents: E::Extent) -> Self {
        ArrayRef {
            ptr,
            extents,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    pub fn shape(&self) -> Shape {
        let mut shape = Shape::new();
        shape.push(N);
        self.extents.collect_shape(&mut shape);
        shape
    }

    /// Return the element at `index`, or `None` if out of range.
    ///
    /// The returned reference borrows the underlying container, not the
    /// view, so accesses can be chained.
    pub fn get(&self, index: usize) -> Option<E::Ref<'a>> {
        if index < N {
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
            None => panic!("index {} out of range for length {}", index, N),
        }
    }

    /// Return the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `N`.
    pub unsafe fn get_unchecked(&self, index: usize) -> E::Ref<'a> {
        unsafe { E::make_ref(self.ptr.add(index * self.extents.stride()), self.extents) }
    }

    pub fn first(&self) -> Option<E::Ref<'a>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<E::Ref<'a>> {
        N.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> Iter<'a, E> {
        // Safety: the view's contract covers all `N` elements for `'a`.
        unsafe { Iter::new(self.ptr, self.extents, N) }
    }

    /// All leaf values in logical order.
    pub fn as_slice(&self) -> &'a [E::Base] {
        // Safety: the view points to this many live leaf values.
        unsafe { slice::from_raw_parts(self.ptr, N * self.extents.stride()) }
    }

    pub(crate) fn eq_parts(&self) -> (E::Extent, &[E::Base]) {
        (self.extents, self.as_slice())
    }
}

impl<'a, E: Element, const N: usize> Clone for ArrayRef<'a, E, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E: Element, const N: usize> Copy for ArrayRef<'a, E, N> {}

impl<'a, E: Element, const N: usize> fmt::Debug for ArrayRef<'a, E, N>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Safety: the view points to `N` live elements.
        unsafe { fmt_nested::<E>(self.ptr, N, self.extents, f) }
    }
}

impl<'a, E: Element, const N: usize> IntoIterator for ArrayRef<'a, E, N> {
    type Item = E::Ref<'a>;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

// Safety: same rules as `&[T]`.
unsafe impl<'a, E: Element, const N: usize> Send for ArrayRef<'a, E, N> where E::Base: Sync {}
unsafe impl<'a, E: Element, const N: usize> Sync for ArrayRef<'a, E, N> where E::Base: Sync {}

/// Mutable view of an [`Array`] or of an array element nested in another
/// container.
pub struct ArrayRefMut<'a, E: Element, const N: usize> {
    ptr: *mut E::Base,
    extents: E::Extent,
    _marker: PhantomData<(&'a E, &'a mut [E::Base])>,
}

impl<'a, E: Element, const N: usize> ArrayRefMut<'a, E, N> {
    /// Create a mutable view of the `N` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `N * extents.stride()` live leaf values valid
    /// for reads and writes for `'a`, not accessed through any other
    /// pointer during `'a`.
    pub(crate) unsafe fn from_raw_parts(ptr: *mut E::Base, extents: E::Extent) -> Self {
        ArrayRefMut {
            ptr,
            extents,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn extents(&self) -> E::Extent {
        self.extents
    }

    pub fn shape(&self) -> Shape {
        self.as_ref().shape()
    }

    /// Downgrade to a shared view borrowing from this one.
    pub fn as_ref(&self) -> ArrayRef<'_, E, N> {
        // Safety: reborrows this view's elements for `'_`.
        unsafe { ArrayRef::from_raw_parts(self.ptr, self.extents) }
    }

    pub fn get(&self, index: usize) -> Option<E::Ref<'_>> {
        self.as_ref().get(index)
    }

    pub fn at(&self, index: usize) -> E::Ref<'_> {
        self.as_ref().at(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<E::RefMut<'_>> {
        if index < N {
            // Safety: in range, and `&mut self` makes the access exclusive.
            Some(unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) })
        } else {
            None
        }
    }

    pub fn at_mut(&mut self, index: usize) -> E::RefMut<'_> {
        match self.get_mut(index) {
            Some(elem) => elem,
            None => panic!("index {} out of range for length {}", index, N),
        }
    }

    /// Consume the view, returning the element at `index` with the full
    /// lifetime `'a`, or `None` if out of range.
    pub fn into_mut(self, index: usize) -> Option<E::RefMut<'a>> {
        if index < N {
            // Safety: in range, and the view is consumed so the access
            // stays exclusive for `'a`.
            Some(unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) })
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// `index` must be less than `N`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> E::RefMut<'_> {
        unsafe { E::make_mut(self.ptr.add(index * self.extents.stride()), self.extents) }
    }

    pub fn first(&self) -> Option<E::Ref<'_>> {
        self.as_ref().get(0)
    }

    pub fn last(&self) -> Option<E::Ref<'_>> {
        N.checked_sub(1).and_then(|i| self.as_ref().get(i))
    }

    pub fn iter(&self) -> Iter<'_, E> {
        self.as_ref().iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, E> {
        // Safety: `&mut self` keeps the elements exclusive for `'_`.
        unsafe { IterMut::new(self.ptr, self.extents, N) }
    }

    pub fn as_slice(&self) -> &[E::Base] {
        // Safety: the view points to this many live leaf values.
        unsafe { slice::from_raw_parts(self.ptr, N * self.extents.stride()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [E::Base] {
        // Safety: as `as_slice`, exclusively borrowed via `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.ptr, N * self.extents.stride()) }
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
        for i in 0..N {
            // Safety: each slot holds a live element; `value` cannot alias
            // them while the container is mutably borrowed.
            unsafe { value.assign_to(self.ptr.add(i * stride)) };
        }
    }

    /// Deep-assign the elements of `src` over this view's elements.
    ///
    /// Panics if the element shapes differ.
    pub fn copy_from(&mut self, src: ArrayRef<'_, E, N>)
    where
        E::Base: Clone,
    {
        assert!(src.extents == self.extents, "element shape mismatch");
        self.as_mut_slice().clone_from_slice(src.as_slice());
    }

    /// Exchange the contents of two equal-shaped views.
    pub fn swap_with(&mut self, other: &mut ArrayRefMut<'_, E, N>) {
        assert!(other.extents == self.extents, "element shape mismatch");
        let len = N * self.extents.stride();
        // Safety: two live mutable views cannot overlap.
        unsafe { ptr::swap_nonoverlapping(self.ptr, other.ptr, len) };
    }

    pub(crate) fn eq_parts(&self) -> (E::Extent, &[E::Base]) {
        (self.extents, self.as_slice())
    }
}

impl<'a, E: Element, const N: usize> fmt::Debug for ArrayRefMut<'a, E, N>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl<'a, E: Element, const N: usize> IntoIterator for ArrayRefMut<'a, E, N> {
    type Item = E::RefMut<'a>;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        // Safety: consumes the exclusive view.
        unsafe { IterMut::new(self.ptr, self.extents, N) }
    }
}

// Safety: same rules as `&mut [T]`.
unsafe impl<'a, E: Element, const N: usize> Send for ArrayRefMut<'a, E, N> where E::Base: Send {}
unsafe impl<'a, E: Element, const N: usize> Sync for ArrayRefMut<'a, E, N> where E::Base: Sync {}

impl<'a, E: Element, const N: usize> ElementSource<InnerArray<E, N>> for ArrayRef<'a, E, N>
where
    E::Base: Clone,
{
    fn source_extent(&self) -> StaticExtent<E::Extent, N> {
        StaticExtent { inner: self.extents }
    }

    unsafe fn write_to(&self, dst: *mut E::Base) {
        unsafe { clone_to_uninit(self.ptr, dst, N * self.extents.stride()) };
    }

    unsafe fn assign_to(&self, dst: *mut E::Base) {
        unsafe { clone_assign(self.ptr, dst, N * self.extents.stride()) };
    }
}

impl<'a, E: Element, const N: usize> ElementSource<InnerArray<E, N>> for &'a Array<E, N>
where
    E::Base: Clone,
{
    fn source_extent(&self) -> StaticExtent<E::Extent, N> {
        StaticExtent {
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

macro_rules! impl_static_eq {
    ($( ($($lt:lifetime),*) $lhs:ty => $rhs:ty ),+ $(,)?) => {
        $(
            impl<$($lt,)* E: Element, const N: usize> PartialEq<$rhs> for $lhs
            where
                E::Base: PartialEq,
            {
                fn eq(&self, other: &$rhs) -> bool {
                    let (ae, asl) = self.eq_parts();
                    let (be, bsl) = other.eq_parts();
                    ae == be && asl == bsl
                }
            }
        )+
    };
}

impl_static_eq!(
    () Array<E, N> => Array<E, N>,
    ('b) Array<E, N> => ArrayRef<'b, E, N>,
    ('b) Array<E, N> => ArrayRefMut<'b, E, N>,
    ('a) ArrayRef<'a, E, N> => Array<E, N>,
    ('a, 'b) ArrayRef<'a, E, N> => ArrayRef<'b, E, N>,
    ('a, 'b) ArrayRef<'a, E, N> => ArrayRefMut<'b, E, N>,
    ('a) ArrayRefMut<'a, E, N> => Array<E, N>,
    ('a, 'b) ArrayRefMut<'a, E, N> => ArrayRef<'b, E, N>,
    ('a, 'b) ArrayRefMut<'a, E, N> => ArrayRefMut<'b, E, N>,
);

impl<E: Element, const N: usize> Eq for Array<E, N> where E::Base: Eq {}

#[cfg(test)]
mod tests {
    use super::Array;
    use crate::element::{InnerArray, InnerDynArray};

    #[test]
    fn test_from_and_into_array() {
        let arr = Array::from([3, 1, 4, 1]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.at(2), &4);
        assert_eq!(arr.as_slice(), &[3, 1, 4, 1]);

        let [a, b, c, d] = arr.into_array();
        assert_eq!((a, b, c, d), (3, 1, 4, 1));
    }

    #[test]
    fn test_nested_static() {
        // 2x3 of i32, fully inline.
        let mut grid = Array::<InnerArray<i32, 3>, 2>::new(&[]);
        assert_eq!(grid.shape().as_slice(), &[2, 3]);
        assert_eq!(
            std::mem::size_of_val(&grid),
            6 * std::mem::size_of::<i32>()
        );

        for (i, mut row) in grid.iter_mut().enumerate() {
            for (j, x) in row.iter_mut().enumerate() {
                *x = (i * 3 + j) as i32;
            }
        }
        assert_eq!(grid.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(grid.at(1).at(0), &3);
    }

    #[test]
    fn test_dynamic_inner() {
        // 2 rows whose length is chosen at construction.
        let mut grid = Array::<InnerDynArray<i32>, 2>::new(&[5]);
        assert_eq!(grid.shape().as_slice(), &[2, 5]);
        grid.at_mut(1).fill(7);
        assert_eq!(grid.as_slice(), &[0, 0, 0, 0, 0, 7, 7, 7, 7, 7]);
    }

    #[test]
    fn test_fill_and_copy_from() {
        let mut a = Array::<i32, 4>::new(&[]);
        a.fill(9);
        assert_eq!(a.as_slice(), &[9, 9, 9, 9]);

        let b = Array::from([1, 2, 3, 4]);
        a.copy_from(b.view());
        assert_eq!(a, b);
    }

    #[test]
    fn test_swap_with() {
        let mut grid = Array::<InnerArray<i32, 2>, 3>::new(&[]);
        for (i, x) in grid.as_mut_slice().iter_mut().enumerate() {
            *x = i as i32;
        }
        let mut view = grid.view_mut();
        let mut iter = view.iter_mut();
        let mut first = iter.next().unwrap();
        let mut last = iter.nth(1).unwrap();
        first.swap_with(&mut last);
        assert_eq!(grid.as_slice(), &[4, 5, 2, 3, 0, 1]);
    }

    #[test]
    fn test_eq() {
        let a = Array::from([1, 2, 3]);
        let b = Array::from([1, 2, 3]);
        let c = Array::from([1, 2, 4]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.view(), b);
        assert_eq!(a, b.view());
    }

    #[test]
    fn test_clone_is_deep() {
        let a = Array::<i32, 3>::from([1, 2, 3]);
        let mut b = a.clone();
        *b.view_mut().at_mut(0) = 9;
        assert_eq!(a.at(0), &1);
        assert_eq!(b.at(0), &9);
    }

    #[test]
    fn test_debug() {
        let grid = Array::<InnerArray<i32, 2>, 2>::new(&[]);
        assert_eq!(format!("{:?}", grid), "[[0, 0], [0, 0]]");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range() {
        let a = Array::from([1, 2, 3]);
        a.at(3);
    }
}
