//! Compile-time resolution of container element types.
//!
//! The element parameter of a container is either a leaf scalar type (a
//! primitive, a tuple, or a user type opted in via
//! [`leaf_element!`](crate::leaf_element)) or one of the nesting markers
//! [`InnerArray`] and [`InnerDynArray`]. The [`Element`] trait maps that
//! parameter to the leaf scalar actually stored, the extent chain of one
//! element, the buffer kind it occupies and the fake-reference types
//! produced by indexing. Markers are never instantiated; they exist only at
//! the type level.

use std::fmt;
use std::marker::PhantomData;

use crate::array::{ArrayRef, ArrayRefMut};
use crate::buffer::{Buffer, HeapBuffer, LeafBuffer};
use crate::dynarray::{DynArrayRef, DynArrayRefMut};
use crate::extent::{DynExtent, Extent, StaticExtent, UnitExtent};

/// Descriptor for the element type of a container.
pub trait Element {
    /// Leaf scalar type this element bottoms out in.
    type Base;

    /// Extent chain describing the shape of one element.
    type Extent: Extent;

    /// Buffer kind occupied by one element. Containers derive their own
    /// storage from this via [`Buffer::WithDim`].
    type Buffer: Buffer<Elem = Self::Base>;

    /// Reference produced by shared indexing: `&T` for leaves, a `Copy`
    /// view struct for nested elements.
    type Ref<'a>: Clone
    where
        Self: 'a;

    /// Reference produced by mutable indexing.
    type RefMut<'a>
    where
        Self: 'a;

    /// True for the nesting markers, false for leaf scalars.
    const IS_NESTED: bool;

    /// Build a shared reference to the element at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `extent.stride()` live leaf values that remain
    /// valid for reads, and unaliased by writes, for `'a`.
    unsafe fn make_ref<'a>(ptr: *const Self::Base, extent: Self::Extent) -> Self::Ref<'a>
    where
        Self: 'a;

    /// Build a mutable reference to the element at `ptr`.
    ///
    /// # Safety
    ///
    /// As [`make_ref`](Element::make_ref), and additionally the leaf values
    /// must not be accessed through any other pointer for `'a`.
    unsafe fn make_mut<'a>(ptr: *mut Self::Base, extent: Self::Extent) -> Self::RefMut<'a>
    where
        Self: 'a;

    /// Format the element at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `extent.stride()` live leaf values.
    unsafe fn fmt_element(
        ptr: *const Self::Base,
        extent: Self::Extent,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    where
        Self::Base: fmt::Debug;
}

/// Marker for elements that are themselves fixed-size arrays.
///
/// `Array<InnerArray<i32, 3>, 2>` is a 2x3 block of `i32` in one buffer.
pub struct InnerArray<E, const N: usize> {
    _marker: PhantomData<E>,
}

/// Marker for elements that are construction-sized arrays.
///
/// All sibling elements share a single extent; the per-element size is part
/// of the container's extent chain, not of each element.
pub struct InnerDynArray<E> {
    _marker: PhantomData<E>,
}

impl<E: Element, const N: usize> Element for InnerArray<E, N> {
    type Base = E::Base;
    type Extent = StaticExtent<E::Extent, N>;
    type Buffer = <E::Buffer as Buffer>::WithDim<N>;
    type Ref<'a>
        = ArrayRef<'a, E, N>
    where
        Self: 'a;
    type RefMut<'a>
        = ArrayRefMut<'a, E, N>
    where
        Self: 'a;

    const IS_NESTED: bool = true;

    unsafe fn make_ref<'a>(ptr: *const E::Base, extent: Self::Extent) -> ArrayRef<'a, E, N>
    where
        Self: 'a,
    {
        unsafe { ArrayRef::from_raw_parts(ptr, extent.inner) }
    }

    unsafe fn make_mut<'a>(ptr: *mut E::Base, extent: Self::Extent) -> ArrayRefMut<'a, E, N>
    where
        Self: 'a,
    {
        unsafe { ArrayRefMut::from_raw_parts(ptr, extent.inner) }
    }

    unsafe fn fmt_element(
        ptr: *const E::Base,
        extent: Self::Extent,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    where
        E::Base: fmt::Debug,
    {
        fmt_nested::<E>(ptr, N, extent.inner, f)
    }
}

impl<E: Element> Element for InnerDynArray<E> {
    type Base = E::Base;
    type Extent = DynExtent<E::Extent>;
    type Buffer = HeapBuffer<E::Base>;
    type Ref<'a>
        = DynArrayRef<'a, E>
    where
        Self: 'a;
    type RefMut<'a>
        = DynArrayRefMut<'a, E>
    where
        Self: 'a;

    const IS_NESTED: bool = true;

    unsafe fn make_ref<'a>(ptr: *const E::Base, extent: Self::Extent) -> DynArrayRef<'a, E>
    where
        Self: 'a,
    {
        unsafe { DynArrayRef::from_raw_parts(ptr, extent.size, extent.inner) }
    }

    unsafe fn make_mut<'a>(ptr: *mut E::Base, extent: Self::Extent) -> DynArrayRefMut<'a, E>
    where
        Self: 'a,
    {
        unsafe { DynArrayRefMut::from_raw_parts(ptr, extent.size, extent.inner) }
    }

    unsafe fn fmt_element(
        ptr: *const E::Base,
        extent: Self::Extent,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    where
        E::Base: fmt::Debug,
    {
        fmt_nested::<E>(ptr, extent.size, extent.inner, f)
    }
}

/// Format `len` elements starting at `ptr` as a list.
///
/// # Safety
///
/// `ptr` must point to `len * extent.stride()` live leaf values.
pub(crate) unsafe fn fmt_nested<E: Element>(
    ptr: *const E::Base,
    len: usize,
    extent: E::Extent,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result
where
    E::Base: fmt::Debug,
{
    let stride = extent.stride();
    f.debug_list()
        .entries((0..len).map(|i| DebugElement::<E> {
            // Safety: element `i` starts `i * stride` leafs into the block.
            ptr: unsafe { ptr.add(i * stride) },
            extent,
        }))
        .finish()
}

/// Adapter that formats a raw element through [`Element::fmt_element`].
struct DebugElement<E: Element> {
    ptr: *const E::Base,
    extent: E::Extent,
}

impl<E: Element> fmt::Debug for DebugElement<E>
where
    E::Base: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Safety: constructed from a live element by `fmt_nested`.
        unsafe { E::fmt_element(self.ptr, self.extent, f) }
    }
}

/// A value that can populate one element slot of a container.
///
/// Leaf scalars are sources for themselves; whole containers and views are
/// sources for the matching nesting marker. There is no piecewise
/// construction path for nested elements: an element enters a container
/// whole, with a shape equal to the container's element extent.
pub trait ElementSource<E: Element> {
    /// Extent chain of the element this source produces.
    fn source_extent(&self) -> E::Extent;

    /// Clone-construct one element into `dst`.
    ///
    /// # Safety
    ///
    /// `dst` must point to `self.source_extent().stride()` allocated,
    /// uninitialized leaf slots. If a clone panics, slots already written
    /// are dropped before unwinding continues.
    unsafe fn write_to(&self, dst: *mut E::Base);

    /// Clone-assign one element over the live element at `dst`.
    ///
    /// # Safety
    ///
    /// `dst` must point to `self.source_extent().stride()` live leaf
    /// values, unaliased by `self`.
    unsafe fn assign_to(&self, dst: *mut E::Base);

    /// Move-construct one element into `dst`, consuming the source.
    ///
    /// Sources that borrow their element clone instead.
    ///
    /// # Safety
    ///
    /// As [`write_to`](ElementSource::write_to).
    unsafe fn move_to(self, dst: *mut E::Base)
    where
        Self: Sized,
    {
        unsafe { self.write_to(dst) };
    }
}

/// Leaf scalars are sources for themselves.
impl<T> ElementSource<T> for T
where
    T: Element<Base = T, Extent = UnitExtent> + Clone,
{
    fn source_extent(&self) -> UnitExtent {
        UnitExtent
    }

    unsafe fn write_to(&self, dst: *mut T) {
        unsafe { dst.write(self.clone()) };
    }

    unsafe fn assign_to(&self, dst: *mut T) {
        unsafe { (*dst).clone_from(self) };
    }

    unsafe fn move_to(self, dst: *mut T) {
        unsafe { dst.write(self) };
    }
}

macro_rules! tuple_leaf_element {
    ($( ($($T:ident),+) ),+ $(,)?) => {
        $(
            impl<$($T),+> Element for ($($T,)+) {
                type Base = ($($T,)+);
                type Extent = UnitExtent;
                type Buffer = LeafBuffer<($($T,)+)>;
                type Ref<'a>
                    = &'a ($($T,)+)
                where
                    Self: 'a;
                type RefMut<'a>
                    = &'a mut ($($T,)+)
                where
                    Self: 'a;

                const IS_NESTED: bool = false;

                unsafe fn make_ref<'a>(
                    ptr: *const Self::Base,
                    _extent: UnitExtent,
                ) -> &'a ($($T,)+)
                where
                    Self: 'a,
                {
                    unsafe { &*ptr }
                }

                unsafe fn make_mut<'a>(
                    ptr: *mut Self::Base,
                    _extent: UnitExtent,
                ) -> &'a mut ($($T,)+)
                where
                    Self: 'a,
                {
                    unsafe { &mut *ptr }
                }

                unsafe fn fmt_element(
                    ptr: *const Self::Base,
                    _extent: UnitExtent,
                    f: &mut fmt::Formatter<'_>,
                ) -> fmt::Result
                where
                    Self::Base: fmt::Debug,
                {
                    fmt::Debug::fmt(unsafe { &*ptr }, f)
                }
            }
        )+
    };
}

tuple_leaf_element!((A, B), (A, B, C), (A, B, C, D));

crate::leaf_element!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String
);
