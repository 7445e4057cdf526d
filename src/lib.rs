//! multidim provides multidimensional containers whose nesting is described
//! in the type and whose leaf values all live in one contiguous buffer.
//!
//! # Containers and elements
//!
//! There are three container kinds, differing in how the top dimension is
//! sized:
//!
//! | Top dimension | Container |
//! | ------------- | --------- |
//! | Fixed at compile time | [Array] |
//! | Fixed at construction | [DynArray] |
//! | Growable | [Vector] |
//!
//! The element parameter is either a leaf scalar type or a nesting marker:
//! [`InnerArray`] for a nested compile-time-sized dimension,
//! [`InnerDynArray`] for a nested construction-sized dimension. A
//! `DynArray<InnerDynArray<i32>>` is a 2D grid in a single heap
//! allocation, not a vector of row allocations; an
//! `Array<InnerArray<i32, 3>, 2>` is a 2x3 block with no heap allocation
//! at all. There is no growable nesting marker: all sibling elements share
//! one shape, which a growable inner dimension would break.
//!
//! Indexing a nested container yields *fake references*: lightweight views
//! ([`ArrayRef`], [`DynArrayRef`] and their `Mut` counterparts) holding a
//! pointer and a shape rather than a materialized element.
//!
//! ```
//! use multidim::{DynArray, InnerDynArray};
//!
//! let mut grid = DynArray::<InnerDynArray<i32>>::new(&[2, 3]);
//! for (i, row) in grid.iter_mut().enumerate() {
//!     for (j, cell) in row.into_iter().enumerate() {
//!         *cell = (i * 3 + j) as i32;
//!     }
//! }
//! assert_eq!(grid.at(1).at(2), &5);
//! assert_eq!(grid.as_slice(), &[0, 1, 2, 3, 4, 5]);
//! ```
//!
//! Custom scalar types opt into being leaf elements with
//! [`leaf_element!`](crate::leaf_element).

pub mod alg;
pub mod buffer;
pub mod errors;
#[cfg(feature = "random")]
pub mod random;

mod array;
mod dynarray;
mod element;
mod extent;
mod iter;
mod macros;
mod uninit;
mod vector;

pub use array::{Array, ArrayRef, ArrayRefMut};
pub use dynarray::{DynArray, DynArrayRef, DynArrayRefMut};
pub use element::{Element, ElementSource, InnerArray, InnerDynArray};
pub use extent::{DynExtent, Extent, Shape, StaticExtent, UnitExtent};
pub use iter::{Iter, IterMut};
pub use vector::Vector;

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::{Element, ElementSource, Extent};
}

// This module is public for use by this crate's tests, but currently
// considered internal.
#[doc(hidden)]
pub mod test_util;
