//! Shape descriptors for nested containers.
//!
//! An extent chain describes the shape of one element: one node per nested
//! dimension, terminated by [`UnitExtent`] at the leaf. The chain is part of
//! the container's type, so nesting depth and which levels are static is
//! resolved entirely at compile time; only dynamic levels carry runtime
//! state.

use std::fmt::Debug;

use smallvec::SmallVec;

/// Dimension sizes of a container, outermost first.
///
/// Stored inline for up to 4 dims.
pub type Shape = SmallVec<[usize; 4]>;

/// A chain of per-dimension shape nodes.
pub trait Extent: Copy + Debug + Default + PartialEq {
    /// Number of construction-time sizes this chain consumes.
    const DYN_DIMS: usize;

    /// Number of leaf scalars spanned by one element with this shape.
    fn stride(&self) -> usize;

    /// Build the chain from per-level sizes, outermost first. Only dynamic
    /// levels consume an entry.
    ///
    /// Panics if `dims.len() != Self::DYN_DIMS`.
    fn from_dims(dims: &[usize]) -> Self;

    /// Append the size of every level, outermost first, static levels
    /// included.
    fn collect_shape(&self, shape: &mut Shape);
}

/// Terminator of an extent chain. Describes a single scalar.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitExtent;

impl Extent for UnitExtent {
    const DYN_DIMS: usize = 0;

    fn stride(&self) -> usize {
        1
    }

    fn from_dims(dims: &[usize]) -> UnitExtent {
        assert!(
            dims.is_empty(),
            "expected 0 dimension sizes, got {}",
            dims.len()
        );
        UnitExtent
    }

    fn collect_shape(&self, _shape: &mut Shape) {}
}

/// Extent node for a dimension whose size is fixed at compile time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticExtent<E, const N: usize> {
    pub(crate) inner: E,
}

impl<E: Extent, const N: usize> StaticExtent<E, N> {
    /// Size of this dimension.
    pub fn top_extent(&self) -> usize {
        N
    }

    /// Extent chain of one element of this dimension.
    pub fn inner(&self) -> E {
        self.inner
    }
}

impl<E: Extent, const N: usize> Extent for StaticExtent<E, N> {
    const DYN_DIMS: usize = E::DYN_DIMS;

    fn stride(&self) -> usize {
        N * self.inner.stride()
    }

    fn from_dims(dims: &[usize]) -> Self {
        StaticExtent {
            inner: E::from_dims(dims),
        }
    }

    fn collect_shape(&self, shape: &mut Shape) {
        shape.push(N);
        self.inner.collect_shape(shape);
    }
}

/// Extent node for a dimension whose size is chosen when the container is
/// constructed.
///
/// The default value has size zero, matching a default-constructed
/// container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DynExtent<E> {
    pub(crate) size: usize,
    pub(crate) inner: E,
}

impl<E: Extent> DynExtent<E> {
    /// Size of this dimension.
    pub fn top_extent(&self) -> usize {
        self.size
    }

    /// Extent chain of one element of this dimension.
    pub fn inner(&self) -> E {
        self.inner
    }
}

impl<E: Extent> Extent for DynExtent<E> {
    const DYN_DIMS: usize = 1 + E::DYN_DIMS;

    fn stride(&self) -> usize {
        self.size * self.inner.stride()
    }

    fn from_dims(dims: &[usize]) -> Self {
        assert!(!dims.is_empty(), "missing size for dynamic dimension");
        DynExtent {
            size: dims[0],
            inner: E::from_dims(&dims[1..]),
        }
    }

    fn collect_shape(&self, shape: &mut Shape) {
        shape.push(self.size);
        self.inner.collect_shape(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::{DynExtent, Extent, Shape, StaticExtent, UnitExtent};

    #[test]
    fn test_stride() {
        assert_eq!(UnitExtent.stride(), 1);

        let e = StaticExtent::<UnitExtent, 4>::from_dims(&[]);
        assert_eq!(e.stride(), 4);

        let e = DynExtent::<StaticExtent<UnitExtent, 4>>::from_dims(&[3]);
        assert_eq!(e.stride(), 12);
        assert_eq!(e.top_extent(), 3);

        let e = StaticExtent::<DynExtent<UnitExtent>, 2>::from_dims(&[5]);
        assert_eq!(e.stride(), 10);
    }

    #[test]
    fn test_dyn_dims() {
        assert_eq!(UnitExtent::DYN_DIMS, 0);
        assert_eq!(StaticExtent::<UnitExtent, 4>::DYN_DIMS, 0);
        assert_eq!(DynExtent::<DynExtent<UnitExtent>>::DYN_DIMS, 2);
        assert_eq!(DynExtent::<StaticExtent<UnitExtent, 3>>::DYN_DIMS, 1);
    }

    #[test]
    fn test_collect_shape() {
        let e = DynExtent::<StaticExtent<UnitExtent, 4>>::from_dims(&[3]);
        let mut shape = Shape::new();
        e.collect_shape(&mut shape);
        assert_eq!(shape.as_slice(), &[3, 4]);
    }

    #[test]
    fn test_default_is_empty() {
        let e = DynExtent::<UnitExtent>::default();
        assert_eq!(e.top_extent(), 0);
        assert_eq!(e.stride(), 0);
    }

    #[test]
    #[should_panic(expected = "missing size")]
    fn test_from_dims_too_few() {
        DynExtent::<DynExtent<UnitExtent>>::from_dims(&[3]);
    }

    #[test]
    #[should_panic(expected = "expected 0 dimension sizes")]
    fn test_from_dims_too_many() {
        DynExtent::<UnitExtent>::from_dims(&[3, 4]);
    }
}
