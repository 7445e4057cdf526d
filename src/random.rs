//! Randomized algorithms over containers.

use std::ptr;

use fastrand::Rng;

use crate::dynarray::DynArrayRefMut;
use crate::element::Element;
use crate::extent::Extent;

/// Shuffle the elements of a view in place (Fisher-Yates).
///
/// Whole elements are exchanged by swapping their leaf blocks.
pub fn shuffle<E: Element>(mut view: DynArrayRefMut<'_, E>, rng: &mut Rng) {
    let stride = view.extents().stride();
    let len = view.len();
    let base = view.as_mut_slice().as_mut_ptr();
    for i in (1..len).rev() {
        let j = rng.usize(..=i);
        if i != j {
            // Distinct elements are `stride` leafs apart and never overlap.
            unsafe { ptr::swap_nonoverlapping(base.add(i * stride), base.add(j * stride), stride) };
        }
    }
}

/// Select `n` items uniformly at random, preserving their order of
/// appearance in the reservoir (Algorithm R).
///
/// Returns fewer than `n` items if the sequence is shorter than `n`.
pub fn sample<I>(iter: I, n: usize, rng: &mut Rng) -> Vec<I::Item>
where
    I: IntoIterator,
{
    let mut reservoir = Vec::with_capacity(n);
    if n == 0 {
        return reservoir;
    }
    let mut seen = 0;
    for item in iter {
        seen += 1;
        if reservoir.len() < n {
            reservoir.push(item);
        } else {
            let j = rng.usize(..seen);
            if j < n {
                reservoir[j] = item;
            }
        }
    }
    reservoir
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use super::{sample, shuffle};
    use crate::dynarray::DynArray;
    use crate::element::InnerDynArray;

    #[test]
    fn test_shuffle_permutes() {
        let mut rng = Rng::with_seed(0x5eed);
        let mut v = DynArray::<i32>::new(&[20]);
        for (i, x) in v.iter_mut().enumerate() {
            *x = i as i32;
        }

        shuffle(v.view_mut(), &mut rng);

        let mut sorted: Vec<i32> = v.as_slice().to_vec();
        sorted.sort_unstable();
        let expected: Vec<i32> = (0..20).collect();
        assert_eq!(sorted, expected);
        // With this seed the permutation is not the identity.
        assert_ne!(v.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_shuffle_moves_whole_rows() {
        let mut rng = Rng::with_seed(42);
        let mut grid = DynArray::<InnerDynArray<i32>>::new(&[6, 3]);
        for (i, x) in grid.as_mut_slice().iter_mut().enumerate() {
            *x = i as i32;
        }

        shuffle(grid.view_mut(), &mut rng);

        // Every row is still one of the original rows, intact.
        for row in grid.iter() {
            let first = *row.at(0);
            assert_eq!(first % 3, 0);
            assert_eq!(row.as_slice(), &[first, first + 1, first + 2]);
        }
    }

    #[test]
    fn test_sample() {
        let mut rng = Rng::with_seed(7);
        let items = sample(0..100, 10, &mut rng);
        assert_eq!(items.len(), 10);
        for x in &items {
            assert!((0..100).contains(x));
        }

        let all = sample(0..5, 10, &mut rng);
        assert_eq!(all, [0, 1, 2, 3, 4]);

        assert!(sample(0..100, 0, &mut rng).is_empty());
    }
}
