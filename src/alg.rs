//! Sequence algorithms the standard library lacks.
//!
//! These are generic over [`IntoIterator`] and return positions rather
//! than iterators, so they work with container iterators and plain slices
//! alike. Operations std already covers for slices (find, count, rotate,
//! partition and friends) are deliberately not duplicated here.

/// Return the position of the first run of `count` consecutive items equal
/// to `value`.
///
/// A `count` of zero trivially matches at position 0.
pub fn find_consecutive<I>(iter: I, count: usize, value: &I::Item) -> Option<usize>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    find_consecutive_by(iter, count, |item| item == value)
}

/// Return the position of the first run of `count` consecutive items
/// matching `pred`.
pub fn find_consecutive_by<I, F>(iter: I, count: usize, mut pred: F) -> Option<usize>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> bool,
{
    if count == 0 {
        return Some(0);
    }
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, item) in iter.into_iter().enumerate() {
        if pred(&item) {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len == count {
                return Some(run_start);
            }
        } else {
            run_len = 0;
        }
    }
    None
}

/// Return the position of the first occurrence of `needle` as a contiguous
/// subsequence of `haystack`.
///
/// An empty needle matches at position 0.
pub fn search<H, N>(haystack: H, needle: N) -> Option<usize>
where
    H: IntoIterator,
    N: IntoIterator<Item = H::Item>,
    H::IntoIter: Clone,
    N::IntoIter: Clone,
    H::Item: PartialEq,
{
    search_iters(haystack.into_iter(), needle.into_iter())
}

fn search_iters<H, N>(haystack: H, needle: N) -> Option<usize>
where
    H: Iterator + Clone,
    N: Iterator<Item = H::Item> + Clone,
    H::Item: PartialEq,
{
    let mut outer = haystack;
    let mut pos = 0;
    loop {
        let mut h = outer.clone();
        let mut n = needle.clone();
        let matched = loop {
            let Some(expected) = n.next() else {
                break true;
            };
            match h.next() {
                Some(item) if item == expected => {}
                Some(_) => break false,
                // The haystack is shorter than the needle from here on.
                None => return None,
            }
        };
        if matched {
            return Some(pos);
        }
        if outer.next().is_none() {
            return None;
        }
        pos += 1;
    }
}

/// Return the position of the last occurrence of `needle` as a contiguous
/// subsequence of `haystack`, or `None` for an empty needle.
pub fn find_end<H, N>(haystack: H, needle: N) -> Option<usize>
where
    H: IntoIterator,
    N: IntoIterator<Item = H::Item>,
    H::IntoIter: Clone,
    N::IntoIter: Clone,
    H::Item: PartialEq,
{
    let needle = needle.into_iter();
    if needle.clone().next().is_none() {
        return None;
    }
    let mut h = haystack.into_iter();
    let mut base = 0;
    let mut result = None;
    while let Some(offset) = search_iters(h.clone(), needle.clone()) {
        result = Some(base + offset);
        // Restart just past the found position.
        for _ in 0..=offset {
            if h.next().is_none() {
                return result;
            }
        }
        base += offset + 1;
    }
    result
}

/// Return the position of the first difference between two sequences.
///
/// A difference is either a pair of unequal items or one sequence ending
/// before the other. Returns `None` when both end together with all items
/// equal.
pub fn mismatch<A, B>(a: A, b: B) -> Option<usize>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialEq<B::Item>,
{
    let mut b = b.into_iter();
    let mut i = 0;
    for x in a {
        match b.next() {
            Some(y) if x == y => i += 1,
            _ => return Some(i),
        }
    }
    if b.next().is_some() {
        Some(i)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{find_consecutive, find_consecutive_by, find_end, mismatch, search};
    use crate::vector::Vector;

    #[test]
    fn test_find_consecutive() {
        struct Case {
            count: usize,
            value: i32,
            expected: Option<usize>,
        }

        let cases = [
            Case {
                count: 3,
                value: 3,
                expected: Some(4),
            },
            Case {
                count: 4,
                value: 3,
                expected: None,
            },
            Case {
                count: 3,
                value: 4,
                expected: Some(7),
            },
            Case {
                count: 1,
                value: 6,
                expected: Some(10),
            },
            Case {
                count: 0,
                value: 9,
                expected: Some(0),
            },
            Case {
                count: 1,
                value: 9,
                expected: None,
            },
        ];

        let mut v = Vector::<i32>::new();
        v.extend([4, 3, 3, 2, 3, 3, 3, 4, 4, 4, 6]);

        for case in cases {
            assert_eq!(
                find_consecutive(v.iter().copied(), case.count, &case.value),
                case.expected
            );
        }
    }

    #[test]
    fn test_find_consecutive_by() {
        let values = [2, 5, 7, 9, 2, 8];
        let pos = find_consecutive_by(values, 3, |x| x % 2 == 1);
        assert_eq!(pos, Some(1));
        assert_eq!(find_consecutive_by(values, 4, |x| x % 2 == 1), None);
    }

    #[test]
    fn test_search() {
        let haystack = [1, 2, 3, 1, 2, 3, 4];
        assert_eq!(search(haystack, [2, 3, 4]), Some(4));
        assert_eq!(search(haystack, [1, 2, 3]), Some(0));
        assert_eq!(search(haystack, [4, 5]), None);
        assert_eq!(search(haystack, []), Some(0));
    }

    #[test]
    fn test_find_end() {
        let haystack = [1, 2, 3, 1, 2, 3, 4];
        assert_eq!(find_end(haystack, [1, 2, 3]), Some(3));
        assert_eq!(find_end(haystack, [4]), Some(6));
        assert_eq!(find_end(haystack, [5]), None);
        assert_eq!(find_end::<[i32; 7], [i32; 0]>(haystack, []), None);
    }

    #[test]
    fn test_mismatch() {
        assert_eq!(mismatch([1, 2, 3], [1, 2, 3]), None);
        assert_eq!(mismatch([1, 2, 3], [1, 9, 3]), Some(1));
        assert_eq!(mismatch([1, 2], [1, 2, 3]), Some(2));
        assert_eq!(mismatch([1, 2, 3], [1, 2]), Some(2));
    }
}
