//! In-place sorting, merging and rotation of slices.
//!
//! The sort is an unstable pattern-defeating quicksort with a heapsort fallback, the merges are
//! stable and either use a buffer the size of the shorter run or work purely through rotations.
//! All entry points come in a whole-slice flavor and a subrange flavor that leaves every element
//! outside the given range untouched.

use core::cmp::Ordering;
use core::mem;
use core::ops::Range;

mod heapsort;
mod merge;
mod partition;
mod pivot;
mod quicksort;
mod rotate;
mod smallsort;

/// Selects the algorithm used by the merge functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MergeMode {
    /// Copies the shorter run into a temporary buffer. *O*(*n*) time and
    /// *O*(min(*left*, *right*)) extra memory.
    Buffered,
    /// Merges by repeated rotations without allocating. *O*(*n* \* log(*n*)) time and *O*(1)
    /// extra memory.
    InPlace,
}

/// Sorts the slice, but might not preserve the order of equal elements.
///
/// This sort is unstable (i.e., may reorder equal elements), in-place
/// (i.e., does not allocate), and *O*(*n* \* log(*n*)) worst-case.
///
/// # Current implementation
///
/// The algorithm is based on [pattern-defeating quicksort][pdqsort] by Orson Peters, which
/// combines the fast average case of randomized quicksort with the fast worst case of heapsort,
/// while achieving linear time on slices with certain patterns. It uses some randomization to
/// avoid degenerate cases, but with a fixed seed to always provide deterministic behavior.
///
/// [pdqsort]: https://github.com/orlp/pdqsort
#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    unstable_sort(v, &mut |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, but might not preserve the order of equal
/// elements.
///
/// The comparator function must define a strict weak ordering for the elements in the slice. If
/// it does not, the order of the elements is unspecified, but all original elements remain in
/// the slice exactly once. If `compare` panics the slice holds some permutation of its original
/// elements.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    unstable_sort(v, &mut |a, b| compare(a, b) == Ordering::Less);
}

/// Sorts the slice with a key extraction function, but might not preserve the order of equal
/// elements.
#[inline]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    unstable_sort(v, &mut |a, b| f(a).lt(&f(b)));
}

/// Sorts `v[range]` with a comparator function, leaving the rest of `v` untouched.
///
/// # Panics
///
/// Panics if `range.start > range.end` or `range.end > v.len()`.
#[inline]
pub fn sort_range_by<T, F>(v: &mut [T], range: Range<usize>, compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(&range, v.len());
    sort_by(&mut v[range], compare);
}

/// Merges the two adjacent sorted runs `v[..mid]` and `v[mid..]` into one sorted slice.
///
/// The merge is stable: equal elements keep their relative order and elements of the left run
/// come before equal elements of the right run. If either run is not sorted the result is
/// unspecified, but still a permutation of the input.
///
/// # Panics
///
/// Panics if `mid > v.len()`.
#[inline]
pub fn merge<T>(v: &mut [T], mid: usize, mode: MergeMode)
where
    T: Ord,
{
    stable_merge(v, mid, mode, &mut |a, b| a.lt(b));
}

/// Merges the two adjacent sorted runs `v[..mid]` and `v[mid..]` with a comparator function.
///
/// See [`merge`] for the guarantees.
#[inline]
pub fn merge_by<T, F>(v: &mut [T], mid: usize, mode: MergeMode, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    stable_merge(v, mid, mode, &mut |a, b| compare(a, b) == Ordering::Less);
}

/// Merges the two adjacent sorted runs `v[..mid]` and `v[mid..]` with a key extraction
/// function.
#[inline]
pub fn merge_by_key<T, K, F>(v: &mut [T], mid: usize, mode: MergeMode, mut f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    stable_merge(v, mid, mode, &mut |a, b| f(a).lt(&f(b)));
}

/// Merges the sorted runs `v[range.start..mid]` and `v[mid..range.end]`, leaving the rest of
/// `v` untouched. `mid` is an index into `v`, not into the range.
///
/// # Panics
///
/// Panics if the range is invalid for `v` or `mid` lies outside of `range.start..=range.end`.
#[inline]
pub fn merge_range_by<T, F>(
    v: &mut [T],
    range: Range<usize>,
    mid: usize,
    mode: MergeMode,
    compare: F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(&range, v.len());
    check_split(&range, mid);
    let start = range.start;
    merge_by(&mut v[range], mid - start, mode, compare);
}

/// Rotates the slice in-place such that `v[mid]` becomes the first element and `v[..mid]` moves
/// to the end, preserving the relative order inside both parts.
///
/// Returns the new index of the element that was at index 0. Uses *O*(*n*) swaps and no
/// allocation.
///
/// # Panics
///
/// Panics if `mid > v.len()`.
#[inline]
pub fn rotate<T>(v: &mut [T], mid: usize) -> usize {
    assert!(
        mid <= v.len(),
        "rotation point {} out of range for slice of length {}",
        mid,
        v.len()
    );
    rotate::rotate(v, mid)
}

/// Rotates `v[range]` such that `v[new_first]` becomes its first element, leaving the rest of
/// `v` untouched. Returns the new index in `v` of the element that was at `range.start`.
///
/// # Panics
///
/// Panics if the range is invalid for `v` or `new_first` lies outside of
/// `range.start..=range.end`.
#[inline]
pub fn rotate_range<T>(v: &mut [T], range: Range<usize>, new_first: usize) -> usize {
    check_range(&range, v.len());
    check_split(&range, new_first);
    let start = range.start;
    start + rotate::rotate(&mut v[range], new_first - start)
}

// --- IMPL ---

fn unstable_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    // Sorting has no meaningful behavior on zero-sized types.
    if mem::size_of::<T>() == 0 {
        return;
    }

    let len = v.len();
    if len < 2 {
        return;
    }

    if len <= smallsort::SMALL_SORT_THRESHOLD {
        smallsort::insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    let (streak_end, was_reversed) = find_streak(v, is_less);
    if streak_end == len {
        if was_reversed {
            v.reverse();
        }
        return;
    }

    // Limit the number of imbalanced partitions to `2 * floor(log2(len))`.
    // The binary OR by one is used to eliminate the zero-check in the logarithm.
    let limit = 2 * (len | 1).ilog2();

    quicksort::quicksort(v, is_less, None, limit);
}

fn stable_merge<T, F>(v: &mut [T], mid: usize, mode: MergeMode, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(
        mid <= v.len(),
        "merge point {} out of range for slice of length {}",
        mid,
        v.len()
    );

    match mode {
        MergeMode::Buffered => merge::merge_buffered(v, mid, is_less),
        MergeMode::InPlace => merge::merge_in_place(v, mid, is_less),
    }
}

/// Finds a streak of presorted elements starting at the beginning of the slice. Returns the first
/// index that is not part of said streak, and a bool denoting whether the streak was reversed.
/// Streaks can be increasing or strictly decreasing.
fn find_streak<T, F>(v: &[T], is_less: &mut F) -> (usize, bool)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 {
        return (len, false);
    }

    let mut end = 2;

    // Only strictly descending streaks may be reversed, otherwise equal elements would be
    // reordered for no benefit.
    if is_less(&v[1], &v[0]) {
        while end < len && is_less(&v[end], &v[end - 1]) {
            end += 1;
        }

        (end, true)
    } else {
        while end < len && !is_less(&v[end], &v[end - 1]) {
            end += 1;
        }

        (end, false)
    }
}

fn check_range(range: &Range<usize>, len: usize) {
    assert!(
        range.start <= range.end,
        "range start {} is greater than range end {}",
        range.start,
        range.end
    );
    assert!(
        range.end <= len,
        "range end {} out of range for slice of length {}",
        range.end,
        len
    );
}

fn check_split(range: &Range<usize>, split: usize) {
    assert!(
        range.start <= split && split <= range.end,
        "split point {} outside of range {:?}",
        split,
        range
    );
}
