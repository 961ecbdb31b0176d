/// Partitions `v` into elements smaller than `v[pivot]`, followed by elements greater than or
/// equal to `v[pivot]`. The pivot itself ends up between the two groups.
///
/// Returns a tuple of:
///
/// 1. The final position of the pivot, which is the number of elements smaller than it.
/// 2. True if `v` was already partitioned, meaning no element had to be swapped.
///
/// If `is_less` does not implement a strict weak order the resulting order and return value are
/// unspecified, but all original elements remain in `v`. Same is true if `is_less` panics.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn partition_right<T, F>(v: &mut [T], pivot: usize, is_less: &mut F) -> (usize, bool)
where
    F: FnMut(&T, &T) -> bool,
{
    let (mid, was_partitioned) = {
        // Place the pivot at the beginning of slice.
        v.swap(0, pivot);
        let (pivot, v) = v.split_at_mut(1);
        let pivot = &pivot[0];

        // Find the first pair of out-of-order elements.
        let mut l = 0;
        let mut r = v.len();

        // Find the first element greater than or equal to the pivot.
        while l < r && is_less(&v[l], pivot) {
            l += 1;
        }

        // Find the last element smaller that the pivot.
        while l < r && !is_less(&v[r - 1], pivot) {
            r -= 1;
        }

        let was_partitioned = l >= r;

        loop {
            while l < r && is_less(&v[l], pivot) {
                l += 1;
            }

            while l < r && !is_less(&v[r - 1], pivot) {
                r -= 1;
            }

            // Are we done?
            if l >= r {
                break;
            }

            // Swap the found pair of out-of-order elements.
            r -= 1;
            v.swap(l, r);
            l += 1;
        }

        (l, was_partitioned)
    };

    // Place the pivot between the two partitions.
    v.swap(0, mid);

    (mid, was_partitioned)
}

/// Partitions `v` into elements smaller than or equal to `v[pivot]`, followed by elements
/// greater than `v[pivot]`. The pivot itself ends up as the last element of the first group.
///
/// Returns the final position of the pivot. Used for slices that are known to contain no element
/// smaller than the pivot, in which case everything up to and including the returned index is
/// equal to the pivot and needs no further sorting.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn partition_left<T, F>(v: &mut [T], pivot: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mid = {
        v.swap(0, pivot);
        let (pivot, v) = v.split_at_mut(1);
        let pivot = &pivot[0];

        let mut l = 0;
        let mut r = v.len();

        loop {
            // Find the first element greater than the pivot.
            while l < r && !is_less(pivot, &v[l]) {
                l += 1;
            }

            // Find the last element smaller than or equal to the pivot.
            while l < r && is_less(pivot, &v[r - 1]) {
                r -= 1;
            }

            if l >= r {
                break;
            }

            r -= 1;
            v.swap(l, r);
            l += 1;
        }

        l
    };

    v.swap(0, mid);

    mid
}
