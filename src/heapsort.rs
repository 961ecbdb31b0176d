/// Sorts `v` using heapsort, which guarantees *O*(*n* \* log(*n*)) worst-case.
///
/// Used by the quicksort driver once its budget of imbalanced partitions is exhausted.
#[cold]
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn heapsort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    // This binary heap respects the invariant `parent >= child`.
    let mut sift_down = |v: &mut [T], mut node| {
        loop {
            // Children of `node`.
            let mut child = 2 * node + 1;
            if child >= v.len() {
                break;
            }

            // Choose the greater child.
            if child + 1 < v.len() && is_less(&v[child], &v[child + 1]) {
                child += 1;
            }

            // Stop if the invariant holds at `node`.
            if !is_less(&v[node], &v[child]) {
                break;
            }

            // Swap `node` with the greater child, move one step down, and continue sifting.
            v.swap(node, child);
            node = child;
        }
    };

    // Build the heap in linear time.
    for i in (0..v.len() / 2).rev() {
        sift_down(v, i);
    }

    // Pop maximal elements from the heap.
    for i in (1..v.len()).rev() {
        v.swap(0, i);
        sift_down(&mut v[..i], 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heapsort_duplicates() {
        let mut v = [5, 3, 3, 3, 1, 4, 3, 9, 0, 0];
        heapsort(&mut v, &mut |a, b| a < b);
        assert_eq!(v, [0, 0, 1, 3, 3, 3, 3, 4, 5, 9]);
    }

    #[test]
    fn heapsort_trivial() {
        let mut empty: [u8; 0] = [];
        heapsort(&mut empty, &mut |a, b| a < b);

        let mut one = [7];
        heapsort(&mut one, &mut |a, b| a < b);
        assert_eq!(one, [7]);
    }
}
