/// Rotates `v` such that `v[mid]` becomes the first element. Returns the new position of the
/// element that was previously at index 0.
///
/// Every element is moved along one of `gcd(len, mid)` cycles. The element that belongs at a
/// position is always found `mid` places to its right (wrapping around), so following a cycle and
/// swapping the travelling element forward places every visited element exactly once. That makes
/// for `len - gcd(len, mid)` swaps and no allocation, independent of `T`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn rotate<T>(v: &mut [T], mid: usize) -> usize {
    let len = v.len();
    debug_assert!(mid <= len);

    if mid == 0 || mid == len {
        return 0;
    }

    let cycles = gcd(len, mid);

    for start in 0..cycles {
        let mut i = start;
        loop {
            let src = add_modulo(i, mid, len);
            if src == start {
                break;
            }

            // `v[start]` travels along the cycle, every swap drops the correct element at `i`.
            v.swap(i, src);
            i = src;
        }
    }

    len - mid
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }

    a
}

// (a + b) % n, without overflow and without the division. Requires a < n and b < n.
#[inline]
fn add_modulo(a: usize, b: usize, n: usize) -> usize {
    debug_assert!(a < n && b < n);
    let c = n - a;
    if b >= c {
        b - c
    } else {
        a + b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_letters() {
        let mut v = ['a', 'b', 'c', 'd', 'e'];

        assert_eq!(rotate(&mut v, 2), 3);
        assert_eq!(v, ['c', 'd', 'e', 'a', 'b']);

        assert_eq!(rotate(&mut v, 3), 2);
        assert_eq!(v, ['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn rotate_trivial() {
        let mut empty: [i32; 0] = [];
        assert_eq!(rotate(&mut empty, 0), 0);

        let mut v = [1, 2, 3];
        assert_eq!(rotate(&mut v, 0), 0);
        assert_eq!(rotate(&mut v, 3), 0);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn rotate_matches_std() {
        for len in 1..40 {
            for mid in 0..=len {
                let mut v: Vec<usize> = (0..len).collect();
                let mut expected = v.clone();
                expected.rotate_left(mid);

                let new_first = rotate(&mut v, mid);

                assert_eq!(v, expected, "len: {len} mid: {mid}");
                assert_eq!(v[new_first], 0);
            }
        }
    }

    #[test]
    fn rotate_non_coprime_lengths() {
        // gcd(12, 8) == 4 cycles.
        let mut v: Vec<String> = (0..12).map(|x| x.to_string()).collect();
        rotate(&mut v, 8);

        let expected: Vec<String> = (8..12).chain(0..8).map(|x| x.to_string()).collect();
        assert_eq!(v, expected);
    }

    #[test]
    fn modular_helpers() {
        assert_eq!(gcd(12, 8), 4);
        assert_eq!(gcd(7, 3), 1);
        assert_eq!(add_modulo(5, 6, 7), 4);
        assert_eq!(add_modulo(0, 6, 7), 6);
    }
}
