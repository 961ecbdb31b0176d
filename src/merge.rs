use core::mem;
use core::ptr;

use crate::rotate::rotate;

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` using a buffer the size of the shorter
/// run, and stores the result into `v[..]`.
///
/// The merge is stable, on ties the element of the left run is emitted first.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_buffered<T, F>(v: &mut [T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    // Merging zero-sized types has no observable effect.
    if mid == 0 || mid >= len || mem::size_of::<T>() == 0 {
        return;
    }

    // The runs are already in order, which is a common case for nearly sorted input.
    if !is_less(&v[mid], &v[mid - 1]) {
        return;
    }

    // The length is never set, `buf` only provides raw storage and never drops elements.
    let mut buf = Vec::<T>::with_capacity(mid.min(len - mid));

    // SAFETY: `buf` has room for the shorter run, `v` is exclusively borrowed and `T` is not a
    // zero-sized type.
    unsafe {
        merge(v, mid, buf.as_mut_ptr(), is_less);
    }
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` without allocating, by rotating the parts
/// that are out of order into place.
///
/// The longer run is cut in half and the matching cut in the other run is found by binary search,
/// after which rotating the middle leaves two independent, smaller merges. The smaller one is
/// solved recursively and the larger one in the loop, which bounds the recursion depth to
/// *O*(log(*n*)). Total time is *O*(*n* \* log(*n*)).
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_in_place<T, F>(mut v: &mut [T], mut mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = v.len();

        if mid == 0 || mid >= len {
            return;
        }

        if !is_less(&v[mid], &v[mid - 1]) {
            return;
        }

        let (left_cut, right_cut) = if mid >= len - mid {
            // Cut the left run in half, everything in the right run strictly smaller than the cut
            // element has to move in front of it.
            let left_cut = mid / 2;
            let (left, right) = v.split_at(mid);
            let pivot = &left[left_cut];
            (left_cut, mid + right.partition_point(|x| is_less(x, pivot)))
        } else {
            // Cut the right run in half, everything in the left run smaller than or equal to the
            // cut element stays in front of it.
            let right_cut = mid + (len - mid) / 2;
            let (left, right) = v.split_at(mid);
            let pivot = &right[right_cut - mid];
            (left.partition_point(|x| !is_less(pivot, x)), right_cut)
        };

        // v[left_cut..mid] and v[mid..right_cut] swap places.
        rotate(&mut v[left_cut..right_cut], mid - left_cut);
        let new_mid = left_cut + (right_cut - mid);

        let (low, high) = v.split_at_mut(new_mid);
        let low_mid = left_cut;
        let high_mid = right_cut - new_mid;

        if low.len() < high.len() {
            merge_in_place(low, low_mid, is_less);
            v = high;
            mid = high_mid;
        } else {
            merge_in_place(high, high_mid, is_less);
            v = low;
            mid = low_mid;
        }
    }
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` using `buf` as temporary storage, and
/// stores the result into `v[..]`.
///
/// # Safety
///
/// The two slices must be non-empty and `mid` must be in bounds. Buffer `buf` must be long enough
/// to hold a copy of the shorter slice. Also, `T` must not be a zero-sized type.
unsafe fn merge<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let arr_ptr = v.as_mut_ptr();
    let (v_mid, v_end) = unsafe { (arr_ptr.add(mid), arr_ptr.add(len)) };

    // The merge process first copies the shorter run into `buf`. Then it traces the newly copied
    // run and the longer run forwards (or backwards), comparing their next unconsumed elements and
    // copying the lesser (or greater) one into `v`.
    //
    // As soon as the shorter run is fully consumed, the process is done. If the longer run gets
    // consumed first, then we must copy whatever is left of the shorter run into the remaining
    // hole in `v`.
    //
    // Intermediate state of the process is always tracked by `hole`, which serves two purposes:
    // 1. Protects integrity of `v` from panics in `is_less`.
    // 2. Fills the remaining hole in `v` if the longer run gets consumed first.
    //
    // Panic safety:
    //
    // If `is_less` panics at any point during the process, `hole` will get dropped and fill the
    // hole in `v` with the unconsumed range in `buf`, thus ensuring that `v` still holds every
    // object it initially held exactly once.
    let mut hole;

    if mid <= len - mid {
        // The left run is shorter.
        unsafe {
            ptr::copy_nonoverlapping(arr_ptr, buf, mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(mid),
                dest: arr_ptr,
            };
        }

        // Initially, these pointers point to the beginnings of their arrays.
        let left = &mut hole.start;
        let mut right = v_mid;
        let out = &mut hole.dest;

        while *left < hole.end && right < v_end {
            // Consume the lesser side.
            // If equal, prefer the left run to maintain stability.
            unsafe {
                let to_copy = if is_less(&*right, &**left) {
                    get_and_increment(&mut right)
                } else {
                    get_and_increment(left)
                };
                ptr::copy_nonoverlapping(to_copy, get_and_increment(out), 1);
            }
        }
    } else {
        // The right run is shorter.
        unsafe {
            ptr::copy_nonoverlapping(v_mid, buf, len - mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(len - mid),
                dest: v_mid,
            };
        }

        // Initially, these pointers point past the ends of their arrays.
        let left = &mut hole.dest;
        let right = &mut hole.end;
        let mut out = v_end;

        while arr_ptr < *left && buf < *right {
            // Consume the greater side.
            // If equal, prefer the right run to maintain stability.
            unsafe {
                let to_copy = if is_less(&*right.sub(1), &*left.sub(1)) {
                    decrement_and_get(left)
                } else {
                    decrement_and_get(right)
                };
                ptr::copy_nonoverlapping(to_copy, decrement_and_get(&mut out), 1);
            }
        }
    }
    // Finally, `hole` gets dropped. If the shorter run was not fully consumed, whatever remains of
    // it will now be copied into the hole in `v`.

    unsafe fn get_and_increment<T>(ptr: &mut *mut T) -> *mut T {
        let old = *ptr;
        *ptr = unsafe { ptr.add(1) };
        old
    }

    unsafe fn decrement_and_get<T>(ptr: &mut *mut T) -> *mut T {
        *ptr = unsafe { ptr.sub(1) };
        *ptr
    }

    // When dropped, copies the range `start..end` into `dest..`.
    struct MergeHole<T> {
        start: *mut T,
        end: *mut T,
        dest: *mut T,
    }

    impl<T> Drop for MergeHole<T> {
        fn drop(&mut self) {
            // SAFETY: `T` is not a zero-sized type, and these are pointers into a slice's elements.
            unsafe {
                let len = self.end.offset_from(self.start) as usize;
                ptr::copy_nonoverlapping(self.start, self.dest, len);
            }
        }
    }
}
