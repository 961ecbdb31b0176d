pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

/// Merges the two sorted runs `arr[..mid]` and `arr[mid..]`.
pub trait Merge {
    fn name() -> String;

    fn merge<T>(arr: &mut [T], mid: usize)
    where
        T: Ord;

    fn merge_by<T, F>(arr: &mut [T], mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

#[doc(hidden)]
pub use paste;

pub mod patterns;
pub mod test_types;
