use std::cell::RefCell;
use std::env;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use once_cell::sync::Lazy;

use hybrid_sort::MergeMode;
use sort_test_tools::{patterns, Merge, Sort};

// --- Implementations under test ---

struct HybridSort;

impl Sort for HybridSort {
    fn name() -> String {
        "hybrid_sort_unstable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        hybrid_sort::sort(arr);
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        hybrid_sort::sort_by(arr, compare);
    }
}

struct StdUnstableSort;

impl Sort for StdUnstableSort {
    fn name() -> String {
        "rust_std_unstable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        arr.sort_unstable();
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        arr.sort_unstable_by(compare);
    }
}

struct BufferedMerge;

impl Merge for BufferedMerge {
    fn name() -> String {
        "hybrid_merge_buffered".into()
    }

    fn merge<T>(arr: &mut [T], mid: usize)
    where
        T: Ord,
    {
        hybrid_sort::merge(arr, mid, MergeMode::Buffered);
    }

    fn merge_by<T, F>(arr: &mut [T], mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        hybrid_sort::merge_by(arr, mid, MergeMode::Buffered, compare);
    }
}

struct InPlaceMerge;

impl Merge for InPlaceMerge {
    fn name() -> String {
        "hybrid_merge_in_place".into()
    }

    fn merge<T>(arr: &mut [T], mid: usize)
    where
        T: Ord,
    {
        hybrid_sort::merge(arr, mid, MergeMode::InPlace);
    }

    fn merge_by<T, F>(arr: &mut [T], mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        hybrid_sort::merge_by(arr, mid, MergeMode::InPlace, compare);
    }
}

// The stable std sort detects both runs and merges them once, which makes it the natural baseline.
struct StdStableMerge;

impl Merge for StdStableMerge {
    fn name() -> String {
        "rust_std_stable_merge".into()
    }

    fn merge<T>(arr: &mut [T], _mid: usize)
    where
        T: Ord,
    {
        arr.sort();
    }

    fn merge_by<T, F>(arr: &mut [T], _mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        arr.sort_by(compare);
    }
}

// --- Harness ---

/// Comma separated list of pattern names, limits the benchmarked patterns if set.
static PATTERN_FILTER: Lazy<Option<Vec<String>>> = Lazy::new(|| {
    env::var("BENCH_PATTERNS")
        .ok()
        .map(|patterns| patterns.split(',').map(|p| p.trim().to_string()).collect())
});

fn pattern_enabled(pattern_name: &str) -> bool {
    PATTERN_FILTER
        .as_ref()
        .map_or(true, |names| names.iter().any(|name| name == pattern_name))
}

fn measure_comp_count(
    name: &str,
    test_size: usize,
    instrumented_func: impl Fn(),
    comp_count: Rc<RefCell<u64>>,
) {
    // Measure how many comparisons are performed by a specific implementation and input
    // combination.
    let run_count: usize = if test_size <= 20 {
        100_000
    } else if test_size < 10_000 {
        3000
    } else if test_size < 100_000 {
        1000
    } else {
        100
    };

    *comp_count.borrow_mut() = 0;
    for _ in 0..run_count {
        instrumented_func();
    }

    // If there is on average less than a single comparison this will be wrong.
    let total = *comp_count.borrow() / (run_count as u64);
    println!("{name}: mean comparisons: {total}");
}

#[inline(never)]
fn bench_sort_impl<T: Ord + std::fmt::Debug, S: Sort>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: &fn(Vec<i32>) -> Vec<T>,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
) {
    let bench_name = S::name();

    if env::var("MEASURE_COMP").is_ok() {
        if transform_name == "i32" && test_size <= 100_000 {
            let name = format!("{bench_name}-comp-{transform_name}-{pattern_name}-{test_size}");
            // Instrument via sort_by to ensure the type properties such as Copy of the type
            // that is being sorted doesn't change. And we get representative numbers.
            let comp_count = Rc::new(RefCell::new(0u64));
            let comp_count_copy = comp_count.clone();
            let instrumented_sort_func = || {
                let mut test_data = transform(pattern_provider(test_size));
                S::sort_by(black_box(test_data.as_mut_slice()), |a, b| {
                    *comp_count_copy.borrow_mut() += 1;
                    a.cmp(b)
                })
            };
            measure_comp_count(&name, test_size, instrumented_sort_func, comp_count);
        }
        return;
    }

    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(
        &format!("{bench_name}-{transform_name}-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || transform(pattern_provider(test_size)),
                |mut test_data| S::sort(black_box(test_data.as_mut_slice())),
                batch_size,
            )
        },
    );
}

#[inline(never)]
fn bench_merge_impl<M: Merge>(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
    split_percent: usize,
) {
    let bench_name = M::name();
    let mid = (test_size * split_percent) / 100;

    // Both runs have to be sorted before each measured merge.
    let make_runs = || {
        let mut v = pattern_provider(test_size);
        v[..mid].sort_unstable();
        v[mid..].sort_unstable();
        v
    };

    if env::var("MEASURE_COMP").is_ok() {
        let name = format!("{bench_name}-comp-{pattern_name}-{split_percent}p-{test_size}");
        let comp_count = Rc::new(RefCell::new(0u64));
        let comp_count_copy = comp_count.clone();
        let instrumented_merge_func = || {
            let mut test_data = make_runs();
            M::merge_by(black_box(test_data.as_mut_slice()), mid, |a, b| {
                *comp_count_copy.borrow_mut() += 1;
                a.cmp(b)
            })
        };
        measure_comp_count(&name, test_size, instrumented_merge_func, comp_count);
        return;
    }

    c.bench_function(
        &format!("{bench_name}-{pattern_name}-{split_percent}p-{test_size}"),
        |b| {
            b.iter_batched(
                make_runs,
                |mut test_data| M::merge(black_box(test_data.as_mut_slice()), mid),
                BatchSize::LargeInput,
            )
        },
    );
}

fn pattern_providers() -> Vec<(&'static str, fn(usize) -> Vec<i32>)> {
    vec![
        ("random", patterns::random),
        ("random_dense", |size| {
            patterns::random_uniform(size, 0..=(((size as f64).log2().round()) as i32) as i32)
        }),
        ("random_binary", |size| {
            patterns::random_uniform(size, 0..=1 as i32)
        }),
        ("random_s95", |size| patterns::random_sorted(size, 95.0)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saws_long", |size| {
            patterns::saw_mixed(size, ((size as f64).log2().round()) as usize)
        }),
        ("saws_short", |size| {
            patterns::saw_mixed(size, (size as f64 / 22.0).round() as usize)
        }),
        ("pipe_organ", patterns::pipe_organ),
        ("median_of_three_killer", patterns::median_of_three_killer),
    ]
}

fn bench_patterns<T: Ord + std::fmt::Debug>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: fn(Vec<i32>) -> Vec<T>,
) {
    if test_size > 100_000 && !(transform_name == "i32" || transform_name == "u64") {
        // These are just too expensive.
        return;
    }

    for (pattern_name, pattern_provider) in pattern_providers().iter() {
        if (test_size < 3 && *pattern_name != "random") || !pattern_enabled(pattern_name) {
            continue;
        }

        bench_sort_impl::<T, HybridSort>(
            c,
            test_size,
            transform_name,
            &transform,
            pattern_name,
            pattern_provider,
        );

        bench_sort_impl::<T, StdUnstableSort>(
            c,
            test_size,
            transform_name,
            &transform,
            pattern_name,
            pattern_provider,
        );
    }
}

fn bench_merge_patterns(c: &mut Criterion, test_size: usize) {
    for (pattern_name, pattern_provider) in pattern_providers().iter() {
        if !matches!(*pattern_name, "random" | "random_binary" | "saws_long")
            || !pattern_enabled(pattern_name)
        {
            continue;
        }

        // Balanced runs and a short run next to a long one.
        for split_percent in [50, 5] {
            bench_merge_impl::<BufferedMerge>(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                split_percent,
            );

            bench_merge_impl::<InPlaceMerge>(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                split_percent,
            );

            bench_merge_impl::<StdStableMerge>(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                split_percent,
            );
        }
    }
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    let test_sizes = [
        0, 1, 2, 3, 5, 7, 8, 9, 11, 13, 15, 16, 17, 19, 20, 24, 28, 31, 36, 50, 101, 200, 500,
        1_000, 2_048, 10_000, 100_000, 1_000_000,
    ];

    patterns::use_random_seed_each_time();
    ensure_true_random();

    for test_size in test_sizes {
        // Basic type often used to test sorting algorithms.
        bench_patterns(c, test_size, "i32", |values| values);

        // Common type for usize on 64-bit machines.
        // Sorting indices is very common.
        bench_patterns(c, test_size, "u64", |values| {
            values
                .iter()
                .map(|val| -> u64 {
                    // Extends the value into the 64 bit range,
                    // while preserving input order.
                    let x = ((*val as i64) + (i32::MAX as i64) + 1) as u64;
                    x.checked_mul(i32::MAX as u64).unwrap()
                })
                .collect()
        });

        // Strings are compared lexicographically, so we zero extend them to maintain the input
        // order.
        bench_patterns(c, test_size, "string", |values| {
            values
                .iter()
                .map(|val| format!("{:010}", val.saturating_abs()))
                .collect()
        });

        if test_size >= 100 {
            bench_merge_patterns(c, test_size);
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
