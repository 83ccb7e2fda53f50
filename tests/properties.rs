//! Property tests for the comparison engine and stack trace limiting.

use std::cmp::Ordering;

use proptest::prelude::*;
use verity::engine::{
    compare_numeric, contains, deep_equal, is_empty, multiset_equal, subset, to_f64,
};
use verity::stacktrace::{CaptureConfig, StackTrace};
use verity::value::Reflect;

fn backtrace_text(depth: usize) -> String {
    (0..depth)
        .map(|i| {
            format!(
                "{:>4}: app::module::function_{}\n             at ./src/module.rs:{}:5\n",
                i,
                i,
                i + 1
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn compare_is_reflexive(x in any::<i64>()) {
        prop_assert_eq!(compare_numeric(&x.reflect(), &x.reflect()), Ok(Ordering::Equal));
    }

    #[test]
    fn compare_is_antisymmetric(x in -1_000_000i32..1_000_000, y in -1_000_000i32..1_000_000) {
        let forward = compare_numeric(&x.reflect(), &y.reflect()).unwrap();
        let backward = compare_numeric(&y.reflect(), &x.reflect()).unwrap();
        prop_assert_eq!(forward, backward.reverse());
    }

    #[test]
    fn compare_crosses_widths(x in any::<i16>()) {
        let widened = f64::from(x).reflect();
        prop_assert_eq!(compare_numeric(&x.reflect(), &widened), Ok(Ordering::Equal));
    }

    #[test]
    fn coercion_never_fails_on_numbers(a in any::<u32>(), b in any::<i8>(), c in any::<f32>()) {
        prop_assert!(to_f64(&a.reflect()).is_ok());
        prop_assert!(to_f64(&b.reflect()).is_ok());
        prop_assert!(to_f64(&c.reflect()).is_ok());
    }

    #[test]
    fn deep_equal_agrees_with_partial_eq(a in prop::collection::vec(any::<i32>(), 0..8),
                                         b in prop::collection::vec(any::<i32>(), 0..8)) {
        prop_assert_eq!(deep_equal(&a.reflect(), &b.reflect()), a == b);
    }

    #[test]
    fn subset_implies_every_element_is_contained(
        sup in prop::collection::vec(0u8..16, 0..12),
        sub in prop::collection::vec(0u8..16, 0..6),
    ) {
        if subset(&sup.reflect(), &sub.reflect()) == Ok(true) {
            for item in &sub {
                prop_assert_eq!(contains(&sup.reflect(), &item.reflect()), Ok(true));
            }
        }
    }

    #[test]
    fn multiset_equal_is_symmetric(
        a in prop::collection::vec(0u8..4, 0..8),
        b in prop::collection::vec(0u8..4, 0..8),
    ) {
        prop_assert_eq!(
            multiset_equal(&a.reflect(), &b.reflect()),
            multiset_equal(&b.reflect(), &a.reflect())
        );
    }

    #[test]
    fn multiset_equal_accepts_permutations(a in prop::collection::vec(any::<i64>(), 0..10)) {
        let mut reversed = a.clone();
        reversed.reverse();
        let mut sorted = a.clone();
        sorted.sort_unstable();
        prop_assert_eq!(multiset_equal(&a.reflect(), &reversed.reflect()), Ok(true));
        prop_assert_eq!(multiset_equal(&sorted.reflect(), &a.reflect()), Ok(true));
    }

    #[test]
    fn emptiness_matches_length(v in prop::collection::vec(any::<u8>(), 0..4)) {
        prop_assert_eq!(is_empty(&v.reflect()), v.is_empty());
    }

    #[test]
    fn limit_never_exceeds_request(depth in 0usize..40, n in 0usize..50) {
        let config = CaptureConfig { skip_frames: 0, ..CaptureConfig::DEFAULT };
        let trace = StackTrace::from_text(&backtrace_text(depth), &config);
        let limited = trace.limit(n);
        prop_assert_eq!(limited.frames().len(), n.min(trace.frames().len()));
        prop_assert_eq!(limited.raw(), trace.raw());
    }
}
