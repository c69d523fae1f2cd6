//! Property-based tests for the list sorts.

use proptest::prelude::*;
use roster::{merge_sort, quick_sort, radix_quicksort, Algorithm, IntoKey, Key, List};

// =============================================================================
// Test helpers
// =============================================================================

/// A value with an optional integer key and its input position.
type Tagged = (Option<i64>, usize);

fn tagged(keys: &[Option<i64>]) -> List<Tagged> {
    return keys.iter().copied().zip(0..).collect();
}

fn tag_key(t: &Tagged) -> Option<i64> {
    return t.0;
}

fn arbitrary_keys() -> impl Strategy<Value = Vec<Option<i64>>> {
    return prop::collection::vec(prop::option::weighted(0.9, -20i64..20), 0..200);
}

fn keys_of(list: &List<Tagged>) -> Vec<Key> {
    return list.iter().map(|t| t.0.into_key()).collect();
}

fn sorted_tags(list: &List<Tagged>) -> Vec<usize> {
    let mut tags: Vec<usize> = list.iter().map(|t| t.1).collect();
    tags.sort();
    return tags;
}

// =============================================================================
// Ordering and permutation
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Merge and quick sort produce a non-decreasing permutation.
    #[test]
    fn comparison_sorts_order_and_permute(keys in arbitrary_keys()) {
        let list = tagged(&keys);
        for algorithm in [Algorithm::Merge, Algorithm::Quick] {
            let sorted = algorithm.sort(&list, tag_key);
            prop_assert_eq!(sorted.len(), list.len());
            let out = keys_of(&sorted);
            prop_assert!(out.windows(2).all(|w| w[0] <= w[1]), "{} out of order", algorithm);
            prop_assert_eq!(sorted_tags(&sorted), (0..keys.len()).collect::<Vec<usize>>());
        }
    }

    /// Merge sort keeps equal keys in input order.
    #[test]
    fn merge_sort_is_stable(keys in arbitrary_keys()) {
        let list = tagged(&keys);
        let sorted: Vec<Tagged> = merge_sort(&list, tag_key).iter().copied().collect();
        let mut expected: Vec<Tagged> = list.iter().copied().collect();
        expected.sort_by(|a, b| a.0.into_key().cmp(&b.0.into_key()));
        prop_assert_eq!(sorted, expected);
    }

    /// Sorting never changes the input list.
    #[test]
    fn input_is_untouched(keys in arbitrary_keys()) {
        let list = tagged(&keys);
        let before: Vec<Tagged> = list.iter().copied().collect();
        for algorithm in Algorithm::ALL {
            let _ = algorithm.sort(&list, tag_key);
        }
        prop_assert_eq!(list.iter().copied().collect::<Vec<Tagged>>(), before);
    }

    /// Sorting sorted output changes nothing.
    #[test]
    fn sorting_is_idempotent(keys in arbitrary_keys()) {
        let list = tagged(&keys);
        for algorithm in Algorithm::ALL {
            let once = algorithm.sort(&list, tag_key);
            let twice = algorithm.sort(&once, tag_key);
            prop_assert_eq!(keys_of(&once), keys_of(&twice));
        }
    }

    /// Radix quicksort orders text the way `Key` does.
    #[test]
    fn radix_agrees_with_key_order_on_text(words in prop::collection::vec("[a-cA-C]{0,6}", 0..150)) {
        let list: List<String> = words.iter().cloned().collect();
        let sorted = radix_quicksort(&list, |w: &String| w.clone());
        let out: Vec<Key> = sorted.iter().map(|w| w.as_str().into_key()).collect();
        let mut expected: Vec<Key> = words.iter().map(|w| w.as_str().into_key()).collect();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    /// Radix quicksort puts missing keys last in input order.
    #[test]
    fn radix_missing_keys_last(keys in arbitrary_keys()) {
        let list = tagged(&keys);
        let sorted = radix_quicksort(&list, tag_key);
        let missing: Vec<usize> = sorted.iter().skip_while(|t| t.0.is_some()).map(|t| t.1).collect();
        let expected: Vec<usize> = list.iter().filter(|t| t.0.is_none()).map(|t| t.1).collect();
        prop_assert_eq!(missing, expected);
        prop_assert_eq!(sorted_tags(&sorted), (0..keys.len()).collect::<Vec<usize>>());
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn five_numbers_every_algorithm() {
    let list: List<i64> = [5, 1, 3, 2, 4].into_iter().collect();
    for algorithm in [Algorithm::Merge, Algorithm::Quick] {
        let sorted: Vec<i64> = algorithm.sort(&list, |v: &i64| *v).iter().copied().collect();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5], "{algorithm}");
    }
}

#[test]
fn words_with_shared_prefixes() {
    let list: List<&'static str> = ["banana", "band", "bandana", "ant"].into_iter().collect();
    let sorted: Vec<&str> = radix_quicksort(&list, |w: &&'static str| *w).iter().copied().collect();
    assert_eq!(sorted, vec!["ant", "banana", "band", "bandana"]);
    let quick: Vec<&str> = quick_sort(&list, |w: &&'static str| *w).iter().copied().collect();
    assert_eq!(quick, sorted);
}

#[test]
fn counts_descending_keeps_ties_in_order() {
    let list: List<(&'static str, i64)> =
        [("chile", 3), ("peru", 7), ("ecuador", 3), ("mexico", 1)].into_iter().collect();
    let sorted: Vec<&str> = merge_sort(&list, |c: &(&'static str, i64)| -c.1).iter().map(|c| c.0).collect();
    assert_eq!(sorted, vec!["peru", "chile", "ecuador", "mexico"]);
}
