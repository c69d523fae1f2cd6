//! Sorting algorithms that work on [`List`] directly.
//!
//! Each algorithm reads its input list without modifying it and returns a
//! new list. Keys are computed once per value up front: the input is
//! decorated into a list of [`Entry`] values holding the normalized key
//! beside a clone of the value, the entries are sorted, and the values are
//! unwrapped again. Clones are expected to be cheap (`Rc` handles in
//! practice).
//!
//! | Algorithm | Split | Stable | Worst case |
//! |-----------|-------|--------|------------|
//! | [`merge_sort`] | slow/fast midpoint | yes | O(n log n) |
//! | [`quick_sort`] | 3-way on head pivot | no | O(n²) on sorted input |
//! | [`radix_quicksort`] | 3-way on character at depth | no | O(n · key length) partitions |

mod merge;
mod quick;
mod radix;

use std::fmt;
use std::str::FromStr;

use crate::key::{normalize, IntoKey, Key};
use crate::list::List;

pub use merge::merge_sort;
pub use quick::quick_sort;
pub use radix::radix_quicksort;

/// A value paired with its precomputed sort key.
struct Entry<K, T> {
    key: K,
    value: T,
}

fn decorate<T, K, F>(list: &List<T>, keyfn: &F) -> List<Entry<Key, T>>
where
    T: Clone,
    K: IntoKey,
    F: Fn(&T) -> K,
{
    return list
        .iter()
        .map(|value| Entry { key: normalize(keyfn, value), value: value.clone() })
        .collect();
}

fn undecorate<K, T>(list: List<Entry<K, T>>) -> List<T> {
    return list.into_iter().map(|entry| entry.value).collect();
}

/// Which sort to run, chosen at runtime by the session and the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Merge,
    Quick,
    Radix,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Merge, Algorithm::Quick, Algorithm::Radix];

    /// Sort `list` by `keyfn` with this algorithm.
    pub fn sort<T, K, F>(self, list: &List<T>, keyfn: F) -> List<T>
    where
        T: Clone,
        K: IntoKey,
        F: Fn(&T) -> K,
    {
        return match self {
            Algorithm::Merge => merge_sort(list, keyfn),
            Algorithm::Quick => quick_sort(list, keyfn),
            Algorithm::Radix => radix_quicksort(list, keyfn),
        };
    }

    pub fn name(self) -> &'static str {
        return match self {
            Algorithm::Merge => "merge sort",
            Algorithm::Quick => "quick sort",
            Algorithm::Radix => "radix quicksort",
        };
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.name());
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Algorithm, String> {
        return match s.trim().to_lowercase().as_str() {
            "merge" | "mergesort" | "merge sort" => Ok(Algorithm::Merge),
            "quick" | "quicksort" | "quick sort" => Ok(Algorithm::Quick),
            "radix" | "radix quicksort" | "string" => Ok(Algorithm::Radix),
            other => Err(format!("unknown sort algorithm '{other}'")),
        };
    }
}
