use super::{decorate, undecorate, Entry};
use crate::collection::Collection;
use crate::key::{IntoKey, Key};
use crate::list::List;

/// Three-way quicksort.
///
/// The pivot is always the head value. Every value lands in a less, equal
/// or greater list; less and greater are sorted recursively and the three
/// are concatenated, with the equal run left in input order. There is no
/// pivot randomization, so already sorted input degrades to O(n²) time and
/// O(n) recursion depth.
pub fn quick_sort<T, K, F>(list: &List<T>, keyfn: F) -> List<T>
where
    T: Clone,
    K: IntoKey,
    F: Fn(&T) -> K,
{
    return undecorate(sort(decorate(list, &keyfn)));
}

fn sort<T>(list: List<Entry<Key, T>>) -> List<Entry<Key, T>> {
    let pivot = match list.front() {
        Some(head) if list.len() > 1 => head.key.clone(),
        _ => return list,
    };

    let mut less = List::new();
    let mut equal = List::new();
    let mut greater = List::new();
    for entry in list {
        if entry.key < pivot {
            less.append(entry);
        } else if entry.key == pivot {
            equal.append(entry);
        } else {
            greater.append(entry);
        }
    }

    let mut out = sort(less);
    Collection::append(&mut out, equal);
    Collection::append(&mut out, sort(greater));
    return out;
}
