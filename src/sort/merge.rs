use super::{decorate, undecorate, Entry};
use crate::collection::Collection;
use crate::key::{IntoKey, Key};
use crate::list::List;

/// Stable merge sort.
///
/// The list is cut at its structural midpoint (see [`List::midpoint`]),
/// both halves are sorted recursively, and the runs are merged by taking
/// the smaller front each time. Ties take from the left run, so values with
/// equal keys keep their original relative order.
pub fn merge_sort<T, K, F>(list: &List<T>, keyfn: F) -> List<T>
where
    T: Clone,
    K: IntoKey,
    F: Fn(&T) -> K,
{
    return undecorate(sort(decorate(list, &keyfn)));
}

fn sort<T>(list: List<Entry<Key, T>>) -> List<Entry<Key, T>> {
    if list.len() <= 1 {
        return list;
    }
    let mid = list.midpoint();
    let (left, right) = Collection::split(list, mid);
    return merge(sort(left), sort(right));
}

fn merge<T>(mut left: List<Entry<Key, T>>, mut right: List<Entry<Key, T>>) -> List<Entry<Key, T>> {
    let mut out = List::new();
    loop {
        let from_left = match (left.front(), right.front()) {
            (Some(a), Some(b)) => a.key <= b.key,
            _ => break,
        };
        let next = if from_left { left.pop_front() } else { right.pop_front() };
        if let Some(entry) = next {
            out.append(entry);
        }
    }
    // At most one run still has entries; both are already in order.
    Collection::append(&mut out, left);
    Collection::append(&mut out, right);
    return out;
}
