use super::{undecorate, Entry};
use crate::collection::Collection;
use crate::key::{normalize, IntoKey};
use crate::list::List;

/// Three-way radix quicksort (string quicksort) on the key's characters.
///
/// At depth `d` values are partitioned by their lower-cased character at
/// position `d`, with "past the end" ordering before every character. The
/// less and greater partitions are sorted again at depth `d`; the equal
/// partition moves on to depth `d + 1`, unless the pivot itself was past
/// the end, in which case those keys are identical and the run is done.
///
/// Key classes are kept apart first so the result agrees with [`Key`]
/// ordering across classes: scalars, then text, then missing keys (which
/// stay in input order). Scalars are partitioned on their display form, so
/// numbers sort lexicographically here ("10" before "9").
///
/// [`Key`]: crate::key::Key
pub fn radix_quicksort<T, K, F>(list: &List<T>, keyfn: F) -> List<T>
where
    T: Clone,
    K: IntoKey,
    F: Fn(&T) -> K,
{
    let mut scalars = List::new();
    let mut texts = List::new();
    let mut missing = List::new();
    for value in list.iter() {
        let key = normalize(&keyfn, value);
        let entry = Entry { key: key.chars(), value: value.clone() };
        match key.class() {
            0 => scalars.append(entry),
            1 => texts.append(entry),
            _ => missing.append(entry),
        }
    }

    let mut out = sort(scalars, 0);
    Collection::append(&mut out, sort(texts, 0));
    Collection::append(&mut out, missing);
    return undecorate(out);
}

fn char_at(key: &[char], depth: usize) -> Option<char> {
    return key.get(depth).copied();
}

fn sort<T>(list: List<Entry<Vec<char>, T>>, depth: usize) -> List<Entry<Vec<char>, T>> {
    let pivot = match list.front() {
        Some(head) if list.len() > 1 => char_at(&head.key, depth),
        _ => return list,
    };

    let mut less = List::new();
    let mut equal = List::new();
    let mut greater = List::new();
    for entry in list {
        let c = char_at(&entry.key, depth);
        if c < pivot {
            less.append(entry);
        } else if c == pivot {
            equal.append(entry);
        } else {
            greater.append(entry);
        }
    }

    let mut out = sort(less, depth);
    if pivot.is_some() {
        Collection::append(&mut out, sort(equal, depth + 1));
    } else {
        Collection::append(&mut out, equal);
    }
    Collection::append(&mut out, sort(greater, depth));
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(words: &[&'static str]) -> Vec<&'static str> {
        let list: List<&'static str> = words.iter().copied().collect();
        return radix_quicksort(&list, |w: &&'static str| *w).iter().copied().collect();
    }

    #[test]
    fn shared_prefixes() {
        assert_eq!(
            sorted(&["banana", "band", "bandana", "ant"]),
            vec!["ant", "banana", "band", "bandana"]
        );
    }

    #[test]
    fn prefix_sorts_before_extension() {
        assert_eq!(sorted(&["abc", "ab", "a", ""]), vec!["", "a", "ab", "abc"]);
    }

    #[test]
    fn case_insensitive() {
        let out = sorted(&["beta", "Alpha", "alpha2", "BETA"]);
        assert_eq!(out[0], "Alpha");
        assert_eq!(out[1], "alpha2");
        assert_eq!(out[2..].iter().map(|w| w.to_lowercase()).collect::<Vec<_>>(), vec!["beta", "beta"]);
    }

    #[test]
    fn identical_keys_terminate() {
        assert_eq!(sorted(&["same", "same", "same"]), vec!["same", "same", "same"]);
    }

    #[test]
    fn numbers_compare_as_text() {
        let list: List<u32> = [9, 10, 100, 2].into_iter().collect();
        let out: Vec<u32> = radix_quicksort(&list, |v: &u32| *v).iter().copied().collect();
        assert_eq!(out, vec![10, 100, 2, 9]);
    }

    #[test]
    fn missing_keys_go_last() {
        let list: List<Option<&str>> = [Some("b"), None, Some(""), Some("a")].into_iter().collect();
        let out: Vec<_> = radix_quicksort(&list, |v: &Option<&str>| *v).iter().copied().collect();
        assert_eq!(out, vec![Some(""), Some("a"), Some("b"), None]);
    }

    #[test]
    fn scalars_before_text() {
        let list: List<Result<u32, &str>> = [Err("x"), Ok(5), Err("a"), Ok(12)].into_iter().collect();
        let keyfn = |v: &Result<u32, &str>| -> crate::key::Key {
            return match v {
                Ok(n) => (*n).into_key(),
                Err(s) => (*s).into_key(),
            };
        };
        let out: Vec<_> = radix_quicksort(&list, keyfn).iter().copied().collect();
        assert_eq!(out, vec![Ok(12), Ok(5), Err("a"), Err("x")]);
    }
}
