//! Normalized ordering keys.
//!
//! Every comparison the tree and the sorts make goes through [`Key`], so a
//! pair of records orders the same way no matter which structure looks at
//! them. Raw extraction results are sorted into three classes:
//!
//! | Class | Variant | Holds | Compared |
//! |-------|---------|-------|----------|
//! | 0 | `Scalar` | integers, floats, booleans, dates | natively |
//! | 1 | `Text` | strings | case-insensitively |
//! | 2 | `Missing` | absent or failed extraction | all equal, always last |

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// A class 0 value. Numbers compare numerically across integer and float,
/// and every number orders before every date.
#[derive(Clone, Copy, Debug)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

/// A normalized key. Variant order is the class order, so the derived
/// `Ord` puts scalars first, then text, then missing values.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Scalar(Scalar),
    /// Lower-cased at construction.
    Text(String),
    Missing,
}

impl Key {
    /// Text key, folded to lower case.
    pub fn text(s: &str) -> Key {
        return Key::Text(s.to_lowercase());
    }

    /// Ordering class: 0 scalar, 1 text, 2 missing.
    pub fn class(&self) -> u8 {
        return match self {
            Key::Scalar(_) => 0,
            Key::Text(_) => 1,
            Key::Missing => 2,
        };
    }

    pub fn is_missing(&self) -> bool {
        return matches!(self, Key::Missing);
    }

    /// The character sequence the string sort partitions on. Text is
    /// already lower case; scalars use their display form; missing keys
    /// are empty.
    pub fn chars(&self) -> Vec<char> {
        return match self {
            Key::Text(s) => s.chars().collect(),
            Key::Scalar(s) => s.to_string().to_lowercase().chars().collect(),
            Key::Missing => Vec::new(),
        };
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Key::Scalar(s) => write!(f, "{s}"),
            Key::Text(s) => f.write_str(s),
            Key::Missing => f.write_str("(none)"),
        };
    }
}

impl Scalar {
    fn is_number(&self) -> bool {
        return !matches!(self, Scalar::Date(_));
    }
}

/// NaN sorts above every other number and equal to itself.
fn cmp_float(a: f64, b: f64) -> Ordering {
    return match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    };
}

/// Exact integer/float comparison, no rounding of large integers.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, the first float above i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return Ordering::Less;
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    return match i.cmp(&(whole as i64)) {
        Ordering::Equal => cmp_float(0.0, f - whole),
        other => other,
    };
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        return match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => cmp_float(*a, *b),
            (Scalar::Int(a), Scalar::Float(b)) => cmp_int_float(*a, *b),
            (Scalar::Float(a), Scalar::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Scalar::Date(a), Scalar::Date(b)) => a.cmp(b),
            (a, b) => b.is_number().cmp(&a.is_number()),
        };
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        return self.cmp(other) == Ordering::Equal;
    }
}

impl Eq for Scalar {}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        };
    }
}

/// Conversion from whatever a key function returns into a [`Key`].
///
/// `Option::None` and `Result::Err` both become [`Key::Missing`]: a key
/// function that cannot produce a value does not fail the caller, it just
/// sorts the record last.
pub trait IntoKey {
    fn into_key(self) -> Key;
}

impl IntoKey for Key {
    fn into_key(self) -> Key {
        return self;
    }
}

macro_rules! int_keys {
    ($($t:ty),*) => {$(
        impl IntoKey for $t {
            fn into_key(self) -> Key {
                return Key::Scalar(Scalar::Int(self as i64));
            }
        }
    )*};
}

int_keys!(i8, i16, i32, i64, u8, u16, u32);

impl IntoKey for u64 {
    fn into_key(self) -> Key {
        return match i64::try_from(self) {
            Ok(i) => Key::Scalar(Scalar::Int(i)),
            Err(_) => Key::Scalar(Scalar::Float(self as f64)),
        };
    }
}

impl IntoKey for usize {
    fn into_key(self) -> Key {
        return (self as u64).into_key();
    }
}

impl IntoKey for f64 {
    fn into_key(self) -> Key {
        return Key::Scalar(Scalar::Float(self));
    }
}

impl IntoKey for f32 {
    fn into_key(self) -> Key {
        return Key::Scalar(Scalar::Float(self as f64));
    }
}

impl IntoKey for bool {
    fn into_key(self) -> Key {
        return Key::Scalar(Scalar::Int(self as i64));
    }
}

impl IntoKey for NaiveDate {
    fn into_key(self) -> Key {
        return Key::Scalar(Scalar::Date(self));
    }
}

impl IntoKey for String {
    fn into_key(self) -> Key {
        return Key::text(&self);
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Key {
        return Key::text(self);
    }
}

impl IntoKey for char {
    fn into_key(self) -> Key {
        return Key::Text(self.to_lowercase().collect());
    }
}

impl<K: IntoKey> IntoKey for Option<K> {
    fn into_key(self) -> Key {
        return match self {
            Some(k) => k.into_key(),
            None => Key::Missing,
        };
    }
}

impl<K: IntoKey, E> IntoKey for Result<K, E> {
    fn into_key(self) -> Key {
        return match self {
            Ok(k) => k.into_key(),
            Err(_) => Key::Missing,
        };
    }
}

/// Run a key function on a value and normalize the result.
pub fn normalize<T, K, F>(keyfn: &F, value: &T) -> Key
where
    K: IntoKey,
    F: Fn(&T) -> K,
{
    return keyfn(value).into_key();
}
