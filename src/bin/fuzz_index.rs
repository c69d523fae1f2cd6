//! AFL fuzz harness for the index tree and the list sorts.
//!
//! Input bytes decode into a sequence of operations on a shared pool of
//! values. After every insert the tree must still satisfy its structural
//! invariants; after every sort the output must be a non-decreasing
//! permutation of the input.

use afl::fuzz;
use roster::{Algorithm, IndexTree, IntoKey, Key, List};

/// A value with a key that may be a number, short text or absent.
#[derive(Clone, Debug)]
enum Item {
    Num(i64),
    Word(String),
    Blank,
}

impl Item {
    fn key(&self) -> Key {
        return match self {
            Item::Num(n) => (*n).into_key(),
            Item::Word(w) => w.as_str().into_key(),
            Item::Blank => Key::Missing,
        };
    }
}

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert { kind: u8, seed: u8 },
    Sort { algorithm: u8 },
    Find { seed: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        return match tag % 3 {
            0 if rest.len() >= 2 => Some((FuzzOp::Insert { kind: rest[0], seed: rest[1] }, &rest[2..])),
            1 if !rest.is_empty() => Some((FuzzOp::Sort { algorithm: rest[0] }, &rest[1..])),
            2 if !rest.is_empty() => Some((FuzzOp::Find { seed: rest[0] }, &rest[1..])),
            _ => None,
        };
    }
}

fn make_item(kind: u8, seed: u8) -> Item {
    return match kind % 4 {
        0 | 1 => Item::Num(seed as i64 - 128),
        // Few letters so prefixes and case-folded duplicates are common.
        2 => Item::Word((0..seed % 5).map(|i| ['a', 'B', 'b', 'c'][((seed >> i) % 4) as usize]).collect()),
        _ => Item::Blank,
    };
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut tree = IndexTree::new(|item: &Item| item.key());
        let mut pool: List<Item> = List::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            match op {
                FuzzOp::Insert { kind, seed } => {
                    let item = make_item(kind, seed);
                    pool.append(item.clone());
                    tree.insert(item);
                    tree.check_invariants();
                    assert_eq!(tree.size(), pool.len(), "size mismatch");
                }
                FuzzOp::Sort { algorithm } => {
                    let algorithm = Algorithm::ALL[(algorithm % 3) as usize];
                    let sorted = algorithm.sort(&pool, Item::key);
                    assert_eq!(sorted.len(), pool.len(), "{algorithm} changed length");
                    let keys: Vec<Key> = sorted.iter().map(Item::key).collect();
                    if algorithm != Algorithm::Radix {
                        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{algorithm} out of order");
                    }
                    let mut expected: Vec<Key> = pool.iter().map(Item::key).collect();
                    let mut got = keys;
                    expected.sort();
                    got.sort();
                    assert_eq!(expected, got, "{algorithm} is not a permutation");
                }
                FuzzOp::Find { seed } => {
                    let probe = make_item(seed, seed);
                    let key = probe.key();
                    let found = tree.find(key.clone());
                    let expected = pool.iter().filter(|item| item.key() == key).count();
                    assert_eq!(found.len(), expected, "find missed values");
                }
            }
        }

        let in_order: Vec<Key> = tree.in_order().map(Item::key).collect();
        assert!(in_order.windows(2).all(|w| w[0] <= w[1]), "in-order walk not sorted");
    });
}
