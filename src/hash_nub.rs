use crate::set::Set;
use std::{hash::Hash, iter::FusedIterator};

/// Removes duplicate values from an iterator lazily.
///
/// The first value of each key computed by `key` is kept and the order of
/// kept values is preserved. Keys seen so far are kept in a [`Set`].
///
/// ```
/// use hamt_set::hash_nub_by;
///
/// let values = hash_nub_by(["a", "bb", "cc", "d", "eee"], |value| value.len());
///
/// assert_eq!(values.collect::<Vec<_>>(), ["a", "bb", "eee"]);
/// ```
pub fn hash_nub_by<I, K, F>(iterator: I, key: F) -> HashNubBy<I::IntoIter, K, F>
where
    I: IntoIterator,
    K: Clone + Hash + Eq,
    F: FnMut(&I::Item) -> K,
{
    HashNubBy {
        iterator: iterator.into_iter(),
        key,
        seen: Set::new(),
    }
}

/// Removes duplicate values from an iterator lazily, keeping their first
/// occurrences in order.
///
/// ```
/// use hamt_set::hash_nub;
///
/// assert_eq!(hash_nub([2, 1, 2, 3, 1]).collect::<Vec<_>>(), [2, 1, 3]);
/// ```
pub fn hash_nub<I>(iterator: I) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    I::Item: Clone + Hash + Eq,
{
    hash_nub_by(iterator, |value: &I::Item| value.clone())
}

/// An iterator returned by [`hash_nub_by`].
#[derive(Clone, Debug)]
pub struct HashNubBy<I, K, F> {
    iterator: I,
    key: F,
    seen: Set<K>,
}

impl<I, K, F> Iterator for HashNubBy<I, K, F>
where
    I: Iterator,
    K: Clone + Hash + Eq,
    F: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        for value in self.iterator.by_ref() {
            let key = (self.key)(&value);

            if !self.seen.contains(&key) {
                self.seen = self.seen.insert(key);

                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iterator.size_hint();

        (0, upper)
    }
}

impl<I, K, F> FusedIterator for HashNubBy<I, K, F>
where
    I: FusedIterator,
    K: Clone + Hash + Eq,
    F: FnMut(&I::Item) -> K,
{
}
