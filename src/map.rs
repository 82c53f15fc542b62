use crate::hamt::{ClonedHamtIterator, Hamt, HamtIterator};
use std::{
    borrow::Borrow,
    fmt::{self, Debug, Formatter},
    hash::Hash,
    iter::FusedIterator,
    sync::Arc,
};

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary. Untouched sub-trees are shared between the original and
/// new maps.
///
/// Keys must hash consistently with their equality; two equal keys with
/// different hashes are treated as different keys.
#[derive(Clone)]
pub struct Map<K, V> {
    hamt: Arc<Hamt<K, V>>,
}

impl<K, V> Map<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self {
            hamt: Hamt::new().into(),
        }
    }

    fn from_hamt(hamt: Hamt<K, V>) -> Self {
        Self { hamt: hamt.into() }
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.hamt.len()
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns key-value pairs in a map.
    ///
    /// The order is unspecified but the same for the same map. The iterator
    /// traverses a trie lazily from both ends.
    pub fn iter(&self) -> MapIterator<'_, K, V> {
        self.into_iter()
    }

    /// Returns keys in a map.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns values in a map.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Folds key-value pairs of a map strictly from left.
    ///
    /// Use [`Self::iter`] with [`Iterator::rfold`] or
    /// [`DoubleEndedIterator::try_rfold`] to fold from right or to stop early.
    pub fn fold<B>(&self, init: B, f: impl FnMut(B, (&K, &V)) -> B) -> B {
        self.iter().fold(init, f)
    }

    /// Returns true if two maps share the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.hamt, &other.hamt)
    }
}

impl<K: Eq, V> Map<K, V> {
    /// Finds a value corresponding to a key.
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.hamt.get(key).map(|key_value| key_value.value())
    }

    /// Finds a key-value pair corresponding to a key.
    pub fn get_key_value<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
    {
        self.hamt.get(key).map(|key_value| key_value.as_pair())
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.hamt.get(key).is_some()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Map<K, V> {
    /// Creates a map of a key-value pair.
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair into a map. A value of an existing key is
    /// replaced.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        Self::from_hamt(self.hamt.insert(key, value).0)
    }

    /// Removes a key from a map if any.
    ///
    /// The original map is returned as it is if the key is not found.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
    {
        self.hamt
            .remove(key)
            .map(Self::from_hamt)
            .unwrap_or_else(|| self.clone())
    }

    /// Extends a map with an iterator of key-value pairs.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut hamt = self.hamt.clone();

        for (key, value) in iterator {
            Arc::make_mut(&mut hamt).insert_mut(key, value);
        }

        Self { hamt }
    }

    /// Removes the first key-value pair in a map and returns a new map
    /// containing the rest of pairs.
    #[must_use]
    pub fn first_rest(&self) -> Option<(&K, &V, Self)> {
        let (key, value) = self.iter().next()?;

        Some((key, value, self.remove(key)))
    }

    /// Calculates union of two maps.
    ///
    /// Values in `self` take precedence over ones in `other` for keys in both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() || self.ptr_eq(other) {
            self.clone()
        } else if self.is_empty() {
            other.clone()
        } else {
            Self::from_hamt(self.hamt.union(&other.hamt))
        }
    }

    /// Calculates intersection of two maps. Values are taken from `self`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if self.ptr_eq(other) {
            self.clone()
        } else if self.is_empty() || other.is_empty() {
            Self::new()
        } else {
            Self::from_hamt(self.hamt.intersection(&other.hamt))
        }
    }

    /// Calculates difference of two maps.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        if self.ptr_eq(other) {
            Self::new()
        } else if self.is_empty() || other.is_empty() {
            self.clone()
        } else {
            Self::from_hamt(self.hamt.difference(&other.hamt))
        }
    }

    /// Retains key-value pairs which satisfy a predicate.
    #[must_use]
    pub fn filter(&self, predicate: impl FnMut(&K, &V) -> bool) -> Self {
        let hamt = self.hamt.filter(predicate);

        if hamt.len() == self.len() {
            self.clone()
        } else {
            Self::from_hamt(hamt)
        }
    }

    /// Maps keys of a map.
    ///
    /// All pairs are reinserted into a new map as hashes of keys change. If
    /// several keys are mapped into the same one, only one of their pairs
    /// remains.
    pub fn map_keys<L: Clone + Hash + Eq>(&self, mut f: impl FnMut(&K) -> L) -> Map<L, V> {
        self.iter()
            .map(|(key, value)| (f(key), value.clone()))
            .collect()
    }
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || self.len() == other.len()
                && self
                    .iter()
                    .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Eq + Hash, V: Eq> Eq for Map<K, V> {}

impl<K: Debug, V: Debug> Debug for Map<K, V> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let mut hamt = Hamt::new();

        for (key, value) in iterator {
            hamt.insert_mut(key, value);
        }

        Self::from_hamt(hamt)
    }
}

#[derive(Debug)]
pub struct MapIterator<'a, K: 'a, V: 'a>(HamtIterator<'a, K, V>);

impl<'a, K, V> Iterator for MapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for MapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for MapIterator<'_, K, V> {}

impl<K, V> FusedIterator for MapIterator<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type IntoIter = MapIterator<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        MapIterator(self.hamt.as_ref().into_iter())
    }
}

#[derive(Debug)]
pub struct ClonedMapIterator<K, V>(ClonedHamtIterator<K, V>);

impl<K: Clone, V: Clone> Iterator for ClonedMapIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for ClonedMapIterator<K, V> {}

impl<K: Clone, V: Clone> FusedIterator for ClonedMapIterator<K, V> {}

impl<K: Clone, V: Clone> IntoIterator for Map<K, V> {
    type IntoIter = ClonedMapIterator<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        ClonedMapIterator(ClonedHamtIterator::new(self.hamt))
    }
}
