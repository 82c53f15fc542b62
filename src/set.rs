use crate::map::{ClonedMapIterator, Map, MapIterator};
use std::{
    borrow::Borrow,
    fmt::{self, Debug, Formatter},
    hash::Hash,
    iter::FusedIterator,
};

/// Set data structure of HAMT.
///
/// Note that every method does not modify the original set but creates a new
/// one if necessary.
#[derive(Clone)]
pub struct Set<T> {
    map: Map<T, ()>,
}

impl<T> Set<T> {
    /// Creates a new set.
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    /// Returns a size of a set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if a set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns values in a set
    pub fn iter(&self) -> SetIterator<'_, T> {
        self.into_iter()
    }

    /// Folds values of a set strictly from left.
    pub fn fold<B>(&self, init: B, mut f: impl FnMut(B, &T) -> B) -> B {
        self.iter().fold(init, |accumulator, value| f(accumulator, value))
    }

    /// Returns true if two sets share the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.map.ptr_eq(&other.map)
    }
}

impl<T: Hash + Eq> Set<T> {
    /// Checks if a value is contained in a set.
    pub fn contains<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
    {
        self.map.contains_key(value)
    }

    /// Returns true if every value in a set is contained in the other.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Clone + Hash + Eq> Set<T> {
    /// Creates a set of a value.
    pub fn singleton(value: T) -> Self {
        Self {
            map: Map::singleton(value, ()),
        }
    }

    /// Inserts a value into a set.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        Self {
            map: self.map.insert(value, ()),
        }
    }

    /// Removes a value from a set if any.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> Self
    where
        T: Borrow<Q>,
    {
        Self {
            map: self.map.remove(value),
        }
    }

    /// Extends a set with an iterator of values.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = T>) -> Self {
        Self {
            map: self
                .map
                .extend(iterator.into_iter().map(|value| (value, ()))),
        }
    }

    /// Removes the first element in a set and returns a new set containing the
    /// rest of elements.
    #[must_use]
    pub fn first_rest(&self) -> Option<(&T, Self)> {
        self.map
            .first_rest()
            .map(|(value, _, map)| (value, Self { map }))
    }

    /// Calculates union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            map: self.map.union(&other.map),
        }
    }

    /// Calculates intersection of two sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            map: self.map.intersection(&other.map),
        }
    }

    /// Calculates difference of two sets.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            map: self.map.difference(&other.map),
        }
    }

    /// Retains values which satisfy a predicate.
    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self {
            map: self.map.filter(|value, _| predicate(value)),
        }
    }

    /// Maps values of a set.
    ///
    /// Values mapped into the same one are merged, so the result can be
    /// smaller than the original set.
    pub fn map<U: Clone + Hash + Eq>(&self, f: impl FnMut(&T) -> U) -> Set<U> {
        Set {
            map: self.map.map_keys(f),
        }
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Hash + Eq> Eq for Set<T> {}

impl<T: Debug> Debug for Set<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone + Hash + Eq> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        Self {
            map: iterator.into_iter().map(|value| (value, ())).collect(),
        }
    }
}

#[derive(Debug)]
pub struct SetIterator<'a, T: 'a>(MapIterator<'a, T, ()>);

impl<'a, T> Iterator for SetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(value, _)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for SetIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(value, _)| value)
    }
}

impl<T> ExactSizeIterator for SetIterator<'_, T> {}

impl<T> FusedIterator for SetIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a Set<T> {
    type IntoIter = SetIterator<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        SetIterator(self.map.iter())
    }
}

#[derive(Debug)]
pub struct ClonedSetIterator<T: Clone>(ClonedMapIterator<T, ()>);

impl<T: Clone> Iterator for ClonedSetIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(value, _)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for ClonedSetIterator<T> {}

impl<T: Clone> FusedIterator for ClonedSetIterator<T> {}

impl<T: Clone> IntoIterator for Set<T> {
    type IntoIter = ClonedSetIterator<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        ClonedSetIterator(self.map.into_iter())
    }
}
