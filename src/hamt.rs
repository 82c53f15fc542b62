use crate::{
    bitmap::Bitmap,
    bucket::Bucket,
    key_value::KeyValue,
    utilities::{fragment, hash_key},
};
use std::{borrow::Borrow, hash::Hash, iter::FusedIterator, slice, sync::Arc};

#[derive(Clone, Debug)]
enum Entry<K, V> {
    KeyValue(u64, KeyValue<K, V>),
    Bucket(Arc<Bucket<K, V>>),
    Hamt(Arc<Hamt<K, V>>),
}

impl<K, V> Entry<K, V> {
    fn size(&self) -> usize {
        match self {
            Self::KeyValue(_, _) => 1,
            Self::Bucket(bucket) => bucket.len(),
            Self::Hamt(hamt) => hamt.size,
        }
    }

    fn from_collisions(hash: u64, mut key_values: Vec<KeyValue<K, V>>) -> Option<Self> {
        match key_values.len() {
            0 => None,
            1 => key_values
                .pop()
                .map(|key_value| Self::KeyValue(hash, key_value)),
            _ => Some(Self::Bucket(Bucket::new(hash, key_values).into())),
        }
    }
}

impl<K: Eq, V> Entry<K, V> {
    fn get<Q: Eq + ?Sized>(&self, key: &Q, hash: u64, level: usize) -> Option<&KeyValue<K, V>>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::KeyValue(entry_hash, key_value) => {
                (*entry_hash == hash && key_value.has_key(key)).then_some(key_value)
            }
            Self::Bucket(bucket) => {
                if bucket.hash() == hash {
                    bucket.find(key)
                } else {
                    None
                }
            }
            Self::Hamt(hamt) => hamt.get_with_hash(key, hash, level),
        }
    }
}

impl<K: Clone + Eq, V: Clone> Entry<K, V> {
    /// Inserts an entry into a slot. `level` is the level of a node which
    /// would be created under the slot.
    fn insert(
        &self,
        key_value: KeyValue<K, V>,
        hash: u64,
        level: usize,
        replace: bool,
    ) -> (Self, bool) {
        match self {
            Self::KeyValue(entry_hash, entry) => {
                if key_value.key() == entry.key() {
                    (
                        if replace {
                            Self::KeyValue(hash, key_value)
                        } else {
                            self.clone()
                        },
                        false,
                    )
                } else if *entry_hash == hash {
                    (
                        Self::Bucket(Bucket::new(hash, vec![entry.clone(), key_value]).into()),
                        true,
                    )
                } else {
                    (
                        Self::Hamt(
                            Hamt::pair(
                                level,
                                (*entry_hash, self.clone()),
                                (hash, Self::KeyValue(hash, key_value)),
                            )
                            .into(),
                        ),
                        true,
                    )
                }
            }
            Self::Bucket(bucket) => {
                if bucket.hash() == hash {
                    let (bucket, added) = bucket.insert(key_value, replace);

                    (Self::Bucket(bucket.into()), added)
                } else {
                    (
                        Self::Hamt(
                            Hamt::pair(
                                level,
                                (bucket.hash(), self.clone()),
                                (hash, Self::KeyValue(hash, key_value)),
                            )
                            .into(),
                        ),
                        true,
                    )
                }
            }
            Self::Hamt(hamt) => {
                let (hamt, added) = hamt.insert_with_hash(key_value, hash, level, replace);

                (Self::Hamt(hamt.into()), added)
            }
        }
    }

    /// Removes a key from a slot.
    ///
    /// It returns `None` if the key is not found, and `Some(None)` if the slot
    /// becomes empty.
    fn remove<Q: Eq + ?Sized>(&self, key: &Q, hash: u64, level: usize) -> Option<Option<Self>>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::KeyValue(entry_hash, key_value) => {
                (*entry_hash == hash && key_value.has_key(key)).then_some(None)
            }
            Self::Bucket(bucket) => {
                if bucket.hash() != hash {
                    return None;
                }

                let bucket = bucket.remove(key)?;

                Some(Self::from_collisions(hash, bucket.into_key_values()))
            }
            Self::Hamt(hamt) => hamt.remove_with_hash(key, hash, level).map(Hamt::into_entry),
        }
    }

    fn union(&self, other: &Self, level: usize) -> Self {
        match (self, other) {
            (Self::Hamt(one), Self::Hamt(another)) => {
                if Arc::ptr_eq(one, another) {
                    self.clone()
                } else {
                    Self::Hamt(one.union_with_level(another, level).into())
                }
            }
            (Self::KeyValue(hash, key_value), _) => {
                other.insert(key_value.clone(), *hash, level, true).0
            }
            (_, Self::KeyValue(hash, key_value)) => {
                self.insert(key_value.clone(), *hash, level, false).0
            }
            (Self::Bucket(bucket), _) => {
                bucket
                    .key_values()
                    .iter()
                    .fold(other.clone(), |entry, key_value| {
                        entry.insert(key_value.clone(), bucket.hash(), level, true).0
                    })
            }
            (_, Self::Bucket(bucket)) => {
                bucket
                    .key_values()
                    .iter()
                    .fold(self.clone(), |entry, key_value| {
                        entry.insert(key_value.clone(), bucket.hash(), level, false).0
                    })
            }
        }
    }

    fn intersection(&self, other: &Self, level: usize) -> Option<Self> {
        match (self, other) {
            (Self::Hamt(one), Self::Hamt(another)) => {
                if Arc::ptr_eq(one, another) {
                    Some(self.clone())
                } else {
                    one.intersection_with_level(another, level).into_entry()
                }
            }
            (Self::KeyValue(hash, key_value), _) => other
                .get(key_value.key(), *hash, level)
                .map(|_| self.clone()),
            (_, Self::KeyValue(hash, key_value)) => self
                .get(key_value.key(), *hash, level)
                .map(|key_value| Self::KeyValue(*hash, key_value.clone())),
            (Self::Bucket(bucket), _) => Self::from_collisions(
                bucket.hash(),
                bucket
                    .key_values()
                    .iter()
                    .filter(|key_value| other.get(key_value.key(), bucket.hash(), level).is_some())
                    .cloned()
                    .collect(),
            ),
            (_, Self::Bucket(bucket)) => Self::from_collisions(
                bucket.hash(),
                bucket
                    .key_values()
                    .iter()
                    .filter_map(|key_value| self.get(key_value.key(), bucket.hash(), level))
                    .cloned()
                    .collect(),
            ),
        }
    }

    fn difference(&self, other: &Self, level: usize) -> Option<Self> {
        match (self, other) {
            (Self::Hamt(one), Self::Hamt(another)) => {
                if Arc::ptr_eq(one, another) {
                    None
                } else {
                    one.difference_with_level(another, level).into_entry()
                }
            }
            (Self::KeyValue(hash, key_value), _) => other
                .get(key_value.key(), *hash, level)
                .is_none()
                .then(|| self.clone()),
            (_, Self::KeyValue(hash, key_value)) => self
                .remove(key_value.key(), *hash, level)
                .unwrap_or_else(|| Some(self.clone())),
            (Self::Bucket(bucket), _) => Self::from_collisions(
                bucket.hash(),
                bucket
                    .key_values()
                    .iter()
                    .filter(|key_value| other.get(key_value.key(), bucket.hash(), level).is_none())
                    .cloned()
                    .collect(),
            ),
            (_, Self::Bucket(bucket)) => {
                bucket
                    .key_values()
                    .iter()
                    .try_fold(self.clone(), |entry, key_value| {
                        entry
                            .remove(key_value.key(), bucket.hash(), level)
                            .unwrap_or(Some(entry))
                    })
            }
        }
    }

    fn filter<F: FnMut(&K, &V) -> bool>(&self, predicate: &mut F) -> Option<Self> {
        match self {
            Self::KeyValue(_, key_value) => {
                predicate(key_value.key(), key_value.value()).then(|| self.clone())
            }
            Self::Bucket(bucket) => {
                let key_values = bucket
                    .key_values()
                    .iter()
                    .filter(|key_value| predicate(key_value.key(), key_value.value()))
                    .cloned()
                    .collect::<Vec<_>>();

                if key_values.len() == bucket.len() {
                    Some(self.clone())
                } else {
                    Self::from_collisions(bucket.hash(), key_values)
                }
            }
            Self::Hamt(hamt) => {
                let filtered = hamt.filter_with(predicate);

                if filtered.size == hamt.size {
                    Some(self.clone())
                } else {
                    filtered.into_entry()
                }
            }
        }
    }
}

/// A branch node of a trie.
///
/// Entries are stored densely in the order of their slots. A node caches the
/// number of keys in its sub-tree.
#[derive(Clone, Debug)]
pub struct Hamt<K, V> {
    bitmap: Bitmap,
    entries: Vec<Entry<K, V>>,
    size: usize,
}

impl<K, V> Default for Hamt<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Hamt<K, V> {
    pub fn new() -> Self {
        Self {
            bitmap: Bitmap::new(),
            entries: vec![],
            size: 0,
        }
    }

    fn from_parts(bitmap: Bitmap, entries: Vec<Entry<K, V>>) -> Self {
        debug_assert_eq!(bitmap.size(), entries.len());

        Self {
            size: entries.iter().map(Entry::size).sum(),
            bitmap,
            entries,
        }
    }

    /// Creates a node containing two entries of different hashes.
    fn pair(level: usize, first: (u64, Entry<K, V>), second: (u64, Entry<K, V>)) -> Self {
        debug_assert_ne!(first.0, second.0);

        let index = fragment(first.0, level);
        let other_index = fragment(second.0, level);

        if index == other_index {
            Self::from_parts(
                Bitmap::new().set(index),
                vec![Entry::Hamt(Self::pair(level + 1, first, second).into())],
            )
        } else {
            Self::from_parts(
                Bitmap::new().set(index).set(other_index),
                if index < other_index {
                    vec![first.1, second.1]
                } else {
                    vec![second.1, first.1]
                },
            )
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    fn entry(&self, index: u8) -> Option<&Entry<K, V>> {
        self.bitmap
            .get(index)
            .then(|| &self.entries[self.bitmap.index(index)])
    }

    fn slots(&self) -> impl Iterator<Item = (u8, &Entry<K, V>)> {
        self.bitmap.iter().zip(&self.entries)
    }

    /// Converts a node into an entry of its parent, collapsing nodes which
    /// hold nothing or only a single leaf or bucket.
    fn into_entry(mut self) -> Option<Entry<K, V>> {
        match self.entries.len() {
            0 => None,
            1 if !matches!(self.entries[0], Entry::Hamt(_)) => self.entries.pop(),
            _ => Some(Entry::Hamt(self.into())),
        }
    }
}

impl<K: Eq, V> Hamt<K, V> {
    #[must_use]
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&KeyValue<K, V>>
    where
        K: Borrow<Q>,
    {
        self.get_with_hash(key, hash_key(key), 0)
    }

    fn get_with_hash<Q: Eq + ?Sized>(
        &self,
        key: &Q,
        hash: u64,
        level: usize,
    ) -> Option<&KeyValue<K, V>>
    where
        K: Borrow<Q>,
    {
        self.entry(fragment(hash, level))?
            .get(key, hash, level + 1)
    }
}

impl<K: Clone, V: Clone> Hamt<K, V> {
    fn set_entry(&self, index: u8, entry: Entry<K, V>) -> Self {
        let mut entries = self.entries.clone();

        entries[self.bitmap.index(index)] = entry;

        Self::from_parts(self.bitmap, entries)
    }

    fn insert_entry(&self, index: u8, entry: Entry<K, V>) -> Self {
        let mut entries = self.entries.clone();

        entries.insert(self.bitmap.index(index), entry);

        Self::from_parts(self.bitmap.set(index), entries)
    }

    fn remove_entry(&self, index: u8) -> Self {
        let mut entries = self.entries.clone();

        entries.remove(self.bitmap.index(index));

        Self::from_parts(self.bitmap.unset(index), entries)
    }
}

impl<K: Clone + Eq, V: Clone> Hamt<K, V> {
    fn insert_with_hash(
        &self,
        key_value: KeyValue<K, V>,
        hash: u64,
        level: usize,
        replace: bool,
    ) -> (Self, bool) {
        let index = fragment(hash, level);

        match self.entry(index) {
            None => (
                self.insert_entry(index, Entry::KeyValue(hash, key_value)),
                true,
            ),
            Some(entry) => {
                let (entry, added) = entry.insert(key_value, hash, level + 1, replace);

                (self.set_entry(index, entry), added)
            }
        }
    }

    fn insert_mut_with_hash(&mut self, key_value: KeyValue<K, V>, hash: u64, level: usize) -> bool {
        let index = fragment(hash, level);
        let position = self.bitmap.index(index);

        if !self.bitmap.get(index) {
            self.bitmap = self.bitmap.set(index);
            self.entries
                .insert(position, Entry::KeyValue(hash, key_value));
            self.size += 1;

            return true;
        }

        let added = match &mut self.entries[position] {
            Entry::Hamt(hamt) => {
                Arc::make_mut(hamt).insert_mut_with_hash(key_value, hash, level + 1)
            }
            entry => {
                let (other, added) = entry.insert(key_value, hash, level + 1, true);
                *entry = other;
                added
            }
        };

        self.size += added as usize;

        added
    }

    fn remove_with_hash<Q: Eq + ?Sized>(&self, key: &Q, hash: u64, level: usize) -> Option<Self>
    where
        K: Borrow<Q>,
    {
        let index = fragment(hash, level);

        Some(match self.entry(index)?.remove(key, hash, level + 1)? {
            Some(entry) => self.set_entry(index, entry),
            None => self.remove_entry(index),
        })
    }

    fn union_with_level(&self, other: &Self, level: usize) -> Self {
        let bitmap = self.bitmap.union(other.bitmap);
        let mut entries = Vec::with_capacity(bitmap.size());

        for index in bitmap.iter() {
            entries.push(match (self.entry(index), other.entry(index)) {
                (Some(entry), None) | (None, Some(entry)) => entry.clone(),
                (Some(one), Some(another)) => one.union(another, level + 1),
                (None, None) => continue,
            });
        }

        Self::from_parts(bitmap, entries)
    }

    fn intersection_with_level(&self, other: &Self, level: usize) -> Self {
        let mut bitmap = Bitmap::new();
        let mut entries = vec![];

        for index in self.bitmap.intersection(other.bitmap).iter() {
            if let (Some(one), Some(another)) = (self.entry(index), other.entry(index)) {
                if let Some(entry) = one.intersection(another, level + 1) {
                    bitmap = bitmap.set(index);
                    entries.push(entry);
                }
            }
        }

        Self::from_parts(bitmap, entries)
    }

    fn difference_with_level(&self, other: &Self, level: usize) -> Self {
        let mut bitmap = Bitmap::new();
        let mut entries = vec![];

        for (index, entry) in self.slots() {
            let entry = match other.entry(index) {
                None => Some(entry.clone()),
                Some(another) => entry.difference(another, level + 1),
            };

            if let Some(entry) = entry {
                bitmap = bitmap.set(index);
                entries.push(entry);
            }
        }

        Self::from_parts(bitmap, entries)
    }

    fn filter_with<F: FnMut(&K, &V) -> bool>(&self, predicate: &mut F) -> Self {
        let mut bitmap = Bitmap::new();
        let mut entries = vec![];

        for (index, entry) in self.slots() {
            if let Some(entry) = entry.filter(predicate) {
                bitmap = bitmap.set(index);
                entries.push(entry);
            }
        }

        Self::from_parts(bitmap, entries)
    }

    /// Merges two tries. Values in `self` take precedence over ones in `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.union_with_level(other, 0)
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.intersection_with_level(other, 0)
    }

    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.difference_with_level(other, 0)
    }

    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> Self {
        self.filter_with(&mut predicate)
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Hamt<K, V> {
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
    {
        self.remove_with_hash(key, hash_key(key), 0)
    }

    #[must_use]
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        let hash = hash_key(&key);

        self.insert_with_hash(KeyValue::new(key, value), hash, 0, true)
    }

    /// Inserts an entry in place. Shared sub-trees are copied before they are
    /// modified.
    pub fn insert_mut(&mut self, key: K, value: V) -> bool {
        let hash = hash_key(&key);

        self.insert_mut_with_hash(KeyValue::new(key, value), hash, 0)
    }

    #[cfg(test)]
    fn is_normal(&self) -> bool {
        self.size == self.entries.iter().map(Entry::size).sum::<usize>()
            && self.bitmap.size() == self.entries.len()
            && self.entries.iter().all(|entry| match entry {
                Entry::KeyValue(_, _) => true,
                Entry::Bucket(bucket) => bucket.len() >= 2,
                Entry::Hamt(hamt) => {
                    hamt.is_normal()
                        && hamt.size >= 2
                        && (hamt.entries.len() >= 2
                            || matches!(hamt.entries.first(), Some(Entry::Hamt(_))))
                }
            })
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::KeyValue(_, _) => 1,
                Entry::Bucket(bucket) => bucket.key_values().len(),
                Entry::Hamt(hamt) => hamt.entry_count(),
            })
            .sum()
    }
}

/// Lazy traversal over entries of a trie from both ends.
#[derive(Debug)]
pub struct HamtIterator<'a, K, V> {
    front: Vec<slice::Iter<'a, Entry<K, V>>>,
    back: Vec<slice::Iter<'a, Entry<K, V>>>,
    front_bucket: slice::Iter<'a, KeyValue<K, V>>,
    back_bucket: slice::Iter<'a, KeyValue<K, V>>,
    remaining: usize,
}

impl<'a, K, V> IntoIterator for &'a Hamt<K, V> {
    type IntoIter = HamtIterator<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        HamtIterator {
            front: vec![self.entries.iter()],
            back: vec![self.entries.iter()],
            front_bucket: Default::default(),
            back_bucket: Default::default(),
            remaining: self.size,
        }
    }
}

impl<'a, K, V> Iterator for HamtIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some(key_value) = self.front_bucket.next() {
                self.remaining -= 1;
                return Some(key_value.as_pair());
            }

            match self.front.last_mut()?.next() {
                None => {
                    self.front.pop();
                }
                Some(Entry::KeyValue(_, key_value)) => {
                    self.remaining -= 1;
                    return Some(key_value.as_pair());
                }
                Some(Entry::Bucket(bucket)) => self.front_bucket = bucket.key_values().iter(),
                Some(Entry::Hamt(hamt)) => self.front.push(hamt.entries.iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for HamtIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some(key_value) = self.back_bucket.next_back() {
                self.remaining -= 1;
                return Some(key_value.as_pair());
            }

            match self.back.last_mut()?.next_back() {
                None => {
                    self.back.pop();
                }
                Some(Entry::KeyValue(_, key_value)) => {
                    self.remaining -= 1;
                    return Some(key_value.as_pair());
                }
                Some(Entry::Bucket(bucket)) => self.back_bucket = bucket.key_values().iter(),
                Some(Entry::Hamt(hamt)) => self.back.push(hamt.entries.iter()),
            }
        }
    }
}

impl<K, V> ExactSizeIterator for HamtIterator<'_, K, V> {}

impl<K, V> FusedIterator for HamtIterator<'_, K, V> {}

/// Traversal yielding cloned entries while keeping the trie alive.
#[derive(Debug)]
pub struct ClonedHamtIterator<K, V> {
    nodes: Vec<(Arc<Hamt<K, V>>, usize)>,
    bucket: Option<(Arc<Bucket<K, V>>, usize)>,
    remaining: usize,
}

impl<K, V> ClonedHamtIterator<K, V> {
    pub fn new(hamt: Arc<Hamt<K, V>>) -> Self {
        Self {
            remaining: hamt.size,
            nodes: vec![(hamt, 0)],
            bucket: None,
        }
    }
}

impl<K: Clone, V: Clone> Iterator for ClonedHamtIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some((bucket, index)) = &mut self.bucket {
                if let Some(key_value) = bucket.key_values().get(*index) {
                    *index += 1;
                    self.remaining -= 1;
                    return Some(key_value.clone().into_pair());
                }

                self.bucket = None;
            }

            let (hamt, index) = self.nodes.pop()?;

            if let Some(entry) = hamt.entries.get(index) {
                self.nodes.push((hamt.clone(), index + 1));

                match entry {
                    Entry::KeyValue(_, key_value) => {
                        self.remaining -= 1;
                        return Some(key_value.clone().into_pair());
                    }
                    Entry::Bucket(bucket) => self.bucket = Some((bucket.clone(), 0)),
                    Entry::Hamt(hamt) => self.nodes.push((hamt.clone(), 0)),
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for ClonedHamtIterator<K, V> {}

impl<K: Clone, V: Clone> FusedIterator for ClonedHamtIterator<K, V> {}
