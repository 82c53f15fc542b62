use crate::key_value::KeyValue;
use std::borrow::Borrow;

/// Keys whose full hashes collide.
///
/// A bucket in a trie always holds at least two entries with distinct keys.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    hash: u64,
    key_values: Vec<KeyValue<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub fn new(hash: u64, key_values: Vec<KeyValue<K, V>>) -> Self {
        Self { hash, key_values }
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.key_values.len()
    }

    pub fn key_values(&self) -> &[KeyValue<K, V>] {
        &self.key_values
    }

    pub fn into_key_values(self) -> Vec<KeyValue<K, V>> {
        self.key_values
    }

    fn find_index<Q: Eq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.key_values
            .iter()
            .position(|key_value| key_value.has_key(key))
    }

    pub fn find<Q: Eq + ?Sized>(&self, key: &Q) -> Option<&KeyValue<K, V>>
    where
        K: Borrow<Q>,
    {
        self.find_index(key).map(|i| &self.key_values[i])
    }
}

impl<K: Clone + Eq, V: Clone> Bucket<K, V> {
    /// Inserts an entry. An existing entry of the same key is replaced only if
    /// `replace` is true.
    pub fn insert(&self, key_value: KeyValue<K, V>, replace: bool) -> (Self, bool) {
        let mut key_values = self.key_values.clone();

        let added = match self.find_index(key_value.key()) {
            Some(i) => {
                if replace {
                    key_values[i] = key_value;
                }

                false
            }
            None => {
                key_values.push(key_value);
                true
            }
        };

        (Self::new(self.hash, key_values), added)
    }

    pub fn remove<Q: Eq + ?Sized>(&self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
    {
        self.find_index(key).map(|i| {
            let mut key_values = self.key_values.clone();
            key_values.remove(i);
            Self::new(self.hash, key_values)
        })
    }
}
