use std::borrow::Borrow;

/// A leaf entry of a trie.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    pub fn has_key<Q: Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        key == self.key.borrow()
    }
}
