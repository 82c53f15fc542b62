use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

const BITS_PER_LEVEL: usize = 5;

/// The deepest level of a trie. It consumes only the last 4 bits of a hash.
pub const MAX_LEVEL: usize = 64 / BITS_PER_LEVEL; // inclusive

pub fn hash_key(key: &(impl Hash + ?Sized)) -> u64 {
    let mut hasher = DefaultHasher::new();

    key.hash(&mut hasher);

    hasher.finish()
}

/// Returns a slot of a hash at a level.
pub fn fragment(hash: u64, level: usize) -> u8 {
    debug_assert!(level <= MAX_LEVEL);

    ((hash >> (level * BITS_PER_LEVEL)) & 0b11111) as u8
}

/// A key whose hash is chosen by tests to force collisions.
#[cfg(test)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Colliding {
    id: usize,
    hash: u64,
}

#[cfg(test)]
impl Colliding {
    pub fn new(id: usize, hash: u64) -> Self {
        Self { id, hash }
    }
}

#[cfg(test)]
impl Hash for Colliding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}
