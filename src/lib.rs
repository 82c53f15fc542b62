//! Persistent hash sets and maps on HAMT whose sub-trees can be shared over
//! threads.
//!
//! Hash-Array Mapped Trie (HAMT) is a data structure popular as a map (a.k.a.
//! associative array or dictionary) or set. Its immutable variant is adopted
//! widely by functional programming languages like Scala and Clojure to
//! implement immutable and memory-efficient associative arrays and sets.
//!
//! Every operation returns a new collection and leaves the original one
//! untouched. Only nodes on paths to modified entries are copied while the
//! rest are shared between the old and new collections. Set operations of
//! [`Set::union`], [`Set::intersection`] and [`Set::difference`] merge two
//! tries node by node.
//!
//! ```
//! use hamt_set::Set;
//!
//! let set = Set::new().insert(1).insert(2);
//! let other = set.remove(&1).insert(3);
//!
//! assert!(set.contains(&1));
//! assert_eq!(set.union(&other).len(), 3);
//! assert_eq!(set.intersection(&other), Set::singleton(2));
//! ```
//!
//! Keys must implement [`Hash`](std::hash::Hash) consistently with
//! [`Eq`]. Otherwise, operations silently return wrong results.

mod bitmap;
mod bucket;
mod hamt;
mod hash_nub;
mod key_value;
mod map;
#[cfg(test)]
mod proptests;
#[cfg(feature = "serde")]
mod serialization;
mod set;
mod utilities;

pub use hash_nub::{hash_nub, hash_nub_by, HashNubBy};
pub use map::{ClonedMapIterator, Map, MapIterator};
pub use set::{ClonedSetIterator, Set, SetIterator};
