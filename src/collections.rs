use std::hash::BuildHasherDefault;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;


/// Use indexmap for fast lookups and rustc_hash for fast hashing
/// Insertion order is kept, so iteration over search state is deterministic
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Ordered set, used for explored nodes handed to visualization
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

pub(crate) use rustc_hash::FxHashSet;
