//! Collection aliases used throughout the graph store and flip engine.
//!
//! The concrete hashers and buffers are chosen for speed on small integer keys:
//!
//! - [`FastHashMap`]/[`FastHashSet`] use `rustc_hash`'s `FxHasher`
//! - [`SmallBuffer`] keeps short lists (apex sets, triangle edges) on the stack
//! - [`StorageMap`] is the slotmap backend holding vertex records
//!
//! # Security Warning
//!
//! ⚠️ The Fx hasher is **not DoS-resistant**. Vertex identifiers are assigned by the
//! graph itself, so keys are never attacker-controlled.

use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

use crate::core::edge::EdgeKey;
use crate::core::vertex::VertexId;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Internal storage backend for vertex records.
///
/// `DenseSlotMap` is used by default (the `dense-slotmap` feature); building with
/// `--no-default-features` switches to `SlotMap`. The choice never leaks into the
/// public API: callers address vertices by [`VertexId`].
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Internal storage backend for vertex records.
///
/// `DenseSlotMap` is used by default (the `dense-slotmap` feature); building with
/// `--no-default-features` switches to `SlotMap`. The choice never leaks into the
/// public API: callers address vertices by [`VertexId`].
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// `HashMap` backed by `FxHasher`.
///
/// # Examples
///
/// ```rust
/// use triflip::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(7, 1);
/// assert_eq!(map.get(&7), Some(&1));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// `HashSet` backed by `FxHasher`.
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-first vector; spills to the heap past `N` elements.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// DOMAIN-SPECIFIC TYPES
// =============================================================================

/// Inline capacity for apex lists.
///
/// A flippable edge has exactly two apexes; a third slot covers the common
/// "one too many" rejection without spilling, the fourth is slack.
pub const APEX_BUFFER_SIZE: usize = 4;

/// Adjacency set of a single vertex.
pub type NeighborSet = FastHashSet<VertexId>;

/// Sorted apex list returned by the triangle oracle.
pub type ApexBuffer = SmallBuffer<VertexId, APEX_BUFFER_SIZE>;

/// Set of canonical edge keys.
pub type EdgeKeySet = FastHashSet<EdgeKey>;

// =============================================================================
// UTILITY FUNCTIONS
// =============================================================================

/// Creates a [`FastHashMap`] with pre-allocated capacity.
#[inline]
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default())
}

/// Creates a [`FastHashSet`] with pre-allocated capacity.
///
/// # Examples
///
/// ```rust
/// use triflip::core::collections::fast_hash_set_with_capacity;
///
/// let set = fast_hash_set_with_capacity::<u64>(32);
/// assert!(set.capacity() >= 32);
/// ```
#[inline]
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, FxBuildHasher::default())
}
