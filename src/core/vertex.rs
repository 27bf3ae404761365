//! Vertex identifiers and vertex records.
//!
//! Vertices carry two kinds of identity:
//!
//! - [`VertexId`] is the public, session-stable identifier. It is assigned
//!   monotonically by the graph and never reused, even after the vertex is removed.
//! - [`VertexKey`] is the internal slotmap key addressing the vertex record in
//!   storage. It is an implementation detail of [`Graph`](crate::core::graph::Graph).
//!
//! A [`Vertex`] record owns its adjacency set and an opaque payload (typically the
//! screen position used by a rendering collaborator). The graph never interprets
//! the payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::core::collections::NeighborSet;
use crate::core::traits::payload::Payload;

new_key_type! {
    /// Key type for accessing vertex records in the storage map.
    ///
    /// Keys are internal; public operations take a [`VertexId`].
    pub struct VertexKey;
}

/// Public identifier of a vertex.
///
/// Identifiers are ordered by assignment order, which makes them suitable for
/// canonicalizing edges (smaller identifier first).
///
/// # Examples
///
/// ```rust
/// use triflip::core::vertex::VertexId;
///
/// let a = VertexId::new(3);
/// let b = VertexId::from(7);
/// assert!(a < b);
/// assert_eq!(b.get(), 7);
/// assert_eq!(a.to_string(), "3");
/// ```
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VertexId(u64);

impl VertexId {
    /// Wraps a raw identifier value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for VertexId {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<VertexId> for u64 {
    #[inline]
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex record: identifier, adjacency set and opaque payload.
///
/// Records are created and destroyed only by the graph store, which keeps the
/// adjacency sets of both endpoints of every edge in sync.
#[derive(Clone, Debug)]
pub struct Vertex<P> {
    id: VertexId,
    payload: P,
    neighbors: NeighborSet,
}

impl<P> Vertex<P>
where
    P: Payload,
{
    pub(crate) fn new(id: VertexId, payload: P) -> Self {
        Self {
            id,
            payload,
            neighbors: NeighborSet::default(),
        }
    }

    /// The vertex identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> VertexId {
        self.id
    }

    /// The payload attached at creation time.
    #[inline]
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    #[inline]
    pub(crate) const fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Number of incident edges.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if `other` is adjacent to this vertex.
    #[inline]
    #[must_use]
    pub fn is_adjacent(&self, other: VertexId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Iterates over adjacent vertex identifiers in unspecified order.
    #[must_use = "this iterator is lazy and does nothing unless consumed"]
    pub fn neighbors(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbors.iter().copied()
    }

    #[inline]
    pub(crate) const fn neighbor_set(&self) -> &NeighborSet {
        &self.neighbors
    }

    /// Inserts one direction of an edge. Returns `false` if it was already present.
    #[inline]
    pub(crate) fn link(&mut self, other: VertexId) -> bool {
        self.neighbors.insert(other)
    }

    /// Removes one direction of an edge. Returns `false` if it was absent.
    #[inline]
    pub(crate) fn unlink(&mut self, other: VertexId) -> bool {
        self.neighbors.remove(&other)
    }

    /// Drops the whole adjacency set, returning the former neighbors.
    pub(crate) fn take_neighbors(&mut self) -> NeighborSet {
        std::mem::take(&mut self.neighbors)
    }
}
