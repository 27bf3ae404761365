//! Canonical edge identifiers.
//!
//! Edges are not stored as entities; an edge `{u, v}` exists iff `v` is in the
//! adjacency set of `u`. To use an edge as a lookup or selection key, we expose a
//! lightweight `EdgeKey` that:
//!
//! - identifies an edge purely by its two endpoint [`VertexId`]s
//! - canonicalizes endpoint ordering so `(a, b)` and `(b, a)` map to the same edge
//!   (smaller identifier first)
//! - is `Copy`/`Hash`/`Ord` for fast use in sets and maps
//!
//! Because vertex identifiers are assigned monotonically, `EdgeKey` ordering is
//! deterministic for a given sequence of graph operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::vertex::VertexId;

/// Canonical identifier for an (undirected) edge.
///
/// # Examples
///
/// ```rust
/// use triflip::core::edge::EdgeKey;
/// use triflip::core::vertex::VertexId;
///
/// let edge = EdgeKey::new(VertexId::new(4), VertexId::new(1));
/// assert_eq!(edge.endpoints(), (VertexId::new(1), VertexId::new(4)));
/// assert_eq!(edge.to_string(), "1-4");
/// ```
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "RawEdgeKey")]
pub struct EdgeKey {
    v0: VertexId,
    v1: VertexId,
}

/// Wire shape of [`EdgeKey`]; deserialized keys are re-canonicalized.
#[derive(Deserialize)]
struct RawEdgeKey {
    v0: VertexId,
    v1: VertexId,
}

impl From<RawEdgeKey> for EdgeKey {
    fn from(raw: RawEdgeKey) -> Self {
        Self::new(raw.v0, raw.v1)
    }
}

impl EdgeKey {
    /// Creates a new canonical edge key.
    ///
    /// The endpoints are reordered so that `v0 <= v1`.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Returns the first (smaller) endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(self) -> VertexId {
        self.v0
    }

    /// Returns the second (larger) endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(self) -> VertexId {
        self.v1
    }

    /// Returns the two endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (VertexId, VertexId) {
        (self.v0, self.v1)
    }

    /// Returns `true` if both endpoints are the same vertex.
    ///
    /// Loop keys can be constructed but never correspond to an edge of a graph.
    #[inline]
    #[must_use]
    pub fn is_loop(self) -> bool {
        self.v0 == self.v1
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[inline]
    #[must_use]
    pub fn contains(self, v: VertexId) -> bool {
        self.v0 == v || self.v1 == v
    }

    /// Returns the endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    #[must_use]
    pub fn opposite(self, v: VertexId) -> Option<VertexId> {
        if self.v0 == v {
            Some(self.v1)
        } else if self.v1 == v {
            Some(self.v0)
        } else {
            None
        }
    }
}

impl From<(u64, u64)> for EdgeKey {
    #[inline]
    fn from((a, b): (u64, u64)) -> Self {
        Self::new(VertexId::new(a), VertexId::new(b))
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.v0, self.v1)
    }
}
