//! Triangle oracle: triangles and flip eligibility derived from adjacency.
//!
//! Triangles are never stored. A triangle is any 3-clique of the adjacency
//! relation, and every query here recomputes what it needs from the current
//! neighbor sets, so there is nothing to invalidate when the graph mutates.
//!
//! The central primitive is [`Graph::apexes_of`]: the *apexes* of `{u, v}` are
//! the common neighbors of `u` and `v`, i.e. the third vertices of every
//! triangle that has `{u, v}` as a side.

use serde::{Deserialize, Serialize};

use crate::core::collections::{ApexBuffer, FastHashSet};
use crate::core::edge::EdgeKey;
use crate::core::graph::Graph;
use crate::core::traits::payload::Payload;
use crate::core::vertex::VertexId;

/// A 3-clique of the adjacency relation, with vertices in ascending order.
///
/// # Examples
///
/// ```rust
/// use triflip::core::triangles::Triangle;
/// use triflip::core::vertex::VertexId;
///
/// let t = Triangle::new(VertexId::new(4), VertexId::new(1), VertexId::new(3));
/// let ids: Vec<u64> = t.vertices().iter().map(|v| v.get()).collect();
/// assert_eq!(ids, [1, 3, 4]);
/// ```
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Triangle {
    vertices: [VertexId; 3],
}

impl Triangle {
    /// Creates a triangle from three vertex identifiers in any order.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        let mut vertices = [a, b, c];
        vertices.sort_unstable();
        Self { vertices }
    }

    /// The three vertices, ascending.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    /// The three sides as canonical keys.
    #[must_use]
    pub fn edges(&self) -> [EdgeKey; 3] {
        let [a, b, c] = self.vertices;
        [EdgeKey::new(a, b), EdgeKey::new(a, c), EdgeKey::new(b, c)]
    }

    /// Returns `true` if `edge` is one of the three sides.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeKey) -> bool {
        self.edges().contains(&edge)
    }
}

impl std::fmt::Display for Triangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.vertices;
        write!(f, "{a}-{b}-{c}")
    }
}

impl<P> Graph<P>
where
    P: Payload,
{
    /// Returns every vertex adjacent to both `u` and `v`, ascending.
    ///
    /// The edge `{u, v}` itself need not exist. Unknown vertices have no
    /// neighbors, so the result is empty for them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let graph = samples::hexagon_seed();
    /// let apexes: Vec<u64> = graph
    ///     .apexes_of(VertexId::new(1), VertexId::new(4))
    ///     .iter()
    ///     .map(|v| v.get())
    ///     .collect();
    /// assert_eq!(apexes, [3, 5]);
    /// ```
    #[must_use]
    pub fn apexes_of(&self, u: VertexId, v: VertexId) -> ApexBuffer {
        let (Some(u_neighbors), Some(v_neighbors)) = (self.neighbor_set(u), self.neighbor_set(v))
        else {
            return ApexBuffer::new();
        };

        let (smaller, larger) = if u_neighbors.len() <= v_neighbors.len() {
            (u_neighbors, v_neighbors)
        } else {
            (v_neighbors, u_neighbors)
        };

        let mut apexes: ApexBuffer = smaller
            .iter()
            .copied()
            .filter(|&w| w != u && w != v && larger.contains(&w))
            .collect();
        apexes.sort_unstable();
        apexes
    }

    /// Returns `true` if `{u, v}` is an edge with exactly two apexes that are
    /// not yet connected to each other.
    ///
    /// Non-edges are never flippable. See
    /// [`flip_operation`](Graph::flip_operation) for the reason an edge is
    /// rejected.
    #[must_use]
    pub fn is_flippable(&self, u: VertexId, v: VertexId) -> bool {
        self.flip_operation(u, v).is_ok()
    }

    /// Returns `true` if every edge lies in at least one triangle.
    ///
    /// This is a purely combinatorial property: planarity and geometric quality
    /// are not checked. The empty graph is a valid triangulation.
    #[must_use]
    pub fn is_valid_triangulation(&self) -> bool {
        self.edges()
            .all(|edge| !self.apexes_of(edge.v0(), edge.v1()).is_empty())
    }

    /// Edges that belong to no triangle, ascending.
    ///
    /// Empty exactly when [`is_valid_triangulation`](Graph::is_valid_triangulation)
    /// holds.
    #[must_use]
    pub fn dangling_edges(&self) -> Vec<EdgeKey> {
        let mut dangling: Vec<EdgeKey> = self
            .edges()
            .filter(|edge| self.apexes_of(edge.v0(), edge.v1()).is_empty())
            .collect();
        dangling.sort_unstable();
        dangling
    }

    /// Every triangle of the graph, ascending.
    ///
    /// Each 3-clique is reported once, from its side with the two smallest
    /// vertices.
    #[must_use]
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut seen: FastHashSet<Triangle> = FastHashSet::default();
        for edge in self.edges() {
            let (u, v) = edge.endpoints();
            for &w in &self.apexes_of(u, v) {
                if w > v {
                    seen.insert(Triangle::new(u, v, w));
                }
            }
        }
        let mut triangles: Vec<Triangle> = seen.into_iter().collect();
        triangles.sort_unstable();
        triangles
    }
}
