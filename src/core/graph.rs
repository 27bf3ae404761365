//! The graph store: vertices, undirected adjacency and the flip selection.
//!
//! [`Graph`] is the single owned aggregate every other component works on. It
//! owns the vertex records, the adjacency relation, and the [`Selection`] of
//! edges marked for a batch flip. All mutation goes through the methods in this
//! module, which keep the structural invariants intact at every observable point:
//!
//! - **Symmetry** – `v ∈ adjacency(u) ⟺ u ∈ adjacency(v)`
//! - **No self-loops** – `u ∉ adjacency(u)`
//! - **No dangling references** – every identifier in an adjacency set names a
//!   live vertex
//! - **Selection membership** – every selected key names an existing edge
//!
//! Mutators validate first and mutate second; a returned error always means the
//! graph is unchanged.
//!
//! # Examples
//!
//! ```rust
//! use triflip::prelude::*;
//!
//! let mut graph: Graph<[f64; 2]> = Graph::new();
//! let a = graph.add_vertex([0.0, 0.0]);
//! let b = graph.add_vertex([1.0, 0.0]);
//! let c = graph.add_vertex([0.0, 1.0]);
//!
//! graph.add_edge(a, b).unwrap();
//! graph.add_edge(b, c).unwrap();
//! graph.add_edge(c, a).unwrap();
//!
//! assert_eq!(graph.number_of_edges(), 3);
//! assert!(matches!(graph.add_edge(a, a), Err(GraphError::SelfLoop { .. })));
//! assert!(graph.is_valid_triangulation());
//! ```

use thiserror::Error;

use crate::core::collections::{
    FastHashMap, NeighborSet, StorageMap, fast_hash_map_with_capacity,
};
use crate::core::config::GraphOptions;
use crate::core::edge::EdgeKey;
use crate::core::selection::Selection;
use crate::core::traits::payload::Payload;
use crate::core::vertex::{Vertex, VertexId, VertexKey};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Structural errors reported by graph store mutators.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// Both endpoints of a requested edge are the same vertex.
    #[error("Self-loop on vertex {vertex} is not allowed")]
    SelfLoop {
        /// The vertex named twice.
        vertex: VertexId,
    },
    /// The vertex does not exist (never created, or already removed).
    #[error("Vertex {vertex} not found")]
    UnknownVertex {
        /// The missing vertex.
        vertex: VertexId,
    },
    /// The edge already exists.
    #[error("Edge {edge} already exists")]
    DuplicateEdge {
        /// The existing edge.
        edge: EdgeKey,
    },
    /// The edge does not exist.
    #[error("Edge {edge} not found")]
    MissingEdge {
        /// The missing edge.
        edge: EdgeKey,
    },
}

// =============================================================================
// GRAPH STORE
// =============================================================================

/// Undirected graph representing a combinatorial triangulation.
///
/// `P` is the opaque per-vertex payload (usually a position). See the
/// [module documentation](self) for the invariants maintained.
#[derive(Clone, Debug)]
pub struct Graph<P = ()>
where
    P: Payload,
{
    /// Vertex records, addressed by internal keys.
    vertices: StorageMap<VertexKey, Vertex<P>>,

    /// Public identifier → storage key.
    ///
    /// Only modified together with `vertices`.
    id_to_key: FastHashMap<VertexId, VertexKey>,

    /// Identifier handed to the next created vertex.
    next_id: u64,

    /// Number of undirected edges.
    edge_count: usize,

    /// Edges marked for a batch flip.
    pub(crate) selection: Selection,

    /// Bumped on every structural mutation.
    generation: u64,

    options: GraphOptions,
}

impl<P> Default for Graph<P>
where
    P: Payload,
{
    fn default() -> Self {
        Self::with_options(GraphOptions::default())
    }
}

impl<P> Graph<P>
where
    P: Payload,
{
    /// Creates an empty graph with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given options.
    #[must_use]
    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            vertices: StorageMap::with_capacity_and_key(options.vertex_capacity()),
            id_to_key: fast_hash_map_with_capacity(options.vertex_capacity()),
            next_id: options.first_vertex_id(),
            edge_count: 0,
            selection: Selection::default(),
            generation: 0,
            options,
        }
    }

    /// Builds a graph with `vertex_count` default-payload vertices and the given
    /// edges, named by the identifiers the vertices receive (`1..=vertex_count`
    /// with default options).
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] raised while adding the edges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let graph: Graph = Graph::from_edge_list(3, &[(1, 2), (2, 3), (3, 1)]).unwrap();
    /// assert_eq!(graph.number_of_edges(), 3);
    /// assert_eq!(graph.triangles().len(), 1);
    /// ```
    pub fn from_edge_list(vertex_count: usize, edges: &[(u64, u64)]) -> Result<Self, GraphError>
    where
        P: Default,
    {
        let mut graph =
            Self::with_options(GraphOptions::default().with_vertex_capacity(vertex_count));
        for _ in 0..vertex_count {
            graph.add_vertex(P::default());
        }
        for &(u, v) in edges {
            graph.add_edge(VertexId::new(u), VertexId::new(v))?;
        }
        Ok(graph)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The options this graph was created with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> GraphOptions {
        self.options
    }

    /// Number of live vertices.
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    #[inline]
    #[must_use]
    pub const fn number_of_edges(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` if the graph has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Generation counter, incremented on every structural modification.
    ///
    /// Callers caching derived data (apex sets, flip plans) compare generations
    /// to detect that the cache has gone stale.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if `id` names a live vertex.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.id_to_key.contains_key(&id)
    }

    /// Returns the vertex record for `id`.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<P>> {
        self.id_to_key
            .get(&id)
            .and_then(|&key| self.vertices.get(key))
    }

    /// Returns the payload attached to `id`.
    #[must_use]
    pub fn payload(&self, id: VertexId) -> Option<&P> {
        self.vertex(id).map(Vertex::payload)
    }

    /// Mutable access to the payload of `id` (e.g. to move a vertex on screen).
    ///
    /// Payload edits are not structural and do not bump the generation.
    pub fn payload_mut(&mut self, id: VertexId) -> Option<&mut P> {
        let key = *self.id_to_key.get(&id)?;
        self.vertices.get_mut(key).map(Vertex::payload_mut)
    }

    /// Iterates over all vertex records in unspecified order.
    #[must_use = "this iterator is lazy and does nothing unless consumed"]
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<P>> + '_ {
        self.vertices.values()
    }

    /// All vertex identifiers in ascending order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self.id_to_key.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterates over the neighbors of `id` in unspecified order.
    ///
    /// If `id` is not a live vertex, the iterator is empty.
    #[must_use = "this iterator is lazy and does nothing unless consumed"]
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex(id).into_iter().flat_map(Vertex::neighbors)
    }

    /// Number of edges incident to `id` (0 for unknown vertices).
    #[must_use]
    pub fn degree(&self, id: VertexId) -> usize {
        self.vertex(id).map_or(0, Vertex::degree)
    }

    /// Returns `true` if the edge `{u, v}` exists.
    #[must_use]
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.vertex(u).is_some_and(|vertex| vertex.is_adjacent(v))
    }

    /// Iterates over every edge exactly once, as canonical keys, in unspecified order.
    #[must_use = "this iterator is lazy and does nothing unless consumed"]
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.vertices.values().flat_map(|vertex| {
            let u = vertex.id();
            vertex
                .neighbors()
                .filter(move |&v| u < v)
                .map(move |v| EdgeKey::new(u, v))
        })
    }

    /// All edges as canonical keys in ascending order.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<EdgeKey> {
        let mut edges: Vec<EdgeKey> = self.edges().collect();
        edges.sort_unstable();
        edges
    }

    /// The current selection of edges marked for a batch flip.
    #[inline]
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn neighbor_set(&self, id: VertexId) -> Option<&NeighborSet> {
        self.vertex(id).map(Vertex::neighbor_set)
    }

    pub(crate) fn id_mappings(&self) -> &FastHashMap<VertexId, VertexKey> {
        &self.id_to_key
    }

    pub(crate) const fn storage(&self) -> &StorageMap<VertexKey, Vertex<P>> {
        &self.vertices
    }

    fn require_vertex(&self, id: VertexId) -> Result<VertexKey, GraphError> {
        self.id_to_key
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownVertex { vertex: id })
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Allocates a fresh identifier and adds an isolated vertex carrying `payload`.
    ///
    /// Identifiers are never reused within a session: options only accept
    /// starting values up to [`MAX_FIRST_VERTEX_ID`](crate::core::config::MAX_FIRST_VERTEX_ID), which leaves more
    /// identifiers than can be allocated.
    pub fn add_vertex(&mut self, payload: P) -> VertexId {
        let id = VertexId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let key = self.vertices.insert(Vertex::new(id, payload));
        self.id_to_key.insert(id, key);
        self.bump_generation();

        tracing::debug!(vertex = %id, "added vertex");
        id
    }

    /// Removes a vertex together with all its incident edges.
    ///
    /// Selected edges touching the vertex are dropped from the selection.
    /// Returns the number of incident edges that were removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `id` is not a live vertex.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<usize, GraphError> {
        let key = self.require_vertex(id)?;

        let former_neighbors = self
            .vertices
            .get_mut(key)
            .map(Vertex::take_neighbors)
            .unwrap_or_default();
        for &neighbor in &former_neighbors {
            if let Some(record) = self
                .id_to_key
                .get(&neighbor)
                .and_then(|&neighbor_key| self.vertices.get_mut(neighbor_key))
            {
                record.unlink(id);
            }
        }

        self.vertices.remove(key);
        self.id_to_key.remove(&id);
        self.edge_count -= former_neighbors.len();
        let dropped = self.selection.discard_incident(id);
        self.bump_generation();

        tracing::debug!(
            vertex = %id,
            edges_removed = former_neighbors.len(),
            selection_dropped = dropped,
            "removed vertex"
        );
        Ok(former_neighbors.len())
    }

    /// Adds the undirected edge `{u, v}`.
    ///
    /// Both adjacency directions are inserted in one step.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SelfLoop`] if `u == v`
    /// - [`GraphError::UnknownVertex`] if either endpoint is not a live vertex
    /// - [`GraphError::DuplicateEdge`] if the edge already exists
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> Result<EdgeKey, GraphError> {
        if u == v {
            return Err(GraphError::SelfLoop { vertex: u });
        }
        let u_key = self.require_vertex(u)?;
        let v_key = self.require_vertex(v)?;
        let edge = EdgeKey::new(u, v);
        if self.has_edge(u, v) {
            return Err(GraphError::DuplicateEdge { edge });
        }

        self.link(u_key, v, v_key, u);
        self.edge_count += 1;
        self.bump_generation();

        tracing::debug!(%edge, "added edge");
        Ok(edge)
    }

    /// Removes the undirected edge `{u, v}` and drops it from the selection.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownVertex`] if either endpoint is not a live vertex
    /// - [`GraphError::MissingEdge`] if the edge does not exist
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> Result<EdgeKey, GraphError> {
        let u_key = self.require_vertex(u)?;
        let v_key = self.require_vertex(v)?;
        let edge = EdgeKey::new(u, v);
        if !self.has_edge(u, v) {
            return Err(GraphError::MissingEdge { edge });
        }

        self.unlink(u_key, v, v_key, u);
        self.edge_count -= 1;
        self.selection.discard(edge);
        self.bump_generation();

        tracing::debug!(%edge, "removed edge");
        Ok(edge)
    }

    /// Drops every vertex, edge and selected edge, and restarts identifier
    /// assignment at [`GraphOptions::first_vertex_id`](GraphOptions::first_vertex_id).
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.id_to_key.clear();
        self.selection.clear();
        self.next_id = self.options.first_vertex_id();
        self.edge_count = 0;
        self.bump_generation();

        tracing::debug!("graph reset");
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Inserts both directions of an edge whose endpoints were already checked.
    fn link(&mut self, u_key: VertexKey, v: VertexId, v_key: VertexKey, u: VertexId) {
        if let Some(record) = self.vertices.get_mut(u_key) {
            record.link(v);
        }
        if let Some(record) = self.vertices.get_mut(v_key) {
            record.link(u);
        }
    }

    /// Removes both directions of an edge whose endpoints were already checked.
    fn unlink(&mut self, u_key: VertexKey, v: VertexId, v_key: VertexKey, u: VertexId) {
        if let Some(record) = self.vertices.get_mut(u_key) {
            record.unlink(v);
        }
        if let Some(record) = self.vertices.get_mut(v_key) {
            record.unlink(u);
        }
    }

    #[inline]
    const fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GraphOptionsBuilder, MAX_FIRST_VERTEX_ID};

    fn v(raw: u64) -> VertexId {
        VertexId::new(raw)
    }

    fn triangle() -> Graph {
        Graph::from_edge_list(3, &[(1, 2), (2, 3), (3, 1)]).unwrap()
    }

    #[test]
    fn identifiers_are_monotonic_and_never_reused() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_vertex(());
        let b = graph.add_vertex(());
        assert_eq!((a, b), (v(1), v(2)));

        graph.remove_vertex(b).unwrap();
        let c = graph.add_vertex(());
        assert_eq!(c, v(3));
        assert!(!graph.contains_vertex(b));
    }

    #[test]
    fn add_edge_is_symmetric() {
        let graph = triangle();
        for edge in graph.edges() {
            let (u, w) = edge.endpoints();
            assert!(graph.has_edge(u, w));
            assert!(graph.has_edge(w, u));
        }
        assert_eq!(graph.degree(v(1)), 2);
        assert_eq!(graph.number_of_edges(), 3);
    }

    #[test]
    fn add_edge_rejects_structural_errors_without_mutation() {
        let mut graph = triangle();
        let before = graph.sorted_edges();
        let generation = graph.generation();

        assert_eq!(
            graph.add_edge(v(1), v(1)),
            Err(GraphError::SelfLoop { vertex: v(1) })
        );
        assert_eq!(
            graph.add_edge(v(1), v(9)),
            Err(GraphError::UnknownVertex { vertex: v(9) })
        );
        assert_eq!(
            graph.add_edge(v(2), v(1)),
            Err(GraphError::DuplicateEdge {
                edge: EdgeKey::new(v(1), v(2))
            })
        );

        assert_eq!(graph.sorted_edges(), before);
        assert_eq!(graph.generation(), generation);
    }

    #[test]
    fn remove_edge_reports_missing_edges() {
        let mut graph = triangle();
        assert_eq!(graph.remove_edge(v(2), v(1)), Ok(EdgeKey::new(v(1), v(2))));
        assert_eq!(
            graph.remove_edge(v(1), v(2)),
            Err(GraphError::MissingEdge {
                edge: EdgeKey::new(v(1), v(2))
            })
        );
        assert_eq!(
            graph.remove_edge(v(1), v(7)),
            Err(GraphError::UnknownVertex { vertex: v(7) })
        );
        assert!(!graph.has_edge(v(2), v(1)));
        assert_eq!(graph.number_of_edges(), 2);
    }

    #[test]
    fn remove_vertex_cleans_neighbor_sets() {
        let mut graph = triangle();
        assert_eq!(graph.remove_vertex(v(2)), Ok(2));
        assert_eq!(graph.number_of_vertices(), 2);
        assert_eq!(graph.number_of_edges(), 1);
        for vertex in graph.vertices() {
            assert!(!vertex.is_adjacent(v(2)));
        }
        assert_eq!(
            graph.remove_vertex(v(2)),
            Err(GraphError::UnknownVertex { vertex: v(2) })
        );
    }

    #[test]
    fn neighbors_of_unknown_vertex_is_empty() {
        let graph = triangle();
        assert_eq!(graph.neighbors(v(42)).count(), 0);
        let mut around_one: Vec<_> = graph.neighbors(v(1)).collect();
        around_one.sort();
        assert_eq!(around_one, vec![v(2), v(3)]);
    }

    #[test]
    fn reset_restarts_identifiers() {
        let options = GraphOptionsBuilder::default()
            .first_vertex_id(10)
            .build()
            .unwrap();
        let mut graph: Graph = Graph::with_options(options);
        graph.add_vertex(());
        graph.add_vertex(());
        graph.add_edge(v(10), v(11)).unwrap();

        graph.reset();
        assert!(graph.is_empty());
        assert_eq!(graph.number_of_edges(), 0);
        assert!(graph.selection().is_empty());
        assert_eq!(graph.add_vertex(()), v(10));
    }

    #[test]
    fn identifiers_stay_distinct_at_the_highest_start() {
        let options = GraphOptionsBuilder::default()
            .first_vertex_id(MAX_FIRST_VERTEX_ID)
            .build()
            .unwrap();
        let mut graph: Graph = Graph::with_options(options);
        let ids: Vec<VertexId> = (0..3).map(|_| graph.add_vertex(())).collect();

        assert_eq!(
            ids,
            [
                v(MAX_FIRST_VERTEX_ID),
                v(MAX_FIRST_VERTEX_ID + 1),
                v(MAX_FIRST_VERTEX_ID + 2)
            ]
        );
        assert_eq!(graph.number_of_vertices(), 3);
        assert!(graph.is_valid().is_ok());

        // Starts that would run into u64::MAX are refused up front.
        assert!(
            GraphOptionsBuilder::default()
                .first_vertex_id(u64::MAX - 1)
                .build()
                .is_err()
        );
    }

    #[test]
    fn payload_is_inert() {
        let mut graph: Graph<[f64; 2]> = Graph::new();
        let a = graph.add_vertex([3.0, 4.0]);
        let generation = graph.generation();

        if let Some(position) = graph.payload_mut(a) {
            position[0] = 5.0;
        }
        assert_eq!(graph.payload(a), Some(&[5.0, 4.0]));
        assert_eq!(graph.generation(), generation);
        assert_eq!(graph.payload(v(99)), None);
    }

    #[test]
    fn sorted_edges_are_canonical_and_ordered() {
        let graph: Graph = Graph::from_edge_list(4, &[(4, 1), (3, 2), (2, 1)]).unwrap();
        let rendered: Vec<_> = graph.sorted_edges().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1-2", "1-4", "2-3"]);
        assert_eq!(graph.vertex_ids(), vec![v(1), v(2), v(3), v(4)]);
    }

    #[test]
    fn error_messages_name_the_offender() {
        assert_eq!(
            GraphError::DuplicateEdge {
                edge: EdgeKey::new(v(3), v(1))
            }
            .to_string(),
            "Edge 1-3 already exists"
        );
        assert_eq!(
            GraphError::SelfLoop { vertex: v(4) }.to_string(),
            "Self-loop on vertex 4 is not allowed"
        );
    }
}
