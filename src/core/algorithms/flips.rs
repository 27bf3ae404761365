//! Edge flips on a combinatorial triangulation.
//!
//! Flipping an edge `{u, v}` that is shared by exactly two triangles `u-v-a` and
//! `u-v-b` replaces it with the other diagonal `{a, b}` of the quadrilateral
//! `u-a-v-b`. The edge count is unchanged.
//!
//! A flip is computed in two steps, mirroring every mutator in the crate:
//!
//! 1. [`Graph::flip_operation`] inspects the current adjacency and returns a
//!    [`FlipOperation`] describing the rewrite, or the reason it is impossible.
//! 2. The operation is applied (all removals, then all additions).
//!
//! A [`FlipOperation`] is a snapshot. Once the graph mutates it must be
//! recomputed; [`Graph::flip_edge`] does both steps in one call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::algorithms::conflicts::FlipConflict;
use crate::core::collections::{EdgeKeySet, fast_hash_set_with_capacity};
use crate::core::edge::EdgeKey;
use crate::core::graph::{Graph, GraphError};
use crate::core::traits::payload::Payload;
use crate::core::vertex::VertexId;

// =============================================================================
// TYPES
// =============================================================================

/// The rewrite performed by one flip: `removed` is replaced by `added`.
///
/// # Examples
///
/// ```rust
/// use triflip::prelude::*;
///
/// let graph = samples::polygon_fan(6).unwrap();
/// let op = graph.flip_operation(VertexId::new(1), VertexId::new(3)).unwrap();
/// assert_eq!(op.removed(), EdgeKey::from((1, 3)));
/// assert_eq!(op.added(), EdgeKey::from((2, 4)));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlipOperation {
    removed: EdgeKey,
    added: EdgeKey,
}

impl FlipOperation {
    /// Only the oracle produces operations; tests use this to build
    /// combinations that no valid graph state yields.
    pub(crate) const fn new(removed: EdgeKey, added: EdgeKey) -> Self {
        Self { removed, added }
    }

    /// The edge that disappears.
    #[inline]
    #[must_use]
    pub const fn removed(&self) -> EdgeKey {
        self.removed
    }

    /// The diagonal that replaces it.
    #[inline]
    #[must_use]
    pub const fn added(&self) -> EdgeKey {
        self.added
    }

    /// The two apexes of the removed edge, i.e. the endpoints of the added one.
    #[inline]
    #[must_use]
    pub const fn apexes(&self) -> (VertexId, VertexId) {
        self.added.endpoints()
    }
}

impl std::fmt::Display for FlipOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.removed, self.added)
    }
}

/// Why an existing edge cannot be flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFlippableReason {
    /// The edge is not shared by exactly two triangles.
    ApexCount {
        /// Number of distinct apexes found.
        found: usize,
    },
    /// The two apexes are already connected.
    DiagonalExists {
        /// The existing diagonal.
        diagonal: EdgeKey,
    },
}

impl std::fmt::Display for NotFlippableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApexCount { found } => {
                write!(f, "it borders {found} triangle(s), expected exactly 2")
            }
            Self::DiagonalExists { diagonal } => {
                write!(f, "its flip target {diagonal} already exists")
            }
        }
    }
}

/// Errors raised by single and batch flips.
///
/// Every error leaves the graph unmodified.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlipError {
    /// A structural precondition failed (unknown vertex, missing edge).
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The edge exists but cannot be flipped.
    #[error("Edge {edge} is not flippable: {reason}")]
    NotFlippable {
        /// The rejected edge.
        edge: EdgeKey,
        /// Why.
        reason: NotFlippableReason,
    },
    /// Two operations of a batch interfere with each other or with the graph.
    #[error(transparent)]
    Conflict(#[from] FlipConflict),
    /// A batch without any edge was committed.
    #[error("No edges selected for flipping")]
    EmptyBatch,
    /// A planned batch was applied after the graph changed.
    #[error("Flip plan is stale: planned at generation {planned}, graph is at {current}")]
    StalePlan {
        /// Generation the plan was validated against.
        planned: u64,
        /// Current generation.
        current: u64,
    },
}

// =============================================================================
// SINGLE-FLIP EXECUTOR
// =============================================================================

impl<P> Graph<P>
where
    P: Payload,
{
    /// Computes the flip of `{u, v}` against the current graph without mutating it.
    ///
    /// # Errors
    ///
    /// - [`FlipError::Graph`] if a vertex is unknown or the edge does not exist
    /// - [`FlipError::NotFlippable`] if the edge does not have exactly two
    ///   apexes, or if they are already connected
    pub fn flip_operation(&self, u: VertexId, v: VertexId) -> Result<FlipOperation, FlipError> {
        for id in [u, v] {
            if !self.contains_vertex(id) {
                return Err(GraphError::UnknownVertex { vertex: id }.into());
            }
        }
        let edge = EdgeKey::new(u, v);
        if !self.has_edge(u, v) {
            return Err(GraphError::MissingEdge { edge }.into());
        }

        let apexes = self.apexes_of(u, v);
        let &[a, b] = apexes.as_slice() else {
            return Err(FlipError::NotFlippable {
                edge,
                reason: NotFlippableReason::ApexCount {
                    found: apexes.len(),
                },
            });
        };

        let diagonal = EdgeKey::new(a, b);
        if self.has_edge(a, b) {
            return Err(FlipError::NotFlippable {
                edge,
                reason: NotFlippableReason::DiagonalExists { diagonal },
            });
        }

        Ok(FlipOperation::new(edge, diagonal))
    }

    /// Flips `{u, v}`: removes it and adds the diagonal joining its two apexes.
    ///
    /// If `{u, v}` was selected, its key is dropped from the selection.
    ///
    /// # Errors
    ///
    /// Same as [`flip_operation`](Graph::flip_operation). On error the graph is
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let mut graph = samples::polygon_fan(6).unwrap();
    /// let edges_before = graph.number_of_edges();
    ///
    /// let op = graph.flip_edge(VertexId::new(1), VertexId::new(4)).unwrap();
    /// assert_eq!(op.added(), EdgeKey::from((3, 5)));
    /// assert!(!graph.has_edge(VertexId::new(1), VertexId::new(4)));
    /// assert!(graph.has_edge(VertexId::new(3), VertexId::new(5)));
    /// assert_eq!(graph.number_of_edges(), edges_before);
    ///
    /// // {1,4} is gone now, so flipping it again is a structural error.
    /// assert!(graph.flip_edge(VertexId::new(1), VertexId::new(4)).is_err());
    /// ```
    pub fn flip_edge(&mut self, u: VertexId, v: VertexId) -> Result<FlipOperation, FlipError> {
        let operation = self.flip_operation(u, v)?;
        self.apply_operations(&[operation])?;
        tracing::debug!(flip = %operation, "[flip] flipped edge");
        Ok(operation)
    }

    /// Applies operations as one unit: every removal, then every addition.
    ///
    /// Nothing is mutated until the whole set has been checked against the
    /// current adjacency, so an error always leaves the graph unchanged, even
    /// for a plan that was validated against another graph.
    pub(crate) fn apply_operations(&mut self, operations: &[FlipOperation]) -> Result<(), FlipError> {
        self.check_applicable(operations)?;

        for operation in operations {
            let (u, v) = operation.removed().endpoints();
            self.remove_edge(u, v)?;
        }
        for operation in operations {
            let (a, b) = operation.added().endpoints();
            self.add_edge(a, b)?;
        }
        Ok(())
    }

    /// Every removed edge exists once; every added edge is new, or freed by a
    /// removal of the same set, and is added once.
    fn check_applicable(&self, operations: &[FlipOperation]) -> Result<(), FlipError> {
        let mut removed: EdgeKeySet = fast_hash_set_with_capacity(operations.len());
        for operation in operations {
            let edge = operation.removed();
            let (u, v) = edge.endpoints();
            for id in [u, v] {
                if !self.contains_vertex(id) {
                    return Err(GraphError::UnknownVertex { vertex: id }.into());
                }
            }
            if !self.has_edge(u, v) || !removed.insert(edge) {
                return Err(GraphError::MissingEdge { edge }.into());
            }
        }

        let mut added: EdgeKeySet = fast_hash_set_with_capacity(operations.len());
        for operation in operations {
            let edge = operation.added();
            let (a, b) = edge.endpoints();
            if edge.is_loop() {
                return Err(GraphError::SelfLoop { vertex: a }.into());
            }
            for id in [a, b] {
                if !self.contains_vertex(id) {
                    return Err(GraphError::UnknownVertex { vertex: id }.into());
                }
            }
            let occupied = self.has_edge(a, b) && !removed.contains(&edge);
            if occupied || !added.insert(edge) {
                return Err(GraphError::DuplicateEdge { edge }.into());
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
