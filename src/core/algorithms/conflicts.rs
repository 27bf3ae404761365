//! Pairwise independence predicates shared by batch commits and the selection gate.
//!
//! Two flips may run in the same batch only if they do not interact. For
//! operations `i` and `j`, checked in this order:
//!
//! 1. **Shared triangle** – the removed edges must not be two sides of one
//!    triangle (their four endpoints must not collapse to three vertices).
//! 2. **Duplicate diagonal** – the added edges must differ.
//! 3. **Co-triangular diagonals** – the added edges must not collapse to three
//!    vertices either.
//!
//! Finally every added edge must be absent from the graph unless the batch
//! itself removes it ([`check_existing_diagonal`]).
//!
//! [`check_all_pairs`] runs the pairwise rules over a whole batch, checking
//! rule 1 for every pair before rules 2 and 3. [`check_candidate`] runs the same
//! rules between one new candidate and an already consistent set, which is how
//! the selection grows one edge at a time.

use thiserror::Error;

use crate::core::algorithms::flips::FlipOperation;
use crate::core::collections::EdgeKeySet;
use crate::core::edge::EdgeKey;
use crate::core::graph::Graph;
use crate::core::traits::payload::Payload;

/// A reason two flips (or a flip and the graph) cannot be applied together.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlipConflict {
    /// The removed edges are sides of a common triangle.
    #[error("Edges {first} and {second} share a triangle")]
    SharedTriangle {
        /// Removed edge of the earlier operation.
        first: EdgeKey,
        /// Removed edge of the later operation.
        second: EdgeKey,
    },
    /// Both flips would add the same edge.
    #[error("Flipping {first} and {second} would both create {diagonal}")]
    DuplicateDiagonal {
        /// Removed edge of the earlier operation.
        first: EdgeKey,
        /// Removed edge of the later operation.
        second: EdgeKey,
        /// The edge both would add.
        diagonal: EdgeKey,
    },
    /// The new diagonals would be two sides of one triangle.
    #[error(
        "Flipping {first} and {second} would create {first_diagonal} and {second_diagonal} in one triangle"
    )]
    CoTriangularDiagonals {
        /// Removed edge of the earlier operation.
        first: EdgeKey,
        /// Removed edge of the later operation.
        second: EdgeKey,
        /// Diagonal added by the earlier operation.
        first_diagonal: EdgeKey,
        /// Diagonal added by the later operation.
        second_diagonal: EdgeKey,
    },
    /// The new diagonal is already an edge the batch does not remove.
    #[error("Flipping {edge} would create {diagonal}, which already exists")]
    DiagonalExists {
        /// Removed edge of the offending operation.
        edge: EdgeKey,
        /// Its already present diagonal.
        diagonal: EdgeKey,
    },
}

/// Number of distinct vertices among the endpoints of two edges.
fn distinct_endpoints(a: EdgeKey, b: EdgeKey) -> usize {
    let mut ids = [a.v0(), a.v1(), b.v0(), b.v1()];
    ids.sort_unstable();
    1 + ids.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

/// Rule 1: the removed edges of `first` and `second` are not in one triangle.
///
/// # Errors
///
/// Returns [`FlipConflict::SharedTriangle`] if they are.
pub fn check_independent(first: &FlipOperation, second: &FlipOperation) -> Result<(), FlipConflict> {
    if distinct_endpoints(first.removed(), second.removed()) == 3 {
        return Err(FlipConflict::SharedTriangle {
            first: first.removed(),
            second: second.removed(),
        });
    }
    Ok(())
}

/// Rules 2 and 3: the added edges differ and are not in one triangle.
///
/// # Errors
///
/// Returns [`FlipConflict::DuplicateDiagonal`] or
/// [`FlipConflict::CoTriangularDiagonals`].
pub fn check_diagonals(first: &FlipOperation, second: &FlipOperation) -> Result<(), FlipConflict> {
    if first.added() == second.added() {
        return Err(FlipConflict::DuplicateDiagonal {
            first: first.removed(),
            second: second.removed(),
            diagonal: first.added(),
        });
    }
    if distinct_endpoints(first.added(), second.added()) == 3 {
        return Err(FlipConflict::CoTriangularDiagonals {
            first: first.removed(),
            second: second.removed(),
            first_diagonal: first.added(),
            second_diagonal: second.added(),
        });
    }
    Ok(())
}

/// Runs the pairwise rules over every pair of `operations`.
///
/// All pairs are checked for shared triangles before any pair is checked for
/// diagonal collisions, so the reported conflict is the first in that order.
///
/// # Errors
///
/// Returns the first [`FlipConflict`] found.
///
/// # Examples
///
/// ```rust
/// use triflip::prelude::*;
/// use triflip::core::algorithms::conflicts::check_all_pairs;
///
/// let graph = samples::polygon_fan(6).unwrap();
/// let ops = [
///     graph.flip_operation(VertexId::new(1), VertexId::new(3)).unwrap(),
///     graph.flip_operation(VertexId::new(1), VertexId::new(4)).unwrap(),
/// ];
/// assert!(matches!(
///     check_all_pairs(&ops),
///     Err(FlipConflict::SharedTriangle { .. })
/// ));
/// ```
pub fn check_all_pairs(operations: &[FlipOperation]) -> Result<(), FlipConflict> {
    for (i, first) in operations.iter().enumerate() {
        for second in &operations[i + 1..] {
            check_independent(first, second)?;
        }
    }
    for (i, first) in operations.iter().enumerate() {
        for second in &operations[i + 1..] {
            check_diagonals(first, second)?;
        }
    }
    Ok(())
}

/// Runs the pairwise rules between `candidate` and each of `existing`.
///
/// `existing` is assumed to be pairwise consistent already.
///
/// # Errors
///
/// Returns the first [`FlipConflict`] found.
pub fn check_candidate(
    candidate: &FlipOperation,
    existing: &[FlipOperation],
) -> Result<(), FlipConflict> {
    for other in existing {
        check_independent(other, candidate)?;
    }
    for other in existing {
        check_diagonals(other, candidate)?;
    }
    Ok(())
}

/// The added edge of `operation` must not exist unless it is in `removed`.
///
/// # Errors
///
/// Returns [`FlipConflict::DiagonalExists`].
pub fn check_existing_diagonal<P>(
    graph: &Graph<P>,
    operation: &FlipOperation,
    removed: &EdgeKeySet,
) -> Result<(), FlipConflict>
where
    P: Payload,
{
    let diagonal = operation.added();
    if graph.has_edge(diagonal.v0(), diagonal.v1()) && !removed.contains(&diagonal) {
        return Err(FlipConflict::DiagonalExists {
            edge: operation.removed(),
            diagonal,
        });
    }
    Ok(())
}
