//! Edge selection and its admission gate.
//!
//! The [`Selection`] is the set of edges an editor has marked for the next batch
//! flip. It only grows through [`Graph::try_add_to_selection`], which runs the
//! same checks a batch commit runs, but only between the candidate and the edges
//! already selected. Since the selection is pairwise consistent before every
//! admission, it stays pairwise consistent after it, and a commit of an
//! untouched selection cannot fail on a conflict.
//!
//! Removing edges from the selection never needs validation.

use thiserror::Error;

use crate::core::algorithms::conflicts::{check_candidate, check_existing_diagonal};
use crate::core::algorithms::flips::{FlipError, FlipOperation};
use crate::core::collections::{EdgeKeySet, fast_hash_set_with_capacity};
use crate::core::edge::EdgeKey;
use crate::core::graph::{Graph, GraphError};
use crate::core::traits::payload::Payload;
use crate::core::vertex::VertexId;

/// Canonical keys of the edges marked for flipping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    edges: EdgeKeySet,
}

impl Selection {
    /// Returns `true` if `edge` is selected.
    #[must_use]
    pub fn contains(&self, edge: EdgeKey) -> bool {
        self.edges.contains(&edge)
    }

    /// Number of selected edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over the selected keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.iter().copied()
    }

    /// The selected keys, ascending.
    #[must_use]
    pub fn sorted(&self) -> Vec<EdgeKey> {
        let mut edges: Vec<EdgeKey> = self.iter().collect();
        edges.sort_unstable();
        edges
    }

    pub(crate) fn insert(&mut self, edge: EdgeKey) -> bool {
        self.edges.insert(edge)
    }

    pub(crate) fn discard(&mut self, edge: EdgeKey) -> bool {
        self.edges.remove(&edge)
    }

    /// Drops every key with `vertex` as an endpoint. Returns how many were dropped.
    pub(crate) fn discard_incident(&mut self, vertex: VertexId) -> usize {
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.contains(vertex));
        before - self.edges.len()
    }

    pub(crate) fn clear(&mut self) {
        self.edges.clear();
    }
}

/// Outcome of [`Graph::toggle_selection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionToggle {
    /// The edge is now the only selected edge.
    Selected(FlipOperation),
    /// The edge was selected and has been removed from the selection.
    Deselected,
}

/// Reasons the admission gate refuses an edge.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    /// The edge is already in the selection.
    #[error("Edge {edge} is already selected")]
    AlreadySelected {
        /// The candidate.
        edge: EdgeKey,
    },
    /// The candidate is not flippable or conflicts with the selection.
    #[error(transparent)]
    Rejected(#[from] FlipError),
    /// An edge selected earlier is no longer flippable.
    #[error("Selected edge {edge} is no longer flippable")]
    StaleSelection {
        /// The stale selected edge.
        edge: EdgeKey,
        /// Why it cannot be flipped anymore.
        #[source]
        source: FlipError,
    },
}

impl<P> Graph<P>
where
    P: Payload,
{
    /// Flip operations of the current selection, ascending by removed edge.
    fn selected_operations(&self) -> Result<Vec<FlipOperation>, SelectionError> {
        self.selection
            .sorted()
            .into_iter()
            .map(|edge| {
                self.flip_operation(edge.v0(), edge.v1())
                    .map_err(|source| SelectionError::StaleSelection { edge, source })
            })
            .collect()
    }

    /// Adds `edge` to the selection if it can be flipped together with every
    /// edge already selected.
    ///
    /// Returns the candidate's flip operation on success.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::AlreadySelected`] if `edge` is selected
    /// - [`SelectionError::Rejected`] if `edge` is not flippable, shares a
    ///   triangle with a selected edge, would create the same or a co-triangular
    ///   diagonal, or would create an edge that already exists
    /// - [`SelectionError::StaleSelection`] if a selected edge stopped being
    ///   flippable since it was admitted
    ///
    /// Selected edges are re-checked on every admission because a later edit
    /// (an added edge, say) can make one unflippable, and a commit would then
    /// fail. `StaleSelection` names that edge so the editor can show what is
    /// blocking the selection; deselecting it unblocks admission.
    ///
    /// The selection is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let mut graph = samples::polygon_fan(6).unwrap();
    /// graph.try_add_to_selection(EdgeKey::from((1, 3))).unwrap();
    ///
    /// // {1,4} shares triangle 1-3-4 with {1,3}.
    /// let err = graph.try_add_to_selection(EdgeKey::from((1, 4))).unwrap_err();
    /// assert!(matches!(
    ///     err,
    ///     SelectionError::Rejected(FlipError::Conflict(FlipConflict::SharedTriangle { .. }))
    /// ));
    /// assert_eq!(graph.selection().len(), 1);
    /// ```
    pub fn try_add_to_selection(&mut self, edge: EdgeKey) -> Result<FlipOperation, SelectionError> {
        match self.admit(edge) {
            Ok(candidate) => {
                self.selection.insert(edge);
                tracing::debug!(%edge, selected = self.selection.len(), "[selection] admitted edge");
                Ok(candidate)
            }
            Err(err) => {
                tracing::debug!(%edge, error = %err, "[selection] rejected edge");
                Err(err)
            }
        }
    }

    fn admit(&self, edge: EdgeKey) -> Result<FlipOperation, SelectionError> {
        if self.selection.contains(edge) {
            return Err(SelectionError::AlreadySelected { edge });
        }
        let candidate = self.flip_operation(edge.v0(), edge.v1())?;
        let existing = self.selected_operations()?;

        check_candidate(&candidate, &existing).map_err(FlipError::from)?;

        let mut removed: EdgeKeySet = fast_hash_set_with_capacity(existing.len() + 1);
        removed.extend(existing.iter().map(FlipOperation::removed));
        check_existing_diagonal(self, &candidate, &removed).map_err(FlipError::from)?;

        Ok(candidate)
    }

    /// Removes `edge` from the selection. Returns `false` if it was not selected.
    pub fn remove_from_selection(&mut self, edge: EdgeKey) -> bool {
        let removed = self.selection.discard(edge);
        if removed {
            tracing::debug!(%edge, "[selection] deselected edge");
        }
        removed
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Single-click selection: deselects `edge` if it is selected, otherwise
    /// replaces the whole selection with `edge` provided it is flippable.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Rejected`] if `edge` is not flippable; the
    /// selection is unchanged in that case.
    pub fn toggle_selection(&mut self, edge: EdgeKey) -> Result<SelectionToggle, SelectionError> {
        if self.remove_from_selection(edge) {
            return Ok(SelectionToggle::Deselected);
        }
        let operation = self.flip_operation(edge.v0(), edge.v1())?;
        self.selection.clear();
        self.selection.insert(edge);
        tracing::debug!(%edge, "[selection] selected single edge");
        Ok(SelectionToggle::Selected(operation))
    }

    /// Removes every selected edge from the graph and clears the selection.
    ///
    /// Returns the number of edges removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingEdge`] if a selected key names no edge,
    /// which cannot happen while the store's invariants hold. The graph is
    /// unchanged in that case.
    pub fn remove_selected_edges(&mut self) -> Result<usize, GraphError> {
        let edges = self.selection.sorted();
        if let Some(&missing) = edges.iter().find(|e| !self.has_edge(e.v0(), e.v1())) {
            return Err(GraphError::MissingEdge { edge: missing });
        }
        for edge in &edges {
            self.remove_edge(edge.v0(), edge.v1())?;
        }
        self.selection.clear();
        tracing::debug!(removed = edges.len(), "[selection] removed selected edges");
        Ok(edges.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::conflicts::FlipConflict;
    use crate::core::algorithms::flips::NotFlippableReason;
    use crate::core::samples;

    fn key(u: u64, v: u64) -> EdgeKey {
        EdgeKey::from((u, v))
    }

    #[test]
    fn gate_admits_independent_edges() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        graph.try_add_to_selection(key(2, 6)).unwrap();
        assert_eq!(graph.selection().sorted(), vec![key(1, 5), key(2, 6)]);
    }

    #[test]
    fn gate_rejects_already_selected() {
        let mut graph = samples::polygon_fan(6).unwrap();
        graph.try_add_to_selection(key(3, 1)).unwrap();
        assert_eq!(
            graph.try_add_to_selection(key(1, 3)),
            Err(SelectionError::AlreadySelected { edge: key(1, 3) })
        );
    }

    #[test]
    fn gate_rejects_unflippable_candidates() {
        let mut graph = samples::hexagon_seed();
        assert_eq!(
            graph.try_add_to_selection(key(1, 4)),
            Err(SelectionError::Rejected(FlipError::NotFlippable {
                edge: key(1, 4),
                reason: NotFlippableReason::DiagonalExists {
                    diagonal: key(3, 5)
                },
            }))
        );
        assert!(graph.selection().is_empty());
    }

    #[test]
    fn gate_rejects_co_triangular_diagonals() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(2, 6)).unwrap();
        assert_eq!(
            graph.try_add_to_selection(key(4, 8)),
            Err(SelectionError::Rejected(FlipError::Conflict(
                FlipConflict::CoTriangularDiagonals {
                    first: key(2, 6),
                    second: key(4, 8),
                    first_diagonal: key(3, 5),
                    second_diagonal: key(5, 7),
                }
            )))
        );
    }

    #[test]
    fn gate_rejects_duplicate_diagonals() {
        // Quadrilaterals 1-3-2-4 and 1-5-2-6 share the apex pair {1,2}.
        let mut graph: Graph = Graph::from_edge_list(
            6,
            &[
                (3, 4),
                (1, 3),
                (1, 4),
                (2, 3),
                (2, 4),
                (5, 6),
                (1, 5),
                (1, 6),
                (2, 5),
                (2, 6),
            ],
        )
        .unwrap();
        graph.try_add_to_selection(key(3, 4)).unwrap();

        assert_eq!(
            graph.try_add_to_selection(key(5, 6)),
            Err(SelectionError::Rejected(FlipError::Conflict(
                FlipConflict::DuplicateDiagonal {
                    first: key(3, 4),
                    second: key(5, 6),
                    diagonal: key(1, 2),
                }
            )))
        );
        assert_eq!(graph.selection().sorted(), vec![key(3, 4)]);
        assert_eq!(graph.commit_batch_flip().unwrap().len(), 1);
    }

    #[test]
    fn gate_reports_stale_selection() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        graph.add_edge(VertexId::new(2), VertexId::new(4)).unwrap();

        let err = graph.try_add_to_selection(key(5, 9)).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::StaleSelection { edge, .. } if edge == key(1, 5)
        ));

        assert!(graph.remove_from_selection(key(1, 5)));
        graph.try_add_to_selection(key(5, 9)).unwrap();
    }

    #[test]
    fn removing_a_selected_edge_discards_its_key() {
        let mut graph = samples::polygon_fan(6).unwrap();
        graph.try_add_to_selection(key(1, 3)).unwrap();
        graph.remove_edge(VertexId::new(3), VertexId::new(1)).unwrap();
        assert!(graph.selection().is_empty());
    }

    #[test]
    fn removing_a_vertex_discards_incident_keys() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        graph.try_add_to_selection(key(2, 6)).unwrap();
        graph.remove_vertex(VertexId::new(6)).unwrap();
        assert_eq!(graph.selection().sorted(), vec![key(1, 5)]);
    }

    #[test]
    fn toggle_replaces_or_deselects() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        graph.try_add_to_selection(key(2, 6)).unwrap();

        let outcome = graph.toggle_selection(key(4, 8)).unwrap();
        assert!(matches!(outcome, SelectionToggle::Selected(op) if op.added() == key(5, 7)));
        assert_eq!(graph.selection().sorted(), vec![key(4, 8)]);

        assert_eq!(
            graph.toggle_selection(key(4, 8)),
            Ok(SelectionToggle::Deselected)
        );
        assert!(graph.selection().is_empty());

        assert!(graph.toggle_selection(key(1, 2)).is_err());
        assert!(graph.selection().is_empty());
    }

    #[test]
    fn remove_selected_edges_clears_selection() {
        let mut graph = samples::grid(3, 3).unwrap();
        let edges_before = graph.number_of_edges();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        graph.try_add_to_selection(key(2, 6)).unwrap();

        assert_eq!(graph.remove_selected_edges(), Ok(2));
        assert_eq!(graph.number_of_edges(), edges_before - 2);
        assert!(!graph.has_edge(VertexId::new(1), VertexId::new(5)));
        assert!(graph.selection().is_empty());
    }

    #[test]
    fn clear_and_remove_from_selection() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(key(1, 5)).unwrap();
        assert!(graph.remove_from_selection(key(1, 5)));
        assert!(!graph.remove_from_selection(key(1, 5)));

        graph.try_add_to_selection(key(2, 6)).unwrap();
        graph.clear_selection();
        assert!(graph.selection().is_empty());
    }
}
