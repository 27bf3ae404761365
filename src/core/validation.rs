//! Invariant validation for [`Graph`].
//!
//! The store's mutators keep these invariants by construction; the checks here
//! exist for tests, property tests and debugging sessions.
//!
//! [`Graph::is_valid`] runs the structural checks and stops at the first
//! failure. [`Graph::validation_report`] runs every check (plus the optional
//! ones selected by [`ValidationOptions`]) and returns all violations at once.

use thiserror::Error;

use crate::core::algorithms::flips::FlipError;
use crate::core::edge::EdgeKey;
use crate::core::graph::Graph;
use crate::core::traits::payload::Payload;
use crate::core::vertex::VertexId;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// A broken invariant found by validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphValidationError {
    /// The identifier map and the vertex storage disagree.
    #[error("Inconsistent identifier mapping: {message}")]
    InconsistentMapping {
        /// Description of the mismatch.
        message: String,
    },
    /// A vertex is adjacent to itself.
    #[error("Vertex {vertex} is adjacent to itself")]
    SelfLoop {
        /// The offending vertex.
        vertex: VertexId,
    },
    /// `v` is a neighbor of `u` but not the other way round.
    #[error("Asymmetric adjacency: {v} is a neighbor of {u}, but {u} is not a neighbor of {v}")]
    AsymmetricAdjacency {
        /// Vertex listing the neighbor.
        u: VertexId,
        /// Vertex missing the back reference.
        v: VertexId,
    },
    /// An adjacency set names a vertex that does not exist.
    #[error("Vertex {vertex} references unknown neighbor {neighbor}")]
    DanglingReference {
        /// Vertex holding the reference.
        vertex: VertexId,
        /// The unknown neighbor.
        neighbor: VertexId,
    },
    /// The cached edge count disagrees with the adjacency sets.
    #[error("Edge count is {recorded} but adjacency holds {actual} edges")]
    EdgeCountMismatch {
        /// Cached count.
        recorded: usize,
        /// Count derived from adjacency.
        actual: usize,
    },
    /// A selected key names no edge.
    #[error("Selected edge {edge} does not exist")]
    SelectedEdgeMissing {
        /// The stale key.
        edge: EdgeKey,
    },
    /// The selection cannot be committed as one batch.
    #[error("Selection cannot be flipped as a batch: {source}")]
    SelectionConflict {
        /// Why the batch would be rejected.
        #[source]
        source: FlipError,
    },
    /// An edge lies in no triangle.
    #[error("Edge {edge} does not belong to any triangle")]
    DanglingEdge {
        /// The dangling edge.
        edge: EdgeKey,
    },
}

/// Category of an invariant, used to group report entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Identifier ↔ storage key mapping.
    IdMappings,
    /// No vertex is its own neighbor.
    NoSelfLoops,
    /// Adjacency is symmetric.
    Symmetry,
    /// Adjacency only names live vertices.
    References,
    /// Cached edge count matches adjacency.
    EdgeCount,
    /// Selected keys name existing edges.
    SelectionMembership,
    /// The selection is pairwise conflict-free (optional).
    SelectionConsistency,
    /// Every edge lies in a triangle (optional).
    Triangulation,
}

/// A single invariant violation recorded during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The detailed error explaining the failure.
    pub error: GraphValidationError,
}

/// Aggregate report returned by [`Graph::validation_report`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphValidationReport {
    /// Violations in the order the checks ran.
    pub violations: Vec<InvariantViolation>,
}

impl GraphValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if a violation of `kind` was recorded.
    #[must_use]
    pub fn has(&self, kind: InvariantKind) -> bool {
        self.violations.iter().any(|violation| violation.kind == kind)
    }
}

impl std::fmt::Display for GraphValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invariant violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {:?}: {}", violation.kind, violation.error)?;
        }
        Ok(())
    }
}

/// Optional checks for [`Graph::validation_report`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationOptions {
    /// Require every edge to lie in at least one triangle.
    pub check_triangulation: bool,
    /// Require the selection to be committable as one batch.
    pub check_selection: bool,
}

// =============================================================================
// VALIDATION
// =============================================================================

impl<P> Graph<P>
where
    P: Payload,
{
    /// Checks that identifier map and vertex storage agree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::InconsistentMapping`].
    pub fn validate_id_mappings(&self) -> Result<(), GraphValidationError> {
        let mappings = self.id_mappings();
        let storage = self.storage();
        if mappings.len() != storage.len() {
            return Err(GraphValidationError::InconsistentMapping {
                message: format!(
                    "{} identifiers mapped, {} vertex records stored",
                    mappings.len(),
                    storage.len()
                ),
            });
        }
        for (&id, &key) in mappings {
            match storage.get(key) {
                Some(record) if record.id() == id => {}
                Some(record) => {
                    return Err(GraphValidationError::InconsistentMapping {
                        message: format!("identifier {id} maps to the record of {}", record.id()),
                    });
                }
                None => {
                    return Err(GraphValidationError::InconsistentMapping {
                        message: format!("identifier {id} maps to a removed record"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that no vertex is adjacent to itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::SelfLoop`].
    pub fn validate_no_self_loops(&self) -> Result<(), GraphValidationError> {
        match self.vertices().find(|vertex| vertex.is_adjacent(vertex.id())) {
            Some(vertex) => Err(GraphValidationError::SelfLoop { vertex: vertex.id() }),
            None => Ok(()),
        }
    }

    /// Checks that every adjacency entry names a live vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::DanglingReference`].
    pub fn validate_references(&self) -> Result<(), GraphValidationError> {
        for vertex in self.vertices() {
            if let Some(neighbor) = vertex.neighbors().find(|&n| !self.contains_vertex(n)) {
                return Err(GraphValidationError::DanglingReference {
                    vertex: vertex.id(),
                    neighbor,
                });
            }
        }
        Ok(())
    }

    /// Checks `v ∈ adjacency(u) ⟺ u ∈ adjacency(v)`.
    ///
    /// Dangling entries are reported by [`validate_references`](Graph::validate_references)
    /// and skipped here.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::AsymmetricAdjacency`].
    pub fn validate_symmetry(&self) -> Result<(), GraphValidationError> {
        for vertex in self.vertices() {
            let u = vertex.id();
            for v in vertex.neighbors() {
                if self.vertex(v).is_some_and(|other| !other.is_adjacent(u)) {
                    return Err(GraphValidationError::AsymmetricAdjacency { u, v });
                }
            }
        }
        Ok(())
    }

    /// Checks the cached edge count against the adjacency sets.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::EdgeCountMismatch`].
    pub fn validate_edge_count(&self) -> Result<(), GraphValidationError> {
        let degree_sum: usize = self.vertices().map(|vertex| vertex.degree()).sum();
        let actual = degree_sum / 2;
        if degree_sum % 2 != 0 || actual != self.number_of_edges() {
            return Err(GraphValidationError::EdgeCountMismatch {
                recorded: self.number_of_edges(),
                actual,
            });
        }
        Ok(())
    }

    /// Checks that every selected key names an existing edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::SelectedEdgeMissing`].
    pub fn validate_selection_membership(&self) -> Result<(), GraphValidationError> {
        match self
            .selection()
            .sorted()
            .into_iter()
            .find(|edge| !self.has_edge(edge.v0(), edge.v1()))
        {
            Some(edge) => Err(GraphValidationError::SelectedEdgeMissing { edge }),
            None => Ok(()),
        }
    }

    /// Checks that the selection would pass a batch commit right now.
    ///
    /// An empty selection is consistent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::SelectionConflict`].
    pub fn validate_selection_consistency(&self) -> Result<(), GraphValidationError> {
        if self.selection().is_empty() {
            return Ok(());
        }
        self.plan_batch_flip(self.selection().iter())
            .map(|_| ())
            .map_err(|source| GraphValidationError::SelectionConflict { source })
    }

    /// Checks that every edge lies in a triangle.
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::DanglingEdge`] for the smallest dangling edge.
    pub fn validate_triangulation(&self) -> Result<(), GraphValidationError> {
        match self.dangling_edges().first() {
            Some(&edge) => Err(GraphValidationError::DanglingEdge { edge }),
            None => Ok(()),
        }
    }

    /// Runs the structural checks, stopping at the first failure.
    ///
    /// Covers identifier mappings, self-loops, references, symmetry, the edge
    /// count and selection membership. Whether the graph is a triangulation is
    /// not part of validity; see
    /// [`is_valid_triangulation`](Graph::is_valid_triangulation).
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphValidationError`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let mut graph = samples::hexagon_seed();
    /// graph.remove_vertex(VertexId::new(1)).unwrap();
    /// assert!(graph.is_valid().is_ok());
    /// ```
    pub fn is_valid(&self) -> Result<(), GraphValidationError> {
        self.validate_id_mappings()?;
        self.validate_no_self_loops()?;
        self.validate_references()?;
        self.validate_symmetry()?;
        self.validate_edge_count()?;
        self.validate_selection_membership()
    }

    /// Runs every check and collects all violations.
    ///
    /// If the identifier mapping is broken, only mapping violations are
    /// reported, since the remaining checks would produce secondary noise.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphValidationReport`] listing every violation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let graph: Graph = Graph::from_edge_list(3, &[(1, 2), (2, 3)]).unwrap();
    /// assert!(graph.validation_report(ValidationOptions::default()).is_ok());
    ///
    /// let options = ValidationOptions { check_triangulation: true, ..Default::default() };
    /// let report = graph.validation_report(options).unwrap_err();
    /// assert!(report.has(InvariantKind::Triangulation));
    /// ```
    pub fn validation_report(
        &self,
        options: ValidationOptions,
    ) -> Result<(), GraphValidationReport> {
        let mut violations = Vec::new();

        if let Err(error) = self.validate_id_mappings() {
            violations.push(InvariantViolation {
                kind: InvariantKind::IdMappings,
                error,
            });
            return Err(GraphValidationReport { violations });
        }

        let checks: [(InvariantKind, fn(&Self) -> Result<(), GraphValidationError>); 5] = [
            (InvariantKind::NoSelfLoops, Self::validate_no_self_loops),
            (InvariantKind::References, Self::validate_references),
            (InvariantKind::Symmetry, Self::validate_symmetry),
            (InvariantKind::EdgeCount, Self::validate_edge_count),
            (
                InvariantKind::SelectionMembership,
                Self::validate_selection_membership,
            ),
        ];
        for (kind, check) in checks {
            if let Err(error) = check(self) {
                violations.push(InvariantViolation { kind, error });
            }
        }

        if options.check_selection {
            if let Err(error) = self.validate_selection_consistency() {
                violations.push(InvariantViolation {
                    kind: InvariantKind::SelectionConsistency,
                    error,
                });
            }
        }

        if options.check_triangulation {
            violations.extend(self.dangling_edges().into_iter().map(|edge| {
                InvariantViolation {
                    kind: InvariantKind::Triangulation,
                    error: GraphValidationError::DanglingEdge { edge },
                }
            }));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(violations = violations.len(), "graph validation failed");
            Err(GraphValidationReport { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;

    #[test]
    fn samples_are_structurally_valid() {
        assert!(samples::hexagon_seed().is_valid().is_ok());
        assert!(samples::polygon_fan(8).unwrap().is_valid().is_ok());
        assert!(samples::grid(4, 5).unwrap().is_valid().is_ok());
    }

    #[test]
    fn full_report_on_a_valid_triangulation() {
        let mut graph = samples::grid(3, 3).unwrap();
        graph.try_add_to_selection(EdgeKey::from((1, 5))).unwrap();
        let options = ValidationOptions {
            check_triangulation: true,
            check_selection: true,
        };
        assert_eq!(graph.validation_report(options), Ok(()));
    }

    #[test]
    fn report_lists_every_dangling_edge() {
        let mut graph = samples::hexagon_seed();
        graph.remove_edge(VertexId::new(1), VertexId::new(3)).unwrap();
        graph.remove_edge(VertexId::new(3), VertexId::new(5)).unwrap();
        assert!(graph.is_valid().is_ok());

        let options = ValidationOptions {
            check_triangulation: true,
            ..ValidationOptions::default()
        };
        let report = graph.validation_report(options).unwrap_err();
        let dangling: Vec<EdgeKey> = report
            .violations
            .iter()
            .filter_map(|violation| match violation.error {
                GraphValidationError::DanglingEdge { edge } => Some(edge),
                _ => None,
            })
            .collect();
        assert_eq!(dangling, graph.dangling_edges());
        assert!(!dangling.is_empty());
        assert!(report.to_string().starts_with(&format!("{} invariant", dangling.len())));
    }

    #[test]
    fn stale_selection_is_reported_when_requested() {
        let mut graph = samples::polygon_fan(6).unwrap();
        graph.try_add_to_selection(EdgeKey::from((1, 3))).unwrap();
        graph.add_edge(VertexId::new(2), VertexId::new(4)).unwrap();

        assert_eq!(graph.validation_report(ValidationOptions::default()), Ok(()));
        let options = ValidationOptions {
            check_selection: true,
            ..ValidationOptions::default()
        };
        let report = graph.validation_report(options).unwrap_err();
        assert!(report.has(InvariantKind::SelectionConsistency));
        assert!(!report.has(InvariantKind::Symmetry));
    }
}
