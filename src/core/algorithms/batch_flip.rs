//! Batch flips: validate several flips as one unit, then apply all or none.
//!
//! A batch is planned against the current graph ([`Graph::plan_batch_flip`]):
//!
//! 1. every edge must be flippable right now
//! 2. the resulting operations must be pairwise conflict-free
//!    (see [`conflicts`](crate::core::algorithms::conflicts))
//! 3. no added edge may already exist unless the batch removes it
//!
//! The plan records the graph generation it was validated against;
//! [`Graph::apply_batch_flip`] refuses a plan once the graph has moved on.
//! Application removes every old edge before adding any new one, so additions
//! never collide with edges that are about to disappear.
//!
//! [`Graph::commit_batch_flip`] plans from the current selection, applies, and
//! clears the selection.

use crate::core::algorithms::conflicts::{check_all_pairs, check_existing_diagonal};
use crate::core::algorithms::flips::{FlipError, FlipOperation};
use crate::core::collections::{EdgeKeySet, fast_hash_set_with_capacity};
use crate::core::config::batch_trace_enabled;
use crate::core::edge::EdgeKey;
use crate::core::graph::Graph;
use crate::core::traits::payload::Payload;

/// A validated set of flips, bound to the graph generation it was planned at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFlipPlan {
    operations: Vec<FlipOperation>,
    generation: u64,
}

impl BatchFlipPlan {
    /// The planned operations, ordered by removed edge.
    #[must_use]
    pub fn operations(&self) -> &[FlipOperation] {
        &self.operations
    }

    /// Graph generation the plan was validated against.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of flips in the plan.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Always `false` for plans produced by [`Graph::plan_batch_flip`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<P> Graph<P>
where
    P: Payload,
{
    /// Validates flipping every edge in `edges` at once.
    ///
    /// Duplicate keys are collapsed. The graph is not modified.
    ///
    /// # Errors
    ///
    /// - [`FlipError::EmptyBatch`] if `edges` is empty
    /// - [`FlipError::Graph`] or [`FlipError::NotFlippable`] for the first edge
    ///   that cannot be flipped on its own
    /// - [`FlipError::Conflict`] for the first interfering pair, or an added
    ///   edge that already exists
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let graph = samples::grid(3, 3).unwrap();
    /// let plan = graph
    ///     .plan_batch_flip([EdgeKey::from((1, 5)), EdgeKey::from((2, 6))])
    ///     .unwrap();
    /// let added: Vec<String> = plan.operations().iter().map(|op| op.added().to_string()).collect();
    /// assert_eq!(added, ["2-4", "3-5"]);
    ///
    /// // 1-5 and 5-9 meet at vertex 5 and are treated as sharing a triangle.
    /// assert!(graph.plan_batch_flip([EdgeKey::from((1, 5)), EdgeKey::from((5, 9))]).is_err());
    /// ```
    pub fn plan_batch_flip<I>(&self, edges: I) -> Result<BatchFlipPlan, FlipError>
    where
        I: IntoIterator<Item = EdgeKey>,
    {
        let mut keys: Vec<EdgeKey> = edges.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.is_empty() {
            return Err(FlipError::EmptyBatch);
        }

        let trace = batch_trace_enabled();
        let mut operations = Vec::with_capacity(keys.len());
        for edge in &keys {
            let operation = self.flip_operation(edge.v0(), edge.v1())?;
            if trace {
                tracing::trace!(flip = %operation, "[batch] planned operation");
            }
            operations.push(operation);
        }

        check_all_pairs(&operations)?;

        let mut removed: EdgeKeySet = fast_hash_set_with_capacity(operations.len());
        removed.extend(operations.iter().map(FlipOperation::removed));
        for operation in &operations {
            check_existing_diagonal(self, operation, &removed)?;
        }

        Ok(BatchFlipPlan {
            operations,
            generation: self.generation(),
        })
    }

    /// Applies a plan produced by [`plan_batch_flip`](Graph::plan_batch_flip).
    ///
    /// Selected keys of removed edges are dropped from the selection; the rest
    /// of the selection is left alone.
    ///
    /// The generation check catches later edits to the planning graph. A plan
    /// carried over to a clone at the same generation is still checked edge by
    /// edge before anything is mutated.
    ///
    /// # Errors
    ///
    /// - [`FlipError::StalePlan`] if the graph changed since planning
    /// - [`FlipError::Graph`] if a removed edge is missing or an added edge
    ///   already exists
    ///
    /// The graph is unchanged on error.
    pub fn apply_batch_flip(&mut self, plan: &BatchFlipPlan) -> Result<(), FlipError> {
        let current = self.generation();
        if plan.generation != current {
            return Err(FlipError::StalePlan {
                planned: plan.generation,
                current,
            });
        }

        self.apply_operations(&plan.operations)?;

        if batch_trace_enabled() {
            for operation in &plan.operations {
                tracing::trace!(flip = %operation, "[batch] applied operation");
            }
        }
        tracing::debug!(flips = plan.len(), "[batch] applied flip plan");
        Ok(())
    }

    /// Flips every selected edge as one transaction and clears the selection.
    ///
    /// Returns the applied operations, ordered by removed edge.
    ///
    /// # Errors
    ///
    /// Same as [`plan_batch_flip`](Graph::plan_batch_flip); an empty selection
    /// yields [`FlipError::EmptyBatch`]. On error neither the graph nor the
    /// selection changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triflip::prelude::*;
    ///
    /// let mut graph = samples::polygon_fan(6).unwrap();
    /// graph.try_add_to_selection(EdgeKey::from((1, 3))).unwrap();
    ///
    /// let applied = graph.commit_batch_flip().unwrap();
    /// assert_eq!(applied.len(), 1);
    /// assert!(graph.has_edge(VertexId::new(2), VertexId::new(4)));
    /// assert!(graph.selection().is_empty());
    /// ```
    pub fn commit_batch_flip(&mut self) -> Result<Vec<FlipOperation>, FlipError> {
        let plan = match self.plan_batch_flip(self.selection.iter()) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::debug!(error = %err, "[batch] commit rejected");
                return Err(err);
            }
        };
        self.apply_batch_flip(&plan)?;
        self.selection.clear();

        tracing::debug!(flips = plan.len(), "[batch] committed selection");
        Ok(plan.operations)
    }
}
