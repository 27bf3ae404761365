//! # triflip
//!
//! A combinatorial triangulation graph with an edge-flip engine.
//!
//! The graph is a plain undirected adjacency structure. Triangles are never
//! stored; they are the 3-cliques of the adjacency relation, recomputed on
//! demand. On top of that the crate provides:
//!
//! - the edge flip: an edge shared by exactly two triangles is replaced by the
//!   other diagonal of the quadrilateral they form
//! - batch flips that validate several flips as one transaction and apply all
//!   or none
//! - an incremental selection gate that only admits edges which can later be
//!   flipped together with everything already selected
//!
//! Vertex payloads (typically screen positions) are opaque to the crate.
//!
//! # Basic Usage
//!
//! ```rust
//! use triflip::prelude::*;
//!
//! // A hexagon triangulated as a fan from vertex 1.
//! let mut graph = samples::polygon_fan(6).unwrap();
//! assert!(graph.is_valid_triangulation());
//!
//! // {1,3} borders triangles 1-2-3 and 1-3-4: flipping it yields {2,4}.
//! let op = graph.flip_edge(VertexId::new(1), VertexId::new(3)).unwrap();
//! assert_eq!(op.added(), EdgeKey::from((2, 4)));
//! assert!(graph.is_valid_triangulation());
//! ```
//!
//! # Batch Flips
//!
//! Edges are admitted to the selection one at a time; conflicting edges are
//! rejected with a reason:
//!
//! ```rust
//! use triflip::prelude::*;
//!
//! let mut graph = samples::grid(3, 3).unwrap();
//!
//! graph.try_add_to_selection(EdgeKey::from((1, 5))).unwrap();
//! graph.try_add_to_selection(EdgeKey::from((2, 6))).unwrap();
//!
//! // {4,8} would create 5-7 next to 3-5 from {2,6}.
//! let rejected = graph.try_add_to_selection(EdgeKey::from((4, 8)));
//! assert!(rejected.is_err());
//!
//! let flipped = graph.commit_batch_flip().unwrap();
//! assert_eq!(flipped.len(), 2);
//! assert!(graph.selection().is_empty());
//! ```
//!
//! # Errors
//!
//! Every mutator validates before it mutates and reports failure through a
//! typed error (`GraphError`, `FlipError`, `SelectionError`). A returned error
//! always means the graph is unchanged.
//!
//! # Tracing
//!
//! Accepted mutations, flips and selection decisions are logged with
//! [`tracing`](https://docs.rs/tracing) at `debug` level. Setting the
//! `TRIFLIP_TRACE` environment variable adds per-operation `trace` events for
//! batch planning and application.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the graph store, the triangle oracle, the flip
/// algorithms and the selection gate.
pub mod core {
    /// Flip algorithms: single flips, pairwise conflict rules and batch transactions.
    pub mod algorithms {
        /// Batch-flip planning and application
        pub mod batch_flip;
        /// Pairwise independence predicates shared by batches and the selection gate
        pub mod conflicts;
        /// Flip operations and the single-flip executor
        pub mod flips;

        pub use batch_flip::*;
        pub use conflicts::*;
        pub use flips::*;
    }
    pub mod collections;
    pub mod config;
    pub mod edge;
    pub mod graph;
    pub mod samples;
    pub mod selection;
    pub mod triangles;
    pub mod validation;
    pub mod vertex;
    /// Traits for data attached to the graph.
    pub mod traits {
        pub mod payload;
        pub use payload::*;
    }

    pub use edge::*;
    pub use graph::*;
    pub use selection::*;
    pub use triangles::*;
    pub use validation::*;
    pub use vertex::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        algorithms::{batch_flip::*, conflicts::FlipConflict, flips::*},
        config::{GraphOptions, GraphOptionsBuilder},
        edge::*,
        graph::*,
        samples,
        selection::*,
        traits::payload::*,
        triangles::*,
        validation::*,
        vertex::*,
    };

    // Collection types are handy when post-processing query results.
    pub use crate::core::collections::{
        ApexBuffer, EdgeKeySet, FastHashMap, FastHashSet, SmallBuffer,
        fast_hash_map_with_capacity, fast_hash_set_with_capacity,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            algorithms::{BatchFlipPlan, FlipOperation},
            edge::EdgeKey,
            graph::Graph,
            selection::Selection,
            triangles::Triangle,
            vertex::{Vertex, VertexId},
        },
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<VertexId>());
        assert!(is_normal::<EdgeKey>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<FlipOperation>());
        assert!(is_normal::<BatchFlipPlan>());
        assert!(is_normal::<Selection>());
        assert!(is_normal::<Vertex<[f64; 2]>>());
        assert!(is_normal::<Graph<[f64; 2]>>());
        assert!(is_normal::<Graph>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let options = GraphOptionsBuilder::default()
            .vertex_capacity(4)
            .build()
            .unwrap();
        let mut graph: Graph = Graph::with_options(options);
        let a = graph.add_vertex(());
        let b = graph.add_vertex(());
        graph.add_edge(a, b).unwrap();

        let mut set: EdgeKeySet = fast_hash_set_with_capacity(1);
        set.extend(graph.edges());
        assert!(set.contains(&EdgeKey::new(b, a)));

        let apexes: ApexBuffer = graph.apexes_of(a, b);
        assert!(apexes.is_empty());

        let seed = samples::hexagon_seed();
        assert!(seed.validation_report(ValidationOptions::default()).is_ok());
    }
}
