//! Construction options and runtime toggles.
//!
//! [`GraphOptions`] is built with `derive_builder`:
//!
//! ```rust
//! use triflip::core::config::GraphOptionsBuilder;
//! use triflip::core::graph::Graph;
//!
//! let options = GraphOptionsBuilder::default()
//!     .first_vertex_id(100)
//!     .vertex_capacity(16)
//!     .build()
//!     .unwrap();
//!
//! let mut graph: Graph = Graph::with_options(options);
//! assert_eq!(graph.add_vertex(()).get(), 100);
//! ```
//!
//! Verbose batch tracing is switched on by setting `TRIFLIP_TRACE` in the
//! environment; events are emitted at `trace` level through `tracing`.

/// Environment variable enabling per-operation batch tracing.
pub const TRACE_ENV_VAR: &str = "TRIFLIP_TRACE";

/// Largest accepted [`GraphOptions::first_vertex_id`].
///
/// Starting at or below this value leaves at least `2^63` fresh identifiers,
/// so the counter cannot wrap onto an identifier already handed out.
pub const MAX_FIRST_VERTEX_ID: u64 = u64::MAX / 2;

/// Options controlling how a [`Graph`](crate::core::graph::Graph) allocates
/// identifiers and storage.
///
/// Fields are private; values come from [`GraphOptionsBuilder`] (validated) or
/// [`Default`].
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GraphOptions {
    /// Identifier given to the first vertex (and again after a reset).
    #[builder(default = "1")]
    first_vertex_id: u64,

    /// Number of vertex records to pre-allocate.
    #[builder(default)]
    vertex_capacity: usize,
}

impl GraphOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.first_vertex_id {
            Some(first) if first > MAX_FIRST_VERTEX_ID => Err(format!(
                "first_vertex_id {first} exceeds {MAX_FIRST_VERTEX_ID}; identifiers could be reused"
            )),
            _ => Ok(()),
        }
    }
}

impl GraphOptions {
    /// Identifier given to the first vertex (and again after a reset).
    #[inline]
    #[must_use]
    pub const fn first_vertex_id(&self) -> u64 {
        self.first_vertex_id
    }

    /// Number of vertex records to pre-allocate.
    #[inline]
    #[must_use]
    pub const fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    pub(crate) const fn with_vertex_capacity(mut self, vertex_capacity: usize) -> Self {
        self.vertex_capacity = vertex_capacity;
        self
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            first_vertex_id: 1,
            vertex_capacity: 0,
        }
    }
}

/// Returns `true` when `TRIFLIP_TRACE` is set.
#[must_use]
pub fn batch_trace_enabled() -> bool {
    std::env::var_os(TRACE_ENV_VAR).is_some()
}
