//! Payload trait for data attached to vertices.
//!
//! The graph treats vertex payloads as inert: they are stored at creation time
//! and handed back to whoever draws or hit-tests the graph. Positions such as
//! `[f64; 2]` are the usual payload; `()` works when only topology matters.

use std::fmt::Debug;

/// Trait alias for data that can be attached to a vertex.
///
/// # Required Traits
///
/// - `Clone`: graphs are cloneable (snapshots in tests, undo buffers in editors)
/// - `Debug`: for diagnostics and tracing output
///
/// Unlike identifiers, payloads need not be `Eq` or `Hash`, so floating-point
/// coordinates qualify.
///
/// # Usage
///
/// ```rust
/// use triflip::core::traits::Payload;
///
/// fn accepts<P: Payload>(_payload: P) {}
///
/// accepts([400.0_f64, 140.0]);
/// accepts(());
/// ```
pub trait Payload: Clone + Debug {}

// Blanket implementation for all types that satisfy the bounds
impl<T> Payload for T where T: Clone + Debug {}
