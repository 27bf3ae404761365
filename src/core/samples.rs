//! Ready-made graphs for demos, tests and benchmarks.
//!
//! All samples use `[f64; 2]` screen positions as payload and are built on a
//! fresh [`Graph`], so vertex identifiers start at `1`.

use std::f64::consts::{PI, TAU};

use crate::core::graph::{Graph, GraphError};
use crate::core::vertex::VertexId;

/// Center of the sample polygons, in screen coordinates.
pub const SAMPLE_CENTER: [f64; 2] = [400.0, 300.0];

/// Radius of the sample polygons.
pub const SAMPLE_RADIUS: f64 = 160.0;

/// Distance between neighboring grid vertices.
pub const GRID_SPACING: f64 = 80.0;

/// Position of corner `index` of a regular `sides`-gon, first corner on top.
#[allow(clippy::cast_precision_loss)]
fn polygon_corner(index: usize, sides: usize) -> [f64; 2] {
    let angle = TAU * index as f64 / sides as f64 - PI / 2.0;
    [
        SAMPLE_RADIUS.mul_add(angle.cos(), SAMPLE_CENTER[0]),
        SAMPLE_RADIUS.mul_add(angle.sin(), SAMPLE_CENTER[1]),
    ]
}

fn add_polygon(graph: &mut Graph<[f64; 2]>, sides: usize) -> Vec<VertexId> {
    (0..sides)
        .map(|index| graph.add_vertex(polygon_corner(index, sides)))
        .collect()
}

/// The editor's seed sample: a hexagon with diagonals `1-3`, `1-4`, `1-5`
/// and `3-5`.
///
/// Every edge lies in a triangle, and none is flippable: each interior
/// diagonal's flip target already exists.
///
/// # Examples
///
/// ```rust
/// use triflip::prelude::*;
///
/// let graph = samples::hexagon_seed();
/// assert_eq!(graph.number_of_vertices(), 6);
/// assert_eq!(graph.number_of_edges(), 10);
/// assert!(graph.is_valid_triangulation());
/// ```
#[must_use]
pub fn hexagon_seed() -> Graph<[f64; 2]> {
    const DIAGONALS: [(usize, usize); 4] = [(0, 2), (0, 3), (0, 4), (2, 4)];

    let mut graph = Graph::new();
    let ids = add_polygon(&mut graph, 6);
    let rim = (0..ids.len()).map(|i| (i, (i + 1) % ids.len()));
    for (a, b) in rim.chain(DIAGONALS) {
        let added = graph.add_edge(ids[a], ids[b]);
        debug_assert!(added.is_ok(), "seed edge {a}-{b}: {added:?}");
    }
    graph
}

/// A convex `n`-gon triangulated as a fan from vertex `1`.
///
/// Every fan diagonal `1-k` (`3 <= k < n`) is flippable on its own. For
/// `n < 3` the result is a single vertex or edge.
///
/// # Errors
///
/// Propagates [`GraphError`] from edge insertion.
///
/// # Examples
///
/// ```rust
/// use triflip::prelude::*;
///
/// let graph = samples::polygon_fan(6).unwrap();
/// assert_eq!(graph.triangles().len(), 4);
/// assert!(graph.is_flippable(VertexId::new(1), VertexId::new(4)));
/// ```
pub fn polygon_fan(n: usize) -> Result<Graph<[f64; 2]>, GraphError> {
    let mut graph = Graph::new();
    let ids = add_polygon(&mut graph, n);

    match n {
        0 | 1 => {}
        2 => {
            graph.add_edge(ids[0], ids[1])?;
        }
        _ => {
            for i in 0..n {
                graph.add_edge(ids[i], ids[(i + 1) % n])?;
            }
            for &far in &ids[2..n - 1] {
                graph.add_edge(ids[0], far)?;
            }
        }
    }
    Ok(graph)
}

/// A `rows x cols` lattice, each cell split along its down-right diagonal.
///
/// Vertices are numbered row by row starting at `1`, so the cell with top-left
/// vertex `k` has diagonal `k - (k + cols + 1)`.
///
/// # Errors
///
/// Propagates [`GraphError`] from edge insertion.
///
/// # Examples
///
/// ```rust
/// use triflip::prelude::*;
///
/// let graph = samples::grid(3, 3).unwrap();
/// assert_eq!(graph.number_of_vertices(), 9);
/// assert_eq!(graph.triangles().len(), 8);
/// assert!(graph.is_flippable(VertexId::new(1), VertexId::new(5)));
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn grid(rows: usize, cols: usize) -> Result<Graph<[f64; 2]>, GraphError> {
    let mut graph = Graph::new();
    let mut ids = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            ids.push(graph.add_vertex([c as f64 * GRID_SPACING, r as f64 * GRID_SPACING]));
        }
    }

    let at = |r: usize, c: usize| ids[r * cols + c];
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                graph.add_edge(at(r, c), at(r, c + 1))?;
            }
            if r + 1 < rows {
                graph.add_edge(at(r, c), at(r + 1, c))?;
            }
            if r + 1 < rows && c + 1 < cols {
                graph.add_edge(at(r, c), at(r + 1, c + 1))?;
            }
        }
    }
    Ok(graph)
}
