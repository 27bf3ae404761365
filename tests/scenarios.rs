//! Editor scenarios on the seed sample.
//!
//! The seed is a hexagon (vertices `1..=6`, vertex 1 on top, clockwise on
//! screen) with rim edges and diagonals `1-3`, `1-4`, `1-5`, `3-5`.

use triflip::prelude::*;

fn v(raw: u64) -> VertexId {
    VertexId::new(raw)
}

fn key(u: u64, w: u64) -> EdgeKey {
    EdgeKey::from((u, w))
}

fn ids(apexes: &ApexBuffer) -> Vec<u64> {
    apexes.iter().map(|w| w.get()).collect()
}

#[test]
fn scenario_a_seed_is_a_valid_triangulation() {
    let graph = samples::hexagon_seed();

    assert_eq!(graph.number_of_vertices(), 6);
    assert_eq!(graph.number_of_edges(), 10);
    assert!(graph.is_valid_triangulation());
    assert!(graph.dangling_edges().is_empty());

    // Besides the fan's four triangles, 3-5 closes the cliques 1-3-5 and 3-4-5.
    let triangles: Vec<String> = graph.triangles().iter().map(ToString::to_string).collect();
    assert_eq!(
        triangles,
        ["1-2-3", "1-3-4", "1-3-5", "1-4-5", "1-5-6", "3-4-5"]
    );
}

#[test]
fn scenario_b_diagonal_with_connected_apexes_is_not_flippable() {
    let mut graph = samples::hexagon_seed();

    assert_eq!(ids(&graph.apexes_of(v(1), v(4))), [3, 5]);
    assert!(graph.has_edge(v(3), v(5)));
    assert!(!graph.is_flippable(v(1), v(4)));

    let before = graph.sorted_edges();
    assert!(matches!(
        graph.flip_edge(v(1), v(4)),
        Err(FlipError::NotFlippable {
            reason: NotFlippableReason::DiagonalExists { .. },
            ..
        })
    ));
    assert_eq!(graph.sorted_edges(), before);
}

#[test]
fn scenario_c_flip_replaces_edge_with_apex_diagonal() {
    let mut graph = samples::hexagon_seed();

    let apexes = graph.apexes_of(v(3), v(4));
    assert_eq!(ids(&apexes), [1, 5]);
    // In the seed itself the replacement 1-5 is already present.
    assert!(!graph.is_flippable(v(3), v(4)));

    graph.remove_edge(v(1), v(5)).unwrap();
    assert!(graph.is_flippable(v(3), v(4)));
    let edges_before = graph.number_of_edges();

    let op = graph.flip_edge(v(3), v(4)).unwrap();
    assert_eq!(op.removed(), key(3, 4));
    assert_eq!(op.added(), EdgeKey::new(apexes[0], apexes[1]));
    assert!(!graph.has_edge(v(3), v(4)));
    assert!(graph.has_edge(v(1), v(5)));
    assert_eq!(graph.number_of_edges(), edges_before);
    assert!(graph.is_valid().is_ok());
}

#[test]
fn scenario_d_gate_rejects_second_edge_of_a_triangle() {
    // The seed without 3-5 is the fan, where 1-3 and 1-4 are both flippable.
    let mut graph = samples::hexagon_seed();
    graph.remove_edge(v(3), v(5)).unwrap();
    assert_eq!(graph.sorted_edges(), samples::polygon_fan(6).unwrap().sorted_edges());

    let first = graph.try_add_to_selection(key(1, 3)).unwrap();
    assert_eq!(first.added(), key(2, 4));
    assert!(graph.is_flippable(v(1), v(4)));

    assert_eq!(
        graph.try_add_to_selection(key(1, 4)),
        Err(SelectionError::Rejected(FlipError::Conflict(
            FlipConflict::SharedTriangle {
                first: key(1, 3),
                second: key(1, 4),
            }
        )))
    );
    assert_eq!(graph.selection().sorted(), vec![key(1, 3)]);
}

#[test]
fn seed_sample_rejects_every_selection() {
    let mut graph = samples::hexagon_seed();
    for edge in graph.sorted_edges() {
        assert!(graph.try_add_to_selection(edge).is_err(), "{edge} admitted");
        assert!(graph.toggle_selection(edge).is_err(), "{edge} toggled");
    }
    assert!(graph.selection().is_empty());
    assert_eq!(graph.commit_batch_flip(), Err(FlipError::EmptyBatch));
}

#[test]
fn delete_key_removes_selected_edges() {
    let mut graph = samples::polygon_fan(6).unwrap();
    graph.toggle_selection(key(1, 4)).unwrap();

    assert_eq!(graph.remove_selected_edges(), Ok(1));
    assert!(!graph.has_edge(v(1), v(4)));
    // Triangles 1-3-4 and 1-4-5 are gone, leaving their outer sides dangling.
    assert_eq!(graph.triangles().len(), 2);
    assert_eq!(graph.dangling_edges(), vec![key(3, 4), key(4, 5)]);
    assert!(!graph.is_valid_triangulation());
}

#[test]
fn removing_a_vertex_drops_its_edges_and_selection() {
    let mut graph = samples::polygon_fan(6).unwrap();
    graph.try_add_to_selection(key(1, 3)).unwrap();

    assert_eq!(graph.remove_vertex(v(1)), Ok(5));
    assert!(graph.selection().is_empty());
    assert_eq!(graph.number_of_edges(), 4);
    assert_eq!(graph.dangling_edges().len(), 4);
    assert!(graph.is_valid().is_ok());
}

#[test]
fn reset_restarts_the_session() {
    let mut graph = samples::hexagon_seed();
    graph.reset();

    assert_eq!(graph.number_of_vertices(), 0);
    assert_eq!(graph.number_of_edges(), 0);
    assert!(graph.is_valid_triangulation());
    assert_eq!(graph.add_vertex([10.0, 20.0]), v(1));
}
