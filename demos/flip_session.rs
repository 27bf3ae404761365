//! # `flip_session` Example
//!
//! Replays a short editing session on the seed sample: inspecting triangles,
//! rejected and accepted flips, growing a selection through the admission gate,
//! and committing it as one batch.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example flip_session
//! RUST_LOG=triflip=debug TRIFLIP_TRACE=1 cargo run --example flip_session
//! ```

use triflip::prelude::*;

fn print_graph(label: &str, graph: &Graph<[f64; 2]>) {
    let edges: Vec<String> = graph.sorted_edges().iter().map(ToString::to_string).collect();
    let triangles: Vec<String> = graph.triangles().iter().map(ToString::to_string).collect();
    println!("{label}");
    println!("  vertices:  {}", graph.number_of_vertices());
    println!("  edges:     {}", edges.join(" "));
    println!("  triangles: {}", triangles.join(" "));
    println!(
        "  valid triangulation: {}",
        if graph.is_valid_triangulation() { "yes" } else { "no" }
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut graph = samples::hexagon_seed();
    print_graph("Seed sample", &graph);

    // Nothing in the seed is flippable; show why for each interior diagonal.
    println!("\nFlip attempts on the seed:");
    for edge in [EdgeKey::from((1, 4)), EdgeKey::from((3, 4))] {
        match graph.flip_edge(edge.v0(), edge.v1()) {
            Ok(op) => println!("  flipped {op}"),
            Err(err) => println!("  {err}"),
        }
    }

    // Dropping 3-5 turns the seed into a fan from vertex 1.
    graph.remove_edge(VertexId::new(3), VertexId::new(5))?;
    print_graph("\nAfter removing 3-5", &graph);

    println!("\nSelecting edges:");
    for edge in [(1, 3), (1, 4), (1, 5)].map(EdgeKey::from) {
        match graph.try_add_to_selection(edge) {
            Ok(op) => println!("  + {edge} (will become {})", op.added()),
            Err(err) => println!("  x {edge}: {err}"),
        }
    }

    let applied = graph.commit_batch_flip()?;
    println!("\nCommitted {} flip(s):", applied.len());
    for op in &applied {
        println!("  {op}");
    }
    print_graph("\nAfter commit", &graph);

    let options = ValidationOptions {
        check_triangulation: true,
        check_selection: true,
    };
    match graph.validation_report(options) {
        Ok(()) => println!("\nAll invariants hold."),
        Err(report) => println!("\n{report}"),
    }

    Ok(())
}
