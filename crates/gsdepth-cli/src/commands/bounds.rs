//! Bounds command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::load_graph;

/// Execute the bounds command.
pub fn execute(input: &Path) -> Result<()> {
    let graph = load_graph(input)?;

    println!("{} {}", style("Graph").cyan().bold(), style(input.display()).green());
    println!("  vertices:    {}", graph.num_vertices());
    println!("  edges:       {}", graph.num_edges());
    println!("  components:  {}", graph.connected_components());
    println!("  max degree:  {}", graph.max_degree());
    println!(
        "  depth range: [{}, {}]",
        style(graph.depth_lower_bound()).yellow(),
        style(graph.depth_upper_bound()).yellow()
    );
    Ok(())
}
