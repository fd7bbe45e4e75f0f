//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gsdepth_ir::Graph;

/// Load a graph from JSON: either `{"num_vertices": n, "edges": [[u, v], ...]}`
/// or a square 0/1 adjacency matrix.
pub fn load_graph(path: &Path) -> Result<Graph> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_graph(&source).with_context(|| format!("Invalid graph in {}", path.display()))
}

/// Parse either accepted JSON graph form.
pub fn parse_graph(source: &str) -> Result<Graph> {
    let value: serde_json::Value = serde_json::from_str(source).context("Malformed JSON")?;
    if value.is_array() {
        let matrix: Vec<Vec<u8>> =
            serde_json::from_value(value).context("Expected an adjacency matrix of 0/1 rows")?;
        Ok(Graph::from_adjacency_matrix(&matrix)?)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Write to `output`, or stdout when absent.
pub fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}
