//! Encode command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use gsdepth_sat::write_dimacs;
use gsdepth_synth::{EncodeOptions, EncodingKind, encode};

use super::common::load_graph;

/// Execute the encode command.
pub fn execute(
    input: &Path,
    depth: u32,
    encoding: &str,
    symmetry_breaking: bool,
    output: Option<&Path>,
) -> Result<()> {
    let graph = load_graph(input)?;
    let kind: EncodingKind = encoding.parse()?;
    let instance = encode(kind, &graph, depth, EncodeOptions { symmetry_breaking });

    let comments = vec![
        format!("gsdepth {kind} encoding, depth {depth}"),
        format!(
            "graph: {} vertices, {} edges",
            graph.num_vertices(),
            graph.num_edges()
        ),
    ];

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_dimacs(&mut file, &instance.formula, &comments)?;
            eprintln!(
                "{} Wrote {} variables, {} clauses to {}",
                style("✓").green().bold(),
                instance.formula.num_vars(),
                instance.formula.num_clauses(),
                style(path.display()).green()
            );
        }
        None => {
            let stdout = std::io::stdout();
            write_dimacs(&mut stdout.lock(), &instance.formula, &comments)?;
        }
    }
    Ok(())
}
