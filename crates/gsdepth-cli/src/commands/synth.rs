//! Synth command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use gsdepth_synth::{SynthesisConfig, Synthesizer};
use tracing::debug;

use super::common::{load_graph, write_output};

/// How to print the result.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Full result record.
    Json,
    /// OpenQASM 3 circuit.
    Qasm,
}

/// Command-line values that override the configuration.
#[derive(Debug, Default)]
pub struct Overrides {
    pub encoding: Option<String>,
    pub strategy: Option<String>,
    pub symmetry_breaking: bool,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub parallel: bool,
}

impl Overrides {
    fn apply(self, mut config: SynthesisConfig) -> Result<SynthesisConfig> {
        if let Some(encoding) = self.encoding {
            config.encoding = encoding.parse()?;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.parse()?;
        }
        config.symmetry_breaking |= self.symmetry_breaking;
        if self.timeout_ms.is_some() {
            config.solver_timeout_ms = self.timeout_ms;
        }
        if let Some(retries) = self.retries {
            config.max_inconclusive_retries = retries;
        }
        config.parallel |= self.parallel;
        config.validate()?;
        Ok(config)
    }
}

/// Execute the synth command.
pub async fn execute(
    input: &Path,
    config_file: Option<&Path>,
    overrides: Overrides,
    cross_validate: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let graph = load_graph(input)?;
    let config = overrides.apply(SynthesisConfig::load(config_file)?)?;
    debug!(?config, "resolved configuration");

    eprintln!(
        "{} Synthesizing {} ({} vertices, {} edges) with {} encoding",
        style("→").cyan().bold(),
        style(input.display()).green(),
        graph.num_vertices(),
        graph.num_edges(),
        style(config.encoding).yellow()
    );

    let synthesizer = Synthesizer::new(config);
    let result = if synthesizer.config().parallel {
        synthesizer.synthesize_parallel(Arc::new(graph.clone())).await?
    } else {
        synthesizer.synthesize(&graph)?
    };

    if cross_validate {
        let depth = synthesizer
            .cross_validate(&graph)
            .context("Cross-validation failed")?;
        eprintln!(
            "  {} both encodings report depth {}",
            style("✓").green(),
            depth
        );
    }

    eprintln!(
        "{} Optimal depth {} ({} solver calls)",
        style("✓").green().bold(),
        style(result.depth).yellow().bold(),
        result.solver_calls
    );

    let rendered = match format {
        OutputFormat::Text => format!("{result}"),
        OutputFormat::Json => serde_json::to_string_pretty(&result)? + "\n",
        OutputFormat::Qasm => result.circuit.to_qasm3(),
    };
    write_output(output, &rendered)
}
