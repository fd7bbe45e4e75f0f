//! gsdepth Command-Line Interface
//!
//! Depth-optimal graph-state preparation circuits from the command line.
//!
//! ```text
//! gsdepth synth  --input graph.json [--encoding tableau] [--format qasm]
//! gsdepth encode --input graph.json --depth 3 --output graph.cnf
//! gsdepth bounds --input graph.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{bounds, encode, synth};

/// gsdepth - SAT-based depth-optimal graph-state synthesis
#[derive(Parser)]
#[command(name = "gsdepth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "console", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Console,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a depth-optimal circuit for a graph state
    Synth {
        /// Graph file (JSON edge list or adjacency matrix)
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Encoding (tableau, edge-coloring)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Depth search (linear, binary)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Pin the edges of a maximum-degree vertex to the first layers
        #[arg(long)]
        symmetry_breaking: bool,

        /// Per-call solver budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Retries for an inconclusive depth
        #[arg(long)]
        retries: Option<u32>,

        /// Probe all candidate depths concurrently
        #[arg(long)]
        parallel: bool,

        /// Also run the other encoding and require the same depth
        #[arg(long)]
        cross_validate: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: synth::OutputFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the CNF instance for one depth in DIMACS format
    Encode {
        /// Graph file (JSON edge list or adjacency matrix)
        #[arg(short, long)]
        input: PathBuf,

        /// Candidate depth
        #[arg(short, long)]
        depth: u32,

        /// Encoding (tableau, edge-coloring)
        #[arg(short, long, default_value = "edge-coloring")]
        encoding: String,

        /// Pin the edges of a maximum-degree vertex to the first layers
        #[arg(long)]
        symmetry_breaking: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print graph statistics and depth bounds
    Bounds {
        /// Graph file (JSON edge list or adjacency matrix)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Console => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let result = match cli.command {
        Commands::Synth {
            input,
            config,
            encoding,
            strategy,
            symmetry_breaking,
            timeout_ms,
            retries,
            parallel,
            cross_validate,
            format,
            output,
        } => {
            let overrides = synth::Overrides {
                encoding,
                strategy,
                symmetry_breaking,
                timeout_ms,
                retries,
                parallel,
            };
            synth::execute(
                &input,
                config.as_deref(),
                overrides,
                cross_validate,
                format,
                output.as_deref(),
            )
            .await
        }

        Commands::Encode {
            input,
            depth,
            encoding,
            symmetry_breaking,
            output,
        } => encode::execute(&input, depth, &encoding, symmetry_breaking, output.as_deref()),

        Commands::Bounds { input } => bounds::execute(&input),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
