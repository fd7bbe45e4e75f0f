//! Error types for the synthesis crate.

use gsdepth_ir::{InvalidGraph, IrError};
use gsdepth_sat::SatError;
use thiserror::Error;

/// Errors produced by depth-optimal synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Input graph rejected before any encoding was attempted.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] InvalidGraph),

    /// The solver could not decide a depth within its budget.
    #[error("depth {depth} undecided after {attempts} attempt(s)")]
    Inconclusive {
        /// The undecided depth.
        depth: u32,
        /// Solver calls spent on it.
        attempts: u32,
    },

    /// No depth up to the upper bound was satisfiable. Never expected for a
    /// correct encoding.
    #[error("no satisfiable depth up to {upper_bound}")]
    Infeasible {
        /// Largest depth probed.
        upper_bound: u32,
    },

    /// A decoded circuit failed re-verification against the target graph.
    #[error("decoded depth-{depth} circuit does not prepare the target state: {source}")]
    DecodingInconsistency {
        /// Depth of the decoded circuit.
        depth: u32,
        /// What the re-simulation found.
        #[source]
        source: IrError,
    },

    /// The two encodings disagree on the minimal depth.
    #[error("encodings disagree: tableau depth {tableau}, edge-coloring depth {edge_coloring}")]
    EncodingDisagreement {
        /// Minimal depth found with the tableau encoding.
        tableau: u32,
        /// Minimal depth found with the edge-coloring encoding.
        edge_coloring: u32,
    },

    /// Other IR failure.
    #[error("IR error: {0}")]
    Ir(IrError),

    /// Solver failure.
    #[error("SAT error: {0}")]
    Sat(#[from] SatError),

    /// Bad configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A background search task failed.
    #[error("search task failed: {0}")]
    Task(String),
}

impl From<IrError> for SynthError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::InvalidGraph(invalid) => SynthError::InvalidGraph(invalid),
            other => SynthError::Ir(other),
        }
    }
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
