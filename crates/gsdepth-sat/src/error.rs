//! Error types for the SAT crate.

use thiserror::Error;

/// Errors raised while building formulas or talking to a solver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SatError {
    /// The solver backend failed (not a verdict).
    #[error("SAT backend '{backend}' failed: {message}")]
    Backend {
        /// Backend name.
        backend: String,
        /// Failure description.
        message: String,
    },

    /// Malformed DIMACS input.
    #[error("invalid DIMACS input: {message}")]
    Dimacs {
        /// 1-based line number, when the error is tied to one.
        line: Option<usize>,
        /// What went wrong.
        message: String,
    },

    /// Literal 0 or a literal outside the `i32` range.
    #[error("invalid literal {0}")]
    InvalidLiteral(i64),

    /// I/O error while writing a formula.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SAT operations.
pub type SatResult<T> = Result<T, SatError>;
