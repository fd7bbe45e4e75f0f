//! DIMACS CNF text format, read and written through `varisat::dimacs`.

use std::io::{Read, Write};

use varisat::dimacs::{DimacsParser, ParserError};

use crate::cnf::CnfFormula;
use crate::error::{SatError, SatResult};

/// Render a formula as DIMACS CNF text.
pub fn to_dimacs(formula: &CnfFormula) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = varisat::dimacs::write_dimacs(&mut buf, &formula.to_varisat());
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write a formula as DIMACS CNF, preceded by `c` comment lines.
pub fn write_dimacs<W: Write>(
    writer: &mut W,
    formula: &CnfFormula,
    comments: &[String],
) -> SatResult<()> {
    for comment in comments {
        for line in comment.lines() {
            writeln!(writer, "c {line}")?;
        }
    }
    varisat::dimacs::write_dimacs(writer, &formula.to_varisat())?;
    Ok(())
}

/// Parse DIMACS CNF.
///
/// The problem line is optional; when present, its variable and clause
/// counts are checked against the body. Every clause must end in `0`.
pub fn parse_dimacs(input: impl Read) -> SatResult<CnfFormula> {
    let parsed = DimacsParser::parse(input).map_err(|err| SatError::Dimacs {
        line: err.downcast_ref::<ParserError>().and_then(error_line),
        message: err.to_string(),
    })?;
    CnfFormula::from_varisat(&parsed)
}

fn error_line(err: &ParserError) -> Option<usize> {
    match err {
        ParserError::UnexpectedInput { line, .. }
        | ParserError::LiteralTooLarge { line, .. }
        | ParserError::InvalidHeader { line, .. }
        | ParserError::UnterminatedClause { line } => Some(*line),
        _ => None,
    }
}
