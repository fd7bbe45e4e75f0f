//! The solver seam.
//!
//! Encoders produce a [`CnfFormula`]; a [`SatBackend`] decides it. Everything
//! above this module is solver-agnostic.

use std::time::Duration;

use crate::assignment::Assignment;
use crate::cnf::CnfFormula;
use crate::error::SatResult;

/// Outcome of a single solver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Satisfiable, with a model.
    Sat(Assignment),
    /// Proven unsatisfiable.
    Unsat,
    /// No decision within the resource limits.
    Inconclusive,
}

impl Verdict {
    /// True for [`Verdict::Sat`].
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat(_))
    }

    /// Short lowercase label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Sat(_) => "sat",
            Verdict::Unsat => "unsat",
            Verdict::Inconclusive => "inconclusive",
        }
    }
}

/// Resource limits for one solver call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveLimits {
    /// Wall-clock budget. `None` means unbounded.
    pub timeout: Option<Duration>,
}

impl SolveLimits {
    /// No limits.
    pub const UNBOUNDED: Self = Self { timeout: None };

    /// Limit the call to `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// A SAT solver.
///
/// # Contract
///
/// | Method | Purpose |
/// |--------|---------|
/// | `name` | Identifier used in logs and error messages |
/// | `solve` | Decide a formula within the given limits |
///
/// A backend must never report `Unsat` for a call it abandoned; running out
/// of budget is [`Verdict::Inconclusive`]. Returned models cover every
/// variable of the formula or leave the rest to read as `false`.
///
/// Backends are shared across worker threads, so implementations must be
/// `Send + Sync`.
pub trait SatBackend: Send + Sync {
    /// Backend identifier.
    fn name(&self) -> &str;

    /// Decide `formula`.
    fn solve(&self, formula: &CnfFormula, limits: SolveLimits) -> SatResult<Verdict>;
}
