//! [`SatBackend`] on top of the `varisat` CDCL solver.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::assignment::Assignment;
use crate::backend::{SatBackend, SolveLimits, Verdict};
use crate::cnf::CnfFormula;
use crate::error::{SatError, SatResult};

const NAME: &str = "varisat";

/// In-process CDCL backend.
///
/// Without a timeout the solver runs on the calling thread. With one, it
/// runs on a dedicated thread and the call returns
/// [`Verdict::Inconclusive`] when the budget expires. varisat cannot be
/// interrupted, so the solve is kept: a later call on an identical formula
/// (a retry with a larger budget) waits on that same solve instead of
/// starting another. At most one solver thread runs per distinct formula.
#[derive(Debug, Default)]
pub struct VarisatBackend {
    in_flight: Mutex<Vec<InFlight>>,
}

/// A timed-out solve still running, or finished but not yet collected.
#[derive(Debug)]
struct InFlight {
    formula: Arc<CnfFormula>,
    rx: Receiver<SatResult<Verdict>>,
}

impl VarisatBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timed-out solves kept for a retry.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InFlight>> {
        // The list stays consistent even if a holder panicked.
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take the solve already running on `formula`, or start one.
    fn claim(&self, formula: &CnfFormula) -> SatResult<InFlight> {
        let mut pending = self.lock();
        if let Some(pos) = pending.iter().position(|p| *p.formula == *formula) {
            debug!(
                vars = formula.num_vars(),
                clauses = formula.num_clauses(),
                "resuming timed-out solve"
            );
            return Ok(pending.swap_remove(pos));
        }
        // Collected results nobody asked for again are dropped here.
        pending.retain(|p| matches!(p.rx.try_recv(), Err(TryRecvError::Empty)));
        drop(pending);

        let owned = Arc::new(formula.clone());
        let worker = Arc::clone(&owned);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("varisat-solve".into())
            .spawn(move || {
                let _ = tx.send(run(&worker));
            })
            .map_err(|e| backend_error(e.to_string()))?;
        Ok(InFlight { formula: owned, rx })
    }

    fn solve_with_timeout(&self, formula: &CnfFormula, timeout: Duration) -> SatResult<Verdict> {
        let job = self.claim(formula)?;
        match job.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    vars = formula.num_vars(),
                    clauses = formula.num_clauses(),
                    "SAT call timed out"
                );
                self.lock().push(job);
                Ok(Verdict::Inconclusive)
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(backend_error("solver thread terminated without a result"))
            }
        }
    }
}

impl SatBackend for VarisatBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn solve(&self, formula: &CnfFormula, limits: SolveLimits) -> SatResult<Verdict> {
        let start = Instant::now();
        let verdict = match limits.timeout {
            None => run(formula)?,
            Some(timeout) => self.solve_with_timeout(formula, timeout)?,
        };

        debug!(
            vars = formula.num_vars(),
            clauses = formula.num_clauses(),
            verdict = verdict.label(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "varisat call finished"
        );
        Ok(verdict)
    }
}

fn run(formula: &CnfFormula) -> SatResult<Verdict> {
    let mut solver = varisat::Solver::new();
    solver.add_formula(&formula.to_varisat());

    match solver.solve() {
        Ok(true) => {
            let model = solver.model().unwrap_or_default();
            Ok(Verdict::Sat(Assignment::from_model(
                formula.num_vars(),
                model.iter().map(|l| l.to_dimacs() as i64),
            )))
        }
        Ok(false) => Ok(Verdict::Unsat),
        Err(e) => Err(backend_error(e.to_string())),
    }
}

fn backend_error(message: impl Into<String>) -> SatError {
    SatError::Backend {
        backend: NAME.to_string(),
        message: message.into(),
    }
}
