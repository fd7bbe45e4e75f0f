//! Minimal-depth search over a monotone feasibility probe.
//!
//! The search never sees formulas or solvers: it calls
//! `probe(depth, attempt)` and reacts to [`ProbeOutcome`]s. Feasibility is
//! monotone in depth (an unused layer can always be appended), which is what
//! makes both linear and bisection search exact.

mod parallel;

pub use parallel::ParallelSearch;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use gsdepth_ir::Graph;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SynthError, SynthResult};

/// Order in which candidate depths are probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// `L, L+1, …` until the first SAT depth.
    Linear,
    /// Bisection on `[L, U]`.
    #[default]
    Binary,
}

impl SearchStrategy {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::Linear => "linear",
            SearchStrategy::Binary => "binary",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(SearchStrategy::Linear),
            "binary" | "bisection" => Ok(SearchStrategy::Binary),
            other => Err(SynthError::Config(format!(
                "unknown search strategy '{other}' (expected 'linear' or 'binary')"
            ))),
        }
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<W> {
    /// A depth-d circuit exists; `W` witnesses it.
    Sat(W),
    /// No depth-d circuit exists.
    Unsat,
    /// The probe ran out of budget.
    Inconclusive,
}

/// Inclusive depth interval known to contain the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthBounds {
    /// No circuit is shallower than this.
    pub lower: u32,
    /// A circuit of this depth is known to exist.
    pub upper: u32,
}

impl DepthBounds {
    /// Maximum degree below, Vizing's Δ+1 above.
    pub fn for_graph(graph: &Graph) -> Self {
        Self {
            lower: graph.depth_lower_bound(),
            upper: graph.depth_upper_bound(),
        }
    }
}

/// A resolved search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<W> {
    /// The minimal depth.
    pub depth: u32,
    /// Witness returned by the SAT probe at `depth`.
    pub witness: W,
    /// Total probe calls, retries included.
    pub probes: u32,
    /// Depths proven infeasible, ascending.
    pub unsat_depths: Vec<u32>,
}

/// Budget for retry `attempt`: the base budget doubled per earlier attempt.
/// Saturates at [`Duration::MAX`].
pub fn escalated_timeout(base: Duration, attempt: u32) -> Duration {
    match 2u32.checked_pow(attempt) {
        Some(factor) => base.saturating_mul(factor),
        None => Duration::MAX,
    }
}

/// Find the smallest depth in `bounds` whose probe is SAT.
///
/// An inconclusive probe is retried with an increasing `attempt` number, up
/// to `max_retries` extra times, after which the search fails with
/// [`SynthError::Inconclusive`]. An empty or exhausted interval is
/// [`SynthError::Infeasible`].
pub fn find_minimal_depth<W, F>(
    bounds: DepthBounds,
    strategy: SearchStrategy,
    max_retries: u32,
    probe: F,
) -> SynthResult<SearchOutcome<W>>
where
    F: FnMut(u32, u32) -> SynthResult<ProbeOutcome<W>>,
{
    let mut prober = Prober {
        probe,
        max_retries,
        calls: 0,
        resolved: FxHashMap::default(),
    };

    let depth = match strategy {
        SearchStrategy::Linear => linear(&mut prober, bounds)?,
        SearchStrategy::Binary => binary(&mut prober, bounds)?,
    };

    let mut unsat_depths: Vec<u32> = prober
        .resolved
        .iter()
        .filter(|(_, w)| w.is_none())
        .map(|(&d, _)| d)
        .collect();
    unsat_depths.sort_unstable();

    let witness = prober
        .resolved
        .remove(&depth)
        .flatten()
        .ok_or(SynthError::Infeasible {
            upper_bound: bounds.upper,
        })?;

    Ok(SearchOutcome {
        depth,
        witness,
        probes: prober.calls,
        unsat_depths,
    })
}

fn linear<W, F>(prober: &mut Prober<W, F>, bounds: DepthBounds) -> SynthResult<u32>
where
    F: FnMut(u32, u32) -> SynthResult<ProbeOutcome<W>>,
{
    for depth in bounds.lower..=bounds.upper {
        if prober.is_sat(depth)? {
            return Ok(depth);
        }
    }
    Err(SynthError::Infeasible {
        upper_bound: bounds.upper,
    })
}

/// Probe `mid`; when it is SAT and above `lo`, also probe `mid - 1` to
/// decide whether `mid` is the optimum or the interval shrinks below it.
fn binary<W, F>(prober: &mut Prober<W, F>, bounds: DepthBounds) -> SynthResult<u32>
where
    F: FnMut(u32, u32) -> SynthResult<ProbeOutcome<W>>,
{
    let (mut lo, mut hi) = (bounds.lower, bounds.upper);
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        if !prober.is_sat(mid)? {
            lo = mid + 1;
        } else if mid > lo && prober.is_sat(mid - 1)? {
            hi = mid - 1;
        } else {
            return Ok(mid);
        }
    }
    Err(SynthError::Infeasible {
        upper_bound: bounds.upper,
    })
}

/// Caches one verdict per depth and owns the retry policy.
struct Prober<W, F> {
    probe: F,
    max_retries: u32,
    calls: u32,
    /// `Some(w)` for SAT depths, `None` for UNSAT ones.
    resolved: FxHashMap<u32, Option<W>>,
}

impl<W, F> Prober<W, F>
where
    F: FnMut(u32, u32) -> SynthResult<ProbeOutcome<W>>,
{
    fn is_sat(&mut self, depth: u32) -> SynthResult<bool> {
        if let Some(known) = self.resolved.get(&depth) {
            return Ok(known.is_some());
        }

        for attempt in 0..=self.max_retries {
            self.calls += 1;
            match (self.probe)(depth, attempt)? {
                ProbeOutcome::Sat(witness) => {
                    debug!(depth, attempt, "probe SAT");
                    self.resolved.insert(depth, Some(witness));
                    return Ok(true);
                }
                ProbeOutcome::Unsat => {
                    debug!(depth, attempt, "probe UNSAT");
                    self.resolved.insert(depth, None);
                    return Ok(false);
                }
                ProbeOutcome::Inconclusive => {
                    warn!(depth, attempt, "probe inconclusive");
                }
            }
        }

        Err(SynthError::Inconclusive {
            depth,
            attempts: self.max_retries + 1,
        })
    }
}
