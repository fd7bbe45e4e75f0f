//! Concurrent depth probing on the tokio blocking pool.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{escalated_timeout, DepthBounds, ProbeOutcome, SearchOutcome};
use crate::error::{SynthError, SynthResult};

/// Probes every depth of a [`DepthBounds`] interval at once.
///
/// The answer is the smallest SAT depth, returned only after every depth
/// below it has been proven UNSAT. Probes for larger depths still running at
/// that point are abandoned, and whatever they returned, errors included, is
/// discarded. An inconclusive depth below the first SAT depth fails the
/// search with [`SynthError::Inconclusive`]; a failed probe there fails it
/// with that probe's error.
#[derive(Debug, Clone)]
pub struct ParallelSearch {
    bounds: DepthBounds,
    max_retries: u32,
    probe_timeout: Option<Duration>,
}

impl ParallelSearch {
    /// Search `bounds` with no retries and no per-probe timeout.
    pub fn new(bounds: DepthBounds) -> Self {
        Self {
            bounds,
            max_retries: 0,
            probe_timeout: None,
        }
    }

    /// Retry inconclusive depths up to `retries` extra times.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Give up waiting on a probe after `timeout` (doubled on each retry).
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Run the search. `probe(depth, attempt)` executes on blocking threads.
    pub async fn run<W, F>(&self, probe: F) -> SynthResult<SearchOutcome<W>>
    where
        W: Send + 'static,
        F: Fn(u32, u32) -> SynthResult<ProbeOutcome<W>> + Send + Sync + 'static,
    {
        let DepthBounds { lower, upper } = self.bounds;
        let probe = Arc::new(probe);
        let calls = Arc::new(AtomicU32::new(0));

        let mut tasks = JoinSet::new();
        for depth in lower..=upper {
            let task = DepthTask {
                depth,
                probe: Arc::clone(&probe),
                calls: Arc::clone(&calls),
                max_retries: self.max_retries,
                timeout: self.probe_timeout,
            };
            tasks.spawn(async move { (depth, task.resolve::<W>().await) });
        }
        info!(lower, upper, tasks = tasks.len(), "parallel depth search started");

        let mut resolved: BTreeMap<u32, Resolution<W>> = BTreeMap::new();
        loop {
            match self.decide(&resolved) {
                Some(Decision::Optimal(depth)) => {
                    let Some(Resolution::Sat(witness)) = resolved.remove(&depth) else {
                        return Err(SynthError::Task(format!("witness for depth {depth} lost")));
                    };
                    let unsat_depths = resolved
                        .iter()
                        .filter(|(_, r)| matches!(r, Resolution::Unsat))
                        .map(|(&d, _)| d)
                        .collect();
                    tasks.abort_all();
                    return Ok(SearchOutcome {
                        depth,
                        witness,
                        probes: calls.load(Ordering::Relaxed),
                        unsat_depths,
                    });
                }
                Some(Decision::Failed(depth)) => {
                    tasks.abort_all();
                    return Err(match resolved.remove(&depth) {
                        Some(Resolution::Failed(err)) => err,
                        _ => SynthError::Task(format!("error for depth {depth} lost")),
                    });
                }
                Some(Decision::Stopped(err)) => {
                    tasks.abort_all();
                    return Err(err);
                }
                None => {}
            }

            let Some(joined) = tasks.join_next().await else {
                return Err(SynthError::Task("search tasks ended without a decision".into()));
            };
            let (depth, resolution) = joined.map_err(|e| SynthError::Task(e.to_string()))?;
            debug!(depth, verdict = resolution.label(), "depth resolved");
            resolved.insert(depth, resolution);
        }
    }

    /// Scan upward from the lower bound; stop at the first depth that is
    /// still pending or not UNSAT. Depths above that one never matter.
    fn decide<W>(&self, resolved: &BTreeMap<u32, Resolution<W>>) -> Option<Decision> {
        for depth in self.bounds.lower..=self.bounds.upper {
            match resolved.get(&depth)? {
                Resolution::Unsat => continue,
                Resolution::Sat(_) => return Some(Decision::Optimal(depth)),
                Resolution::Inconclusive { attempts } => {
                    return Some(Decision::Stopped(SynthError::Inconclusive {
                        depth,
                        attempts: *attempts,
                    }));
                }
                Resolution::Failed(_) => return Some(Decision::Failed(depth)),
            }
        }
        Some(Decision::Stopped(SynthError::Infeasible {
            upper_bound: self.bounds.upper,
        }))
    }
}

enum Decision {
    Optimal(u32),
    /// The probe at this depth returned an error.
    Failed(u32),
    Stopped(SynthError),
}

enum Resolution<W> {
    Sat(W),
    Unsat,
    Inconclusive { attempts: u32 },
    Failed(SynthError),
}

impl<W> Resolution<W> {
    fn label(&self) -> &'static str {
        match self {
            Resolution::Sat(_) => "sat",
            Resolution::Unsat => "unsat",
            Resolution::Inconclusive { .. } => "inconclusive",
            Resolution::Failed(_) => "failed",
        }
    }
}

struct DepthTask<F> {
    depth: u32,
    probe: Arc<F>,
    calls: Arc<AtomicU32>,
    max_retries: u32,
    timeout: Option<Duration>,
}

impl<F> DepthTask<F> {
    async fn resolve<W>(self) -> Resolution<W>
    where
        W: Send + 'static,
        F: Fn(u32, u32) -> SynthResult<ProbeOutcome<W>> + Send + Sync + 'static,
    {
        let depth = self.depth;
        for attempt in 0..=self.max_retries {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let probe = Arc::clone(&self.probe);
            let handle = tokio::task::spawn_blocking(move || probe(depth, attempt));

            let joined = match self.timeout {
                Some(base) => {
                    let limit = escalated_timeout(base, attempt);
                    match tokio::time::timeout(limit, handle).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            warn!(depth, attempt, limit_ms = limit.as_millis() as u64, "probe timed out");
                            continue;
                        }
                    }
                }
                None => handle.await,
            };

            let outcome = match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => return Resolution::Failed(err),
                Err(join) => return Resolution::Failed(SynthError::Task(join.to_string())),
            };
            match outcome {
                ProbeOutcome::Sat(witness) => return Resolution::Sat(witness),
                ProbeOutcome::Unsat => return Resolution::Unsat,
                ProbeOutcome::Inconclusive => warn!(depth, attempt, "probe inconclusive"),
            }
        }
        Resolution::Inconclusive {
            attempts: self.max_retries + 1,
        }
    }
}
