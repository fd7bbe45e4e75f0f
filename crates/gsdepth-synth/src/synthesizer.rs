//! The synthesis driver: search, decode, verify.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gsdepth_ir::{Circuit, Graph};
use gsdepth_sat::{Assignment, SatBackend, SolveLimits, VarisatBackend, Verdict};
use tracing::{debug, info, instrument};

use crate::config::SynthesisConfig;
use crate::decoder::decode;
use crate::encoding::{encode, EncodeOptions, EncodedInstance, EncodingKind, VariableMap};
use crate::error::{SynthError, SynthResult};
use crate::result::SynthesisResult;
use crate::search::{
    escalated_timeout, find_minimal_depth, DepthBounds, ParallelSearch, ProbeOutcome,
    SearchOutcome,
};

/// Extra wait granted to a parallel probe beyond its solver budget, covering
/// encoding time.
const PROBE_GRACE: Duration = Duration::from_secs(1);

/// What a SAT probe hands back to the search.
#[derive(Debug, Clone)]
pub struct Witness {
    /// The solver's model.
    pub assignment: Assignment,
    /// Names of the layer-selection variables in that model.
    pub variables: VariableMap,
}

/// Finds depth-optimal graph-state circuits.
///
/// ```rust
/// use gsdepth_ir::Graph;
/// use gsdepth_synth::{SynthesisConfig, Synthesizer};
///
/// let result = Synthesizer::new(SynthesisConfig::default())
///     .synthesize(&Graph::complete(4))
///     .unwrap();
/// assert_eq!(result.depth, 3);
/// ```
#[derive(Clone)]
pub struct Synthesizer {
    config: SynthesisConfig,
    backend: Arc<dyn SatBackend>,
}

impl Synthesizer {
    /// Create a synthesizer backed by [`VarisatBackend`].
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            config,
            backend: Arc::new(VarisatBackend::new()),
        }
    }

    /// Use a different solver.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SatBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Active solver.
    pub fn backend(&self) -> &dyn SatBackend {
        self.backend.as_ref()
    }

    /// Decide whether a depth-`depth` circuit exists.
    ///
    /// `attempt` scales the solver budget (doubling per attempt).
    pub fn probe(&self, graph: &Graph, depth: u32, attempt: u32) -> SynthResult<ProbeOutcome<Witness>> {
        self.probe_context().probe(graph, depth, attempt)
    }

    /// Validate an edge list, then synthesize. Invalid input fails before
    /// any solver call.
    pub fn synthesize_edge_list(
        &self,
        num_vertices: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> SynthResult<SynthesisResult> {
        let graph = Graph::new(num_vertices, edges)?;
        self.synthesize(&graph)
    }

    /// Sequential minimal-depth synthesis with the configured strategy.
    #[instrument(
        skip_all,
        fields(
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            encoding = %self.config.encoding,
            strategy = %self.config.strategy,
        )
    )]
    pub fn synthesize(&self, graph: &Graph) -> SynthResult<SynthesisResult> {
        let start = Instant::now();
        let bounds = DepthBounds::for_graph(graph);
        info!(lower = bounds.lower, upper = bounds.upper, "starting synthesis");

        if graph.is_empty() {
            return Ok(self.edgeless(graph, bounds, start, false));
        }

        let ctx = self.probe_context();
        let outcome = find_minimal_depth(
            bounds,
            self.config.strategy,
            self.config.max_inconclusive_retries,
            |depth, attempt| ctx.probe(graph, depth, attempt),
        )?;
        self.finish(graph, outcome, bounds, start, false)
    }

    /// Minimal-depth synthesis probing every candidate depth concurrently.
    #[instrument(
        skip_all,
        fields(
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            encoding = %self.config.encoding,
        )
    )]
    pub async fn synthesize_parallel(&self, graph: Arc<Graph>) -> SynthResult<SynthesisResult> {
        let start = Instant::now();
        let bounds = DepthBounds::for_graph(&graph);
        info!(lower = bounds.lower, upper = bounds.upper, "starting parallel synthesis");

        if graph.is_empty() {
            return Ok(self.edgeless(&graph, bounds, start, true));
        }

        let ctx = self.probe_context();
        let shared = Arc::clone(&graph);
        let outcome = ParallelSearch::new(bounds)
            .with_max_retries(self.config.max_inconclusive_retries)
            .with_probe_timeout(self.config.solver_timeout().map(|t| t + PROBE_GRACE))
            .run(move |depth, attempt| ctx.probe(&shared, depth, attempt))
            .await?;
        self.finish(&graph, outcome, bounds, start, true)
    }

    /// Synthesize with both encodings and require the same optimum.
    pub fn cross_validate(&self, graph: &Graph) -> SynthResult<u32> {
        let mut depths = [0u32; 2];
        for (slot, kind) in depths.iter_mut().zip(EncodingKind::ALL) {
            let config = SynthesisConfig {
                encoding: kind,
                ..self.config.clone()
            };
            let synth = Synthesizer {
                config,
                backend: Arc::clone(&self.backend),
            };
            *slot = synth.synthesize(graph)?.depth;
        }

        let [tableau, edge_coloring] = depths;
        if tableau != edge_coloring {
            return Err(SynthError::EncodingDisagreement {
                tableau,
                edge_coloring,
            });
        }
        info!(depth = tableau, "encodings agree");
        Ok(tableau)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn probe_context(&self) -> ProbeContext {
        ProbeContext {
            backend: Arc::clone(&self.backend),
            encoding: self.config.encoding,
            options: self.config.encode_options(),
            timeout: self.config.solver_timeout(),
        }
    }

    fn edgeless(&self, graph: &Graph, bounds: DepthBounds, start: Instant, parallel: bool) -> SynthesisResult {
        SynthesisResult {
            circuit: Circuit::new(graph.num_vertices()),
            depth: 0,
            encoding: self.config.encoding,
            strategy: self.config.strategy,
            parallel,
            solver_calls: 0,
            runtime: start.elapsed(),
            lower_bound: bounds.lower,
            upper_bound: bounds.upper,
            unsat_depths: vec![],
        }
    }

    fn finish(
        &self,
        graph: &Graph,
        outcome: SearchOutcome<Witness>,
        bounds: DepthBounds,
        start: Instant,
        parallel: bool,
    ) -> SynthResult<SynthesisResult> {
        let SearchOutcome {
            depth,
            witness,
            probes,
            unsat_depths,
        } = outcome;
        let circuit = decode(graph, depth, &witness.assignment, &witness.variables)?;
        let runtime = start.elapsed();

        info!(
            depth,
            solver_calls = probes,
            runtime_ms = runtime.as_millis() as u64,
            "synthesis finished"
        );
        Ok(SynthesisResult {
            circuit,
            depth,
            encoding: self.config.encoding,
            strategy: self.config.strategy,
            parallel,
            solver_calls: probes,
            runtime,
            lower_bound: bounds.lower,
            upper_bound: bounds.upper,
            unsat_depths,
        })
    }
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Everything one probe needs, detached from the synthesizer so it can move
/// onto worker threads.
struct ProbeContext {
    backend: Arc<dyn SatBackend>,
    encoding: EncodingKind,
    options: EncodeOptions,
    timeout: Option<Duration>,
}

impl ProbeContext {
    fn probe(&self, graph: &Graph, depth: u32, attempt: u32) -> SynthResult<ProbeOutcome<Witness>> {
        let EncodedInstance { formula, variables } = encode(self.encoding, graph, depth, self.options);
        let limits = SolveLimits {
            timeout: self.timeout.map(|t| escalated_timeout(t, attempt)),
        };

        let verdict = self.backend.solve(&formula, limits)?;
        debug!(
            depth,
            attempt,
            backend = self.backend.name(),
            vars = formula.num_vars(),
            clauses = formula.num_clauses(),
            verdict = verdict.label(),
            "probe finished"
        );

        Ok(match verdict {
            Verdict::Sat(assignment) => ProbeOutcome::Sat(Witness {
                assignment,
                variables,
            }),
            Verdict::Unsat => ProbeOutcome::Unsat,
            Verdict::Inconclusive => ProbeOutcome::Inconclusive,
        })
    }
}
