//! Synthesizer behaviour against scripted solver backends.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gsdepth_ir::{Graph, InvalidGraph};
use gsdepth_sat::{
    Assignment, CnfFormula, SatBackend, SatError, SatResult, SolveLimits, VarisatBackend, Verdict,
};
use gsdepth_synth::{
    encode, EncodeOptions, EncodingKind, SearchStrategy, SynthError, SynthesisConfig, Synthesizer,
};

/// Delegates to varisat and counts calls.
#[derive(Default)]
struct Counting {
    calls: AtomicU32,
}

impl SatBackend for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn solve(&self, formula: &CnfFormula, limits: SolveLimits) -> SatResult<Verdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        VarisatBackend::new().solve(formula, limits)
    }
}

/// Inconclusive unless granted at least `required` time.
struct NeedsBudget {
    required: Duration,
    budgets: std::sync::Mutex<Vec<Option<Duration>>>,
}

impl SatBackend for NeedsBudget {
    fn name(&self) -> &str {
        "needs-budget"
    }

    fn solve(&self, formula: &CnfFormula, limits: SolveLimits) -> SatResult<Verdict> {
        if let Ok(mut budgets) = self.budgets.lock() {
            budgets.push(limits.timeout);
        }
        match limits.timeout {
            Some(t) if t < self.required => Ok(Verdict::Inconclusive),
            _ => VarisatBackend::new().solve(formula, SolveLimits::UNBOUNDED),
        }
    }
}

/// Claims SAT with an all-false model.
struct Lying;

impl SatBackend for Lying {
    fn name(&self) -> &str {
        "lying"
    }

    fn solve(&self, _: &CnfFormula, _: SolveLimits) -> SatResult<Verdict> {
        Ok(Verdict::Sat(Assignment::default()))
    }
}

/// Always fails.
struct Broken;

impl SatBackend for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn solve(&self, _: &CnfFormula, _: SolveLimits) -> SatResult<Verdict> {
        Err(SatError::Backend {
            backend: "broken".into(),
            message: "out of memory".into(),
        })
    }
}

/// Refutes formulas with exactly `num_vars` variables, delegates otherwise.
struct RefuteSize {
    num_vars: u32,
}

impl SatBackend for RefuteSize {
    fn name(&self) -> &str {
        "refute-size"
    }

    fn solve(&self, formula: &CnfFormula, limits: SolveLimits) -> SatResult<Verdict> {
        if formula.num_vars() == self.num_vars {
            return Ok(Verdict::Unsat);
        }
        VarisatBackend::new().solve(formula, limits)
    }
}

fn with_backend(config: SynthesisConfig, backend: Arc<dyn SatBackend>) -> Synthesizer {
    Synthesizer::new(config).with_backend(backend)
}

#[test]
fn invalid_graph_rejected_before_solving() {
    let counting = Arc::new(Counting::default());
    let synth = with_backend(SynthesisConfig::default(), counting.clone());

    let err = synth.synthesize_edge_list(3, [(0, 1), (1, 3)]).unwrap_err();
    assert!(matches!(
        err,
        SynthError::InvalidGraph(InvalidGraph::VertexOutOfRange { .. })
    ));

    let err = synth.synthesize_edge_list(3, [(2, 2)]).unwrap_err();
    assert!(matches!(err, SynthError::InvalidGraph(InvalidGraph::SelfLoop(2))));

    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn edgeless_graph_needs_no_solver() {
    let counting = Arc::new(Counting::default());
    let synth = with_backend(SynthesisConfig::default(), counting.clone());

    let result = synth.synthesize(&Graph::empty(4)).unwrap();
    assert_eq!(result.depth, 0);
    assert_eq!(result.solver_calls, 0);
    assert!(result.circuit.layers().is_empty());
    assert_eq!(result.single_qubit_gates(), 4);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn single_edge_and_triangle() {
    for encoding in EncodingKind::ALL {
        let synth = Synthesizer::new(SynthesisConfig {
            encoding,
            ..SynthesisConfig::default()
        });

        let edge = synth.synthesize_edge_list(2, [(0, 1)]).unwrap();
        assert_eq!(edge.depth, 1);
        assert_eq!(edge.circuit.layers()[0].gates(), &[(0, 1)]);

        let triangle = synth.synthesize(&Graph::complete(3)).unwrap();
        assert_eq!(triangle.depth, 3);
        assert!(triangle.circuit.layers().iter().all(|l| l.len() == 1));
        assert_eq!(triangle.unsat_depths, vec![2]);
    }
}

#[test]
fn complete_four_is_a_perfect_matching_decomposition() {
    let result = Synthesizer::new(SynthesisConfig::default())
        .synthesize(&Graph::complete(4))
        .unwrap();
    assert_eq!(result.depth, 3);
    assert!(result.circuit.layers().iter().all(|l| l.len() == 2));
}

#[test]
fn linear_and_binary_agree_on_solver_calls_for_class_two() {
    // K5: Δ = 4, optimum 5, so both strategies refute 4 then confirm 5.
    for strategy in [SearchStrategy::Linear, SearchStrategy::Binary] {
        let counting = Arc::new(Counting::default());
        let synth = with_backend(
            SynthesisConfig {
                strategy,
                ..SynthesisConfig::default()
            },
            counting.clone(),
        );
        let result = synth.synthesize(&Graph::complete(5)).unwrap();
        assert_eq!(result.depth, 5);
        assert_eq!(result.solver_calls, 2);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }
}

#[test]
fn inconclusive_probes_escalate_budget() {
    let backend = Arc::new(NeedsBudget {
        required: Duration::from_millis(350),
        budgets: Default::default(),
    });
    let synth = with_backend(
        SynthesisConfig {
            solver_timeout_ms: Some(100),
            max_inconclusive_retries: 2,
            ..SynthesisConfig::default()
        },
        backend.clone(),
    );
    let result = synth.synthesize(&Graph::path(2)).unwrap();
    assert_eq!(result.depth, 1);
    assert_eq!(result.solver_calls, 3);

    let budgets = backend.budgets.lock().unwrap().clone();
    assert_eq!(
        budgets,
        vec![
            Some(Duration::from_millis(100)),
            Some(Duration::from_millis(200)),
            Some(Duration::from_millis(400)),
        ]
    );
}

#[test]
fn exhausted_retries_are_inconclusive_not_unsat() {
    let backend = Arc::new(NeedsBudget {
        required: Duration::from_secs(60),
        budgets: Default::default(),
    });
    let synth = with_backend(
        SynthesisConfig {
            solver_timeout_ms: Some(10),
            max_inconclusive_retries: 1,
            ..SynthesisConfig::default()
        },
        backend,
    );
    let err = synth.synthesize(&Graph::complete(3)).unwrap_err();
    assert!(matches!(err, SynthError::Inconclusive { depth: 2, attempts: 2 }));
}

#[test]
fn bogus_model_is_a_decoding_inconsistency() {
    let synth = with_backend(SynthesisConfig::default(), Arc::new(Lying));
    let err = synth.synthesize(&Graph::path(3)).unwrap_err();
    assert!(matches!(err, SynthError::DecodingInconsistency { depth: 2, .. }));
}

#[test]
fn backend_failure_propagates() {
    let synth = with_backend(SynthesisConfig::default(), Arc::new(Broken));
    let err = synth.synthesize(&Graph::path(3)).unwrap_err();
    assert!(matches!(err, SynthError::Sat(SatError::Backend { .. })));
}

#[test]
fn cross_validation_agrees() {
    let synth = Synthesizer::new(SynthesisConfig::default());
    assert_eq!(synth.cross_validate(&Graph::cycle(5).unwrap()).unwrap(), 3);
}

#[test]
fn cross_validation_reports_disagreement() {
    let graph = Graph::path(3);
    let tableau_at_two = encode(EncodingKind::Tableau, &graph, 2, EncodeOptions::default())
        .formula
        .num_vars();
    let synth = with_backend(
        SynthesisConfig::default(),
        Arc::new(RefuteSize {
            num_vars: tableau_at_two,
        }),
    );
    let err = synth.cross_validate(&graph).unwrap_err();
    assert!(matches!(
        err,
        SynthError::EncodingDisagreement {
            tableau: 3,
            edge_coloring: 2
        }
    ));
}

#[tokio::test]
async fn parallel_search_matches_sequential() {
    let synth = Synthesizer::new(SynthesisConfig {
        parallel: true,
        ..SynthesisConfig::default()
    });
    for (graph, depth) in [
        (Graph::complete(3), 3),
        (Graph::complete(4), 3),
        (Graph::star(4), 4),
        (Graph::empty(3), 0),
    ] {
        let result = synth.synthesize_parallel(Arc::new(graph.clone())).await.unwrap();
        assert_eq!(result.depth, depth);
        assert!(result.parallel);
        result.circuit.verify_against(&graph).unwrap();
    }
}

#[tokio::test]
async fn parallel_search_tableau() {
    let synth = Synthesizer::new(SynthesisConfig {
        encoding: EncodingKind::Tableau,
        ..SynthesisConfig::default()
    });
    let result = synth
        .synthesize_parallel(Arc::new(Graph::cycle(5).unwrap()))
        .await
        .unwrap();
    assert_eq!(result.depth, 3);
    assert_eq!(result.unsat_depths, vec![2]);
}
