//! Reference graphs with known optimal depths, run through every encoding,
//! search strategy and symmetry-breaking setting.

use gsdepth_ir::Graph;
use gsdepth_synth::{EncodingKind, SearchStrategy, SynthesisConfig, Synthesizer};

struct Fixture {
    name: &'static str,
    matrix: &'static [&'static [u8]],
    depth: u32,
    gates: usize,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "2 qubits",
        matrix: &[&[0, 1], &[1, 0]],
        depth: 1,
        gates: 3,
    },
    Fixture {
        name: "4 qubits, diamond",
        matrix: &[&[0, 1, 1, 0], &[1, 0, 1, 1], &[1, 1, 0, 1], &[0, 1, 1, 0]],
        depth: 3,
        gates: 9,
    },
    Fixture {
        name: "4 qubits, complete",
        matrix: &[&[0, 1, 1, 1], &[1, 0, 1, 1], &[1, 1, 0, 1], &[1, 1, 1, 0]],
        depth: 3,
        gates: 10,
    },
    Fixture {
        name: "6 qubits, tailed square",
        matrix: &[
            &[0, 1, 0, 0, 0, 0],
            &[1, 0, 1, 0, 0, 0],
            &[0, 1, 0, 1, 0, 1],
            &[0, 0, 1, 0, 1, 0],
            &[0, 0, 0, 1, 0, 1],
            &[0, 0, 1, 0, 1, 0],
        ],
        depth: 3,
        gates: 12,
    },
    Fixture {
        name: "6 qubits, tailed triangle",
        matrix: &[
            &[0, 1, 0, 0, 0, 0],
            &[1, 0, 1, 1, 0, 0],
            &[0, 1, 0, 1, 0, 0],
            &[0, 1, 1, 0, 1, 0],
            &[0, 0, 0, 1, 0, 1],
            &[0, 0, 0, 0, 1, 0],
        ],
        depth: 3,
        gates: 12,
    },
    Fixture {
        name: "10 qubits, banded",
        matrix: &[
            &[0, 1, 0, 0, 1, 0, 0, 0, 0, 0],
            &[1, 0, 1, 0, 0, 1, 0, 0, 0, 0],
            &[0, 1, 0, 1, 0, 0, 1, 0, 0, 0],
            &[0, 0, 1, 0, 1, 0, 0, 1, 0, 0],
            &[1, 0, 0, 1, 0, 1, 0, 0, 1, 0],
            &[0, 1, 0, 0, 1, 0, 1, 0, 0, 1],
            &[0, 0, 1, 0, 0, 1, 0, 1, 0, 0],
            &[0, 0, 0, 1, 0, 0, 1, 0, 1, 0],
            &[0, 0, 0, 0, 1, 0, 0, 1, 0, 1],
            &[0, 0, 0, 0, 0, 1, 0, 0, 1, 0],
        ],
        depth: 4,
        gates: 25,
    },
    Fixture {
        name: "10 qubits, irregular",
        matrix: &[
            &[0, 1, 0, 0, 0, 1, 0, 0, 1, 0],
            &[1, 0, 1, 1, 0, 0, 0, 0, 0, 0],
            &[0, 1, 0, 1, 1, 0, 0, 0, 0, 0],
            &[0, 1, 1, 0, 0, 0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0, 1, 1, 0, 0, 0],
            &[1, 0, 0, 0, 1, 0, 0, 0, 1, 0],
            &[0, 0, 0, 0, 1, 0, 0, 1, 0, 1],
            &[0, 0, 0, 1, 0, 0, 1, 0, 1, 0],
            &[1, 0, 0, 0, 0, 1, 0, 1, 0, 1],
            &[0, 0, 0, 0, 0, 0, 1, 0, 1, 0],
        ],
        depth: 4,
        gates: 25,
    },
];

fn graph(fixture: &Fixture) -> Graph {
    let rows: Vec<Vec<u8>> = fixture.matrix.iter().map(|r| r.to_vec()).collect();
    Graph::from_adjacency_matrix(&rows).unwrap()
}

fn run_all(encoding: EncodingKind, strategy: SearchStrategy, symmetry_breaking: bool) {
    let synth = Synthesizer::new(SynthesisConfig {
        encoding,
        strategy,
        symmetry_breaking,
        ..SynthesisConfig::default()
    });
    for fixture in FIXTURES {
        let g = graph(fixture);
        let result = synth.synthesize(&g).unwrap();
        assert_eq!(result.depth, fixture.depth, "{}", fixture.name);
        assert_eq!(result.gate_count(), fixture.gates, "{}", fixture.name);
        assert_eq!(result.circuit.depth(), fixture.depth as usize, "{}", fixture.name);
        result.circuit.verify_against(&g).unwrap();
        assert!(result.depth <= result.upper_bound, "{}", fixture.name);
    }
}

#[test]
fn edge_coloring_binary() {
    run_all(EncodingKind::EdgeColoring, SearchStrategy::Binary, false);
}

#[test]
fn edge_coloring_linear_symmetry_breaking() {
    run_all(EncodingKind::EdgeColoring, SearchStrategy::Linear, true);
}

#[test]
fn tableau_binary() {
    run_all(EncodingKind::Tableau, SearchStrategy::Binary, false);
}

#[test]
fn tableau_linear_symmetry_breaking() {
    run_all(EncodingKind::Tableau, SearchStrategy::Linear, true);
}

#[test]
fn class_one_fixtures_need_a_single_solver_call() {
    let synth = Synthesizer::new(SynthesisConfig::default());
    for fixture in FIXTURES {
        let result = synth.synthesize(&graph(fixture)).unwrap();
        assert_eq!(result.lower_bound, fixture.depth, "{}", fixture.name);
        assert_eq!(result.solver_calls, 1, "{}", fixture.name);
    }
}
