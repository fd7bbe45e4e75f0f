//! Symbolic stabilizer-tableau evolution.
//!
//! Snapshot 0 is the post-Hadamard state (generator i = X on qubit i). Each
//! of the `depth` layers is a set of CZ gates picked by control variables,
//! one per unordered qubit pair; pairs that are not graph edges are fixed
//! off. Snapshot t+1 is tied to snapshot t by the CZ update rule
//!
//!   z[i][a] ^= c(a,b) & x[i][b]        z[i][b] ^= c(a,b) & x[i][a]
//!   r[i]    ^= c(a,b) & x[i][a] & x[i][b] & (z[i][a] ^ z[i][b])
//!
//! with X rows carried over unchanged. Gates within a layer act on disjoint
//! qubits, so every term reads snapshot t. The last snapshot must equal the
//! canonical graph-state tableau: X = identity, Z = adjacency, r = 0.

use gsdepth_ir::Graph;
use gsdepth_sat::{CnfFormula, Lit};

use super::{each_edge_exactly_once, VariableMap};

/// One symbolic tableau: `n` generators over `n` qubits.
struct Snapshot {
    n: usize,
    x: Vec<Lit>,
    z: Vec<Lit>,
    sign: Vec<Lit>,
}

impl Snapshot {
    fn allocate(formula: &mut CnfFormula, n: usize) -> Self {
        let mut fresh = |count: usize| (0..count).map(|_| formula.new_lit()).collect::<Vec<_>>();
        let x = fresh(n * n);
        let z = fresh(n * n);
        let sign = fresh(n);
        Self { n, x, z, sign }
    }

    fn x(&self, generator: usize, qubit: usize) -> Lit {
        self.x[generator * self.n + qubit]
    }

    fn z(&self, generator: usize, qubit: usize) -> Lit {
        self.z[generator * self.n + qubit]
    }

    /// Constrain to X = identity, Z = `z_bit(i, q)`, all signs positive.
    fn fix_to(&self, formula: &mut CnfFormula, z_bit: impl Fn(usize, usize) -> bool) {
        for i in 0..self.n {
            for q in 0..self.n {
                let x = self.x(i, q);
                formula.fix(if i == q { x } else { !x });
                let z = self.z(i, q);
                formula.fix(if z_bit(i, q) { z } else { !z });
            }
            formula.fix(!self.sign[i]);
        }
    }
}

/// Control literals for every unordered pair `(a, b)`, `a < b`, of one layer.
struct PairControls {
    n: usize,
    lits: Vec<Lit>,
}

impl PairControls {
    fn for_layer(formula: &mut CnfFormula, graph: &Graph, vars: &VariableMap, layer: u32) -> Self {
        let n = graph.num_vertices() as usize;
        let mut lits = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n as u32 {
            for b in a + 1..n as u32 {
                let lit = match graph.edge_index(a, b) {
                    Some(e) => vars.lit(e, layer),
                    None => {
                        let off = formula.new_lit();
                        formula.fix(!off);
                        off
                    }
                };
                lits.push(lit);
            }
        }
        Self { n, lits }
    }

    fn get(&self, a: usize, b: usize) -> Lit {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.lits[a * self.n - a * (a + 1) / 2 + (b - a - 1)]
    }
}

pub(super) fn encode(formula: &mut CnfFormula, graph: &Graph, vars: &VariableMap) {
    let n = graph.num_vertices() as usize;

    each_edge_exactly_once(formula, vars);
    for layer in 0..vars.depth() {
        for v in 0..graph.num_vertices() {
            let lits: Vec<Lit> = graph
                .incident_edges(v)
                .into_iter()
                .map(|e| vars.lit(e, layer))
                .collect();
            formula.at_most_one(&lits);
        }
    }

    let mut current = Snapshot::allocate(formula, n);
    current.fix_to(formula, |_, _| false);

    for layer in 0..vars.depth() {
        let controls = PairControls::for_layer(formula, graph, vars, layer);
        let next = Snapshot::allocate(formula, n);
        apply_layer(formula, &current, &next, &controls);
        current = next;
    }

    current.fix_to(formula, |i, q| graph.has_edge(i as u32, q as u32));
}

fn apply_layer(formula: &mut CnfFormula, prev: &Snapshot, next: &Snapshot, controls: &PairControls) {
    let n = prev.n;
    for i in 0..n {
        for q in 0..n {
            formula.equal(next.x(i, q), prev.x(i, q));

            let mut terms = vec![prev.z(i, q)];
            for p in (0..n).filter(|&p| p != q) {
                terms.push(formula.and_gate(&[controls.get(q, p), prev.x(i, p)]));
            }
            let z = formula.xor_chain(&terms);
            formula.equal(next.z(i, q), z);
        }

        let mut terms = vec![prev.sign[i]];
        for a in 0..n {
            for b in a + 1..n {
                let differ = formula.xor_gate(prev.z(i, a), prev.z(i, b));
                terms.push(formula.and_gate(&[
                    controls.get(a, b),
                    prev.x(i, a),
                    prev.x(i, b),
                    differ,
                ]));
            }
        }
        let sign = formula.xor_chain(&terms);
        formula.equal(next.sign[i], sign);
    }
}
