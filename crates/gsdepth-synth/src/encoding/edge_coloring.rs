//! Proper edge coloring with `depth` colours.
//!
//! Colour classes of a proper edge coloring are matchings, and any ordering
//! of the matchings is a valid CZ layering, so the formula is satisfiable
//! exactly when the edge chromatic index is at most `depth`.

use gsdepth_ir::Graph;
use gsdepth_sat::CnfFormula;

use super::{each_edge_exactly_once, VariableMap};

pub(super) fn encode(formula: &mut CnfFormula, graph: &Graph, vars: &VariableMap) {
    each_edge_exactly_once(formula, vars);

    for e in 0..graph.num_edges() {
        for f in graph.adjacent_edges(e) {
            if f <= e {
                continue;
            }
            for colour in 0..vars.depth() {
                formula.add_clause([!vars.lit(e, colour), !vars.lit(f, colour)]);
            }
        }
    }
}
