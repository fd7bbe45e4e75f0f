//! CNF encodings of "a depth-d layering of the graph's CZ gates exists".
//!
//! Two interchangeable strategies share one entry point, [`encode`]:
//!
//! | Kind | Models | Size |
//! |------|--------|------|
//! | [`EncodingKind::Tableau`] | symbolic stabilizer tableau through d CZ layers | O(d·n³) clauses |
//! | [`EncodingKind::EdgeColoring`] | proper edge coloring with d colours | O(d·Σ deg²) clauses |
//!
//! Both allocate one layer-selection variable per (edge, layer) first, so the
//! [`VariableMap`] and the decoder are shared.

mod edge_coloring;
mod tableau;

use std::fmt;
use std::str::FromStr;

use gsdepth_ir::Graph;
use gsdepth_sat::{CnfFormula, Lit};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SynthError;

/// Which CNF model to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingKind {
    /// Symbolic stabilizer-tableau evolution.
    Tableau,
    /// Proper edge coloring.
    #[default]
    EdgeColoring,
}

impl EncodingKind {
    /// Both kinds, in a fixed order.
    pub const ALL: [EncodingKind; 2] = [EncodingKind::Tableau, EncodingKind::EdgeColoring];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            EncodingKind::Tableau => "tableau",
            EncodingKind::EdgeColoring => "edge-coloring",
        }
    }

    /// Build the instance for `graph` at `depth`.
    pub fn encode(self, graph: &Graph, depth: u32, options: EncodeOptions) -> EncodedInstance {
        encode(self, graph, depth, options)
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingKind {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tableau" | "stabilizer" => Ok(EncodingKind::Tableau),
            "edge-coloring" | "edge_coloring" | "edge-colouring" | "coloring" => {
                Ok(EncodingKind::EdgeColoring)
            }
            other => Err(SynthError::Config(format!(
                "unknown encoding '{other}' (expected 'tableau' or 'edge-coloring')"
            ))),
        }
    }
}

/// Encoding knobs shared by both kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Pin the edges of a maximum-degree vertex to the first layers.
    pub symmetry_breaking: bool,
}

/// Layer-selection variables: `lit(e, t)` is true iff edge `e` is applied in
/// layer `t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMap {
    kind: EncodingKind,
    depth: u32,
    num_edges: usize,
    layer_lits: Vec<Lit>,
}

impl VariableMap {
    fn allocate(formula: &mut CnfFormula, kind: EncodingKind, num_edges: usize, depth: u32) -> Self {
        let layer_lits = (0..num_edges * depth as usize)
            .map(|_| formula.new_lit())
            .collect();
        Self {
            kind,
            depth,
            num_edges,
            layer_lits,
        }
    }

    /// Encoding that produced this map.
    pub fn kind(&self) -> EncodingKind {
        self.kind
    }

    /// Number of layers.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of graph edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Literal selecting edge `edge` in layer `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `edge` or `layer` is out of range.
    pub fn lit(&self, edge: usize, layer: u32) -> Lit {
        assert!(edge < self.num_edges && layer < self.depth, "layer variable out of range");
        self.layer_lits[layer as usize * self.num_edges + edge]
    }

    /// Literals of every edge in `layer`, indexed by edge.
    pub fn layer(&self, layer: u32) -> &[Lit] {
        let start = layer as usize * self.num_edges;
        &self.layer_lits[start..start + self.num_edges]
    }
}

/// A formula ready for the solver plus the names needed to decode it.
#[derive(Debug, Clone)]
pub struct EncodedInstance {
    /// The CNF formula.
    pub formula: CnfFormula,
    /// Layer-selection variables.
    pub variables: VariableMap,
}

/// Encode "a depth-`depth` circuit for `graph` exists" with the chosen model.
pub fn encode(kind: EncodingKind, graph: &Graph, depth: u32, options: EncodeOptions) -> EncodedInstance {
    let mut formula = CnfFormula::new();
    let variables = VariableMap::allocate(&mut formula, kind, graph.num_edges(), depth);

    match kind {
        EncodingKind::Tableau => tableau::encode(&mut formula, graph, &variables),
        EncodingKind::EdgeColoring => edge_coloring::encode(&mut formula, graph, &variables),
    }
    if options.symmetry_breaking {
        pin_max_degree_vertex(&mut formula, graph, &variables);
    }

    debug!(
        encoding = %kind,
        depth,
        vars = formula.num_vars(),
        clauses = formula.num_clauses(),
        "encoded instance"
    );
    EncodedInstance { formula, variables }
}

// ---------------------------------------------------------------------------
// Shared constraints
// ---------------------------------------------------------------------------

/// Every edge is applied in exactly one layer.
fn each_edge_exactly_once(formula: &mut CnfFormula, vars: &VariableMap) {
    for e in 0..vars.num_edges() {
        let lits: Vec<Lit> = (0..vars.depth()).map(|t| vars.lit(e, t)).collect();
        formula.exactly_one(&lits);
    }
}

/// Layers commute, so any layering can be permuted until the edges of one
/// vertex occupy layers `0..k` in edge-index order.
fn pin_max_degree_vertex(formula: &mut CnfFormula, graph: &Graph, vars: &VariableMap) {
    let Some(v) = graph.max_degree_vertex() else {
        return;
    };
    for (layer, e) in graph.incident_edges(v).into_iter().enumerate() {
        let layer = layer as u32;
        if layer >= vars.depth() {
            break;
        }
        formula.fix(vars.lit(e, layer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("tableau".parse::<EncodingKind>().unwrap(), EncodingKind::Tableau);
        assert_eq!(
            "Edge_Coloring".parse::<EncodingKind>().unwrap(),
            EncodingKind::EdgeColoring
        );
        assert!("dnf".parse::<EncodingKind>().is_err());
        assert_eq!(EncodingKind::EdgeColoring.to_string(), "edge-coloring");
    }

    #[test]
    fn test_variable_map_layout() {
        let graph = Graph::path(4);
        let inst = encode(EncodingKind::EdgeColoring, &graph, 2, EncodeOptions::default());
        let vars = &inst.variables;
        assert_eq!(vars.num_edges(), 3);
        assert_eq!(vars.layer(1).len(), 3);
        assert_eq!(vars.lit(0, 0).var(), 1);
        assert_eq!(vars.lit(2, 1).var(), 6);
    }

    #[test]
    fn test_symmetry_pins_respect_depth() {
        // Star with 3 leaves at depth 2: only two pins may be emitted.
        let graph = Graph::star(3);
        let plain = encode(EncodingKind::EdgeColoring, &graph, 2, EncodeOptions::default());
        let pinned = encode(
            EncodingKind::EdgeColoring,
            &graph,
            2,
            EncodeOptions { symmetry_breaking: true },
        );
        assert_eq!(pinned.formula.num_clauses(), plain.formula.num_clauses() + 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EncodingKind::EdgeColoring).unwrap();
        assert_eq!(json, "\"edge-coloring\"");
    }
}
