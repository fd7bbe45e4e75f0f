//! Graph-state preparation circuits: a Hadamard on every qubit followed by
//! an ordered sequence of CZ layers.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult, VerificationError};
use crate::graph::Graph;
use crate::tableau::Tableau;

/// One time step of commuting CZ gates. Pairs are stored as `(u, v)` with
/// `u < v`, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    gates: Vec<(u32, u32)>,
}

impl Layer {
    /// Create a layer from CZ pairs in any orientation.
    pub fn new(gates: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut gates: Vec<_> = gates.into_iter().map(|(u, v)| (u.min(v), u.max(v))).collect();
        gates.sort_unstable();
        Self { gates }
    }

    /// CZ pairs in this layer.
    pub fn gates(&self) -> &[(u32, u32)] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the layer holds no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Qubits touched by this layer, with repetitions.
    pub fn qubits(&self) -> impl Iterator<Item = u32> + '_ {
        self.gates.iter().flat_map(|&(u, v)| [u, v])
    }

    /// First qubit used by two gates, if any.
    pub fn repeated_qubit(&self) -> Option<u32> {
        let mut seen = FxHashSet::default();
        self.qubits().find(|&q| !seen.insert(q))
    }

    /// True if no qubit appears twice.
    pub fn is_matching(&self) -> bool {
        self.repeated_qubit().is_none()
    }
}

/// A depth-`d` graph-state preparation circuit.
///
/// Deserialization goes through [`Circuit::from_layers`], so every gate is
/// checked against the qubit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CircuitSpec")]
pub struct Circuit {
    num_qubits: u32,
    layers: Vec<Layer>,
}

#[derive(Deserialize)]
struct CircuitSpec {
    num_qubits: u32,
    #[serde(default)]
    layers: Vec<Layer>,
}

impl TryFrom<CircuitSpec> for Circuit {
    type Error = IrError;

    fn try_from(spec: CircuitSpec) -> IrResult<Self> {
        let layers = spec.layers.into_iter().map(|l| Layer::new(l.gates));
        Circuit::from_layers(spec.num_qubits, layers)
    }
}

impl Circuit {
    /// Circuit with only the Hadamard step.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            layers: vec![],
        }
    }

    /// Build a circuit from a list of layers.
    pub fn from_layers(num_qubits: u32, layers: impl IntoIterator<Item = Layer>) -> IrResult<Self> {
        let mut circuit = Self::new(num_qubits);
        for layer in layers {
            circuit.push_layer(layer)?;
        }
        Ok(circuit)
    }

    /// Append a layer. Gates must act on two distinct in-range qubits.
    pub fn push_layer(&mut self, layer: Layer) -> IrResult<&mut Self> {
        for &(u, v) in layer.gates() {
            if u == v || v >= self.num_qubits {
                return Err(IrError::InvalidGate(u, v, self.num_qubits));
            }
        }
        self.layers.push(layer);
        Ok(self)
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The CZ layers in execution order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of CZ layers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Hadamards in the initial step.
    pub fn single_qubit_gates(&self) -> usize {
        self.num_qubits as usize
    }

    /// Total number of CZ gates.
    pub fn two_qubit_gates(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// All gates, single- and two-qubit.
    pub fn gate_count(&self) -> usize {
        self.single_qubit_gates() + self.two_qubit_gates()
    }

    /// Render as OpenQASM 3.
    pub fn to_qasm3(&self) -> String {
        crate::qasm::emit_qasm3(self)
    }

    /// Run the circuit on |0…0⟩ and return the final stabilizer tableau.
    pub fn simulate(&self) -> Tableau {
        let n = self.num_qubits as usize;
        let mut tableau = Tableau::zero_state(n);
        for q in 0..n {
            tableau.apply_h(q);
        }
        for layer in &self.layers {
            for &(u, v) in layer.gates() {
                tableau.apply_cz(u as usize, v as usize);
            }
        }
        tableau
    }

    /// Check that the circuit is a valid layering of `graph` and that it
    /// prepares exactly the graph state of `graph`.
    pub fn verify_against(&self, graph: &Graph) -> IrResult<()> {
        self.check_layering(graph)?;

        let produced = self.simulate();
        let expected = Tableau::graph_state(graph);
        // H + CZ keeps every X-part at the identity, so both tableaux are in
        // canonical form and generator-wise equality is group equality.
        for i in 0..produced.num_qubits() {
            let (found, want) = (produced.generator_string(i), expected.generator_string(i));
            if found != want {
                return Err(VerificationError::StabilizerMismatch {
                    generator: i,
                    found,
                    expected: want,
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_layering(&self, graph: &Graph) -> Result<(), VerificationError> {
        if self.num_qubits != graph.num_vertices() {
            return Err(VerificationError::WidthMismatch {
                circuit: self.num_qubits,
                graph: graph.num_vertices(),
            });
        }

        let mut applied = FxHashSet::default();
        for (layer_idx, layer) in self.layers.iter().enumerate() {
            if let Some(qubit) = layer.repeated_qubit() {
                return Err(VerificationError::QubitReused {
                    layer: layer_idx,
                    qubit,
                });
            }
            for &(u, v) in layer.gates() {
                if !graph.has_edge(u, v) {
                    return Err(VerificationError::ForeignGate {
                        layer: layer_idx,
                        u,
                        v,
                    });
                }
                if !applied.insert((u, v)) {
                    return Err(VerificationError::DuplicateGate { u, v });
                }
            }
        }

        if let Some(&(u, v)) = graph.edges().iter().find(|e| !applied.contains(*e)) {
            return Err(VerificationError::MissingGate { u, v });
        }
        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "H on {} qubits", self.num_qubits)?;
        for (idx, layer) in self.layers.iter().enumerate() {
            write!(f, "layer {idx}:")?;
            for (u, v) in layer.gates() {
                write!(f, " CZ({u},{v})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k4_circuit() -> Circuit {
        Circuit::from_layers(
            4,
            [
                Layer::new([(0, 1), (2, 3)]),
                Layer::new([(0, 2), (1, 3)]),
                Layer::new([(3, 0), (1, 2)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_layer_canonical_order() {
        let layer = Layer::new([(3, 2), (1, 0)]);
        assert_eq!(layer.gates(), &[(0, 1), (2, 3)]);
        assert!(layer.is_matching());
        assert_eq!(Layer::new([(0, 1), (1, 2)]).repeated_qubit(), Some(1));
    }

    #[test]
    fn test_push_layer_rejects_bad_gates() {
        let mut c = Circuit::new(2);
        assert!(matches!(
            c.push_layer(Layer::new([(0, 2)])),
            Err(IrError::InvalidGate(0, 2, 2))
        ));
        assert!(c.push_layer(Layer::new([(1, 1)])).is_err());
    }

    #[test]
    fn test_metrics() {
        let c = k4_circuit();
        assert_eq!(c.depth(), 3);
        assert_eq!(c.single_qubit_gates(), 4);
        assert_eq!(c.two_qubit_gates(), 6);
        assert_eq!(c.gate_count(), 10);
    }

    #[test]
    fn test_verify_complete_graph() {
        k4_circuit().verify_against(&Graph::complete(4)).unwrap();
    }

    #[test]
    fn test_verify_reports_missing_gate() {
        let c = Circuit::from_layers(3, [Layer::new([(0, 1)])]).unwrap();
        let err = c.verify_against(&Graph::path(3)).unwrap_err();
        assert_eq!(
            err,
            IrError::Verification(VerificationError::MissingGate { u: 1, v: 2 })
        );
    }

    #[test]
    fn test_verify_reports_reused_qubit() {
        let c = Circuit::from_layers(3, [Layer::new([(0, 1), (1, 2)])]).unwrap();
        let err = c.verify_against(&Graph::path(3)).unwrap_err();
        assert!(matches!(
            err,
            IrError::Verification(VerificationError::QubitReused { layer: 0, qubit: 1 })
        ));
    }

    #[test]
    fn test_verify_reports_foreign_and_duplicate() {
        let g = Graph::path(3);
        let foreign = Circuit::from_layers(3, [Layer::new([(0, 2)])]).unwrap();
        assert!(matches!(
            foreign.verify_against(&g),
            Err(IrError::Verification(VerificationError::ForeignGate { .. }))
        ));
        let twice = Circuit::from_layers(
            3,
            [Layer::new([(0, 1)]), Layer::new([(1, 2)]), Layer::new([(0, 1)])],
        )
        .unwrap();
        assert!(matches!(
            twice.verify_against(&g),
            Err(IrError::Verification(VerificationError::DuplicateGate { u: 0, v: 1 }))
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let err = Circuit::new(2).verify_against(&Graph::empty(3)).unwrap_err();
        assert!(matches!(
            err,
            IrError::Verification(VerificationError::WidthMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_circuit_prepares_plus_state() {
        let c = Circuit::new(3);
        assert_eq!(c.simulate(), Tableau::plus_state(3));
        c.verify_against(&Graph::empty(3)).unwrap();
    }

    #[test]
    fn test_deserialize_validates_gates() {
        let self_loop: Result<Circuit, _> =
            serde_json::from_str(r#"{"num_qubits":3,"layers":[{"gates":[[0,0]]}]}"#);
        assert!(self_loop.is_err());

        let out_of_range: Result<Circuit, _> =
            serde_json::from_str(r#"{"num_qubits":2,"layers":[{"gates":[[0,5]]}]}"#);
        assert!(out_of_range.is_err());

        let ok: Circuit =
            serde_json::from_str(r#"{"num_qubits":3,"layers":[{"gates":[[2,1]]}]}"#).unwrap();
        assert_eq!(ok.layers()[0].gates(), &[(1, 2)]);
        assert_eq!(serde_json::from_str::<Circuit>(&serde_json::to_string(&ok).unwrap()).unwrap(), ok);
    }

    #[test]
    fn test_display() {
        let c = Circuit::from_layers(2, [Layer::new([(0, 1)])]).unwrap();
        assert_eq!(c.to_string(), "H on 2 qubits\nlayer 0: CZ(0,1)\n");
    }
}
