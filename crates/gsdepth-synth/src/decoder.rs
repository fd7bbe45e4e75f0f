//! Turning a satisfying assignment back into a verified circuit.

use gsdepth_ir::{Circuit, Graph, Layer, VerificationError};
use gsdepth_sat::Assignment;
use tracing::debug;

use crate::encoding::VariableMap;
use crate::error::{SynthError, SynthResult};

/// Read layer `t` off as every edge whose selection literal holds, then
/// re-simulate the circuit and compare it with the graph's stabilizers.
///
/// Any mismatch is a defect in an encoding or in the solver integration and
/// surfaces as [`SynthError::DecodingInconsistency`].
pub fn decode(
    graph: &Graph,
    depth: u32,
    assignment: &Assignment,
    variables: &VariableMap,
) -> SynthResult<Circuit> {
    let inconsistent = |source| SynthError::DecodingInconsistency { depth, source };

    if variables.depth() != depth {
        return Err(inconsistent(
            VerificationError::LayerCountMismatch {
                layers: variables.depth(),
                expected: depth,
            }
            .into(),
        ));
    }

    let mut circuit = Circuit::new(graph.num_vertices());
    for t in 0..depth {
        let gates = variables
            .layer(t)
            .iter()
            .zip(graph.edges())
            .filter(|&(&lit, _)| assignment.lit_true(lit))
            .map(|(_, &edge)| edge);
        circuit.push_layer(Layer::new(gates)).map_err(inconsistent)?;
    }

    circuit.verify_against(graph).map_err(inconsistent)?;
    debug!(
        depth,
        encoding = %variables.kind(),
        gates = circuit.two_qubit_gates(),
        "decoded and verified circuit"
    );
    Ok(circuit)
}
