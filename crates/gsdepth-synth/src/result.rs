//! The synthesis result record.

use std::fmt;
use std::time::Duration;

use gsdepth_ir::{Circuit, Tableau};
use serde::{Serialize, Serializer};

use crate::encoding::EncodingKind;
use crate::search::SearchStrategy;

/// A depth-optimal circuit together with how it was found.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    /// The verified circuit.
    pub circuit: Circuit,
    /// Optimal number of CZ layers.
    pub depth: u32,
    /// Encoding used for the probes.
    pub encoding: EncodingKind,
    /// Sequential search order (unused when `parallel` is set).
    pub strategy: SearchStrategy,
    /// Whether depths were probed concurrently.
    pub parallel: bool,
    /// Solver invocations, retries included.
    pub solver_calls: u32,
    /// Wall-clock time of the whole synthesis.
    #[serde(serialize_with = "as_secs")]
    pub runtime: Duration,
    /// Maximum degree.
    pub lower_bound: u32,
    /// Δ+1, or 0 for an edgeless graph.
    pub upper_bound: u32,
    /// Depths proven infeasible.
    pub unsat_depths: Vec<u32>,
}

impl SynthesisResult {
    /// Hadamard count.
    pub fn single_qubit_gates(&self) -> usize {
        self.circuit.single_qubit_gates()
    }

    /// CZ count.
    pub fn two_qubit_gates(&self) -> usize {
        self.circuit.two_qubit_gates()
    }

    /// Total gate count.
    pub fn gate_count(&self) -> usize {
        self.circuit.gate_count()
    }

    /// Stabilizer tableau prepared by the circuit.
    pub fn tableau(&self) -> Tableau {
        self.circuit.simulate()
    }
}

impl fmt::Display for SynthesisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "depth:              {}", self.depth)?;
        writeln!(f, "bounds:             [{}, {}]", self.lower_bound, self.upper_bound)?;
        writeln!(f, "encoding:           {}", self.encoding)?;
        let search = if self.parallel { "parallel" } else { self.strategy.as_str() };
        writeln!(f, "search:             {search}")?;
        writeln!(f, "solver calls:       {}", self.solver_calls)?;
        writeln!(f, "runtime:            {:.3}s", self.runtime.as_secs_f64())?;
        writeln!(f, "single-qubit gates: {}", self.single_qubit_gates())?;
        writeln!(f, "two-qubit gates:    {}", self.two_qubit_gates())?;
        writeln!(f, "gates:              {}", self.gate_count())?;
        write!(f, "{}", self.circuit)
    }
}

fn as_secs<S: Serializer>(runtime: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(runtime.as_secs_f64())
}
