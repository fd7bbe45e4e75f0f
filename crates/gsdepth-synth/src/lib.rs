//! Depth-optimal graph-state synthesis.
//!
//! A graph state is prepared by a Hadamard on every qubit followed by one CZ
//! per graph edge. This crate finds the smallest number of CZ layers (each
//! layer a matching) and proves it optimal by refuting every smaller depth
//! with a SAT solver.
//!
//! # Pipeline
//!
//! ```text
//! Graph ─▶ search ─▶ encode(depth) ─▶ SatBackend ─▶ UNSAT: next depth
//!                                                └▶ SAT:  decode ─▶ verify ─▶ Circuit
//! ```
//!
//! - [`encoding`]: tableau and edge-coloring CNF models behind one [`encode`]
//! - [`search`]: linear, bisection and parallel depth search over a probe
//! - [`decode`]: assignment to circuit, re-simulated against the graph
//! - [`Synthesizer`]: wires the pieces together from a [`SynthesisConfig`]
//!
//! # Example
//!
//! ```rust
//! use gsdepth_ir::Graph;
//! use gsdepth_synth::{EncodingKind, SynthesisConfig, Synthesizer};
//!
//! let config = SynthesisConfig {
//!     encoding: EncodingKind::Tableau,
//!     ..SynthesisConfig::default()
//! };
//! let result = Synthesizer::new(config).synthesize(&Graph::complete(3)).unwrap();
//! assert_eq!(result.depth, 3);
//! assert_eq!(result.two_qubit_gates(), 3);
//! ```

pub mod config;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod result;
pub mod search;
pub mod synthesizer;

pub use config::SynthesisConfig;
pub use decoder::decode;
pub use encoding::{encode, EncodeOptions, EncodedInstance, EncodingKind, VariableMap};
pub use error::{SynthError, SynthResult};
pub use result::SynthesisResult;
pub use search::{
    find_minimal_depth, DepthBounds, ParallelSearch, ProbeOutcome, SearchOutcome, SearchStrategy,
};
pub use synthesizer::{Synthesizer, Witness};
