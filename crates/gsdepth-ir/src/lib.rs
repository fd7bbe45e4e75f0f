//! gsdepth Graph-State Intermediate Representation
//!
//! Core data structures shared by the depth-optimal graph-state synthesis
//! stack.
//!
//! # Core Components
//!
//! - [`Graph`]: immutable undirected simple graph describing the target state
//! - [`Layer`] and [`Circuit`]: a Hadamard on every qubit followed by layers
//!   of vertex-disjoint CZ gates
//! - [`Tableau`]: stabilizer tableau used to re-simulate a circuit and check
//!   it against the target graph state
//!
//! # Example: Triangle
//!
//! ```rust
//! use gsdepth_ir::{Circuit, Graph, Layer};
//!
//! let triangle = Graph::complete(3);
//! assert_eq!(triangle.depth_lower_bound(), 2);
//!
//! let circuit = Circuit::from_layers(
//!     3,
//!     [Layer::new([(0, 1)]), Layer::new([(1, 2)]), Layer::new([(0, 2)])],
//! )
//! .unwrap();
//! circuit.verify_against(&triangle).unwrap();
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod graph;
pub mod qasm;
pub mod tableau;

pub use circuit::{Circuit, Layer};
pub use error::{InvalidGraph, IrError, IrResult, VerificationError};
pub use graph::{Graph, GraphSpec};
pub use qasm::emit_qasm3;
pub use tableau::Tableau;
