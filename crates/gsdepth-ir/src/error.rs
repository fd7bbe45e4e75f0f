//! Error types for the IR crate.

use thiserror::Error;

/// Reasons a graph description is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidGraph {
    /// An edge endpoint is not a vertex of the graph.
    #[error("edge ({u}, {v}) references vertex {vertex} but the graph only has {num_vertices} vertices")]
    VertexOutOfRange {
        /// First endpoint as given.
        u: u32,
        /// Second endpoint as given.
        v: u32,
        /// The offending endpoint.
        vertex: u32,
        /// Number of vertices in the graph.
        num_vertices: u32,
    },

    /// An edge connects a vertex to itself.
    #[error("self-loop on vertex {0}")]
    SelfLoop(u32),

    /// The same unordered pair appears twice.
    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(u32, u32),

    /// Adjacency matrix is not square.
    #[error("adjacency matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Row index.
        row: usize,
        /// Entries in that row.
        len: usize,
        /// Number of rows.
        expected: usize,
    },

    /// Adjacency matrix entry differs from its transpose, or is not 0/1.
    #[error("adjacency matrix is not a symmetric 0/1 matrix at ({0}, {1})")]
    AsymmetricMatrix(usize, usize),
}

/// A decoded circuit does not prepare the graph state it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VerificationError {
    /// Circuit width differs from the graph's vertex count.
    #[error("circuit acts on {circuit} qubits but the graph has {graph} vertices")]
    WidthMismatch {
        /// Qubits in the circuit.
        circuit: u32,
        /// Vertices in the graph.
        graph: u32,
    },

    /// The circuit does not have the number of layers it was decoded for.
    #[error("circuit has {layers} layers, expected {expected}")]
    LayerCountMismatch {
        /// Layers present.
        layers: u32,
        /// Layers required.
        expected: u32,
    },

    /// A layer touches the same qubit twice.
    #[error("layer {layer} uses qubit {qubit} more than once")]
    QubitReused {
        /// Layer index (0-based).
        layer: usize,
        /// The repeated qubit.
        qubit: u32,
    },

    /// A gate acts on a pair that is not an edge.
    #[error("layer {layer} contains CZ({u}, {v}) which is not an edge of the graph")]
    ForeignGate {
        /// Layer index (0-based).
        layer: usize,
        /// First qubit.
        u: u32,
        /// Second qubit.
        v: u32,
    },

    /// An edge is applied in more than one layer.
    #[error("edge ({u}, {v}) appears in more than one layer")]
    DuplicateGate {
        /// First endpoint.
        u: u32,
        /// Second endpoint.
        v: u32,
    },

    /// An edge is never applied.
    #[error("edge ({u}, {v}) is never applied")]
    MissingGate {
        /// First endpoint.
        u: u32,
        /// Second endpoint.
        v: u32,
    },

    /// The simulated stabilizer generator differs from the target.
    #[error("stabilizer generator {generator} is {found}, expected {expected}")]
    StabilizerMismatch {
        /// Generator index.
        generator: usize,
        /// Pauli string produced by the circuit.
        found: String,
        /// Pauli string of the graph state.
        expected: String,
    },
}

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Malformed input graph.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] InvalidGraph),

    /// Circuit failed re-verification.
    #[error("circuit verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// A gate was placed on an out-of-range or repeated qubit.
    #[error("cannot apply CZ({0}, {1}) on a {2}-qubit circuit")]
    InvalidGate(u32, u32, u32),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
