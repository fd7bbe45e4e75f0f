//! Immutable target graph of a graph state.
//!
//! Vertices are `0..n`. Edges are stored canonically as `(u, v)` with
//! `u < v`, sorted lexicographically, so that every edge has a stable
//! index that the SAT encodings use to name their variables.

use petgraph::graph::UnGraph;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidGraph, IrResult};

/// Plain `{ num_vertices, edges }` form used for (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSpec {
    /// Number of vertices.
    pub num_vertices: u32,
    /// Edge list.
    #[serde(default)]
    pub edges: Vec<(u32, u32)>,
}

/// An undirected simple graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphSpec", into = "GraphSpec")]
pub struct Graph {
    num_vertices: u32,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
    edge_index: FxHashMap<(u32, u32), usize>,
}

impl Graph {
    /// Build a graph from a vertex count and an edge list.
    ///
    /// Rejects out-of-range endpoints, self-loops and repeated edges.
    pub fn new(num_vertices: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> IrResult<Self> {
        Ok(Self::build(num_vertices, edges)?)
    }

    fn build(
        num_vertices: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, InvalidGraph> {
        let mut canonical = Vec::new();
        for (u, v) in edges {
            for vertex in [u, v] {
                if vertex >= num_vertices {
                    return Err(InvalidGraph::VertexOutOfRange {
                        u,
                        v,
                        vertex,
                        num_vertices,
                    });
                }
            }
            if u == v {
                return Err(InvalidGraph::SelfLoop(u));
            }
            canonical.push((u.min(v), u.max(v)));
        }
        canonical.sort_unstable();
        if let Some(w) = canonical.windows(2).find(|w| w[0] == w[1]) {
            return Err(InvalidGraph::DuplicateEdge(w[0].0, w[0].1));
        }

        let mut adjacency = vec![Vec::new(); num_vertices as usize];
        let mut edge_index = FxHashMap::default();
        for (idx, &(u, v)) in canonical.iter().enumerate() {
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
            edge_index.insert((u, v), idx);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        Ok(Self {
            num_vertices,
            edges: canonical,
            adjacency,
            edge_index,
        })
    }

    /// Build a graph from a symmetric 0/1 adjacency matrix with zero diagonal.
    pub fn from_adjacency_matrix(matrix: &[Vec<u8>]) -> IrResult<Self> {
        let n = matrix.len();
        let mut edges = Vec::new();
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(InvalidGraph::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                }
                .into());
            }
        }
        for i in 0..n {
            if matrix[i][i] != 0 {
                return Err(InvalidGraph::SelfLoop(i as u32).into());
            }
            for j in (i + 1)..n {
                let (a, b) = (matrix[i][j], matrix[j][i]);
                if a != b || a > 1 {
                    return Err(InvalidGraph::AsymmetricMatrix(i, j).into());
                }
                if a == 1 {
                    edges.push((i as u32, j as u32));
                }
            }
        }
        Self::new(n as u32, edges)
    }

    /// Graph with `n` vertices and no edges.
    pub fn empty(n: u32) -> Self {
        Self {
            num_vertices: n,
            edges: vec![],
            adjacency: vec![Vec::new(); n as usize],
            edge_index: FxHashMap::default(),
        }
    }

    /// Path 0-1-2-…-(n-1).
    pub fn path(n: u32) -> Self {
        Self::from_valid((0..n.saturating_sub(1)).map(|i| (i, i + 1)), n)
    }

    /// Cycle 0-1-…-(n-1)-0. Fails for `n` of 1 or 2, which are not simple.
    pub fn cycle(n: u32) -> IrResult<Self> {
        Self::new(n, (0..n).map(|i| (i, (i + 1) % n)))
    }

    /// Star with centre 0 and `leaves` leaves.
    pub fn star(leaves: u32) -> Self {
        Self::from_valid((1..=leaves).map(|i| (0, i)), leaves + 1)
    }

    /// Complete graph on `n` vertices.
    pub fn complete(n: u32) -> Self {
        Self::from_valid((0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))), n)
    }

    // Edge lists produced by the named constructors are simple by construction.
    fn from_valid(edges: impl IntoIterator<Item = (u32, u32)>, n: u32) -> Self {
        match Self::build(n, edges) {
            Ok(graph) => graph,
            Err(_) => Self::empty(n),
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> u32 {
        self.num_vertices
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Canonical edge list, `u < v`, sorted.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Stable index of the edge `{u, v}`, in either orientation.
    pub fn edge_index(&self, u: u32, v: u32) -> Option<usize> {
        self.edge_index.get(&(u.min(v), u.max(v))).copied()
    }

    /// Check whether `{u, v}` is an edge.
    #[inline]
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        self.edge_index(u, v).is_some()
    }

    /// Sorted neighbours of `v` (empty for out-of-range vertices).
    pub fn neighbors(&self, v: u32) -> &[u32] {
        self.adjacency.get(v as usize).map_or(&[], Vec::as_slice)
    }

    /// Degree of `v`.
    pub fn degree(&self, v: u32) -> usize {
        self.neighbors(v).len()
    }

    /// Largest vertex degree (0 for graphs without vertices).
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Lowest-index vertex attaining the maximum degree.
    pub fn max_degree_vertex(&self) -> Option<u32> {
        let max = self.max_degree();
        (0..self.num_vertices).find(|&v| self.degree(v) == max)
    }

    /// Indices of edges incident to `v`, ascending.
    pub fn incident_edges(&self, v: u32) -> Vec<usize> {
        let mut idx: Vec<usize> = self
            .neighbors(v)
            .iter()
            .filter_map(|&w| self.edge_index(v, w))
            .collect();
        idx.sort_unstable();
        idx
    }

    /// Indices of edges sharing an endpoint with edge `e` (excluding `e`).
    pub fn adjacent_edges(&self, e: usize) -> Vec<usize> {
        let Some(&(u, v)) = self.edges.get(e) else {
            return vec![];
        };
        let mut out: Vec<usize> = self
            .incident_edges(u)
            .into_iter()
            .chain(self.incident_edges(v))
            .filter(|&f| f != e)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Dense 0/1 adjacency matrix.
    pub fn adjacency_matrix(&self) -> Vec<Vec<u8>> {
        let n = self.num_vertices as usize;
        let mut m = vec![vec![0u8; n]; n];
        for &(u, v) in &self.edges {
            m[u as usize][v as usize] = 1;
            m[v as usize][u as usize] = 1;
        }
        m
    }

    /// Cheap lower bound on the number of CZ layers: a vertex of degree k
    /// needs k distinct layers.
    pub fn depth_lower_bound(&self) -> u32 {
        self.max_degree() as u32
    }

    /// Depth that always suffices (Vizing: Δ + 1 colours), 0 without edges.
    pub fn depth_upper_bound(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.depth_lower_bound() + 1
        }
    }

    /// The graph as a petgraph undirected graph, node weight = vertex index.
    pub fn to_petgraph(&self) -> UnGraph<u32, ()> {
        let mut g = UnGraph::with_capacity(self.num_vertices as usize, self.edges.len());
        let nodes: Vec<_> = (0..self.num_vertices).map(|v| g.add_node(v)).collect();
        for &(u, v) in &self.edges {
            g.add_edge(nodes[u as usize], nodes[v as usize], ());
        }
        g
    }

    /// Number of connected components (isolated vertices count as one each).
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.to_petgraph())
    }
}

impl TryFrom<GraphSpec> for Graph {
    type Error = InvalidGraph;

    fn try_from(spec: GraphSpec) -> Result<Self, Self::Error> {
        Graph::build(spec.num_vertices, spec.edges)
    }
}

impl From<Graph> for GraphSpec {
    fn from(graph: Graph) -> Self {
        GraphSpec {
            num_vertices: graph.num_vertices,
            edges: graph.edges,
        }
    }
}
