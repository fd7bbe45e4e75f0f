//! Stabilizer tableau for Clifford simulation of H + CZ circuits.
//!
//! Each of the `n` generators is a pair of bit rows (X-part, Z-part) and a
//! sign bit. Update rules follow Aaronson–Gottesman.

use std::fmt;

use crate::graph::Graph;

/// Symplectic tableau of `n` stabilizer generators on `n` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tableau {
    n: usize,
    x: Vec<Vec<bool>>,
    z: Vec<Vec<bool>>,
    sign: Vec<bool>,
}

impl Tableau {
    /// |0…0⟩: generator i = Z on qubit i.
    pub fn zero_state(n: usize) -> Self {
        let mut tableau = Self::blank(n);
        for i in 0..n {
            tableau.z[i][i] = true;
        }
        tableau
    }

    /// |+…+⟩: generator i = X on qubit i.
    pub fn plus_state(n: usize) -> Self {
        let mut tableau = Self::blank(n);
        for i in 0..n {
            tableau.x[i][i] = true;
        }
        tableau
    }

    /// Canonical generators of the graph state: K_i = X_i ∏_{j ∈ N(i)} Z_j.
    pub fn graph_state(graph: &Graph) -> Self {
        let mut tableau = Self::plus_state(graph.num_vertices() as usize);
        for &(u, v) in graph.edges() {
            tableau.z[u as usize][v as usize] = true;
            tableau.z[v as usize][u as usize] = true;
        }
        tableau
    }

    fn blank(n: usize) -> Self {
        Self {
            n,
            x: vec![vec![false; n]; n],
            z: vec![vec![false; n]; n],
            sign: vec![false; n],
        }
    }

    /// Number of qubits (and generators).
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.n
    }

    /// X-part bit of generator `i` on qubit `q`.
    #[inline]
    pub fn x(&self, i: usize, q: usize) -> bool {
        self.x[i][q]
    }

    /// Z-part bit of generator `i` on qubit `q`.
    #[inline]
    pub fn z(&self, i: usize, q: usize) -> bool {
        self.z[i][q]
    }

    /// Sign bit of generator `i` (`true` means −1).
    #[inline]
    pub fn sign(&self, i: usize) -> bool {
        self.sign[i]
    }

    /// Conjugate every generator by a Hadamard on `q`.
    pub fn apply_h(&mut self, q: usize) {
        for i in 0..self.n {
            self.sign[i] ^= self.x[i][q] & self.z[i][q];
            std::mem::swap(&mut self.x[i][q], &mut self.z[i][q]);
        }
    }

    /// Conjugate every generator by CZ on `(a, b)`.
    pub fn apply_cz(&mut self, a: usize, b: usize) {
        for i in 0..self.n {
            let (xa, xb) = (self.x[i][a], self.x[i][b]);
            self.sign[i] ^= xa & xb & (self.z[i][a] ^ self.z[i][b]);
            self.z[i][a] ^= xb;
            self.z[i][b] ^= xa;
        }
    }

    /// True if every pair of generators commutes (symplectic product 0).
    pub fn commutes_pairwise(&self) -> bool {
        (0..self.n).all(|i| {
            ((i + 1)..self.n).all(|j| {
                let product = (0..self.n).fold(false, |acc, q| {
                    acc ^ (self.x[i][q] & self.z[j][q]) ^ (self.z[i][q] & self.x[j][q])
                });
                !product
            })
        })
    }

    /// Generator `i` as a signed Pauli string, e.g. `+XZI`.
    pub fn generator_string(&self, i: usize) -> String {
        let mut s = String::with_capacity(self.n + 1);
        s.push(if self.sign[i] { '-' } else { '+' });
        for q in 0..self.n {
            s.push(match (self.x[i][q], self.z[i][q]) {
                (false, false) => 'I',
                (true, false) => 'X',
                (false, true) => 'Z',
                (true, true) => 'Y',
            });
        }
        s
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            writeln!(f, "{}", self.generator_string(i))?;
        }
        Ok(())
    }
}
