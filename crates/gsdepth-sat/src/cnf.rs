//! CNF formulas over DIMACS-numbered variables, with Tseitin gadgets.

use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};
use varisat::ExtendFormula;

use crate::error::{SatError, SatResult};

/// A 1-based variable index.
pub type Var = u32;

/// A literal: a variable or its negation, stored in DIMACS form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lit(i32);

impl Lit {
    /// Positive literal of `var`.
    #[inline]
    pub fn pos(var: Var) -> Self {
        Lit(var as i32)
    }

    /// Negative literal of `var`.
    #[inline]
    pub fn neg(var: Var) -> Self {
        Lit(-(var as i32))
    }

    /// Literal of `var` with the given polarity.
    #[inline]
    pub fn with_polarity(var: Var, positive: bool) -> Self {
        if positive { Self::pos(var) } else { Self::neg(var) }
    }

    /// Parse a non-zero DIMACS literal.
    pub fn from_dimacs(value: i64) -> SatResult<Self> {
        match i32::try_from(value) {
            Ok(v) if v != 0 && v != i32::MIN => Ok(Lit(v)),
            _ => Err(SatError::InvalidLiteral(value)),
        }
    }

    /// DIMACS integer form.
    #[inline]
    pub fn to_dimacs(self) -> i32 {
        self.0
    }

    /// Underlying variable.
    #[inline]
    pub fn var(self) -> Var {
        self.0.unsigned_abs()
    }

    /// True for the positive polarity.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The same literal in `varisat` form.
    #[inline]
    pub fn to_varisat(self) -> varisat::Lit {
        varisat::Lit::from_dimacs(self.0 as isize)
    }

    /// Convert a `varisat` literal.
    pub fn from_varisat(lit: varisat::Lit) -> SatResult<Self> {
        Self::from_dimacs(lit.to_dimacs() as i64)
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A conjunction of clauses together with its variable pool.
///
/// Variables are allocated with [`new_var`](Self::new_var) and numbered
/// `1..=num_vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfFormula {
    num_vars: u32,
    clauses: Vec<Vec<Lit>>,
}

impl CnfFormula {
    /// Create an empty formula.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable.
    pub fn new_var(&mut self) -> Var {
        self.num_vars += 1;
        self.num_vars
    }

    /// Allocate a fresh variable and return its positive literal.
    pub fn new_lit(&mut self) -> Lit {
        Lit::pos(self.new_var())
    }

    /// Number of allocated variables.
    #[inline]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of clauses.
    #[inline]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// The clauses.
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Add a clause. Variables referenced beyond the pool grow it.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) {
        let clause: Vec<Lit> = lits.into_iter().collect();
        if let Some(max) = clause.iter().map(|l| l.var()).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    /// Copy into a `varisat` formula with the same variable count.
    pub fn to_varisat(&self) -> varisat::CnfFormula {
        let mut out = varisat::CnfFormula::new();
        out.set_var_count(self.num_vars as usize);
        let mut buffer: Vec<varisat::Lit> = Vec::new();
        for clause in &self.clauses {
            buffer.clear();
            buffer.extend(clause.iter().map(|&l| l.to_varisat()));
            out.add_clause(&buffer);
        }
        out
    }

    /// Copy a `varisat` formula, keeping its variable count.
    pub fn from_varisat(formula: &varisat::CnfFormula) -> SatResult<Self> {
        let mut out = Self::new();
        for clause in formula.iter() {
            let lits = clause
                .iter()
                .map(|&l| Lit::from_varisat(l))
                .collect::<SatResult<Vec<_>>>()?;
            out.add_clause(lits);
        }
        let num_vars = u32::try_from(formula.var_count())
            .map_err(|_| SatError::InvalidLiteral(formula.var_count() as i64))?;
        out.num_vars = out.num_vars.max(num_vars);
        Ok(out)
    }

    // =========================================================================
    // Gadgets
    // =========================================================================

    /// Force `lit` true.
    pub fn fix(&mut self, lit: Lit) {
        self.add_clause([lit]);
    }

    /// Fresh literal fixed to `value`.
    pub fn constant(&mut self, value: bool) -> Lit {
        let lit = self.new_lit();
        self.fix(if value { lit } else { !lit });
        lit
    }

    /// `a ⇔ b`.
    pub fn equal(&mut self, a: Lit, b: Lit) {
        self.add_clause([!a, b]);
        self.add_clause([a, !b]);
    }

    /// At least one of `lits` is true. An empty list makes the formula UNSAT.
    pub fn at_least_one(&mut self, lits: &[Lit]) {
        self.add_clause(lits.iter().copied());
    }

    /// At most one of `lits` is true (pairwise encoding).
    pub fn at_most_one(&mut self, lits: &[Lit]) {
        for (i, &a) in lits.iter().enumerate() {
            for &b in &lits[i + 1..] {
                self.add_clause([!a, !b]);
            }
        }
    }

    /// Exactly one of `lits` is true.
    pub fn exactly_one(&mut self, lits: &[Lit]) {
        self.at_least_one(lits);
        self.at_most_one(lits);
    }

    /// Fresh `out ⇔ ∧ inputs`. The empty conjunction is true.
    pub fn and_gate(&mut self, inputs: &[Lit]) -> Lit {
        let out = self.new_lit();
        for &input in inputs {
            self.add_clause([!out, input]);
        }
        self.add_clause(inputs.iter().map(|&l| !l).chain([out]));
        out
    }

    /// Fresh `out ⇔ ∨ inputs`. The empty disjunction is false.
    pub fn or_gate(&mut self, inputs: &[Lit]) -> Lit {
        let out = self.new_lit();
        for &input in inputs {
            self.add_clause([!input, out]);
        }
        self.add_clause(inputs.iter().copied().chain([!out]));
        out
    }

    /// Fresh `out ⇔ a ⊕ b`.
    pub fn xor_gate(&mut self, a: Lit, b: Lit) -> Lit {
        let out = self.new_lit();
        self.add_clause([!a, !b, !out]);
        self.add_clause([a, b, !out]);
        self.add_clause([a, !b, out]);
        self.add_clause([!a, b, out]);
        out
    }

    /// Parity of `lits` as a chain of two-input XORs. The empty parity is a
    /// fresh literal fixed to false; a single input is returned unchanged.
    pub fn xor_chain(&mut self, lits: &[Lit]) -> Lit {
        match lits {
            [] => self.constant(false),
            [first, rest @ ..] => rest.iter().fold(*first, |acc, &l| self.xor_gate(acc, l)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustively evaluate a small formula under every assignment of its
    /// first `inputs` variables, returning whether some extension satisfies it.
    fn satisfiable_with(formula: &CnfFormula, fixed: &[(Var, bool)]) -> bool {
        let n = formula.num_vars();
        (0u64..(1 << n)).any(|bits| {
            let value = |v: Var| bits >> (v - 1) & 1 == 1;
            fixed.iter().all(|&(v, b)| value(v) == b)
                && formula
                    .clauses()
                    .iter()
                    .all(|c| c.iter().any(|l| value(l.var()) == l.is_positive()))
        })
    }

    #[test]
    fn test_lit_roundtrip() {
        let l = Lit::neg(7);
        assert_eq!(l.var(), 7);
        assert!(!l.is_positive());
        assert_eq!(!l, Lit::pos(7));
        assert_eq!(Lit::from_dimacs(-7).unwrap(), l);
        assert!(Lit::from_dimacs(0).is_err());
        assert!(Lit::from_dimacs(i64::MAX).is_err());
    }

    #[test]
    fn test_add_clause_grows_pool() {
        let mut f = CnfFormula::new();
        f.add_clause([Lit::pos(4)]);
        assert_eq!(f.num_vars(), 4);
        assert_eq!(f.new_var(), 5);
    }

    #[test]
    fn test_xor_gate_truth_table() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut f = CnfFormula::new();
            let (x, y) = (f.new_lit(), f.new_lit());
            let out = f.xor_gate(x, y);
            assert!(satisfiable_with(&f, &[(1, a), (2, b), (out.var(), a ^ b)]));
            assert!(!satisfiable_with(&f, &[(1, a), (2, b), (out.var(), !(a ^ b))]));
        }
    }

    #[test]
    fn test_and_or_gates() {
        let mut f = CnfFormula::new();
        let (x, y) = (f.new_lit(), f.new_lit());
        let and = f.and_gate(&[x, y]);
        let or = f.or_gate(&[x, y]);
        assert!(!satisfiable_with(&f, &[(1, true), (2, false), (and.var(), true)]));
        assert!(satisfiable_with(&f, &[(1, true), (2, true), (and.var(), true)]));
        assert!(!satisfiable_with(&f, &[(1, false), (2, false), (or.var(), true)]));
        assert!(satisfiable_with(&f, &[(1, false), (2, true), (or.var(), true)]));
    }

    #[test]
    fn test_empty_gates_are_constants() {
        let mut f = CnfFormula::new();
        let t = f.and_gate(&[]);
        let z = f.or_gate(&[]);
        let p = f.xor_chain(&[]);
        assert!(!satisfiable_with(&f, &[(t.var(), false)]));
        assert!(!satisfiable_with(&f, &[(z.var(), true)]));
        assert!(!satisfiable_with(&f, &[(p.var(), true)]));
    }

    #[test]
    fn test_xor_chain_parity() {
        let mut f = CnfFormula::new();
        let lits: Vec<Lit> = (0..3).map(|_| f.new_lit()).collect();
        let parity = f.xor_chain(&lits);
        assert!(satisfiable_with(&f, &[(1, true), (2, true), (3, true), (parity.var(), true)]));
        assert!(!satisfiable_with(&f, &[(1, true), (2, true), (3, false), (parity.var(), true)]));
    }

    #[test]
    fn test_exactly_one() {
        let mut f = CnfFormula::new();
        let lits: Vec<Lit> = (0..3).map(|_| f.new_lit()).collect();
        f.exactly_one(&lits);
        assert!(satisfiable_with(&f, &[(1, false), (2, true), (3, false)]));
        assert!(!satisfiable_with(&f, &[(1, true), (2, true)]));
        assert!(!satisfiable_with(&f, &[(1, false), (2, false), (3, false)]));
    }
}
