//! Satisfying assignments returned by solvers.

use serde::{Deserialize, Serialize};

use crate::cnf::{CnfFormula, Lit, Var};

/// Truth values for variables `1..=num_vars`. Variables the solver did not
/// report read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Build from a DIMACS-style model (signed variable indices).
    pub fn from_model(num_vars: u32, model: impl IntoIterator<Item = i64>) -> Self {
        let mut values = vec![false; num_vars as usize];
        for lit in model {
            let var = lit.unsigned_abs() as usize;
            if var == 0 {
                continue;
            }
            if var > values.len() {
                values.resize(var, false);
            }
            values[var - 1] = lit > 0;
        }
        Self { values }
    }

    /// Build from per-variable values, index 0 holding variable 1.
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Value of `var`.
    #[inline]
    pub fn value(&self, var: Var) -> bool {
        var != 0 && self.values.get(var as usize - 1).copied().unwrap_or(false)
    }

    /// Whether `lit` holds.
    #[inline]
    pub fn lit_true(&self, lit: Lit) -> bool {
        self.value(lit.var()) == lit.is_positive()
    }

    /// Number of variables with a stored value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check every clause of `formula`.
    pub fn satisfies(&self, formula: &CnfFormula) -> bool {
        formula
            .clauses()
            .iter()
            .all(|clause| clause.iter().any(|&l| self.lit_true(l)))
    }
}
