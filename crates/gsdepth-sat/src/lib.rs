//! CNF construction and SAT solving for gsdepth.
//!
//! This crate owns everything between "a set of Boolean constraints" and
//! "a verdict":
//!
//! - [`CnfFormula`] with a variable pool and Tseitin gadgets
//!   (`and_gate`, `xor_chain`, `exactly_one`, ...)
//! - DIMACS rendering and parsing ([`to_dimacs`], [`parse_dimacs`])
//! - the [`SatBackend`] trait and the [`VarisatBackend`] implementation
//!
//! # Example
//!
//! ```rust
//! use gsdepth_sat::{CnfFormula, SatBackend, SolveLimits, VarisatBackend, Verdict};
//!
//! let mut f = CnfFormula::new();
//! let a = f.new_lit();
//! let b = f.new_lit();
//! let parity = f.xor_chain(&[a, b]);
//! f.fix(parity);
//! f.fix(!a);
//!
//! let Verdict::Sat(model) = VarisatBackend::new().solve(&f, SolveLimits::UNBOUNDED).unwrap() else {
//!     panic!("satisfiable");
//! };
//! assert!(model.lit_true(b));
//! ```

pub mod assignment;
pub mod backend;
pub mod cnf;
pub mod dimacs;
pub mod error;
pub mod varisat_backend;

pub use assignment::Assignment;
pub use backend::{SatBackend, SolveLimits, Verdict};
pub use cnf::{CnfFormula, Lit, Var};
pub use dimacs::{parse_dimacs, to_dimacs, write_dimacs};
pub use error::{SatError, SatResult};
pub use varisat_backend::VarisatBackend;
