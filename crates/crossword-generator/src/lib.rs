//! Crossword puzzle generation as a constraint satisfaction problem.
//!
//! Given a grid structure and a vocabulary, this crate assigns a word to
//! every slot so that crossing slots agree on shared letters and no word
//! is used twice. Domains are pruned with node consistency and AC-3 before
//! a backtracking search using the MRV, degree and least-constraining-value
//! heuristics.

pub mod assignment;
pub mod consistency;
pub mod domain;
pub mod error;
pub mod puzzle;
pub mod solver;
pub mod words;

// Re-export main types
pub use assignment::{Assignment, Placement};
pub use consistency::Arc;
pub use domain::Domains;
pub use error::{CrosswordError, Result};
pub use puzzle::{Crossword, Direction, Variable};
pub use solver::{CrosswordCreator, SolveStatus, SolverConfig, SolverResult};
pub use words::{load_words, parse_words};
