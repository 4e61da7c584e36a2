//! Errors raised while reading puzzle input.
//!
//! An unsatisfiable puzzle is not an error: the solver reports it as a
//! normal "no solution" result.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors related to loading a crossword structure or word list.
#[derive(Error, Debug)]
pub enum CrosswordError {
    /// The file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The structure contains no cells at all.
    #[error("crossword structure has no cells")]
    EmptyStructure,
}

pub type Result<T> = std::result::Result<T, CrosswordError>;
