//! Crossword structure: the grid, its word slots and how they cross.
//!
//! The structure is immutable once built. Variables are derived from runs
//! of open cells and are used as map keys for the lifetime of a solve.

use std::fmt;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{CrosswordError, Result};

/// Character marking an open cell in the structure text format
pub const OPEN_CELL: char = '_';

/// Direction a word runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Row/column step from one letter to the next
    pub fn delta(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A word slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self {
            row,
            col,
            direction,
            length,
        }
    }

    /// Grid cells covered by this variable, in letter order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (dr, dc) = self.direction.delta();
        (0..self.length).map(move |k| (self.row + k * dr, self.col + k * dc))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {} {}",
            self.row, self.col, self.direction, self.length
        )
    }
}

/// Neighbor list; most slots cross only a handful of others
pub type Neighbors = SmallVec<[Variable; 8]>;

/// The crossword structure with derived variables and overlaps
#[derive(Debug, Clone)]
pub struct Crossword {
    width: usize,
    height: usize,
    /// Open cells (row-major)
    structure: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    /// Keyed by ordered pair; both orientations are stored
    overlaps: FxHashMap<(Variable, Variable), (usize, usize)>,
    neighbors: FxHashMap<Variable, Neighbors>,
}

impl Crossword {
    /// Build a crossword from rows of open (`true`) and blocked cells.
    ///
    /// Rows shorter than the widest row are padded with blocked cells.
    pub fn new(mut structure: Vec<Vec<bool>>) -> Result<Self> {
        let height = structure.len();
        let width = structure.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(CrosswordError::EmptyStructure);
        }
        for row in &mut structure {
            row.resize(width, false);
        }

        let variables = find_variables(&structure, width, height);
        let overlaps = find_overlaps(&variables, width, height);

        let mut neighbors: FxHashMap<Variable, Neighbors> = FxHashMap::default();
        for var in &variables {
            let list = neighbors.entry(*var).or_default();
            for other in &variables {
                if overlaps.contains_key(&(*var, *other)) {
                    list.push(*other);
                }
            }
        }

        Ok(Self {
            width,
            height,
            structure,
            variables,
            overlaps,
            neighbors,
        })
    }

    /// Parse the structure text format: `_` is open, anything else blocked
    pub fn parse(contents: &str) -> Result<Self> {
        let structure = contents
            .lines()
            .map(|line| {
                line.trim_end_matches('\r')
                    .chars()
                    .map(|c| c == OPEN_CELL)
                    .collect()
            })
            .collect();
        Self::new(structure)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CrosswordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether a cell can hold a letter (out of bounds is blocked)
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.structure
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// All variables, in stable row-major order
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Letter indices (i, j) at which `x` and `y` must agree, if they cross
    pub fn overlap(&self, x: &Variable, y: &Variable) -> Option<(usize, usize)> {
        self.overlaps.get(&(*x, *y)).copied()
    }

    /// Variables crossing `var`
    pub fn neighbors(&self, var: &Variable) -> &[Variable] {
        self.neighbors.get(var).map_or(&[][..], |n| n.as_slice())
    }
}

/// Scan for maximal runs of open cells of length two or more.
///
/// For each starting cell the down variable is emitted before the across one.
fn find_variables(structure: &[Vec<bool>], width: usize, height: usize) -> Vec<Variable> {
    let mut variables = Vec::new();

    for row in 0..height {
        for col in 0..width {
            if !structure[row][col] {
                continue;
            }

            if row == 0 || !structure[row - 1][col] {
                let length = (row..height).take_while(|&r| structure[r][col]).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Down, length));
                }
            }

            if col == 0 || !structure[row][col - 1] {
                let length = (col..width).take_while(|&c| structure[row][c]).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Across, length));
                }
            }
        }
    }

    variables
}

/// Compute overlaps from a per-cell lookup of which down slot covers it
fn find_overlaps(
    variables: &[Variable],
    width: usize,
    height: usize,
) -> FxHashMap<(Variable, Variable), (usize, usize)> {
    let mut down_at: Vec<Option<(Variable, usize)>> = vec![None; width * height];
    for var in variables.iter().filter(|v| v.direction == Direction::Down) {
        for (index, (row, col)) in var.cells().enumerate() {
            down_at[row * width + col] = Some((*var, index));
        }
    }

    let mut overlaps = FxHashMap::default();
    for across in variables.iter().filter(|v| v.direction == Direction::Across) {
        for (i, (row, col)) in across.cells().enumerate() {
            if let Some((down, j)) = down_at[row * width + col] {
                overlaps.insert((*across, down), (i, j));
                overlaps.insert((down, *across), (j, i));
            }
        }
    }

    overlaps
}
