//! Mapping from variables to chosen words, and its text rendering.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::puzzle::{Crossword, Direction, Variable};

/// Character drawn for blocked cells
pub const BLOCKED_CELL: char = '█';

/// A partial or complete assignment of words to variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    words: BTreeMap<Variable, String>,
}

/// One placed word, flattened for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
    pub word: String,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `word` to `var`, returning the word it replaced
    pub fn insert(&mut self, var: Variable, word: impl Into<String>) -> Option<String> {
        self.words.insert(var, word.into())
    }

    pub fn remove(&mut self, var: &Variable) -> Option<String> {
        self.words.remove(var)
    }

    pub fn word(&self, var: &Variable) -> Option<&str> {
        self.words.get(var).map(String::as_str)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.words.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether every variable of the crossword has a word
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        crossword.variables().iter().all(|var| self.contains(var))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &str)> {
        self.words.iter().map(|(var, word)| (var, word.as_str()))
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.iter()
            .map(|(var, word)| Placement {
                row: var.row,
                col: var.col,
                direction: var.direction,
                length: var.length,
                word: word.to_string(),
            })
            .collect()
    }

    /// Letters of the grid; `None` for blocked or unfilled cells
    pub fn letter_grid(&self, crossword: &Crossword) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; crossword.width()]; crossword.height()];
        for (var, word) in self.iter() {
            for ((row, col), letter) in var.cells().zip(word.chars()) {
                letters[row][col] = Some(letter);
            }
        }
        letters
    }

    /// Render one string per grid row; unfilled open cells are spaces
    pub fn render_rows(&self, crossword: &Crossword) -> Vec<String> {
        self.letter_grid(crossword)
            .into_iter()
            .enumerate()
            .map(|(row, letters)| {
                letters
                    .into_iter()
                    .enumerate()
                    .map(|(col, letter)| {
                        if crossword.is_open(row, col) {
                            letter.unwrap_or(' ')
                        } else {
                            BLOCKED_CELL
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Render the grid as text, one line per row
    pub fn render(&self, crossword: &Crossword) -> String {
        let mut out = String::new();
        for row in self.render_rows(crossword) {
            out.push_str(&row);
            out.push('\n');
        }
        out
    }
}

impl<'v> Index<&'v Variable> for Assignment {
    type Output = str;

    /// # Panics
    /// If `var` has no word assigned.
    fn index(&self, var: &'v Variable) -> &str {
        match self.word(var) {
            Some(word) => word,
            None => panic!("no word assigned to {}", var),
        }
    }
}
