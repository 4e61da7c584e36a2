//! Word list loading.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{CrosswordError, Result};

/// Parse a word list with one word per line.
///
/// Blank lines are skipped and words are upper-cased.
pub fn parse_words(contents: &str) -> BTreeSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

pub fn load_words(path: impl AsRef<Path>) -> Result<BTreeSet<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CrosswordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_words(&contents))
}

/// Length of a word in letters
pub fn letter_count(word: &str) -> usize {
    word.chars().count()
}

/// Letter at `index`, if the word is long enough
pub fn letter_at(word: &str, index: usize) -> Option<char> {
    word.chars().nth(index)
}
