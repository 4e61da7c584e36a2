//! Candidate words for each variable.
//!
//! Domains start as the full vocabulary and only ever shrink. Words are
//! kept in an ordered set so iteration (and therefore search) is
//! deterministic.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::puzzle::{Crossword, Variable};

#[derive(Debug, Clone, Default)]
pub struct Domains {
    domains: FxHashMap<Variable, BTreeSet<String>>,
}

impl Domains {
    /// Give every variable of the crossword the full vocabulary
    pub fn new(crossword: &Crossword, vocabulary: &BTreeSet<String>) -> Self {
        let domains = crossword
            .variables()
            .iter()
            .map(|var| (*var, vocabulary.clone()))
            .collect();
        Self { domains }
    }

    /// Current candidates for `var`.
    ///
    /// # Panics
    /// If `var` is not part of the crossword these domains were built for.
    pub fn get(&self, var: &Variable) -> &BTreeSet<String> {
        self.domains
            .get(var)
            .unwrap_or_else(|| panic!("variable {} has no domain", var))
    }

    pub fn len(&self, var: &Variable) -> usize {
        self.get(var).len()
    }

    pub fn is_empty(&self, var: &Variable) -> bool {
        self.get(var).is_empty()
    }

    /// Keep only the words of `var` matching `keep`; returns how many were removed
    pub fn retain<F>(&mut self, var: &Variable, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let domain = self
            .domains
            .get_mut(var)
            .unwrap_or_else(|| panic!("variable {} has no domain", var));
        let before = domain.len();
        domain.retain(|word| keep(word));
        before - domain.len()
    }

    /// Sum of all domain sizes
    pub fn total_size(&self) -> usize {
        self.domains.values().map(BTreeSet::len).sum()
    }
}
