//! Backtracking search for a complete crossword fill.
//!
//! Domains are pruned with node and arc consistency first, then a
//! depth-first search assigns one variable at a time, choosing the
//! variable with the fewest remaining values (ties: most neighbors, then
//! grid order) and trying its least constraining words first.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::assignment::Assignment;
use crate::consistency::{self, Arc};
use crate::domain::Domains;
use crate::puzzle::{Crossword, Variable};
use crate::words::{letter_at, letter_count};

/// Budget for the search. Both limits are off by default.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Maximum time to search
    pub timeout: Option<Duration>,
    /// Maximum number of tentative assignments
    pub max_steps: Option<usize>,
}

/// How a solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A complete consistent assignment was found
    Solved,
    /// No assignment exists
    Unsatisfiable,
    /// The budget ran out before the search finished
    Interrupted,
}

/// Result of a bounded solve
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    /// Whether every branch was explored (or propagation proved failure)
    pub search_exhausted: bool,
    /// Tentative assignments made
    pub steps: usize,
    /// Tentative assignments undone
    pub backtracks: usize,
    /// Words removed by node consistency
    pub node_pruned: usize,
    /// Words removed by arc consistency
    pub arc_pruned: usize,
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }
}

/// A solving session owning the domains of one crossword
#[derive(Debug, Clone)]
pub struct CrosswordCreator<'a> {
    crossword: &'a Crossword,
    domains: Domains,
}

impl<'a> CrosswordCreator<'a> {
    pub fn new(crossword: &'a Crossword, vocabulary: &BTreeSet<String>) -> Self {
        Self {
            crossword,
            domains: Domains::new(crossword, vocabulary),
        }
    }

    pub fn crossword(&self) -> &Crossword {
        self.crossword
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Enforce node and arc consistency, then search without a budget
    pub fn solve(&mut self) -> Option<Assignment> {
        self.solve_with_config(&SolverConfig::default()).assignment
    }

    pub fn solve_with_config(&mut self, config: &SolverConfig) -> SolverResult {
        let start_time = Instant::now();
        info!(
            "solving {}x{} crossword with {} variables",
            self.crossword.width(),
            self.crossword.height(),
            self.crossword.variables().len()
        );

        let node_pruned = self.enforce_node_consistency();
        let before_arcs = self.domains.total_size();
        let propagated = !self.has_empty_domain() && self.ac3(None);
        let arc_pruned = before_arcs - self.domains.total_size();

        let mut result = SolverResult {
            status: SolveStatus::Unsatisfiable,
            assignment: None,
            search_exhausted: true,
            steps: 0,
            backtracks: 0,
            node_pruned,
            arc_pruned,
            time_elapsed_ms: 0,
        };

        if !propagated {
            info!("propagation left an empty domain; no solution");
            result.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
            return result;
        }

        let mut search = Search::new(self, config, start_time);
        let mut assignment = Assignment::new();
        let outcome = search.backtrack(&mut assignment);

        result.steps = search.steps;
        result.backtracks = search.backtracks;
        match outcome {
            SearchOutcome::Found => {
                result.status = SolveStatus::Solved;
                result.search_exhausted = false;
                result.assignment = Some(assignment);
            }
            SearchOutcome::Exhausted => {}
            SearchOutcome::Interrupted => {
                result.status = SolveStatus::Interrupted;
                result.search_exhausted = false;
            }
        }
        result.time_elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "search finished: {:?} after {} steps ({} backtracks) in {}ms",
            result.status, result.steps, result.backtracks, result.time_elapsed_ms
        );
        result
    }

    /// Drop words whose length does not fit their variable; returns words removed
    pub fn enforce_node_consistency(&mut self) -> usize {
        consistency::enforce_node_consistency(self.crossword, &mut self.domains)
    }

    /// Make `x` arc consistent with `y`; returns whether `x`'s domain shrank
    pub fn revise(&mut self, x: &Variable, y: &Variable) -> bool {
        consistency::revise(self.crossword, &mut self.domains, x, y)
    }

    /// Run AC-3 from `arcs` (all arcs if `None`); false if a domain emptied
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> bool {
        consistency::ac3(self.crossword, &mut self.domains, arcs)
    }

    fn has_empty_domain(&self) -> bool {
        self.crossword
            .variables()
            .iter()
            .any(|var| self.domains.is_empty(var))
    }

    /// Check that words are distinct, fit their slots and agree with assigned neighbors
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for (var, word) in assignment.iter() {
            if !seen.insert(word) {
                return false;
            }
            if letter_count(word) != var.length {
                return false;
            }

            for neighbor in self.crossword.neighbors(var) {
                let Some(other) = assignment.word(neighbor) else {
                    continue;
                };
                let Some((i, j)) = self.crossword.overlap(var, neighbor) else {
                    continue;
                };
                if letter_at(word, i) != letter_at(other, j) {
                    return false;
                }
            }
        }

        true
    }

    /// Words of `var` ordered by how many neighbor values they rule out.
    ///
    /// Only unassigned neighbors are counted. Ties keep domain order.
    pub fn order_domain_values(&self, var: &Variable, assignment: &Assignment) -> Vec<&str> {
        // Per neighbor: overlap index into `var`, letter histogram at the
        // neighbor's side of the overlap, and its domain size.
        let mut profiles: Vec<(usize, FxHashMap<char, usize>, usize)> = Vec::new();
        for neighbor in self.crossword.neighbors(var) {
            if assignment.contains(neighbor) {
                continue;
            }
            let Some((i, j)) = self.crossword.overlap(var, neighbor) else {
                continue;
            };
            let domain = self.domains.get(neighbor);
            let mut letters: FxHashMap<char, usize> = FxHashMap::default();
            for word in domain {
                if let Some(c) = letter_at(word, j) {
                    *letters.entry(c).or_insert(0) += 1;
                }
            }
            profiles.push((i, letters, domain.len()));
        }

        let mut values: Vec<(usize, &str)> = self
            .domains
            .get(var)
            .iter()
            .map(|word| {
                let ruled_out = profiles
                    .iter()
                    .map(|(i, letters, total)| {
                        let kept = letter_at(word, *i)
                            .and_then(|c| letters.get(&c))
                            .copied()
                            .unwrap_or(0);
                        total - kept
                    })
                    .sum();
                (ruled_out, word.as_str())
            })
            .collect();

        values.sort_by_key(|(ruled_out, _)| *ruled_out);
        values.into_iter().map(|(_, word)| word).collect()
    }

    /// Pick the next variable: fewest remaining values, then most neighbors.
    ///
    /// Remaining ties go to the variable that comes first in grid order.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<Variable> {
        let mut best: Option<(Variable, usize, usize)> = None;

        for var in self.crossword.variables() {
            if assignment.contains(var) {
                continue;
            }
            let remaining = self.domains.len(var);
            let degree = self.crossword.neighbors(var).len();

            let better = match best {
                None => true,
                Some((_, best_remaining, best_degree)) => {
                    remaining < best_remaining
                        || (remaining == best_remaining && degree > best_degree)
                }
            };
            if better {
                best = Some((*var, remaining, degree));
            }
        }

        best.map(|(var, _, _)| var)
    }

    /// Extend `assignment` to a complete one, or `None` if impossible
    pub fn backtrack(&self, mut assignment: Assignment) -> Option<Assignment> {
        let config = SolverConfig::default();
        let mut search = Search::new(self, &config, Instant::now());
        match search.backtrack(&mut assignment) {
            SearchOutcome::Found => Some(assignment),
            SearchOutcome::Exhausted | SearchOutcome::Interrupted => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Found,
    Exhausted,
    Interrupted,
}

/// Depth-first search state for one solve
struct Search<'s, 'a> {
    creator: &'s CrosswordCreator<'a>,
    deadline: Option<Instant>,
    max_steps: Option<usize>,
    steps: usize,
    backtracks: usize,
}

impl<'s, 'a> Search<'s, 'a> {
    fn new(creator: &'s CrosswordCreator<'a>, config: &SolverConfig, start_time: Instant) -> Self {
        Self {
            creator,
            // A deadline past what `Instant` can represent means no deadline
            deadline: config
                .timeout
                .and_then(|timeout| start_time.checked_add(timeout)),
            max_steps: config.max_steps,
            steps: 0,
            backtracks: 0,
        }
    }

    fn out_of_budget(&self) -> bool {
        if self.max_steps.is_some_and(|max| self.steps >= max) {
            return true;
        }
        self.deadline.is_some_and(|deadline| Instant::now() > deadline)
    }

    /// Every tentative entry is removed again unless the outcome is `Found`
    fn backtrack(&mut self, assignment: &mut Assignment) -> SearchOutcome {
        let creator = self.creator;
        let Some(var) = creator.select_unassigned_variable(assignment) else {
            return SearchOutcome::Found;
        };

        for value in creator.order_domain_values(&var, assignment) {
            if self.out_of_budget() {
                debug!("search budget exhausted after {} steps", self.steps);
                return SearchOutcome::Interrupted;
            }
            self.steps += 1;
            trace!("try {} = {}", var, value);

            assignment.insert(var, value);
            if creator.consistent(assignment) {
                match self.backtrack(assignment) {
                    SearchOutcome::Found => return SearchOutcome::Found,
                    SearchOutcome::Interrupted => {
                        assignment.remove(&var);
                        return SearchOutcome::Interrupted;
                    }
                    SearchOutcome::Exhausted => {}
                }
            }
            assignment.remove(&var);
            self.backtracks += 1;
        }

        SearchOutcome::Exhausted
    }
}
