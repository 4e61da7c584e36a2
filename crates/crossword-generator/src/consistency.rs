//! Domain pruning: node consistency and AC-3 arc consistency.
//!
//! These rules remove words that can never be part of a solution, so the
//! backtracking search starts from smaller domains. Pruning is sound: a
//! word is only removed when no complete solution could use it.

use std::collections::VecDeque;

use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::domain::Domains;
use crate::puzzle::{Crossword, Variable};
use crate::words::{letter_at, letter_count};

/// An ordered pair of crossing variables whose consistency is checked `x` against `y`
pub type Arc = (Variable, Variable);

/// Remove every word whose length differs from its variable's length
pub fn enforce_node_consistency(crossword: &Crossword, domains: &mut Domains) -> usize {
    let mut removed = 0;
    for var in crossword.variables() {
        removed += domains.retain(var, |word| letter_count(word) == var.length);
    }
    debug!("node consistency removed {} words", removed);
    removed
}

/// Make `x` arc consistent with `y`.
///
/// Removes every word of `x` that has no word in `y` agreeing with it at
/// the overlap. Returns whether the domain of `x` changed; variables that
/// do not cross are never revised.
pub fn revise(crossword: &Crossword, domains: &mut Domains, x: &Variable, y: &Variable) -> bool {
    let Some((i, j)) = crossword.overlap(x, y) else {
        return false;
    };

    let supported: FxHashSet<char> = domains
        .get(y)
        .iter()
        .filter_map(|word| letter_at(word, j))
        .collect();

    let removed =
        domains.retain(x, |word| letter_at(word, i).is_some_and(|c| supported.contains(&c)));
    if removed > 0 {
        trace!("revise {} against {}: removed {}", x, y, removed);
    }
    removed > 0
}

/// Every ordered pair of neighboring variables
pub fn all_arcs(crossword: &Crossword) -> Vec<Arc> {
    crossword
        .variables()
        .iter()
        .flat_map(|x| crossword.neighbors(x).iter().map(move |y| (*x, *y)))
        .collect()
}

/// Enforce arc consistency with the AC-3 worklist algorithm.
///
/// Starts from `arcs`, or from every arc of the crossword when `None`.
/// Returns false as soon as a domain becomes empty, true once the
/// worklist is exhausted.
pub fn ac3(crossword: &Crossword, domains: &mut Domains, arcs: Option<Vec<Arc>>) -> bool {
    let mut queue: VecDeque<Arc> = arcs.unwrap_or_else(|| all_arcs(crossword)).into();
    let mut revisions = 0usize;

    while let Some((x, y)) = queue.pop_front() {
        if !revise(crossword, domains, &x, &y) {
            continue;
        }
        revisions += 1;

        if domains.is_empty(&x) {
            debug!("ac3: domain of {} is empty after {} revisions", x, revisions);
            return false;
        }

        for z in crossword.neighbors(&x) {
            if *z != y {
                queue.push_back((*z, x));
            }
        }
    }

    debug!("ac3: reached fixed point after {} revisions", revisions);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::parse_words;

    /// Two 3-letter slots sharing their first letter
    fn corner() -> Crossword {
        Crossword::parse("___\n_##\n_##").unwrap()
    }

    /// Two 3-letter slots crossing in the middle
    fn plus() -> Crossword {
        Crossword::parse("#_#\n___\n#_#").unwrap()
    }

    #[test]
    fn test_node_consistency_keeps_matching_lengths() {
        let crossword = Crossword::parse("____\n_###\n_###").unwrap();
        let vocabulary = parse_words("CAT\nDOGS\nEMU\nHORSE\nBEAR");
        let mut domains = Domains::new(&crossword, &vocabulary);

        enforce_node_consistency(&crossword, &mut domains);

        for var in crossword.variables() {
            assert!(domains.get(var).iter().all(|w| letter_count(w) == var.length));
            let expected = vocabulary
                .iter()
                .filter(|w| letter_count(w) == var.length)
                .count();
            assert_eq!(domains.len(var), expected);
        }
    }

    #[test]
    fn test_revise_removes_unsupported() {
        let crossword = plus();
        let down = crossword.variables()[0];
        let across = crossword.variables()[1];
        let mut domains = Domains::new(&crossword, &parse_words("CAT\nDOG\nBAT"));
        domains.retain(&across, |w| w == "DOG");

        assert!(revise(&crossword, &mut domains, &down, &across));
        assert_eq!(domains.len(&down), 1);
        assert!(domains.get(&down).contains("DOG"));
    }

    #[test]
    fn test_revise_judges_each_word() {
        // An early supported word must not shield later unsupported ones.
        let crossword = corner();
        let down = crossword.variables()[0];
        let across = crossword.variables()[1];
        let mut domains = Domains::new(&crossword, &parse_words("ANT\nCAT\nCAR"));
        domains.retain(&across, |w| w == "ANT");

        assert!(revise(&crossword, &mut domains, &down, &across));
        assert_eq!(
            domains.get(&down).iter().collect::<Vec<_>>(),
            vec!["ANT"]
        );
    }

    #[test]
    fn test_revise_idempotent() {
        let crossword = plus();
        let down = crossword.variables()[0];
        let across = crossword.variables()[1];
        let mut domains = Domains::new(&crossword, &parse_words("CAT\nDOG\nBOA\nEMU"));
        domains.retain(&across, |w| w != "CAT");

        assert!(revise(&crossword, &mut domains, &down, &across));
        assert!(!revise(&crossword, &mut domains, &down, &across));
    }

    #[test]
    fn test_revise_without_overlap() {
        let crossword = Crossword::parse("___\n###\n___").unwrap();
        let top = crossword.variables()[0];
        let bottom = crossword.variables()[1];
        let mut domains = Domains::new(&crossword, &parse_words("CAT"));
        domains.retain(&bottom, |_| false);

        assert!(!revise(&crossword, &mut domains, &top, &bottom));
        assert_eq!(domains.len(&top), 1);
    }

    #[test]
    fn test_ac3_empty_domain_fails() {
        let crossword = plus();
        let mut domains = Domains::new(&crossword, &parse_words("CAT\nDOG"));
        enforce_node_consistency(&crossword, &mut domains);

        // Each word supports itself at the middle letter.
        assert!(ac3(&crossword, &mut domains, None));

        let mut domains = Domains::new(&crossword, &parse_words("CAT\nDOG"));
        let down = crossword.variables()[0];
        domains.retain(&down, |w| w == "CAT");
        let across = crossword.variables()[1];
        domains.retain(&across, |w| w == "DOG");
        assert!(!ac3(&crossword, &mut domains, None));
    }

    #[test]
    fn test_ac3_arc_consistent_result() {
        let crossword = Crossword::parse("___\n_#_\n___").unwrap();
        let vocabulary = parse_words("CAT\nCOP\nTEN\nPIN\nDOG\nAXE\nZOO");
        let mut domains = Domains::new(&crossword, &vocabulary);
        enforce_node_consistency(&crossword, &mut domains);

        assert!(ac3(&crossword, &mut domains, None));

        for (x, y) in all_arcs(&crossword) {
            let (i, j) = crossword.overlap(&x, &y).unwrap();
            for wx in domains.get(&x) {
                assert!(domains
                    .get(&y)
                    .iter()
                    .any(|wy| letter_at(wx, i) == letter_at(wy, j)));
            }
        }
    }

    #[test]
    fn test_ac3_with_explicit_arcs() {
        let crossword = corner();
        let down = crossword.variables()[0];
        let across = crossword.variables()[1];
        let mut domains = Domains::new(&crossword, &parse_words("CAT\nCAR\nDOG"));
        domains.retain(&across, |w| w.starts_with('C'));

        assert!(ac3(&crossword, &mut domains, Some(vec![(down, across)])));
        assert!(!domains.get(&down).contains("DOG"));
        assert_eq!(domains.len(&across), 2);
    }
}
