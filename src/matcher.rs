use std::collections::BTreeSet;
use std::mem;

use crate::{
    nfa::{Automaton, Index},
    sparse_set::SparseSet,
    state::StateId,
};

/// Runs an [`Automaton`] against input.
///
/// Both algorithms track the set of active states and never backtrack, so a
/// run over `n` characters takes `O(n * states)` time. A matcher owns its
/// scratch space; holding on to one while testing many inputs against the
/// same automaton avoids reallocating it.
#[derive(Clone, Debug)]
pub struct Matcher<'a> {
    index: &'a Index,
    current: SparseSet,
    next: SparseSet,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given automaton.
    pub fn new(nfa: &'a Automaton) -> Self {
        let index = nfa.index();
        Matcher {
            index,
            current: SparseSet::new(index.len()),
            next: SparseSet::new(index.len()),
        }
    }

    /// Returns true if the automaton accepts all of `text`.
    pub fn accepts(&mut self, text: &str) -> bool {
        self.current.clear();
        self.current.insert(self.index.initial);
        close(self.index, &mut self.current);
        for ch in text.chars() {
            if self.current.is_empty() {
                return false;
            }
            self.next.clear();
            step(self.index, &self.current, &mut self.next, ch);
            close(self.index, &mut self.next);
            mem::swap(&mut self.current, &mut self.next);
        }
        self.is_accepting()
    }

    /// Returns true if the automaton accepts some substring of `line`,
    /// including the empty substring at any position.
    ///
    /// This is equivalent to starting a fresh run at every position and
    /// running them all at once: the initial state is added back to the
    /// active set before each character, and runs that reach the same
    /// state merge.
    pub fn finds_match_in(&mut self, line: &str) -> bool {
        self.current.clear();
        let mut chars = line.chars();
        loop {
            self.current.insert(self.index.initial);
            close(self.index, &mut self.current);
            if self.is_accepting() {
                return true;
            }
            let ch = match chars.next() {
                Some(ch) => ch,
                None => return false,
            };
            // The closure of the destinations is taken at the top of the
            // next iteration, together with the re-added initial state.
            self.next.clear();
            step(self.index, &self.current, &mut self.next, ch);
            mem::swap(&mut self.current, &mut self.next);
        }
    }

    /// Returns true if any active state is accepting.
    fn is_accepting(&self) -> bool {
        self.current.iter().any(|q| self.index.accepting[q])
    }
}

/// Extend `set` with every state reachable from it over epsilon edges.
///
/// The set doubles as the queue, so each state is visited once, in
/// breadth-first order.
fn close(index: &Index, set: &mut SparseSet) {
    let mut i = 0;
    while i < set.len() {
        let q = set.get(i);
        for &r in &index.epsilons[q] {
            set.insert(r);
        }
        i += 1;
    }
}

/// Add to `next` every state reachable from `current` by consuming `ch`.
fn step(index: &Index, current: &SparseSet, next: &mut SparseSet, ch: char) {
    for q in current.iter() {
        for &(c, r) in &index.symbols[q] {
            if c == ch {
                next.insert(r);
            }
        }
    }
}

impl Automaton {
    /// The epsilon closure of `states`: every state reachable from one of
    /// them by following zero or more epsilon transitions.
    ///
    /// The given states are always part of the result. Identifiers that are
    /// not states of this automaton are ignored.
    pub fn epsilon_closure<I>(&self, states: I) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = StateId>,
    {
        let index = self.index();
        let mut set = SparseSet::new(index.len());
        for q in states.into_iter().filter_map(|id| index.dense(id)) {
            set.insert(q);
        }
        close(index, &mut set);
        set.iter().map(|q| index.id(q)).collect()
    }

    /// Returns true if this automaton accepts all of `text`.
    ///
    /// # Example
    ///
    /// ```
    /// let nfa = thompson_regex::compile("(a|b)*abb").unwrap();
    /// assert!(nfa.accepts("aababb"));
    /// assert!(!nfa.accepts("abab"));
    /// ```
    pub fn accepts(&self, text: &str) -> bool {
        Matcher::new(self).accepts(text)
    }

    /// Returns true if this automaton accepts some substring of `line`.
    ///
    /// The empty substring counts, so an automaton accepting the empty
    /// string finds a match in every line.
    ///
    /// # Example
    ///
    /// ```
    /// let nfa = thompson_regex::compile("abb").unwrap();
    /// assert!(nfa.finds_match_in("xxabbyy"));
    /// assert!(!nfa.finds_match_in("xxabyy"));
    /// ```
    pub fn finds_match_in(&self, line: &str) -> bool {
        Matcher::new(self).finds_match_in(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    fn nfa(pattern: &str) -> Automaton {
        crate::compile(pattern).unwrap()
    }

    #[test]
    fn closure_includes_start_states() {
        let mut c = Compiler::new();
        let a = c.symbol('a').unwrap();
        let nfa = c.star(a).unwrap();
        // 0 -a-> 1, 1 -ε-> 0, 2 -ε-> 0
        let s = StateId::new;
        assert_eq!(
            nfa.epsilon_closure([s(2)]),
            BTreeSet::from([s(0), s(2)])
        );
        assert_eq!(
            nfa.epsilon_closure([s(1)]),
            BTreeSet::from([s(0), s(1)])
        );
        assert_eq!(nfa.epsilon_closure([s(0)]), BTreeSet::from([s(0)]));
        assert_eq!(nfa.epsilon_closure([s(9)]), BTreeSet::new());
        assert_eq!(nfa.epsilon_closure(Vec::new()), BTreeSet::new());
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let nfa = nfa("(a*)*");
        let all = nfa.epsilon_closure([nfa.initial()]);
        assert!(all.contains(&nfa.initial()));
        assert!(all.iter().any(|&q| nfa.is_accepting(q)));
    }

    #[test]
    fn accepts_whole_input_only() {
        let nfa = nfa("ab");
        assert!(nfa.accepts("ab"));
        assert!(!nfa.accepts("abab"));
        assert!(!nfa.accepts("xab"));
        assert!(!nfa.accepts(""));
    }

    #[test]
    fn dead_run_stays_dead() {
        let nfa = nfa("a*");
        assert!(!nfa.accepts("ba"));
        assert!(!nfa.accepts("aab"));
    }

    #[test]
    fn search_finds_substrings() {
        let nfa = nfa("abb");
        assert!(nfa.finds_match_in("abb"));
        assert!(nfa.finds_match_in("xxabbyy"));
        assert!(nfa.finds_match_in("ababb"));
        assert!(!nfa.finds_match_in("xxabyy"));
        assert!(!nfa.finds_match_in(""));
    }

    #[test]
    fn search_with_overlapping_starts() {
        // The run started at the first 'a' dies on the third one. The run
        // started at the second 'a' succeeds.
        let nfa = nfa("aab");
        assert!(nfa.finds_match_in("aaab"));
        assert!(!nfa.finds_match_in("abab"));
    }

    #[test]
    fn nullable_pattern_matches_everywhere() {
        let nfa = nfa("x*");
        assert!(nfa.finds_match_in(""));
        assert!(nfa.finds_match_in("abc"));
    }

    #[test]
    fn matcher_is_reusable() {
        let nfa = nfa("(a|b)*abb");
        let mut m = Matcher::new(&nfa);
        assert!(m.accepts("abb"));
        assert!(!m.accepts("ab"));
        assert!(m.finds_match_in("zzabbzz"));
        assert!(!m.finds_match_in("zzabzz"));
        assert!(m.accepts("babb"));
    }

    #[test]
    fn unknown_characters_do_not_match() {
        let nfa = nfa("a");
        assert!(!nfa.accepts("☃"));
        assert!(!nfa.finds_match_in("☃☃"));
        assert!(nfa.finds_match_in("☃a☃"));
    }
}
