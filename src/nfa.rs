use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use crate::state::{Label, StateId, Transition};

/// A nondeterministic finite automaton with epsilon transitions.
///
/// An automaton is built in one go by a [`Compiler`](crate::Compiler) and is
/// never modified afterwards, so it can be shared freely between threads.
/// All sets are ordered, which makes iteration (and [`describe`]) fully
/// deterministic.
///
/// [`describe`]: Automaton::describe
#[derive(Clone)]
pub struct Automaton {
    initial: StateId,
    states: BTreeSet<StateId>,
    accepting: BTreeSet<StateId>,
    transitions: BTreeSet<Transition>,
    /// Built on first use by the simulator.
    index: OnceLock<Index>,
}

impl Automaton {
    /// Assemble an automaton from its parts.
    ///
    /// Callers are responsible for upholding the structural invariants; see
    /// [`Automaton::is_well_formed`].
    pub(crate) fn from_parts(
        initial: StateId,
        states: BTreeSet<StateId>,
        accepting: BTreeSet<StateId>,
        transitions: BTreeSet<Transition>,
    ) -> Self {
        let nfa = Automaton {
            initial,
            states,
            accepting,
            transitions,
            index: OnceLock::new(),
        };
        // The full check is linear, so it runs once per build instead.
        debug_assert!(nfa.states.contains(&nfa.initial));
        nfa
    }

    /// Take the automaton apart, keeping its sets.
    pub(crate) fn into_parts(
        self,
    ) -> (StateId, BTreeSet<StateId>, BTreeSet<StateId>, BTreeSet<Transition>)
    {
        (self.initial, self.states, self.accepting, self.transitions)
    }

    /// The single start state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Every state of the automaton.
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    /// The accepting states.
    pub fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    /// Every transition of the automaton.
    pub fn transitions(&self) -> &BTreeSet<Transition> {
        &self.transitions
    }

    /// Returns true if `id` is an accepting state.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    /// Check the structural invariants: the initial state, every accepting
    /// state and both ends of every transition belong to [`states`].
    ///
    /// Automata built by this crate always satisfy this.
    ///
    /// [`states`]: Automaton::states
    pub fn is_well_formed(&self) -> bool {
        self.states.contains(&self.initial)
            && self.accepting.is_subset(&self.states)
            && self.transitions.iter().all(|t| {
                self.states.contains(&t.source)
                    && self.states.contains(&t.destination)
            })
    }

    /// A human readable dump of the automaton.
    ///
    /// The output lists the initial state, the accepting states, all states
    /// and then one transition per line. It is identical for identical
    /// automata.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// The simulation index, building it if needed.
    pub(crate) fn index(&self) -> &Index {
        self.index.get_or_init(|| Index::new(self))
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "initial state: {}", self.initial)?;
        writeln!(f, "accepting states: {}", DisplaySet(&self.accepting))?;
        writeln!(f, "all states: {}", DisplaySet(&self.states))?;
        writeln!(f, "transitions:")?;
        for t in &self.transitions {
            writeln!(f, "  {}", t)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("initial", &self.initial)
            .field("states", &self.states)
            .field("accepting", &self.accepting)
            .field("transitions", &self.transitions)
            .finish()
    }
}

struct DisplaySet<'a>(&'a BTreeSet<StateId>);

impl<'a> fmt::Display for DisplaySet<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}

/// A dense view of an automaton used during simulation.
///
/// State identifiers are renumbered to `0..len` in ascending order so that
/// sets of states can be represented with sparse sets, and transitions are
/// grouped by source state.
#[derive(Clone, Debug)]
pub(crate) struct Index {
    /// Original identifiers, sorted. Position in this vector is the dense id.
    ids: Vec<StateId>,
    pub(crate) initial: usize,
    pub(crate) accepting: Vec<bool>,
    pub(crate) epsilons: Vec<Vec<usize>>,
    pub(crate) symbols: Vec<Vec<(char, usize)>>,
}

impl Index {
    fn new(nfa: &Automaton) -> Self {
        let ids: Vec<StateId> = nfa.states.iter().copied().collect();
        let len = ids.len();
        let dense = |id: StateId| {
            ids.binary_search(&id).expect("transition endpoint is a state")
        };
        let mut accepting = vec![false; len];
        for &id in &nfa.accepting {
            accepting[dense(id)] = true;
        }
        let mut epsilons = vec![vec![]; len];
        let mut symbols = vec![vec![]; len];
        // Transitions are a set, so no adjacency list has duplicates.
        for t in &nfa.transitions {
            let (src, dst) = (dense(t.source), dense(t.destination));
            match t.label {
                Label::Epsilon => epsilons[src].push(dst),
                Label::Symbol(c) => symbols[src].push((c, dst)),
            }
        }
        let initial = dense(nfa.initial);
        trace!(
            "built simulation index: {} states, {} transitions",
            len,
            nfa.transitions.len(),
        );
        Index { ids, initial, accepting, epsilons, symbols }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    /// The dense id of `id`, or `None` if it is not a state of the automaton.
    pub(crate) fn dense(&self, id: StateId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The original identifier of a dense id.
    pub(crate) fn id(&self, dense: usize) -> StateId {
        self.ids[dense]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> BTreeSet<StateId> {
        ids.iter().copied().map(StateId::new).collect()
    }

    fn sample() -> Automaton {
        let (s0, s1, s2) = (StateId::new(0), StateId::new(1), StateId::new(2));
        let transitions = [
            Transition::symbol(s0, s1, 'a'),
            Transition::epsilon(s2, s0),
        ]
        .into_iter()
        .collect();
        Automaton::from_parts(s2, set(&[0, 1, 2]), set(&[1]), transitions)
    }

    #[test]
    fn describe_lists_everything_in_order() {
        let got = sample().describe();
        let expected = "\
initial state: 2
accepting states: {1}
all states: {0, 1, 2}
transitions:
  (0, 1, 'a')
  (2, 0, ε)
";
        assert_eq!(got, expected);
    }

    #[test]
    fn well_formed() {
        assert!(sample().is_well_formed());
        let bad = Automaton {
            initial: StateId::new(7),
            states: set(&[0]),
            accepting: set(&[]),
            transitions: BTreeSet::new(),
            index: OnceLock::new(),
        };
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn index_is_dense() {
        let nfa = sample();
        let index = nfa.index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.initial, 2);
        assert_eq!(index.accepting, vec![false, true, false]);
        assert_eq!(index.symbols[0], vec![('a', 1)]);
        assert_eq!(index.epsilons[2], vec![0]);
        assert_eq!(index.dense(StateId::new(9)), None);
        assert_eq!(index.id(1), StateId::new(1));
    }

    #[test]
    fn automaton_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Automaton>();
    }
}
