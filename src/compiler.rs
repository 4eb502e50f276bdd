use std::collections::BTreeSet;
use std::fmt;

use crate::{
    nfa::Automaton,
    parser::{Postfix, Token},
    state::{StateAllocator, StateId, Transition},
};

/// An error that indicates a bug rather than a bad pattern.
///
/// These are only produced when a postfix sequence that did not come from
/// [`parse`](crate::parse) is evaluated, or when the identifier space is
/// exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InternalError {
    /// An operator found fewer operands on the stack than it needs.
    StackUnderflow {
        /// The offending token.
        token: Token,
        /// Its index in the postfix sequence.
        index: usize,
    },
    /// More than one automaton remained once the sequence was consumed.
    LeftoverOperands {
        count: usize,
    },
    /// There was nothing to evaluate.
    EmptyPostfix,
    /// Every state identifier has been handed out.
    StateIdsExhausted,
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalError::StackUnderflow { token, index } => write!(
                f,
                "operator '{}' at postfix index {} has too few operands",
                token, index
            ),
            InternalError::LeftoverOperands { count } => write!(
                f,
                "{} automata left on the stack after evaluation",
                count
            ),
            InternalError::EmptyPostfix => write!(f, "empty postfix sequence"),
            InternalError::StateIdsExhausted => {
                write!(f, "ran out of state identifiers")
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// Builds automata with Thompson's construction.
///
/// Every automaton produced by the same compiler draws its states from one
/// [`StateAllocator`], so they can be freely combined with
/// [`concatenate`](Compiler::concatenate), [`union`](Compiler::union) and
/// [`star`](Compiler::star). Combining automata from two different
/// compilers is a logic error.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    states: StateAllocator,
}

impl Compiler {
    /// Create a new compiler with a fresh identifier space.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of states allocated by this compiler so far.
    pub fn states_allocated(&self) -> usize {
        self.states.allocated()
    }

    fn fresh(&mut self) -> Result<StateId, InternalError> {
        self.states.allocate().ok_or(InternalError::StateIdsExhausted)
    }

    /// Evaluate a postfix sequence.
    ///
    /// Operands are kept on a stack. For binary operators the operand popped
    /// second is the left one.
    pub fn build(&mut self, postfix: &Postfix) -> Result<Automaton, InternalError> {
        if postfix.is_empty() {
            return Err(InternalError::EmptyPostfix);
        }
        let mut stack: Vec<Automaton> = Vec::with_capacity(postfix.len());
        for (index, &token) in postfix.tokens().iter().enumerate() {
            if stack.len() < token.arity() {
                return Err(InternalError::StackUnderflow { token, index });
            }
            let nfa = match token {
                Token::Literal(c) => self.symbol(c)?,
                Token::Epsilon => self.epsilon()?,
                Token::Star => {
                    let a = pop(&mut stack, token, index)?;
                    self.star(a)?
                }
                Token::Concat | Token::Union => {
                    let b = pop(&mut stack, token, index)?;
                    let a = pop(&mut stack, token, index)?;
                    if token == Token::Concat {
                        self.concatenate(a, b)
                    } else {
                        self.union(a, b)?
                    }
                }
            };
            trace!(
                "postfix[{}] = '{}' -> {} states, {} transitions",
                index,
                token,
                nfa.states().len(),
                nfa.transitions().len(),
            );
            stack.push(nfa);
        }
        match (stack.pop(), stack.len()) {
            (Some(nfa), 0) => {
                debug_assert!(
                    nfa.is_well_formed(),
                    "malformed automaton:\n{}",
                    nfa
                );
                Ok(nfa)
            }
            (top, rest) => Err(InternalError::LeftoverOperands {
                count: rest + usize::from(top.is_some()),
            }),
        }
    }

    /// An automaton accepting only the empty string.
    ///
    /// It has a single state that is both initial and accepting.
    pub fn epsilon(&mut self) -> Result<Automaton, InternalError> {
        let q = self.fresh()?;
        let states = BTreeSet::from([q]);
        Ok(Automaton::from_parts(q, states.clone(), states, BTreeSet::new()))
    }

    /// An automaton accepting exactly the one-character string `ch`.
    pub fn symbol(&mut self, ch: char) -> Result<Automaton, InternalError> {
        let start = self.fresh()?;
        let end = self.fresh()?;
        Ok(Automaton::from_parts(
            start,
            BTreeSet::from([start, end]),
            BTreeSet::from([end]),
            BTreeSet::from([Transition::symbol(start, end, ch)]),
        ))
    }

    /// An automaton for `a` followed by `b`.
    ///
    /// No states are added. Every accepting state of `a` gets an epsilon
    /// edge to the initial state of `b`, and only the accepting states of
    /// `b` remain accepting.
    pub fn concatenate(&mut self, a: Automaton, b: Automaton) -> Automaton {
        debug_assert!(distinct(&a, &b));
        let (a_initial, a_states, a_accepting, a_transitions) = a.into_parts();
        let (b_initial, b_states, b_accepting, b_transitions) = b.into_parts();
        let states = merge(a_states, b_states);
        let mut transitions = merge(a_transitions, b_transitions);
        transitions.extend(
            a_accepting.iter().map(|&q| Transition::epsilon(q, b_initial)),
        );
        Automaton::from_parts(a_initial, states, b_accepting, transitions)
    }

    /// An automaton for `a` or `b`.
    ///
    /// A new initial state gets epsilon edges to both initial states. The
    /// accepting states are those of both operands.
    pub fn union(
        &mut self,
        a: Automaton,
        b: Automaton,
    ) -> Result<Automaton, InternalError> {
        debug_assert!(distinct(&a, &b));
        let start = self.fresh()?;
        let (a_initial, a_states, a_accepting, a_transitions) = a.into_parts();
        let (b_initial, b_states, b_accepting, b_transitions) = b.into_parts();
        let mut states = merge(a_states, b_states);
        states.insert(start);
        let accepting = merge(a_accepting, b_accepting);
        let mut transitions = merge(a_transitions, b_transitions);
        transitions.insert(Transition::epsilon(start, a_initial));
        transitions.insert(Transition::epsilon(start, b_initial));
        Ok(Automaton::from_parts(start, states, accepting, transitions))
    }

    /// An automaton for zero or more repetitions of `a`.
    ///
    /// A new initial state, which is also accepting, gets an epsilon edge to
    /// the old initial state, and every accepting state of `a` loops back to
    /// the old initial state.
    pub fn star(&mut self, a: Automaton) -> Result<Automaton, InternalError> {
        let start = self.fresh()?;
        let (a_initial, mut states, mut accepting, mut transitions) =
            a.into_parts();
        transitions.extend(
            accepting.iter().map(|&q| Transition::epsilon(q, a_initial)),
        );
        transitions.insert(Transition::epsilon(start, a_initial));
        states.insert(start);
        accepting.insert(start);
        Ok(Automaton::from_parts(start, states, accepting, transitions))
    }
}

/// The union of two sets, built by inserting the smaller into the larger.
///
/// Operands of a right-nested pattern grow on the right, so always
/// extending the left one would copy the whole automaton at every step.
fn merge<T: Ord>(a: BTreeSet<T>, b: BTreeSet<T>) -> BTreeSet<T> {
    let (mut big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    big.extend(small);
    big
}

/// Neither operand contains the other's initial state. Automata from the
/// same compiler never share states, so this only fails when one automaton
/// is combined with a copy of itself or with one from another compiler.
fn distinct(a: &Automaton, b: &Automaton) -> bool {
    !a.states().contains(&b.initial()) && !b.states().contains(&a.initial())
}

fn pop(
    stack: &mut Vec<Automaton>,
    token: Token,
    index: usize,
) -> Result<Automaton, InternalError> {
    stack.pop().ok_or(InternalError::StackUnderflow { token, index })
}
