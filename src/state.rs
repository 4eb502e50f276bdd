use std::fmt;

/// The character used to write the epsilon literal in patterns and dumps.
pub const EPSILON: char = '\u{03B5}';

/// A state identifier in an automaton.
///
/// Identifiers carry no meaning beyond identity. They are handed out by a
/// [`StateAllocator`] and are never reused by the allocator that produced
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Create a state identifier from its raw value.
    pub const fn new(id: u32) -> Self {
        StateId(id)
    }

    /// The raw value of this identifier.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The raw value of this identifier as a `usize`.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The label on a transition.
///
/// Epsilon is its own variant rather than a reserved character, so there is
/// no input character that can ever be matched against an epsilon edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Consumes exactly this character.
    Symbol(char),
    /// Consumes nothing.
    Epsilon,
}

impl Label {
    /// Returns true if this label matches the given input character.
    #[inline]
    pub fn matches(self, ch: char) -> bool {
        match self {
            Label::Symbol(c) => c == ch,
            Label::Epsilon => false,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Label::Symbol(c) => write!(f, "{:?}", c),
            Label::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

/// An edge between two states.
///
/// Two transitions with the same source, destination and label are equal,
/// so storing transitions in a set collapses duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub source: StateId,
    pub destination: StateId,
    pub label: Label,
}

impl Transition {
    /// Create a transition that consumes `ch`.
    pub fn symbol(source: StateId, destination: StateId, ch: char) -> Self {
        Transition { source, destination, label: Label::Symbol(ch) }
    }

    /// Create an epsilon transition.
    pub fn epsilon(source: StateId, destination: StateId) -> Self {
        Transition { source, destination, label: Label::Epsilon }
    }

    /// Returns true if this transition consumes no input.
    pub fn is_epsilon(&self) -> bool {
        self.label == Label::Epsilon
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.destination, self.label)
    }
}

/// Hands out fresh state identifiers.
///
/// Every automaton composed together must draw its states from the same
/// allocator, otherwise identifiers may collide.
#[derive(Clone, Debug, Default)]
pub struct StateAllocator {
    next: u32,
}

impl StateAllocator {
    /// Create an allocator whose first identifier is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new identifier, or `None` once the identifier space is
    /// exhausted.
    pub fn allocate(&mut self) -> Option<StateId> {
        let id = self.next;
        self.next = self.next.checked_add(1)?;
        Some(StateId(id))
    }

    /// The number of identifiers handed out so far.
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}
