/*!
A set of dense state ids with constant time insertion, membership and
clearing.

See: https://research.swtch.com/sparse

The simulator keeps its active states in these. Insertion order is kept,
which makes the set double as the work queue of a breadth-first traversal.
*/

#[derive(Clone, Debug)]
pub(crate) struct SparseSet {
    len: usize,
    /// Members in insertion order.
    dense: Vec<usize>,
    /// Maps a member to its position in `dense`. Only meaningful for
    /// members.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Create a set for ids in `0..capacity`.
    pub(crate) fn new(capacity: usize) -> Self {
        SparseSet { len: 0, dense: vec![0; capacity], sparse: vec![0; capacity] }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `id`, returning false if it was already present.
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub(crate) fn insert(&mut self, id: usize) -> bool {
        if self.contains(id) {
            return false;
        }
        self.dense[self.len] = id;
        self.sparse[id] = self.len;
        self.len += 1;
        true
    }

    #[inline]
    pub(crate) fn contains(&self, id: usize) -> bool {
        let i = self.sparse[id];
        i < self.len && self.dense[i] == id
    }

    /// The member inserted `i`-th.
    #[inline]
    pub(crate) fn get(&self, i: usize) -> usize {
        self.dense[..self.len][i]
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dense[..self.len].iter().copied()
    }
}
