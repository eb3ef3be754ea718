//! Node identity.
//!
//! Every node receives a [`NodeId`] exactly once, when it is inserted into a
//! [`SceneGraph`](crate::scene::SceneGraph). Ids come from an [`IdGenerator`]
//! owned by the graph rather than a process-wide counter, so two graphs built
//! in isolation (e.g. in tests) produce the same id sequence.

use std::fmt;

/// Unique, monotonic node identifier. Never reused within one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Placeholder carried by nodes that have not been inserted into a graph yet.
    pub const UNASSIGNED: NodeId = NodeId(0);

    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic sequence of [`NodeId`]s.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Creates a generator whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Creates a generator whose first id is `first` (clamped to at least `1`,
    /// since `0` is reserved for [`NodeId::UNASSIGNED`]).
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next: first.max(1) }
    }

    /// Hands out the next id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub fn peek(&self) -> NodeId {
        NodeId(self.next)
    }
}
