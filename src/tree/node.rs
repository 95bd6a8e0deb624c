//! Arena handle for tree nodes
//!
//! A [`NodeId`] is the position of a region in the tree's construction
//! order, tagged with the tree that issued it. Handles are only meaningful
//! for that tree and its clones.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Fresh tag for a newly constructed tree
pub(crate) fn next_owner() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// Index of a node in a [`Tree`](super::Tree) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) owner: u64,
}

impl NodeId {
    pub(crate) fn new(index: usize, owner: u64) -> Self {
        Self { index, owner }
    }

    /// Zero-based construction index
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}
