//! Product of two trees for dimensionally decoupled landscapes
//!
//! For a landscape `z(x, y) = f(x) + g(y)` (or `f(x) * g(y)`) the nested
//! peak regions are pairs of one-dimensional regions. A [`ProductTree`]
//! presents those pairs as a tree without storing any of them: every
//! relation is recomputed from the two component trees on each call.
//!
//! A pair `(a, b)` is a node iff it is "sigma-above": `a` is the left
//! root or its parent outsizes `b`, and symmetrically for `b`. This picks
//! exactly one pair for every distinct product region.
//!
//! Components can themselves be products, so `ProductTree::new(&x, &y)`
//! composes to any dimension.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::tree::{Hierarchy, Indexed};

/// Lazily evaluated tree over pairs of nodes from two trees
#[derive(Debug, Clone, Copy)]
pub struct ProductTree<L, R> {
    left: L,
    right: R,
}

impl<L: Hierarchy, R: Hierarchy> ProductTree<L, R> {
    /// Combine two trees (usually passed by reference)
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    /// Tree of the first dimension
    pub fn left(&self) -> &L {
        &self.left
    }

    /// Tree of the second dimension
    pub fn right(&self) -> &R {
        &self.right
    }

    /// Size comparison of the two components of `node`
    fn balance(&self, (a, b): (L::Node, R::Node)) -> Ordering {
        self.left.size(a).total_cmp(&self.right.size(b))
    }

    /// Size-filtered nodes as the Cartesian product of the components'
    /// size filters. Equal as a set to [`Hierarchy::size_filter`].
    pub fn grid(&self, (a, b): (L::Node, R::Node), maxsize: f64) -> Vec<(L::Node, R::Node)> {
        let right = self.right.size_filter(b, maxsize);
        self.left
            .size_filter(a, maxsize)
            .into_iter()
            .flat_map(|x| right.iter().map(move |&y| (x, y)))
            .collect()
    }
}

impl<L: Hierarchy, R: Hierarchy> Hierarchy for ProductTree<L, R> {
    type Node = (L::Node, R::Node);

    fn root(&self) -> Self::Node {
        (self.left.root(), self.right.root())
    }

    fn contains(&self, (a, b): Self::Node) -> bool {
        if !(self.left.contains(a) && self.right.contains(b)) {
            return false;
        }
        let left_ok = self
            .left
            .parent(a)
            .map_or(true, |pa| self.left.size(pa) > self.right.size(b));
        let right_ok = self
            .right
            .parent(b)
            .map_or(true, |pb| self.right.size(pb) > self.left.size(a));
        left_ok && right_ok
    }

    fn is_nonroot(&self, (a, b): Self::Node) -> bool {
        self.left.is_nonroot(a) || self.right.is_nonroot(b)
    }

    /// Step up the side whose parent is smaller, or both on a tie
    fn parent(&self, (a, b): Self::Node) -> Option<Self::Node> {
        match (self.left.parent(a), self.right.parent(b)) {
            (None, None) => None,
            (Some(pa), None) => Some((pa, b)),
            (None, Some(pb)) => Some((a, pb)),
            (Some(pa), Some(pb)) => {
                match self.left.size(pa).total_cmp(&self.right.size(pb)) {
                    Ordering::Greater => Some((a, pb)),
                    Ordering::Less => Some((pa, b)),
                    Ordering::Equal => Some((pa, pb)),
                }
            }
        }
    }

    fn children(&self, (a, b): Self::Node) -> Cow<'_, [Self::Node]> {
        let children: Vec<Self::Node> = match self.balance((a, b)) {
            Ordering::Greater => self.left.children(a).iter().map(|&ca| (ca, b)).collect(),
            Ordering::Less => self.right.children(b).iter().map(|&cb| (a, cb)).collect(),
            Ordering::Equal => {
                let right = self.right.children(b);
                self.left
                    .children(a)
                    .iter()
                    .flat_map(|&ca| right.iter().map(move |&cb| (ca, cb)))
                    .collect()
            }
        };
        Cow::Owned(children)
    }

    fn main_child(&self, (a, b): Self::Node) -> Option<Self::Node> {
        match self.balance((a, b)) {
            Ordering::Greater => self.left.main_child(a).map(|ca| (ca, b)),
            Ordering::Less => self.right.main_child(b).map(|cb| (a, cb)),
            Ordering::Equal => self.left.main_child(a).zip(self.right.main_child(b)),
        }
    }

    fn has_children(&self, (a, b): Self::Node) -> bool {
        self.left.has_children(a) || self.right.has_children(b)
    }

    fn tip(&self, (a, b): Self::Node) -> Self::Node {
        (self.left.tip(a), self.right.tip(b))
    }

    /// Climb while the parent shares the tip
    fn full(&self, node: Self::Node) -> Self::Node {
        let tip = self.tip(node);
        let mut climber = node;
        while let Some(parent) = self.parent(climber) {
            if self.tip(parent) != tip {
                break;
            }
            climber = parent;
        }
        climber
    }

    fn size(&self, (a, b): Self::Node) -> f64 {
        self.left.size(a).max(self.right.size(b))
    }

    fn label(&self, (a, b): Self::Node) -> String {
        format!("({}, {})", self.left.label(a), self.right.label(b))
    }
}

impl<L: Hierarchy, R: Hierarchy> ProductTree<L, R> {
    /// Leaves of the product: every pair of component leaves
    pub fn leaf_pairs(&self) -> Vec<(L::Node, R::Node)> {
        let right: Vec<R::Node> = self.right.leaf_nodes(self.right.root()).collect();
        self.left
            .leaf_nodes(self.left.root())
            .flat_map(|a| right.iter().map(move |&b| (a, b)))
            .collect()
    }
}

impl<L: Indexed, R: Indexed> Indexed for ProductTree<L, R> {
    type Index = (L::Index, R::Index);

    fn index_of(&self, (a, b): Self::Node) -> Self::Index {
        (self.left.index_of(a), self.right.index_of(b))
    }
}
