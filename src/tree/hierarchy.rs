//! The tree contract shared by [`Tree`](super::Tree) and
//! [`ProductTree`](crate::ProductTree)
//!
//! Implementors supply the primitive relations; everything else
//! (paths, partitions, size selection) is derived here once and works for
//! plain trees and arbitrarily nested products alike.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use super::traversal::{Descendants, Edge, Levels, Path, Subtree};

/// Fraction of the root size used by [`Hierarchy::default_maxsize`]
pub const DEFAULT_SIZE_FRACTION: f64 = 0.2;

/// Rooted tree of nested regions with main and lateral children
pub trait Hierarchy {
    /// Node handle
    type Node: Copy + Eq + Hash + Debug;

    /// The unique node without a parent
    fn root(&self) -> Self::Node;

    /// Whether `node` belongs to this tree
    fn contains(&self, node: Self::Node) -> bool;

    /// Containing node, `None` only for the root
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Ordered children; the first one is the main child
    fn children(&self, node: Self::Node) -> Cow<'_, [Self::Node]>;

    /// Child that keeps this node's tip
    fn main_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Leaf reached by following main children
    fn tip(&self, node: Self::Node) -> Self::Node;

    /// Highest ancestor sharing this node's tip
    fn full(&self, node: Self::Node) -> Self::Node;

    /// Vertical extent used to rank prominence
    fn size(&self, node: Self::Node) -> f64;

    /// Short text form of a node
    fn label(&self, node: Self::Node) -> String;

    /// Whether `node` has a parent
    fn is_nonroot(&self, node: Self::Node) -> bool {
        self.parent(node).is_some()
    }

    /// Whether `node` has any children
    fn has_children(&self, node: Self::Node) -> bool {
        self.tip(node) != node
    }

    /// All children except the main child
    fn lateral(&self, node: Self::Node) -> Cow<'_, [Self::Node]> {
        match self.children(node) {
            Cow::Borrowed(children) => Cow::Borrowed(children.get(1..).unwrap_or(&[])),
            Cow::Owned(mut children) => {
                if !children.is_empty() {
                    children.remove(0);
                }
                Cow::Owned(children)
            }
        }
    }

    /// Walk from `start` applying `step` until `stop` (or until `step` gives `None`)
    fn path<F>(&self, start: Self::Node, stop: Self::Node, step: F) -> Path<Self::Node, F>
    where
        F: FnMut(Self::Node) -> Option<Self::Node>,
    {
        Path::new(start, stop, step)
    }

    /// From `node` up to the root
    fn root_path(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.path(node, self.root(), move |n| self.parent(n))
    }

    /// From `node` down its main children to its tip
    fn main_path(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.path(node, self.tip(node), move |n| self.main_child(n))
    }

    /// `localroot` and every descendant, preorder
    fn subtree(&self, localroot: Self::Node) -> Subtree<'_, Self> {
        Subtree::new(self, localroot)
    }

    /// Preorder `(node, depth)` pairs below `localroot`
    fn levels(&self, localroot: Self::Node) -> Levels<'_, Self> {
        Levels::new(self, localroot)
    }

    /// Proper descendants with the kind of edge leading to each
    fn descendants(&self, localroot: Self::Node) -> Descendants<'_, Self> {
        Descendants::new(self, localroot)
    }

    /// Descendants that are the main child of their parent
    fn main_descendants(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.descendants(localroot)
            .filter(|&(_, edge)| edge == Edge::Main)
            .map(|(node, _)| node)
    }

    /// Descendants that are a lateral child of their parent
    fn lateral_descendants(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.descendants(localroot)
            .filter(|&(_, edge)| edge == Edge::Lateral)
            .map(|(node, _)| node)
    }

    /// Nodes in the subtree that are their own full node
    fn full_nodes(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        (self.full(localroot) == localroot)
            .then_some(localroot)
            .into_iter()
            .chain(self.lateral_descendants(localroot))
    }

    /// Subtree nodes without children
    fn leaf_nodes(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.subtree(localroot)
            .filter(move |&n| self.children(n).is_empty())
    }

    /// Subtree nodes with two or more children
    fn branch_nodes(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.subtree(localroot)
            .filter(move |&n| self.children(n).len() > 1)
    }

    /// Subtree nodes with exactly one child
    fn linear_nodes(&self, localroot: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.subtree(localroot)
            .filter(move |&n| self.children(n).len() == 1)
    }

    /// Every node; preorder unless the implementor has its own canonical order
    fn nodes(&self) -> Vec<Self::Node> {
        self.subtree(self.root()).collect()
    }

    /// Number of nodes
    fn node_count(&self) -> usize {
        self.subtree(self.root()).count()
    }

    /// `DEFAULT_SIZE_FRACTION` of the root's size
    fn default_maxsize(&self) -> f64 {
        DEFAULT_SIZE_FRACTION * self.size(self.root())
    }

    /// Outermost nodes below a size threshold.
    ///
    /// Returns `{ n in subtree(localroot) : size(n) < maxsize and
    /// (n == localroot or size(parent(n)) >= maxsize) }`.
    ///
    /// Only main paths leading to qualifying nodes are walked, so the cost
    /// follows the output size and path depth rather than the subtree size.
    fn size_filter(&self, localroot: Self::Node, maxsize: f64) -> Vec<Self::Node> {
        let mut selected = Vec::new();
        let mut pending = vec![localroot];

        while let Some(top) = pending.pop() {
            if self.size(top) < maxsize {
                selected.push(top);
                continue;
            }

            // climb from the tip while the next ancestor is still small
            let mut climber = self.tip(top);
            if self.size(climber) < maxsize {
                while let Some(parent) = self.parent(climber) {
                    if self.size(parent) >= maxsize {
                        break;
                    }
                    climber = parent;
                }
                selected.push(climber);
            }

            // lateral branches hanging off the large part of the main path
            let mut branches = Vec::new();
            while climber != top {
                let Some(parent) = self.parent(climber) else {
                    break;
                };
                climber = parent;
                branches.extend(self.lateral(climber).iter().copied());
            }
            pending.extend(branches.into_iter().rev());
        }

        selected
    }

    /// Members of `nodes` (within the subtree) that contain no other member
    fn innermost<I>(&self, nodes: I, localroot: Self::Node) -> Vec<Self::Node>
    where
        I: IntoIterator<Item = Self::Node>,
    {
        let members: HashSet<Self::Node> = nodes.into_iter().collect();
        let mut countdown = HashMap::new();
        let mut leaves = Vec::new();
        for node in self.subtree(localroot) {
            let count = self.children(node).len();
            if count == 0 {
                leaves.push(node);
            }
            countdown.insert(node, count);
        }

        // a node is promoted once all its children resolved without a member
        let mut found = Vec::new();
        for leaf in leaves {
            let mut node = leaf;
            loop {
                if members.contains(&node) {
                    found.push(node);
                    break;
                }
                if node == localroot {
                    break;
                }
                let Some(parent) = self.parent(node) else {
                    break;
                };
                let Some(remaining) = countdown.get_mut(&parent) else {
                    break;
                };
                *remaining -= 1;
                if *remaining > 0 {
                    break;
                }
                node = parent;
            }
        }
        found
    }

    /// Members of `nodes` (within the subtree) not contained in another member
    fn outermost<I>(&self, nodes: I, localroot: Self::Node) -> Vec<Self::Node>
    where
        I: IntoIterator<Item = Self::Node>,
    {
        let members: HashSet<Self::Node> = nodes.into_iter().collect();
        let mut found = Vec::new();
        let mut stack = vec![localroot];
        while let Some(node) = stack.pop() {
            if members.contains(&node) {
                found.push(node);
            } else {
                stack.extend(self.children(node).iter().rev().copied());
            }
        }
        found
    }
}

impl<H: Hierarchy + ?Sized> Hierarchy for &H {
    type Node = H::Node;

    fn root(&self) -> Self::Node {
        (**self).root()
    }

    fn contains(&self, node: Self::Node) -> bool {
        (**self).contains(node)
    }

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }

    fn children(&self, node: Self::Node) -> Cow<'_, [Self::Node]> {
        (**self).children(node)
    }

    fn main_child(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).main_child(node)
    }

    fn tip(&self, node: Self::Node) -> Self::Node {
        (**self).tip(node)
    }

    fn full(&self, node: Self::Node) -> Self::Node {
        (**self).full(node)
    }

    fn size(&self, node: Self::Node) -> f64 {
        (**self).size(node)
    }

    fn label(&self, node: Self::Node) -> String {
        (**self).label(node)
    }

    fn has_children(&self, node: Self::Node) -> bool {
        (**self).has_children(node)
    }

    fn lateral(&self, node: Self::Node) -> Cow<'_, [Self::Node]> {
        (**self).lateral(node)
    }

    fn nodes(&self) -> Vec<Self::Node> {
        (**self).nodes()
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn size_filter(&self, localroot: Self::Node, maxsize: f64) -> Vec<Self::Node> {
        (**self).size_filter(localroot, maxsize)
    }
}

/// Hierarchies whose nodes have a stable construction index.
///
/// Plain trees index by arena position; products index by the pair of
/// their components' indices, so nested products give nested tuples.
pub trait Indexed: Hierarchy {
    /// Index value, `usize` or a (nested) tuple of them
    type Index: Copy + Eq + Hash + Debug;

    /// Construction index of `node`
    fn index_of(&self, node: Self::Node) -> Self::Index;
}

impl<H: Indexed + ?Sized> Indexed for &H {
    type Index = H::Index;

    fn index_of(&self, node: Self::Node) -> Self::Index {
        (**self).index_of(node)
    }
}
