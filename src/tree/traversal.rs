//! Iterative tree walks
//!
//! Trees built from monotone input are O(n) deep, so every walk keeps its
//! own stack instead of recursing.

use super::Hierarchy;

/// How a node hangs from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// First child: keeps the parent's tip
    Main,

    /// Any later child: starts a new main path
    Lateral,
}

/// Nodes visited by repeatedly applying `step` until `stop` is reached.
///
/// Ends early when `step` returns `None`.
#[derive(Debug, Clone)]
pub struct Path<N, F> {
    next: Option<N>,
    stop: N,
    step: F,
}

impl<N, F> Path<N, F> {
    pub(crate) fn new(start: N, stop: N, step: F) -> Self {
        Self {
            next: Some(start),
            stop,
            step,
        }
    }
}

impl<N, F> Iterator for Path<N, F>
where
    N: Copy + Eq,
    F: FnMut(N) -> Option<N>,
{
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.next.take()?;
        if node != self.stop {
            self.next = (self.step)(node);
        }
        Some(node)
    }
}

/// Preorder walk of a node and all its descendants
#[derive(Debug)]
pub struct Subtree<'a, H: Hierarchy + ?Sized> {
    tree: &'a H,
    stack: Vec<H::Node>,
}

impl<'a, H: Hierarchy + ?Sized> Subtree<'a, H> {
    pub(crate) fn new(tree: &'a H, localroot: H::Node) -> Self {
        Self {
            tree,
            stack: vec![localroot],
        }
    }
}

impl<H: Hierarchy + ?Sized> Iterator for Subtree<'_, H> {
    type Item = H::Node;

    fn next(&mut self) -> Option<H::Node> {
        let node = self.stack.pop()?;
        let tree = self.tree;
        self.stack.extend(tree.children(node).iter().rev().copied());
        Some(node)
    }
}

/// Preorder walk yielding `(node, depth)` with the local root at depth 0
#[derive(Debug)]
pub struct Levels<'a, H: Hierarchy + ?Sized> {
    tree: &'a H,
    stack: Vec<(H::Node, usize)>,
}

impl<'a, H: Hierarchy + ?Sized> Levels<'a, H> {
    pub(crate) fn new(tree: &'a H, localroot: H::Node) -> Self {
        Self {
            tree,
            stack: vec![(localroot, 0)],
        }
    }
}

impl<H: Hierarchy + ?Sized> Iterator for Levels<'_, H> {
    type Item = (H::Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, level) = self.stack.pop()?;
        let tree = self.tree;
        self.stack.extend(
            tree.children(node)
                .iter()
                .rev()
                .map(|&child| (child, level + 1)),
        );
        Some((node, level))
    }
}

/// Preorder walk over proper descendants, tagged with their incoming edge
#[derive(Debug)]
pub struct Descendants<'a, H: Hierarchy + ?Sized> {
    tree: &'a H,
    stack: Vec<(H::Node, Edge)>,
}

impl<'a, H: Hierarchy + ?Sized> Descendants<'a, H> {
    pub(crate) fn new(tree: &'a H, localroot: H::Node) -> Self {
        let mut walk = Self {
            tree,
            stack: Vec::new(),
        };
        walk.push_children(localroot);
        walk
    }

    fn push_children(&mut self, node: H::Node) {
        let tree = self.tree;
        let children = tree.children(node);
        for (i, &child) in children.iter().enumerate().rev() {
            let edge = if i == 0 { Edge::Main } else { Edge::Lateral };
            self.stack.push((child, edge));
        }
    }
}

impl<H: Hierarchy + ?Sized> Iterator for Descendants<'_, H> {
    type Item = (H::Node, Edge);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.push_children(item.0);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stops_at_target() {
        let path: Vec<u32> = Path::new(1, 8, |n| Some(n * 2)).collect();
        assert_eq!(path, vec![1, 2, 4, 8]);
    }

    #[test]
    fn test_path_ends_when_step_runs_out() {
        let path: Vec<u32> = Path::new(5, 100, |n: u32| n.checked_sub(2)).collect();
        assert_eq!(path, vec![5, 3, 1]);
    }

    #[test]
    fn test_path_of_one_node() {
        let path: Vec<u32> = Path::new(7, 7, |_| None).collect();
        assert_eq!(path, vec![7]);
    }
}
