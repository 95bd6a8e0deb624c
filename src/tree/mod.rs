//! Containment tree of peak or valley regions
//!
//! Nodes are the regions found by the scanner, stored in an arena in
//! construction order. Each node knows its parent, its ranked children
//! (main child first), its tip and its full node. A node's main path runs
//! from its full node down to its tip; the main paths partition the tree.

mod builder;
mod hierarchy;
mod node;
mod traversal;

pub use builder::{BuildOptions, TreeBuilder};
pub use hierarchy::{Hierarchy, Indexed, DEFAULT_SIZE_FRACTION};
pub use node::NodeId;
pub use traversal::{Descendants, Edge, Levels, Path, Subtree};

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

use crate::region::{Orientation, RegionScanner, Scope};
use crate::PeakError;

/// Tree of regions in one-dimensional data
///
/// Navigation takes [`NodeId`] handles issued by this tree (or a clone of
/// it); passing a handle from another tree panics. Use [`Tree::node`] or
/// [`Tree::checked`] at trust boundaries.
#[derive(Debug, Clone)]
pub struct Tree {
    scopes: Vec<Scope>,
    lookup: HashMap<Scope, NodeId>,
    parent: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
    tip: Vec<NodeId>,
    full: Vec<NodeId>,
    root: NodeId,
    orientation: Orientation,
    owner: u64,
}

impl Tree {
    /// Tree of peak regions given in scanner order
    pub fn from_peaks<I>(scopes: I) -> Result<Self, PeakError>
    where
        I: IntoIterator<Item = Scope>,
    {
        Self::build(scopes, BuildOptions::default())
    }

    /// Tree of valley regions given in scanner order
    pub fn from_valleys<I>(scopes: I) -> Result<Self, PeakError>
    where
        I: IntoIterator<Item = Scope>,
    {
        Self::build(scopes, BuildOptions::valleys())
    }

    /// Tree from regions with explicit options
    pub fn build<I>(scopes: I, options: BuildOptions) -> Result<Self, PeakError>
    where
        I: IntoIterator<Item = Scope>,
    {
        let mut builder = TreeBuilder::new(options);
        builder.push_all(scopes)?;
        builder.finish()
    }

    /// Scan `values` and build the tree in one go
    pub fn from_values(values: &[f64], orientation: Orientation) -> Result<Self, PeakError> {
        if let Some(position) = values.iter().position(|v| v.is_nan()) {
            return Err(PeakError::InvalidInput(format!(
                "NaN at position {}",
                position
            )));
        }
        let scanner = RegionScanner::new(values.iter().copied(), orientation)?;
        Self::build(scanner, BuildOptions::default().with_orientation(orientation))
    }

    /// Rebuild a tree from its preorder `(region, level)` listing, as
    /// produced by [`Hierarchy::levels`] from the root.
    ///
    /// A level one deeper than the previous one opens the main child of the
    /// previous region; any other level closes subtrees and adds a lateral
    /// child. Nodes are numbered in listing order. The orientation is read
    /// off the root region.
    pub fn from_levels<I>(levels: I) -> Result<Self, PeakError>
    where
        I: IntoIterator<Item = (Scope, usize)>,
    {
        let owner = node::next_owner();
        let mut scopes = Vec::new();
        let mut lookup = HashMap::new();
        let mut parent = Vec::new();
        let mut children: Vec<Vec<NodeId>> = Vec::new();
        let mut ancestors: Vec<NodeId> = Vec::new();

        for (index, (scope, level)) in levels.into_iter().enumerate() {
            let id = NodeId::new(index, owner);
            if index == 0 && level != 0 {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "listing starts at level {} instead of the root",
                    level
                )));
            }
            if index > 0 && (level == 0 || level > ancestors.len()) {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "region {} at level {} does not follow level {}",
                    scope,
                    level,
                    ancestors.len() - 1
                )));
            }
            if lookup.insert(scope, id).is_some() {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "region {} is listed twice",
                    scope
                )));
            }
            ancestors.truncate(level);
            let up = ancestors.last().copied();
            if let Some(up) = up {
                if !scope.is_strict_subset(&scopes[up.index]) {
                    return Err(PeakError::StructuralInvariantViolation(format!(
                        "region {} is not strictly inside {}",
                        scope, scopes[up.index]
                    )));
                }
                children[up.index].push(id);
            }
            scopes.push(scope);
            parent.push(up);
            children.push(Vec::new());
            ancestors.push(id);
        }

        let count = scopes.len();
        if count == 0 {
            return Err(PeakError::InvalidInput(
                "no regions to build a tree from".to_string(),
            ));
        }

        // children follow their parents in preorder
        let mut tip: Vec<NodeId> = (0..count).map(|index| NodeId::new(index, owner)).collect();
        for index in (0..count).rev() {
            if let Some(main) = children[index].first() {
                tip[index] = tip[main.index];
            }
        }
        let mut full: Vec<NodeId> = (0..count).map(|index| NodeId::new(index, owner)).collect();
        for index in 0..count {
            if let Some(up) = parent[index] {
                if children[up.index].first().map(|main| main.index) == Some(index) {
                    full[index] = full[up.index];
                }
            }
        }

        let root = &scopes[0];
        let orientation = if root.extremum < root.cutoff {
            Orientation::Valley
        } else {
            Orientation::Peak
        };
        tracing::debug!(nodes = count, %orientation, "tree rebuilt from levels");

        Ok(Tree {
            scopes,
            lookup,
            parent,
            children,
            tip,
            full,
            root: NodeId::new(0, owner),
            orientation,
            owner,
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Nodes in construction order
    pub fn iter(&self) -> Iter {
        Iter {
            indices: 0..self.scopes.len(),
            owner: self.owner,
        }
    }

    /// Regions in construction order
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Region stored at `node`
    pub fn scope(&self, node: NodeId) -> &Scope {
        &self.scopes[self.slot(node)]
    }

    /// Handle of the node keyed by `scope`
    pub fn node(&self, scope: &Scope) -> Result<NodeId, PeakError> {
        self.lookup
            .get(scope)
            .copied()
            .ok_or_else(|| PeakError::UnknownNode(scope.to_string()))
    }

    /// `node` if it was issued by this tree
    pub fn checked(&self, node: NodeId) -> Result<NodeId, PeakError> {
        if self.contains(node) {
            Ok(node)
        } else {
            Err(PeakError::UnknownNode(node.to_string()))
        }
    }

    /// Arena position of `node`; panics on handles from other trees
    #[inline]
    fn slot(&self, node: NodeId) -> usize {
        assert!(
            self.contains(node),
            "node {} was not issued by this tree",
            node
        );
        node.index
    }

    /// Peak or valley tree
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Replace node regions without touching the topology.
    ///
    /// Regions missing from `changes` are kept. The remap is applied all at
    /// once; if two nodes would end up with the same key the tree is left
    /// unchanged and an error is returned.
    pub fn set_nodes(&mut self, changes: &HashMap<Scope, Scope>) -> Result<(), PeakError> {
        let scopes: Vec<Scope> = self
            .scopes
            .iter()
            .map(|scope| changes.get(scope).copied().unwrap_or(*scope))
            .collect();
        let mut lookup = HashMap::with_capacity(scopes.len());
        for (index, scope) in scopes.iter().enumerate() {
            if lookup.insert(*scope, NodeId::new(index, self.owner)).is_some() {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "remap sends two nodes to {}",
                    scope
                )));
            }
        }
        self.scopes = scopes;
        self.lookup = lookup;
        Ok(())
    }
}

impl Hierarchy for Tree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        node.owner == self.owner && node.index < self.scopes.len()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent[self.slot(node)]
    }

    fn children(&self, node: NodeId) -> Cow<'_, [NodeId]> {
        Cow::Borrowed(&self.children[self.slot(node)])
    }

    fn main_child(&self, node: NodeId) -> Option<NodeId> {
        self.children[self.slot(node)].first().copied()
    }

    fn tip(&self, node: NodeId) -> NodeId {
        self.tip[self.slot(node)]
    }

    fn full(&self, node: NodeId) -> NodeId {
        self.full[self.slot(node)]
    }

    fn size(&self, node: NodeId) -> f64 {
        self.scopes[self.slot(node)].size()
    }

    fn label(&self, node: NodeId) -> String {
        self.scopes[self.slot(node)].to_string()
    }

    fn has_children(&self, node: NodeId) -> bool {
        !self.children[self.slot(node)].is_empty()
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.iter().collect()
    }

    fn node_count(&self) -> usize {
        self.scopes.len()
    }
}

impl Indexed for Tree {
    type Index = usize;

    fn index_of(&self, node: NodeId) -> usize {
        self.slot(node)
    }
}

/// Nodes of a [`Tree`] in construction order
#[derive(Debug, Clone)]
pub struct Iter {
    indices: Range<usize>,
    owner: u64,
}

impl Iterator for Iter {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let index = self.indices.next()?;
        Some(NodeId::new(index, self.owner))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Iter {}

impl<'a> IntoIterator for &'a Tree {
    type Item = NodeId;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}
