//! Stack-based tree construction
//!
//! Regions arrive innermost-first (ascending `stop`). Every region adopts
//! all pending regions that start at or after its own start: finish order
//! guarantees those are nested inside it. Adopted children are ranked by
//! extremum (most extreme first, ties by start) so the first child keeps
//! the parent's tip. One pass, O(n log k) for the per-node child sorts.

use std::collections::HashMap;

use super::{NodeId, Tree};
use crate::region::{Orientation, Scope};
use crate::PeakError;

/// Options for turning regions into a [`Tree`]
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Peak or valley ranking of children
    pub orientation: Orientation,

    /// Regions already come in scanner order
    pub presorted: bool,

    /// Reject region sets that do not nest properly
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Peak,
            presorted: true,
            validate: true,
        }
    }
}

impl BuildOptions {
    /// Options for valley trees
    pub fn valleys() -> Self {
        Self::default().with_orientation(Orientation::Valley)
    }

    /// Set orientation
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Declare whether input is already in scanner order
    pub fn with_presorted(mut self, presorted: bool) -> Self {
        self.presorted = presorted;
        self
    }

    /// Enable nesting checks
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }
}

/// Incremental tree construction state
#[derive(Debug)]
pub struct TreeBuilder {
    options: BuildOptions,
    scopes: Vec<Scope>,
    lookup: HashMap<Scope, NodeId>,
    parent: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
    tip: Vec<NodeId>,
    /// Nodes still waiting for a parent
    pending: Vec<NodeId>,
    owner: u64,
}

impl TreeBuilder {
    /// Empty builder
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            scopes: Vec::new(),
            lookup: HashMap::new(),
            parent: Vec::new(),
            children: Vec::new(),
            tip: Vec::new(),
            pending: Vec::new(),
            owner: super::node::next_owner(),
        }
    }

    /// Options in use
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Add all `scopes`, re-sorting them first unless marked presorted
    pub fn push_all<I>(&mut self, scopes: I) -> Result<(), PeakError>
    where
        I: IntoIterator<Item = Scope>,
    {
        if self.options.presorted {
            for scope in scopes {
                self.push(scope)?;
            }
        } else {
            let orientation = self.options.orientation;
            let mut scopes: Vec<Scope> = scopes.into_iter().collect();
            // inner regions share a stop with outer ones but have the more extreme cutoff
            scopes.sort_by(|a, b| {
                a.stop
                    .cmp(&b.stop)
                    .then_with(|| orientation.rank(a.cutoff, b.cutoff))
            });
            for scope in scopes {
                self.push(scope)?;
            }
        }
        Ok(())
    }

    /// Add the next region in canonical order
    pub fn push(&mut self, scope: Scope) -> Result<NodeId, PeakError> {
        let validate = self.options.validate;
        if self.lookup.contains_key(&scope) {
            return Err(PeakError::StructuralInvariantViolation(format!(
                "region {} was added twice",
                scope
            )));
        }

        let id = NodeId::new(self.scopes.len(), self.owner);
        let mut adopted = Vec::new();
        while let Some(&top) = self.pending.last() {
            let child = &self.scopes[top.index];
            if child.start < scope.start {
                break;
            }
            if validate && !child.is_strict_subset(&scope) {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "region {} is not strictly inside {}",
                    child, scope
                )));
            }
            self.pending.pop();
            self.parent[top.index] = Some(id);
            adopted.push(top);
        }
        if validate {
            if let Some(&left) = self.pending.last() {
                let left = &self.scopes[left.index];
                if left.stop > scope.start {
                    return Err(PeakError::StructuralInvariantViolation(format!(
                        "regions {} and {} overlap without nesting",
                        left, scope
                    )));
                }
            }
        }

        let orientation = self.options.orientation;
        let scopes = &self.scopes;
        adopted.sort_by(|&a, &b| {
            let (a, b) = (&scopes[a.index], &scopes[b.index]);
            orientation
                .rank(a.extremum, b.extremum)
                .then_with(|| a.start.cmp(&b.start))
        });

        let tip = adopted.first().map_or(id, |&main| self.tip[main.index]);
        self.scopes.push(scope);
        self.lookup.insert(scope, id);
        self.parent.push(None);
        self.children.push(adopted);
        self.tip.push(tip);
        self.pending.push(id);
        Ok(id)
    }

    /// Close construction; exactly one region must remain unparented
    pub fn finish(self) -> Result<Tree, PeakError> {
        let root = match self.pending.as_slice() {
            [] => {
                return Err(PeakError::InvalidInput(
                    "no regions to build a tree from".to_string(),
                ))
            }
            [root] => *root,
            rest => {
                return Err(PeakError::StructuralInvariantViolation(format!(
                    "{} regions are not contained in any other region",
                    rest.len()
                )))
            }
        };

        // parents always come after their children, so walking backwards
        // labels each main path from its top down
        let count = self.scopes.len();
        let owner = self.owner;
        let mut full: Vec<NodeId> = (0..count).map(|index| NodeId::new(index, owner)).collect();
        for index in (0..count).rev() {
            if let Some(parent) = self.parent[index] {
                if self.children[parent.index].first() == Some(&NodeId::new(index, owner)) {
                    full[index] = full[parent.index];
                }
            }
        }

        tracing::debug!(
            nodes = count,
            orientation = %self.options.orientation,
            root = %self.scopes[root.index],
            "tree built"
        );

        Ok(Tree {
            scopes: self.scopes,
            lookup: self.lookup,
            parent: self.parent,
            children: self.children,
            tip: self.tip,
            full,
            root,
            orientation: self.options.orientation,
            owner,
        })
    }
}
