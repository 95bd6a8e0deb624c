//! Test helper functions shared by the integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::hash::Hash;

use peaktree::Hierarchy;
use proptest::prelude::*;

/// Cumulative sum of integer steps starting at zero.
///
/// Integer steps keep every comparison exact and make flat runs and
/// repeated levels common.
pub fn random_walk(steps: &[i8]) -> Vec<f64> {
    let mut level = 0.0;
    let mut values = Vec::with_capacity(steps.len() + 1);
    values.push(level);
    for &step in steps {
        level += f64::from(step);
        values.push(level);
    }
    values
}

/// Random walks of 1 to 80 points, including flat steps
pub fn walks() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-3i8..=3, 0..80).prop_map(|steps| random_walk(&steps))
}

/// Short random walks for product trees
pub fn short_walks() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-3i8..=3, 0..12).prop_map(|steps| random_walk(&steps))
}

fn as_set<N: Copy + Eq + Hash>(nodes: impl IntoIterator<Item = N>) -> HashSet<N> {
    nodes.into_iter().collect()
}

/// Whether `ancestor` lies on the root path of `node` (including `node`)
pub fn is_ancestor<H: Hierarchy>(tree: &H, ancestor: H::Node, node: H::Node) -> bool {
    tree.root_path(node).any(|n| n == ancestor)
}

/// Check every relation of the tree contract against every other
pub fn assert_tree_consistency<H: Hierarchy>(tree: &H) {
    let root = tree.root();
    let nodes = tree.nodes();
    let all = as_set(nodes.iter().copied());

    assert_eq!(tree.parent(root), None, "root has a parent");
    assert!(!tree.is_nonroot(root));
    assert_eq!(nodes.len(), all.len(), "duplicate nodes");
    assert_eq!(tree.node_count(), nodes.len());
    assert_eq!(as_set(tree.subtree(root)), all);

    for &node in &nodes {
        assert!(tree.contains(node), "{:?} not contained", node);
        let children = tree.children(node);

        // parent and children agree
        if let Some(parent) = tree.parent(node) {
            assert!(tree.is_nonroot(node));
            assert!(tree.children(parent).contains(&node));
            assert!(
                tree.size(parent) > tree.size(node),
                "size does not grow from {} to {}",
                tree.label(node),
                tree.label(parent)
            );
        } else {
            assert_eq!(node, root);
        }
        for &child in children.iter() {
            assert_eq!(tree.parent(child), Some(node));
        }

        // main child and tip
        assert_eq!(tree.main_child(node), children.first().copied());
        assert_eq!(tree.has_children(node), !children.is_empty());
        assert_eq!(tree.lateral(node).len(), children.len().saturating_sub(1));
        match tree.main_child(node) {
            Some(main) => assert_eq!(tree.tip(node), tree.tip(main)),
            None => assert_eq!(tree.tip(node), node),
        }

        // full node is the highest ancestor with the same tip
        let full = tree.full(node);
        assert!(is_ancestor(tree, full, node));
        assert_eq!(tree.tip(full), tree.tip(node));
        if let Some(above) = tree.parent(full) {
            assert_ne!(tree.tip(above), tree.tip(node));
        }

        assert_eq!(tree.root_path(node).last(), Some(root));
        assert_eq!(tree.main_path(node).last(), Some(tree.tip(node)));
    }

    // main paths partition the tree
    let mut covered = HashSet::new();
    for full in tree.full_nodes(root) {
        assert_eq!(tree.full(full), full);
        for node in tree.main_path(full) {
            assert!(covered.insert(node), "{:?} on two main paths", node);
        }
    }
    assert_eq!(covered, all);

    let mut by_edge = as_set(tree.full_nodes(root));
    let main = as_set(tree.main_descendants(root));
    assert!(by_edge.is_disjoint(&main));
    by_edge.extend(main);
    assert_eq!(by_edge, all);

    let leaves = as_set(tree.leaf_nodes(root));
    let linear = as_set(tree.linear_nodes(root));
    let branches = as_set(tree.branch_nodes(root));
    assert_eq!(leaves.len() + linear.len() + branches.len(), all.len());
    let mut by_degree = leaves;
    by_degree.extend(linear);
    by_degree.extend(branches);
    assert_eq!(by_degree, all);

    // root is outermost and the leaves are innermost
    assert_eq!(tree.outermost(nodes.iter().copied(), root), vec![root]);
    assert_eq!(
        as_set(tree.innermost(nodes.iter().copied(), root)),
        as_set(tree.leaf_nodes(root))
    );

    // levels count the edges from the local root
    for (node, level) in tree.levels(root) {
        assert_eq!(tree.root_path(node).count(), level + 1);
    }
}

/// `size_filter` equals its defining set, checked by brute force
pub fn assert_size_filter<H: Hierarchy>(tree: &H, localroot: H::Node, maxsize: f64) {
    let expected: HashSet<H::Node> = tree
        .subtree(localroot)
        .filter(|&n| tree.size(n) < maxsize)
        .filter(|&n| {
            n == localroot || tree.parent(n).map_or(true, |p| tree.size(p) >= maxsize)
        })
        .collect();
    let selected = tree.size_filter(localroot, maxsize);
    assert_eq!(selected.len(), expected.len(), "duplicates or misses at {}", maxsize);
    assert_eq!(as_set(selected), expected, "size_filter at {}", maxsize);
}

/// `innermost` and `outermost` agree with pairwise ancestry
pub fn assert_extreme_members<H: Hierarchy>(tree: &H, members: &[H::Node]) {
    let root = tree.root();
    let innermost: HashSet<H::Node> = members
        .iter()
        .copied()
        .filter(|&m| {
            !members
                .iter()
                .any(|&other| other != m && is_ancestor(tree, m, other))
        })
        .collect();
    let outermost: HashSet<H::Node> = members
        .iter()
        .copied()
        .filter(|&m| {
            !members
                .iter()
                .any(|&other| other != m && is_ancestor(tree, other, m))
        })
        .collect();
    assert_eq!(as_set(tree.innermost(members.iter().copied(), root)), innermost);
    assert_eq!(as_set(tree.outermost(members.iter().copied(), root)), outermost);
}

/// Every `step`-th node of the tree, starting at `offset`
pub fn every_nth<H: Hierarchy>(tree: &H, offset: usize, step: usize) -> Vec<H::Node> {
    tree.nodes()
        .into_iter()
        .skip(offset)
        .step_by(step.max(1))
        .collect()
}

/// Distinct sizes of the tree plus values between and around them
pub fn thresholds<H: Hierarchy>(tree: &H) -> Vec<f64> {
    let mut sizes: Vec<f64> = tree.nodes().into_iter().map(|n| tree.size(n)).collect();
    sizes.sort_by(f64::total_cmp);
    sizes.dedup();
    let mut out = vec![-1.0, 0.0];
    for &size in &sizes {
        out.push(size);
        out.push(size + 0.5);
    }
    out
}
