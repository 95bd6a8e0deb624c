//! Text formats for trees
//!
//! Each format borrows a [`Hierarchy`] and renders it through `Display`, so
//! plain trees and product trees print the same way. Node text comes from
//! [`Hierarchy::label`].

use std::fmt;

use crate::tree::Hierarchy;

/// Legend printed as the first line of a [`Riverflow`]
pub const RIVERFLOW_NOTATION: &str = "# Notation: <main> /& <lateral>/ => <parent>";

/// Subtree drawn with box-drawing characters, one node per line
///
/// ```text
/// 0:10
/// ├─5:10
/// │ ├─9:10
/// │ └─6:8
/// └─1:4
///   └─2:3
/// ```
#[derive(Debug)]
pub struct BoxDrawing<'a, H: Hierarchy> {
    tree: &'a H,
    localroot: H::Node,
}

impl<'a, H: Hierarchy> BoxDrawing<'a, H> {
    /// Render the whole tree
    pub fn new(tree: &'a H) -> Self {
        Self {
            tree,
            localroot: tree.root(),
        }
    }

    /// Render only the subtree below `localroot`
    pub fn at(mut self, localroot: H::Node) -> Self {
        self.localroot = localroot;
        self
    }
}

impl<H: Hierarchy> fmt::Display for BoxDrawing<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        let mut indent: Vec<&str> = Vec::new();
        for (node, level) in tree.levels(self.localroot) {
            if level == 0 {
                write!(f, "{}", tree.label(node))?;
                continue;
            }
            let last = tree
                .parent(node)
                .map_or(true, |parent| tree.children(parent).last() == Some(&node));
            indent.truncate(level - 1);
            let (branch, below) = if last { ("└─", "  ") } else { ("├─", "│ ") };
            write!(f, "\n{}{}{}", indent.concat(), branch, tree.label(node))?;
            indent.push(below);
        }
        Ok(())
    }
}

/// Subtree as an indented list, one node per line
#[derive(Debug)]
pub struct IndentedList<'a, H: Hierarchy> {
    tree: &'a H,
    localroot: H::Node,
    indent: &'a str,
}

impl<'a, H: Hierarchy> IndentedList<'a, H> {
    /// Render the whole tree with `"| "` per level
    pub fn new(tree: &'a H) -> Self {
        Self {
            tree,
            localroot: tree.root(),
            indent: "| ",
        }
    }

    /// Render only the subtree below `localroot`
    pub fn at(mut self, localroot: H::Node) -> Self {
        self.localroot = localroot;
        self
    }

    /// Use `indent` once per level
    pub fn with_indent(mut self, indent: &'a str) -> Self {
        self.indent = indent;
        self
    }
}

impl<H: Hierarchy> fmt::Display for IndentedList<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (node, level)) in self.tree.levels(self.localroot).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}{}", self.indent.repeat(level), self.tree.label(node))?;
        }
        Ok(())
    }
}

/// Main paths as chains from tip to full node, one path per line
///
/// Each step lists the lateral siblings it merges with:
/// `9:10 /& 6:8/ => 5:10 /& 1:4/ => 0:10.`
#[derive(Debug)]
pub struct Riverflow<'a, H: Hierarchy> {
    tree: &'a H,
    localroot: H::Node,
}

impl<'a, H: Hierarchy> Riverflow<'a, H> {
    /// Render the whole tree
    pub fn new(tree: &'a H) -> Self {
        Self {
            tree,
            localroot: tree.root(),
        }
    }

    /// Render only the subtree below `localroot`
    pub fn at(mut self, localroot: H::Node) -> Self {
        self.localroot = localroot;
        self
    }
}

impl<H: Hierarchy> fmt::Display for Riverflow<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        writeln!(f, "{}", RIVERFLOW_NOTATION)?;
        for full in tree.full_nodes(self.localroot) {
            let Some(main) = tree.main_child(full) else {
                continue;
            };
            for node in tree.path(tree.tip(full), main, |n| tree.parent(n)) {
                write!(f, "{}", tree.label(node))?;
                if let Some(parent) = tree.parent(node) {
                    let lateral = tree.lateral(parent);
                    if !lateral.is_empty() {
                        let names: Vec<String> = lateral.iter().map(|&n| tree.label(n)).collect();
                        write!(f, " /& {}/", names.join(", "))?;
                    }
                }
                write!(f, " => ")?;
            }
            writeln!(f, "{}.", tree.label(full))?;
        }
        Ok(())
    }
}
