//! # Hierarchical Peak and Valley Regions
//!
//! This library finds every nested peak (or valley) region in a sequence of
//! numbers and organizes them as a containment tree.
//!
//! ## Core Algorithm
//!
//! 1. **Streaming scan**: one pass over the values emits each region as soon
//!    as its boundary is known, innermost regions first
//! 2. **Stack construction**: regions in scanner order are linked into a tree
//!    with a monotonic stack, children ranked by their extreme value
//! 3. **Main paths**: each node's most extreme child is its main child; the
//!    chains of main children partition the tree
//! 4. **Size selection**: the outermost regions below a size threshold are
//!    found by walking main paths instead of the whole tree
//!
//! Trees of two independent dimensions combine into a lazy
//! [`ProductTree`] whose nodes are pairs of component nodes.
//!
//! ## Usage Example
//!
//! ```
//! use peaktree::{Hierarchy, Orientation, Tree};
//!
//! let data = [10.0, 30.0, 40.0, 30.0, 10.0, 50.0, 70.0, 70.0, 50.0, 80.0];
//! let tree = Tree::from_values(&data, Orientation::Peak)?;
//! assert_eq!(tree.label(tree.root()), "0:10");
//! assert_eq!(tree.label(tree.tip(tree.root())), "9:10");
//! # Ok::<(), peaktree::PeakError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod product; // Lazy tree over pairs of nodes
pub mod region; // Region values and the streaming scanner
pub mod render; // Text formats for any tree
pub mod tree; // Containment tree and the shared tree contract

// Re-exports for convenience
pub use product::ProductTree;
pub use region::{find_peaks, find_valleys, Orientation, Region, RegionScanner, Scope};
pub use render::{BoxDrawing, IndentedList, Riverflow, RIVERFLOW_NOTATION};
pub use tree::{
    BuildOptions, Hierarchy, Indexed, NodeId, Tree, TreeBuilder, DEFAULT_SIZE_FRACTION,
};

use thiserror::Error;

/// Errors that can occur while scanning data or building trees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeakError {
    /// Input that cannot be scanned or projected
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two regions over different sequences were compared
    #[error("Regions refer to different sequences")]
    MismatchedSequence,

    /// Node is not part of this tree
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Regions do not nest into a single tree
    #[error("Structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
}
