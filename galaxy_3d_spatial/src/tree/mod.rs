//! Tree module: generic spatial tree over AABBs.
//!
//! One implementation serves both object-level and primitive-level
//! indexing: the payload type `T` is opaque to the tree.

mod node;
mod tree;

pub use node::{Item, ItemIndex, Node, NodeIndex, Nodes};
pub use tree::{Tree, TreeConfig, TreeSource, TreeStats, DEFAULT_MAX_DEPTH};
