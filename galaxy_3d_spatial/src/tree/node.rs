/// Tree nodes and the items stored in them.
///
/// A node's AABB always encloses every item stored at or beneath it.
/// Items sit at the deepest node whose child split could not take them
/// (they straddle the split plane, or the node is at `max_depth`).

use crate::math::AABB;

/// Sequential node identifier, unique within one build of a `Tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub u32);

/// Sequential item identifier, unique within one build of a `Tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemIndex(pub u32);

/// An indexed payload with its own bounding box.
#[derive(Debug, Clone)]
pub struct Item<T> {
    index: ItemIndex,
    payload: T,
    aabb: AABB,
}

impl<T> Item<T> {
    pub(crate) fn new(index: ItemIndex, payload: T, aabb: AABB) -> Self {
        Self { index, payload, aabb }
    }

    /// Item index (scoped to the owning tree)
    pub fn index(&self) -> ItemIndex {
        self.index
    }

    /// The payload supplied at insertion
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// The item's own bounding box
    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }
}

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A node of the binary spatial tree.
#[derive(Debug)]
pub struct Node<T> {
    index: NodeIndex,
    depth: u32,
    pub(crate) aabb: AABB,
    pub(crate) left: Option<Box<Node<T>>>,
    pub(crate) right: Option<Box<Node<T>>>,
    pub(crate) items: Vec<Item<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(index: NodeIndex, depth: u32, aabb: AABB) -> Self {
        Self {
            index,
            depth,
            aabb,
            left: None,
            right: None,
            items: Vec::new(),
        }
    }

    /// Node index (scoped to the owning tree)
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Depth below the root (root = 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Bounding box enclosing everything at or beneath this node
    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    /// Left child (lower half along the split axis)
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    /// Right child (upper half along the split axis)
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Existing children, left before right
    pub fn children(&self) -> impl Iterator<Item = &Node<T>> {
        self.left.as_deref().into_iter().chain(self.right.as_deref())
    }

    /// Items stored directly at this node
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn child(&self, side: Side) -> Option<&Node<T>> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> Option<&mut Node<T>> {
        match side {
            Side::Left => self.left.as_deref_mut(),
            Side::Right => self.right.as_deref_mut(),
        }
    }

    /// First existing child whose AABB fully contains `aabb`, left first.
    pub(crate) fn containing_child(&self, aabb: &AABB) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.child(side).is_some_and(|c| c.aabb.contains(aabb)))
    }
}

/// Pre-order node iterator using an explicit stack.
///
/// Yields the same order as a recursive left-before-right walk.
pub struct Nodes<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Nodes<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self { stack: root.into_iter().collect() }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first so that left is visited first
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(node)
    }
}
