/// Tree: binary spatial partition over item AABBs.
///
/// Each item is stored in exactly one node: the deepest node that fully
/// contains it. A node is split on the longest axis of its own AABB at the
/// midpoint; children are created lazily the first time an insertion needs
/// them. Items straddling the split plane stay in the parent.
///
/// The tree is generic over its payload, so the same code indexes scene
/// objects (`Tree<ObjectKey>`) and raw primitives (`Tree<Primitive>`).
///
/// Removal is not supported. When the source collection loses members the
/// caller marks the tree dirty and the next `root_or_rebuild()` rebuilds it
/// from scratch, discarding all node/item indices.

use std::sync::atomic::{AtomicU64, Ordering};
use crate::error::Result;
use crate::math::AABB;
use crate::{spatial_bail, spatial_debug, spatial_warn};
use super::node::{Item, ItemIndex, Node, NodeIndex, Nodes, Side};

/// Default maximum tree depth (root = 0)
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Tree configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// Maximum depth (root = 0). Items reaching this depth are stored there.
    pub max_depth: u32,
    /// A warning is logged after a build when one node holds more items
    pub leaf_warn_threshold: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            leaf_warn_threshold: 1024,
        }
    }
}

/// Collection the tree can be (re)built from.
///
/// Implemented by the owner of the indexed objects. The tree never
/// observes the collection; callers report changes with `Tree::mark_dirty()`.
pub trait TreeSource {
    /// Payload stored for each item
    type Item;

    /// Call `visitor` once per item with its current AABB.
    fn visit_items(&self, visitor: &mut dyn FnMut(Self::Item, AABB));
}

impl<T: Clone> TreeSource for [(T, AABB)] {
    type Item = T;

    fn visit_items(&self, visitor: &mut dyn FnMut(T, AABB)) {
        for (payload, aabb) in self {
            visitor(payload.clone(), *aabb);
        }
    }
}

/// Summary of a tree's shape, logged after each build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of nodes
    pub node_count: usize,
    /// Number of items
    pub item_count: usize,
    /// Deepest node depth
    pub depth: u32,
    /// Largest number of items stored directly at one node
    pub max_items_per_node: usize,
}

/// Source of process-unique tree ids
static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Binary spatial tree over AABBs.
#[derive(Debug)]
pub struct Tree<T> {
    id: u64,
    root: Option<Node<T>>,
    config: TreeConfig,
    next_item_index: u32,
    next_node_index: u32,
    /// Incremented on every build/clear so that delta queries can drop caches
    generation: u64,
    dirty: bool,
    destroyed: bool,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl<T> Tree<T> {
    /// Create an empty tree.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            root: None,
            config,
            next_item_index: 0,
            next_node_index: 0,
            generation: 0,
            dirty: false,
            destroyed: false,
        }
    }

    /// Tree configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Identity of this tree, unique within the process.
    ///
    /// Node and item indices are only meaningful together with the id and
    /// generation of the tree that issued them.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Build generation, incremented on every build and clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of items inserted since the last build
    pub fn item_count(&self) -> usize {
        self.next_item_index as usize
    }

    /// Number of nodes created since the last build
    pub fn node_count(&self) -> usize {
        self.next_node_index as usize
    }

    /// Depth of the deepest node (0 for a root-only or empty tree)
    pub fn depth(&self) -> u32 {
        self.stats().depth
    }

    /// Whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.next_item_index == 0
    }

    /// Whether the source collection changed since the last build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the source collection lost (or changed) members.
    ///
    /// The rebuild is deferred to the next `root_or_rebuild()`.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether `destroy()` has been called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Release all nodes. Every later call returns `Error::UseAfterDestroy`.
    pub fn destroy(&mut self) {
        self.root = None;
        self.destroyed = true;
        self.generation += 1;
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            spatial_bail!(destroyed, "galaxy3d::Tree", "tree");
        }
        Ok(())
    }

    /// Current root, without rebuilding. `None` for an empty tree.
    pub fn root(&self) -> Result<Option<&Node<T>>> {
        self.ensure_alive()?;
        Ok(self.root.as_ref())
    }

    /// Root after rebuilding from `source` if the tree is dirty.
    pub fn root_or_rebuild<S>(&mut self, source: &S) -> Result<Option<&Node<T>>>
    where
        S: TreeSource<Item = T> + ?Sized,
    {
        self.ensure_alive()?;
        if self.dirty {
            self.rebuild_from(source)?;
        }
        Ok(self.root.as_ref())
    }

    /// Rebuild unconditionally from `source`.
    pub fn rebuild_from<S>(&mut self, source: &S) -> Result<()>
    where
        S: TreeSource<Item = T> + ?Sized,
    {
        let mut items = Vec::new();
        source.visit_items(&mut |payload, aabb| items.push((payload, aabb)));
        self.build(items)
    }

    /// Discard the current contents and index `items`.
    ///
    /// The root AABB is the union of all item AABBs.
    pub fn build<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (T, AABB)>,
    {
        let items: Vec<(T, AABB)> = items.into_iter().collect();
        let bounds = items
            .iter()
            .fold(AABB::EMPTY, |acc, (_, aabb)| acc.union(aabb));
        self.build_with_bounds(bounds, items)
    }

    /// Discard the current contents and index `items` under a root of `bounds`.
    ///
    /// Items outside `bounds` are accepted; they stay at the root and
    /// expand its AABB.
    pub fn build_with_bounds<I>(&mut self, bounds: AABB, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (T, AABB)>,
    {
        self.ensure_alive()?;
        self.reset();

        if !bounds.is_empty() {
            let index = self.alloc_node();
            self.root = Some(Node::new(index, 0, bounds));
        }

        for (payload, aabb) in items {
            self.insert_item(payload, aabb);
        }
        self.dirty = false;

        let stats = self.stats();
        spatial_debug!("galaxy3d::Tree",
            "Built tree (generation {}): {} items, {} nodes, depth {}, max {} items/node",
            self.generation, stats.item_count, stats.node_count, stats.depth, stats.max_items_per_node);
        if stats.max_items_per_node > self.config.leaf_warn_threshold {
            spatial_warn!("galaxy3d::Tree",
                "A node holds {} items (threshold {}); queries degrade to a linear scan there",
                stats.max_items_per_node, self.config.leaf_warn_threshold);
        }
        Ok(())
    }

    /// Insert one item without rebuilding.
    ///
    /// The node that ends up storing the item is expanded to enclose `aabb`;
    /// every node above it already does.
    pub fn insert(&mut self, payload: T, aabb: AABB) -> Result<ItemIndex> {
        self.ensure_alive()?;
        Ok(self.insert_item(payload, aabb))
    }

    /// Remove all items and nodes.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.reset();
        Ok(())
    }

    /// Pre-order iterator over all nodes (left before right).
    pub fn nodes(&self) -> Result<Nodes<'_, T>> {
        self.ensure_alive()?;
        Ok(Nodes::new(self.root.as_ref()))
    }

    /// Shape summary of the current tree. All zero when destroyed.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for node in Nodes::new(self.root.as_ref()) {
            stats.node_count += 1;
            stats.item_count += node.items.len();
            stats.depth = stats.depth.max(node.depth());
            stats.max_items_per_node = stats.max_items_per_node.max(node.items.len());
        }
        stats
    }

    // ===== INTERNAL =====

    fn reset(&mut self) {
        self.root = None;
        self.next_item_index = 0;
        self.next_node_index = 0;
        self.generation += 1;
    }

    fn alloc_node(&mut self) -> NodeIndex {
        let index = NodeIndex(self.next_node_index);
        self.next_node_index += 1;
        index
    }

    fn insert_item(&mut self, payload: T, aabb: AABB) -> ItemIndex {
        let index = ItemIndex(self.next_item_index);
        self.next_item_index += 1;
        let item = Item::new(index, payload, aabb);

        if self.root.is_none() {
            let node_index = self.alloc_node();
            self.root = Some(Node::new(node_index, 0, aabb));
        }

        let max_depth = self.config.max_depth;
        let Self { root, next_node_index, .. } = self;
        if let Some(root) = root.as_mut() {
            Self::insert_into(root, item, max_depth, next_node_index);
        }
        index
    }

    fn insert_into(node: &mut Node<T>, item: Item<T>, max_depth: u32, next_node_index: &mut u32) {
        if node.depth() >= max_depth {
            node.aabb.expand(item.aabb());
            node.items.push(item);
            return;
        }

        let side = match node.containing_child(item.aabb()) {
            Some(side) => Some(side),
            None => Self::create_containing_child(node, item.aabb(), next_node_index),
        };

        if let Some(side) = side {
            if let Some(child) = node.child_mut(side) {
                return Self::insert_into(child, item, max_depth, next_node_index);
            }
        }

        // Straddles the split plane (or lies outside this node)
        node.aabb.expand(item.aabb());
        node.items.push(item);
    }

    /// Create the missing child of `node` whose half contains `aabb`.
    ///
    /// Halves come from splitting the node's own AABB at the midpoint of its
    /// longest axis, left first. Returns `None` (and creates nothing) when
    /// no missing half contains `aabb`.
    fn create_containing_child(node: &mut Node<T>, aabb: &AABB, next_node_index: &mut u32) -> Option<Side> {
        let axis = node.aabb.longest_axis();
        let mid = node.aabb.center()[axis];

        for side in [Side::Left, Side::Right] {
            if node.child(side).is_some() {
                continue;
            }
            let mut half = node.aabb;
            match side {
                Side::Left => half.max[axis] = mid,
                Side::Right => half.min[axis] = mid,
            }
            if !half.contains(aabb) {
                continue;
            }

            let index = NodeIndex(*next_node_index);
            *next_node_index += 1;
            let child = Some(Box::new(Node::new(index, node.depth() + 1, half)));
            match side {
                Side::Left => node.left = child,
                Side::Right => node.right = child,
            }
            return Some(side);
        }
        None
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
