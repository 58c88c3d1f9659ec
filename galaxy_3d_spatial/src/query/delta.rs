/// Delta queries: report only classification changes between executions.
///
/// A delta query remembers the last classification of every node and item
/// it visited. Each `execute()` walks the tree like a stateless query but
/// emits an item only when its classification differs from the cached one.
///
/// Pruning: a node that is `Outside` now and was `Outside` on the previous
/// execution is skipped without descending. Nothing beneath it can have
/// changed, because everything beneath it was already recorded `Outside`
/// when the node last left the shape.
///
/// Unknown nodes and items count as `Outside`, so the first execution
/// reports every current match. Switching trees, or a rebuild of the same
/// tree (new generation), drops both caches, which makes the next execution
/// a full resynchronization.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::math::{AABB, Classification, Frustum, Ray};
use crate::tree::{ItemIndex, Node, NodeIndex, Tree};
use crate::{spatial_bail, spatial_debug};
use super::traverse::{classify_node, warn_if_dirty};
use super::QueryShape;

/// Delta query over a box
pub type DeltaAabbQuery<T> = DeltaQuery<AABB, T>;

/// Delta query over a frustum (view culling)
pub type DeltaFrustumQuery<T> = DeltaQuery<Frustum, T>;

/// Delta query over a ray
pub type DeltaRayQuery<T> = DeltaQuery<Ray, T>;

/// Items whose classification changed, with their new classification.
///
/// `items[i]` changed to `states[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaResult<T> {
    /// Changed payloads, in traversal order
    pub items: Vec<T>,
    /// New classification of each changed payload
    pub states: Vec<Classification>,
}

impl<T> Default for DeltaResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            states: Vec::new(),
        }
    }
}

impl<T> DeltaResult<T> {
    /// Number of changed items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate `(payload, new classification)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&T, Classification)> {
        self.items.iter().zip(self.states.iter().copied())
    }

    fn clear(&mut self) {
        self.items.clear();
        self.states.clear();
    }

    fn push(&mut self, item: T, state: Classification) {
        self.items.push(item);
        self.states.push(state);
    }
}

/// Per-node and per-item classification caches.
#[derive(Debug, Default, Clone)]
struct StateCache {
    nodes: FxHashMap<NodeIndex, Classification>,
    items: FxHashMap<ItemIndex, Classification>,
}

impl StateCache {
    /// Store `state` for `index`, returning the previous state.
    ///
    /// `Outside` is the implicit default, so it is stored as an absent entry.
    fn swap_node(&mut self, index: NodeIndex, state: Classification) -> Classification {
        let previous = if state == Classification::Outside {
            self.nodes.remove(&index)
        } else {
            self.nodes.insert(index, state)
        };
        previous.unwrap_or(Classification::Outside)
    }

    fn swap_item(&mut self, index: ItemIndex, state: Classification) -> Classification {
        let previous = if state == Classification::Outside {
            self.items.remove(&index)
        } else {
            self.items.insert(index, state)
        };
        previous.unwrap_or(Classification::Outside)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.items.clear();
    }
}

/// Incremental query reporting classification transitions.
#[derive(Debug, Clone)]
pub struct DeltaQuery<S, T> {
    shape: S,
    cache: StateCache,
    /// Tree id and generation the cache describes
    synced: Option<(u64, u64)>,
    result: DeltaResult<T>,
    destroyed: bool,
}

impl<S: QueryShape, T: Clone> DeltaQuery<S, T> {
    /// Create a delta query with empty caches.
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            cache: StateCache::default(),
            synced: None,
            result: DeltaResult::default(),
            destroyed: false,
        }
    }

    /// The query shape
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Replace the shape, keeping the caches so that the next execution
    /// reports only what the new shape changes.
    pub fn set_shape(&mut self, shape: S) {
        self.shape = shape;
    }

    /// Changes reported by the last execution
    pub fn result(&self) -> &DeltaResult<T> {
        &self.result
    }

    /// Forget all cached classifications.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.synced = None;
    }

    /// Number of items currently cached as `Intersect` or `Inside`
    pub fn tracked_item_count(&self) -> usize {
        self.cache.items.len()
    }

    /// Whether `destroy()` has been called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Release caches and results. Every later execution fails.
    pub fn destroy(&mut self) {
        self.cache = StateCache::default();
        self.result = DeltaResult::default();
        self.destroyed = true;
    }

    /// Walk `tree` and report items whose classification changed.
    ///
    /// Executing against another tree than last time, or against a rebuilt
    /// one, drops the caches first. A dirty tree is walked as last built;
    /// call `Tree::root_or_rebuild()` beforehand to see pending changes.
    pub fn execute(&mut self, tree: &Tree<T>) -> Result<&DeltaResult<T>> {
        if self.destroyed {
            spatial_bail!(destroyed, "galaxy3d::DeltaQuery", "delta query");
        }
        let root = tree.root()?;
        warn_if_dirty(tree, "galaxy3d::DeltaQuery");

        let current = (tree.id(), tree.generation());
        if self.synced != Some(current) {
            match self.synced {
                Some((id, _)) if id != current.0 => spatial_debug!("galaxy3d::DeltaQuery",
                    "Switched from tree {} to tree {}, dropping cached states", id, current.0),
                Some(_) => spatial_debug!("galaxy3d::DeltaQuery",
                    "Tree rebuilt (generation {}), dropping cached states", current.1),
                None => {}
            }
            self.cache.clear();
            self.synced = Some(current);
        }

        self.result.clear();
        if let Some(root) = root {
            Self::visit(root, &self.shape, Classification::Intersect, &mut self.cache, &mut self.result);
        }
        Ok(&self.result)
    }

    fn visit(
        node: &Node<T>,
        shape: &S,
        parent: Classification,
        cache: &mut StateCache,
        out: &mut DeltaResult<T>,
    ) {
        let state = classify_node(node, shape, parent);
        let previous = cache.swap_node(node.index(), state);
        if state == Classification::Outside && previous == Classification::Outside {
            return;
        }

        for item in node.items() {
            let item_state = match state {
                Classification::Intersect => shape.classify(item.aabb()),
                inherited => inherited,
            };
            if cache.swap_item(item.index(), item_state) != item_state {
                out.push(item.payload().clone(), item_state);
            }
        }

        for child in node.children() {
            Self::visit(child, shape, state, cache, out);
        }
    }
}
