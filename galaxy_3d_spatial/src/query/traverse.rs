/// Top-down traversals shared by all stateless queries.
///
/// Classification rule: a node is tested against the shape only while its
/// parent is `Intersect`. An `Inside` parent passes `Inside` down without
/// re-testing (every descendant AABB is enclosed by the parent's), and an
/// `Outside` classification prunes the subtree.

use crate::math::Classification;
use crate::{spatial_trace, spatial_warn};
use crate::tree::{Item, Node, Tree};
use super::QueryShape;

/// Warn when `tree` has pending changes that a query would not see.
pub(crate) fn warn_if_dirty<T>(tree: &Tree<T>, source: &str) {
    if tree.is_dirty() {
        spatial_warn!(source, "Querying a dirty tree (generation {}); call root_or_rebuild() first",
            tree.generation());
    }
}

/// Classification of `node` given its parent's classification.
pub(crate) fn classify_node<T, S: QueryShape>(
    node: &Node<T>,
    shape: &S,
    parent: Classification,
) -> Classification {
    match parent {
        Classification::Intersect => shape.classify(node.aabb()),
        inherited => inherited,
    }
}

/// Append the items of `node` accepted by the item-AABB test and `exact`.
fn collect_items<T, S, F>(
    node: &Node<T>,
    shape: &S,
    state: Classification,
    exact: &mut F,
    out: &mut Vec<T>,
) where
    T: Clone,
    S: QueryShape,
    F: FnMut(&Item<T>, &S) -> bool,
{
    for item in node.items() {
        let hit = state == Classification::Inside || shape.intersects(item.aabb());
        if hit && exact(item, shape) {
            out.push(item.payload().clone());
        }
    }
}

/// Recursive pre-order collection, left before right.
pub(crate) fn collect_recursive<T, S, F>(
    node: &Node<T>,
    shape: &S,
    parent: Classification,
    exact: &mut F,
    out: &mut Vec<T>,
) where
    T: Clone,
    S: QueryShape,
    F: FnMut(&Item<T>, &S) -> bool,
{
    let state = classify_node(node, shape, parent);
    if state == Classification::Outside {
        return;
    }
    spatial_trace!("galaxy3d::Query", "node {} depth {} -> {:?}", node.index().0, node.depth(), state);

    collect_items(node, shape, state, exact, out);
    for child in node.children() {
        collect_recursive(child, shape, state, exact, out);
    }
}

/// Explicit-stack variant of `collect_recursive`, same output order.
pub(crate) fn collect_iterative<T, S, F>(
    root: &Node<T>,
    shape: &S,
    exact: &mut F,
    out: &mut Vec<T>,
) where
    T: Clone,
    S: QueryShape,
    F: FnMut(&Item<T>, &S) -> bool,
{
    let mut stack = vec![(root, Classification::Intersect)];

    while let Some((node, parent)) = stack.pop() {
        let state = classify_node(node, shape, parent);
        if state == Classification::Outside {
            continue;
        }

        collect_items(node, shape, state, exact, out);

        if let Some(right) = node.right() {
            stack.push((right, state));
        }
        if let Some(left) = node.left() {
            stack.push((left, state));
        }
    }
}
