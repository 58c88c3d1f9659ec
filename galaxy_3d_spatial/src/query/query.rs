/// Stateless queries: AABB, frustum and ray.
///
/// A query owns its shape and a result buffer that is cleared and
/// refilled by each `execute()`. Results are payload clones in pre-order,
/// left child before right child.

use crate::error::Result;
use crate::math::{AABB, Classification, Frustum, Ray};
use crate::spatial_bail;
use crate::tree::{Item, Tree};
use super::traverse::{collect_iterative, collect_recursive, warn_if_dirty};
use super::QueryShape;

/// Query of all items whose AABB intersects a box
pub type AabbQuery<T> = Query<AABB, T>;

/// Query of all items whose AABB intersects a frustum
pub type FrustumQuery<T> = Query<Frustum, T>;

/// Query of all items whose AABB is hit by a ray
pub type RayQuery<T> = Query<Ray, T>;

/// Stateless tree query over any `QueryShape`.
#[derive(Debug, Clone)]
pub struct Query<S, T> {
    shape: S,
    results: Vec<T>,
    destroyed: bool,
}

impl<S: QueryShape, T: Clone> Query<S, T> {
    /// Create a query for `shape` with an empty result buffer.
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            results: Vec::new(),
            destroyed: false,
        }
    }

    /// The query shape
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Replace the query shape. Results are kept until the next `execute()`.
    pub fn set_shape(&mut self, shape: S) {
        self.shape = shape;
    }

    /// Results of the last execution
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Whether `destroy()` has been called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Release the result buffer. Every later execution fails.
    pub fn destroy(&mut self) {
        self.results = Vec::new();
        self.destroyed = true;
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            spatial_bail!(destroyed, "galaxy3d::Query", "query");
        }
        Ok(())
    }

    /// Collect every item whose AABB passes the shape test.
    ///
    /// The tree is walked as last built, even when dirty; call
    /// `Tree::root_or_rebuild()` first to pick up pending changes.
    pub fn execute(&mut self, tree: &Tree<T>) -> Result<&[T]> {
        self.execute_with(tree, |_, _| true)
    }

    /// Like `execute`, but an item is only accepted if `exact` also accepts it.
    ///
    /// `exact` receives items whose AABB already passed the shape test,
    /// e.g. to run a ray/primitive intersection.
    pub fn execute_with<F>(&mut self, tree: &Tree<T>, mut exact: F) -> Result<&[T]>
    where
        F: FnMut(&Item<T>, &S) -> bool,
    {
        self.ensure_alive()?;
        self.results.clear();
        warn_if_dirty(tree, "galaxy3d::Query");
        if let Some(root) = tree.root()? {
            collect_recursive(root, &self.shape, Classification::Intersect, &mut exact, &mut self.results);
        }
        Ok(&self.results)
    }

    /// Explicit-stack variant of `execute`, for trees deeper than the
    /// default `max_depth`. Produces the same results in the same order.
    pub fn execute_iterative(&mut self, tree: &Tree<T>) -> Result<&[T]> {
        self.ensure_alive()?;
        self.results.clear();
        warn_if_dirty(tree, "galaxy3d::Query");
        if let Some(root) = tree.root()? {
            collect_iterative(root, &self.shape, &mut |_: &Item<T>, _: &S| true, &mut self.results);
        }
        Ok(&self.results)
    }
}
