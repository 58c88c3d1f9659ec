//! Query module: stateless and delta queries over a `Tree`.
//!
//! All queries share one traversal: start at the root as `Intersect`,
//! prune `Outside` subtrees, test items against their own AABB, and pass
//! `Inside` down to children without re-testing.

mod delta;
mod query;
mod shape;
mod traverse;

pub use delta::{DeltaAabbQuery, DeltaFrustumQuery, DeltaQuery, DeltaRayQuery, DeltaResult};
pub use query::{AabbQuery, FrustumQuery, Query, RayQuery};
pub use shape::QueryShape;
