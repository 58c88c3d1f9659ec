/// PrimitiveIndex: a `Tree<Primitive>` over one position/index buffer.
///
/// The index copies the positions it was built from so that exact
/// ray/primitive tests can run against it later. It is immutable once built.

use glam::Vec3;
use crate::error::Result;
use crate::math::AABB;
use crate::tree::{Tree, TreeConfig};
use crate::{spatial_bail, spatial_debug, spatial_err};
use super::{Primitive, PrimitiveKind, PrimitiveTopology};

/// Default inflation applied to point and line AABBs
pub const DEFAULT_PADDING: f32 = 0.01;

/// Primitive index configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveIndexConfig {
    /// Configuration of the underlying tree
    pub tree: TreeConfig,
    /// Amount added on every side of point and line AABBs, so that
    /// zero-thickness primitives can be reached by threshold tests
    pub padding: f32,
}

impl Default for PrimitiveIndexConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            padding: DEFAULT_PADDING,
        }
    }
}

/// Spatial index over the primitives of one geometry buffer
#[derive(Debug)]
pub struct PrimitiveIndex {
    tree: Tree<Primitive>,
    positions: Vec<Vec3>,
    topology: PrimitiveTopology,
    primitive_count: usize,
}

impl PrimitiveIndex {
    /// Decompose `positions`/`indices` into primitives and index them.
    ///
    /// With `indices == None` the positions are consumed in order.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if an index is out of range, or if a list topology
    /// gets a vertex count that is not a multiple of its primitive size.
    pub fn build(
        positions: &[Vec3],
        indices: Option<&[u32]>,
        topology: PrimitiveTopology,
        config: &PrimitiveIndexConfig,
    ) -> Result<Self> {
        let sequential: Vec<u32>;
        let sequence = match indices {
            Some(indices) => {
                if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
                    spatial_bail!(geometry, "galaxy3d::PrimitiveIndex",
                        "index {} out of range for {} positions", bad, positions.len());
                }
                indices
            }
            None => {
                let count = u32::try_from(positions.len()).map_err(|_| {
                    spatial_err!(geometry, "galaxy3d::PrimitiveIndex",
                        "{} positions exceed the u32 index range", positions.len())
                })?;
                sequential = (0..count).collect();
                &sequential
            }
        };

        let primitives = topology.decompose(sequence)?;
        let primitive_count = primitives.len();

        let mut index = Self {
            tree: Tree::new(config.tree),
            positions: positions.to_vec(),
            topology,
            primitive_count,
        };
        let items: Vec<(Primitive, AABB)> = primitives
            .into_iter()
            .map(|primitive| {
                let aabb = index.primitive_aabb(&primitive, config.padding);
                (primitive, aabb)
            })
            .collect();
        index.tree.build(items)?;

        spatial_debug!("galaxy3d::PrimitiveIndex",
            "Indexed {} {:?} primitives over {} positions ({} nodes)",
            primitive_count, topology, index.positions.len(), index.tree.node_count());
        Ok(index)
    }

    /// Like `build`, for a tightly packed `x, y, z, x, y, z, ...` buffer.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if the length is not a multiple of 3, plus every
    /// error of `build`.
    pub fn from_flat_positions(
        positions: &[f32],
        indices: Option<&[u32]>,
        topology: PrimitiveTopology,
        config: &PrimitiveIndexConfig,
    ) -> Result<Self> {
        let positions: &[Vec3] = bytemuck::try_cast_slice(positions).map_err(|e| {
            spatial_err!(geometry, "galaxy3d::PrimitiveIndex",
                "{} floats is not a whole number of positions ({:?})", positions.len(), e)
        })?;
        Self::build(positions, indices, topology, config)
    }

    /// Tree over the primitives
    pub fn tree(&self) -> &Tree<Primitive> {
        &self.tree
    }

    /// Positions the primitives index into
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Topology the index was built with
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Kind of every primitive in this index
    pub fn kind(&self) -> PrimitiveKind {
        self.topology.kind()
    }

    /// Number of indexed primitives
    pub fn len(&self) -> usize {
        self.primitive_count
    }

    /// Whether no primitive was produced
    pub fn is_empty(&self) -> bool {
        self.primitive_count == 0
    }

    /// Position of vertex `index`
    pub fn position(&self, index: u32) -> Vec3 {
        self.positions[index as usize]
    }

    /// Vertex positions of `primitive`, in winding order
    pub fn vertices<'a>(&'a self, primitive: &'a Primitive) -> impl Iterator<Item = Vec3> + 'a {
        primitive.indices().iter().map(move |&i| self.position(i))
    }

    /// Average of the vertex positions of `primitive`
    pub fn centroid(&self, primitive: &Primitive) -> Vec3 {
        let sum: Vec3 = self.vertices(primitive).sum();
        sum / primitive.indices().len() as f32
    }

    fn primitive_aabb(&self, primitive: &Primitive, padding: f32) -> AABB {
        let aabb = AABB::from_points(self.vertices(primitive));
        match primitive.kind() {
            PrimitiveKind::Triangle => aabb,
            PrimitiveKind::Point | PrimitiveKind::Line => aabb.padded(padding),
        }
    }
}

#[cfg(test)]
#[path = "primitive_index_tests.rs"]
mod tests;
