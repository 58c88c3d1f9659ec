/// Primitive, PrimitiveKind and PrimitiveTopology
///
/// A `Primitive` is a point, line or triangle addressed by vertex indices
/// into the position buffer it was decomposed from.

use crate::error::Result;
use crate::spatial_bail;

/// How a vertex sequence is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// One point per vertex
    PointList,
    /// One line per pair of vertices
    LineList,
    /// One line between each consecutive pair of vertices
    LineStrip,
    /// One triangle per three vertices
    TriangleList,
    /// One triangle per vertex after the first two, alternating winding
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Kind of primitive this topology produces
    pub fn kind(self) -> PrimitiveKind {
        match self {
            PrimitiveTopology::PointList => PrimitiveKind::Point,
            PrimitiveTopology::LineList | PrimitiveTopology::LineStrip => PrimitiveKind::Line,
            PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => PrimitiveKind::Triangle,
        }
    }

    /// Split a vertex sequence into primitives.
    ///
    /// `sequence` holds vertex indices (the index buffer, or `0..n` for
    /// non-indexed geometry). List topologies require a length that is a
    /// multiple of the primitive size. Strips skip degenerate triangles.
    pub fn decompose(self, sequence: &[u32]) -> Result<Vec<Primitive>> {
        let stride = self.kind().vertex_count();
        let is_list = matches!(
            self,
            PrimitiveTopology::LineList | PrimitiveTopology::TriangleList
        );
        if is_list && sequence.len() % stride != 0 {
            spatial_bail!(geometry, "galaxy3d::Primitive",
                "{:?} needs a multiple of {} indices, got {}", self, stride, sequence.len());
        }

        let primitives = match self {
            PrimitiveTopology::PointList => {
                sequence.iter().map(|&a| Primitive::Point([a])).collect()
            }
            PrimitiveTopology::LineList => {
                sequence.chunks_exact(2).map(|v| Primitive::Line([v[0], v[1]])).collect()
            }
            PrimitiveTopology::LineStrip => {
                sequence.windows(2).map(|v| Primitive::Line([v[0], v[1]])).collect()
            }
            PrimitiveTopology::TriangleList => {
                sequence.chunks_exact(3).map(|v| Primitive::Triangle([v[0], v[1], v[2]])).collect()
            }
            PrimitiveTopology::TriangleStrip => {
                sequence
                    .windows(3)
                    .enumerate()
                    .filter(|(_, v)| v[0] != v[1] && v[1] != v[2] && v[0] != v[2])
                    .map(|(i, v)| {
                        if i % 2 == 0 {
                            Primitive::Triangle([v[0], v[1], v[2]])
                        } else {
                            Primitive::Triangle([v[1], v[0], v[2]])
                        }
                    })
                    .collect()
            }
        };
        Ok(primitives)
    }
}

/// Point, line or triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Point,
    Line,
    Triangle,
}

impl PrimitiveKind {
    /// Number of vertices of one primitive of this kind
    pub fn vertex_count(self) -> usize {
        match self {
            PrimitiveKind::Point => 1,
            PrimitiveKind::Line => 2,
            PrimitiveKind::Triangle => 3,
        }
    }
}

/// One indexed primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Point([u32; 1]),
    Line([u32; 2]),
    Triangle([u32; 3]),
}

impl Primitive {
    /// Vertex indices, in winding order
    pub fn indices(&self) -> &[u32] {
        match self {
            Primitive::Point(v) => &v[..],
            Primitive::Line(v) => &v[..],
            Primitive::Triangle(v) => &v[..],
        }
    }

    /// Kind of this primitive
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Point(_) => PrimitiveKind::Point,
            Primitive::Line(_) => PrimitiveKind::Line,
            Primitive::Triangle(_) => PrimitiveKind::Triangle,
        }
    }
}

#[cfg(test)]
#[path = "primitive_tests.rs"]
mod tests;
