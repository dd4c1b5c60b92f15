//! Triangle arena and neighbor relationships.

use nalgebra::{Point3, Vector3};

use crate::geometry::{BarycentricCoordinate, Edge, QuantizedVertex};
use crate::mesh::{MeshBuffers, SubmeshId, TriangleId};

/// The corner opposite each local edge: edge `e` runs from corner `e` to
/// corner `(e + 1) % 3`, so its top vertex is corner `TOP_VERTEX[e]`.
pub const TOP_VERTEX: [usize; 3] = [2, 0, 1];

/// How a triangle sees one of its edge-sharing neighbors.
///
/// Relationships are directed: each triangle of a pair stores its own view,
/// with `edge_index` and `connect` expressed in its own local corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRelationship {
    /// Which local edge of the owner is shared.
    pub edge_index: usize,

    /// For each owner corner, the neighbor corner at the same position.
    pub connect: [Option<usize>; 3],

    /// Signed squared normal alignment.
    pub dot: f64,

    /// Corner angle closeness to 90 degrees.
    pub angle: f64,

    /// Tip distance versus shared edge length.
    pub parallel: f64,

    /// Area ratio.
    pub area: f64,
}

impl NeighborRelationship {
    /// Create a relationship with unscored metrics.
    pub fn new(edge_index: usize, connect: [Option<usize>; 3]) -> Self {
        Self {
            edge_index,
            connect,
            dot: 0.0,
            angle: 0.0,
            parallel: 0.0,
            area: 0.0,
        }
    }

    /// Combined score: the mean of the four metrics.
    #[inline]
    pub fn weight(&self) -> f64 {
        (self.dot + self.angle + self.parallel + self.area) / 4.0
    }

    /// Number of owner corners that coincide with a neighbor corner.
    pub fn shared_corner_count(&self) -> usize {
        self.connect.iter().filter(|c| c.is_some()).count()
    }

    /// The neighbor corner not on the shared edge.
    ///
    /// None unless exactly two owner corners map to two distinct neighbor
    /// corners.
    pub fn neighbor_top_corner(&self) -> Option<usize> {
        let mut shared = self.connect.iter().flatten();
        match (shared.next(), shared.next(), shared.next()) {
            (Some(&a), Some(&b), None) if a != b && a < 3 && b < 3 => Some(3 - a - b),
            _ => None,
        }
    }
}

/// One face of the mesh being converted.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Position in the arena.
    pub id: TriangleId,

    /// Submesh the triangle came from.
    pub submesh: SubmeshId,

    /// Vertex indices into the mesh the set was built from.
    pub vertices: [u32; 3],

    /// Unit face normal, zero for a degenerate triangle.
    pub normal: Vector3<f64>,

    /// Triangle area.
    pub area: f64,

    /// `edges[k]` runs from corner `k` to corner `(k + 1) % 3`.
    pub edges: [Edge; 3],

    /// Per-corner markers.
    pub corners: [BarycentricCoordinate; 3],

    neighbors: Vec<(TriangleId, NeighborRelationship)>,
    mate: Option<TriangleId>,
}

impl Triangle {
    /// Build a triangle from its three corner positions.
    ///
    /// Positions are quantized; normal and area come from the quantized
    /// corners.
    pub fn new(
        id: TriangleId,
        submesh: SubmeshId,
        vertices: [u32; 3],
        positions: [&Point3<f64>; 3],
    ) -> Self {
        let q = positions.map(QuantizedVertex::new);
        let edges = [
            Edge::new(q[0], q[1]),
            Edge::new(q[1], q[2]),
            Edge::new(q[2], q[0]),
        ];

        let p0 = q[0].position();
        let cross = (q[1].position() - p0).cross(&(q[2].position() - p0));
        let len = cross.norm();
        let normal = if len > 0.0 { cross / len } else { Vector3::zeros() };

        Self {
            id,
            submesh,
            vertices,
            normal,
            area: 0.5 * len,
            edges,
            corners: [
                BarycentricCoordinate::X,
                BarycentricCoordinate::Y,
                BarycentricCoordinate::Z,
            ],
            neighbors: Vec::new(),
            mate: None,
        }
    }

    /// Quantized position of corner `k`.
    #[inline]
    pub fn corner_position(&self, k: usize) -> Point3<f64> {
        self.edges[k].v1.position()
    }

    /// Neighbors with their relationships, ascending by id.
    #[inline]
    pub fn neighbors(&self) -> &[(TriangleId, NeighborRelationship)] {
        &self.neighbors
    }

    /// Relationship to a specific neighbor.
    pub fn neighbor(&self, other: TriangleId) -> Option<&NeighborRelationship> {
        self.neighbors
            .binary_search_by_key(&other, |(id, _)| *id)
            .ok()
            .map(|i| &self.neighbors[i].1)
    }

    /// The triangle this one was paired with.
    #[inline]
    pub fn mate(&self) -> Option<TriangleId> {
        self.mate
    }

    /// Whether the triangle has been paired.
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.mate.is_some()
    }

    pub(crate) fn neighbors_mut(&mut self) -> &mut Vec<(TriangleId, NeighborRelationship)> {
        &mut self.neighbors
    }

    /// Record the pairing; the triangle takes no further part in matching.
    pub(crate) fn set_mate(&mut self, mate: TriangleId) {
        self.mate = Some(mate);
        self.neighbors.clear();
    }
}

/// All triangles of one conversion pass, addressed by [`TriangleId`].
#[derive(Debug, Clone, Default)]
pub struct TriangleSet {
    triangles: Vec<Triangle>,
}

impl TriangleSet {
    /// Build one triangle per mesh triangle, in submesh order.
    ///
    /// The mesh must have passed [`MeshBuffers::validate`].
    pub fn from_mesh(mesh: &MeshBuffers) -> Self {
        let triangles = mesh
            .triangles()
            .enumerate()
            .map(|(i, (submesh, tri))| {
                let positions = tri.map(|v| &mesh.positions[v as usize]);
                Triangle::new(TriangleId::new(i), submesh, tri, positions)
            })
            .collect();
        Self { triangles }
    }

    /// Number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get a triangle.
    #[inline]
    pub fn get(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// Get a triangle mutably.
    #[inline]
    pub fn get_mut(&mut self, id: TriangleId) -> &mut Triangle {
        &mut self.triangles[id.index()]
    }

    /// Iterate over triangles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Iterate over all ids.
    pub fn ids(&self) -> impl Iterator<Item = TriangleId> {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Each matched pair once, as `(lower id, higher id)`.
    pub fn matched_pairs(&self) -> Vec<(TriangleId, TriangleId)> {
        self.triangles
            .iter()
            .filter_map(|t| t.mate.filter(|&m| t.id < m).map(|m| (t.id, m)))
            .collect()
    }

    /// Per-triangle corner markers in id order.
    pub fn corner_markers(&self) -> Vec<[BarycentricCoordinate; 3]> {
        self.triangles.iter().map(|t| t.corners).collect()
    }

    /// Mutable access to two distinct triangles at once.
    pub(crate) fn pair_mut(&mut self, a: TriangleId, b: TriangleId) -> (&mut Triangle, &mut Triangle) {
        assert_ne!(a, b, "a triangle cannot pair with itself");
        let (i, j) = (a.index(), b.index());
        if i < j {
            let (lo, hi) = self.triangles.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.triangles.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> Triangle {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        Triangle::new(TriangleId::new(0), SubmeshId::new(0), [0, 1, 2], [&p[0], &p[1], &p[2]])
    }

    #[test]
    fn test_triangle_geometry() {
        let t = right_triangle();
        assert!((t.area - 2.0).abs() < 1e-12);
        assert!((t.normal - Vector3::z()).norm() < 1e-12);
        assert_eq!(t.corner_position(1), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(t.corners[2], BarycentricCoordinate::Z);
        assert!(!t.is_matched());
    }

    #[test]
    fn test_edge_convention() {
        let t = right_triangle();
        for k in 0..3 {
            assert_eq!(t.edges[k].v1, t.edges[(k + 2) % 3].v2);
            // The top vertex is the one corner the edge does not touch
            let top = t.corner_position(TOP_VERTEX[k]);
            assert_ne!(top, t.edges[k].v1.position());
            assert_ne!(top, t.edges[k].v2.position());
        }
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let t = Triangle::new(TriangleId::new(0), SubmeshId::new(0), [0, 1, 2], [&p, &p, &p]);
        assert_eq!(t.normal, Vector3::zeros());
        assert_eq!(t.area, 0.0);
    }

    #[test]
    fn test_relationship_weight_and_top() {
        let mut rel = NeighborRelationship::new(0, [Some(1), Some(0), None]);
        rel.dot = 1.0;
        rel.angle = 0.5;
        rel.parallel = 0.5;
        rel.area = 0.0;
        assert!((rel.weight() - 0.5).abs() < 1e-12);
        assert_eq!(rel.shared_corner_count(), 2);
        assert_eq!(rel.neighbor_top_corner(), Some(2));

        let rel = NeighborRelationship::new(1, [None, Some(2), Some(1)]);
        assert_eq!(rel.neighbor_top_corner(), Some(0));

        let rel = NeighborRelationship::new(1, [Some(0), Some(2), Some(1)]);
        assert_eq!(rel.neighbor_top_corner(), None);

        let rel = NeighborRelationship::new(0, [Some(1), Some(1), None]);
        assert_eq!(rel.neighbor_top_corner(), None);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mesh = MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        );
        let mut set = TriangleSet::from_mesh(&mesh);
        let (b, a) = set.pair_mut(TriangleId::new(1), TriangleId::new(0));
        assert_eq!(a.id, TriangleId::new(0));
        assert_eq!(b.id, TriangleId::new(1));
    }
}
