//! Flat vertex/index mesh buffers.
//!
//! [`MeshBuffers`] is the host-facing mesh representation consumed and
//! produced by the wireframe generators: a position array, one triangle index
//! list per submesh, and optional per-vertex attributes. An attribute that is
//! absent is stored as an empty vector.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use super::index::SubmeshId;
use crate::error::{Result, WireframeError};

/// Number of UV channels a mesh can carry.
pub const UV_CHANNELS: usize = 4;

/// Skinning influences of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneWeight {
    /// Bone indices into the mesh's bind poses.
    pub indices: [u32; 4],
    /// Influence of each bone.
    pub weights: [f64; 4],
}

/// A triangle mesh as flat vertex and index buffers.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Triangle index lists, one per submesh.
    pub submeshes: Vec<Vec<u32>>,

    /// Per-vertex normals (empty if absent).
    pub normals: Vec<Vector3<f64>>,

    /// Per-vertex tangents, `w` holding handedness (empty if absent).
    pub tangents: Vec<Vector4<f64>>,

    /// Per-vertex RGBA colors (empty if absent).
    pub colors: Vec<Vector4<f64>>,

    /// UV channels 0..=3 as four-component values (each empty if absent).
    pub uvs: [Vec<Vector4<f64>>; UV_CHANNELS],

    /// Per-vertex bone weights (empty if absent).
    pub bone_weights: Vec<BoneWeight>,

    /// Bind pose matrices, one per bone.
    pub bind_poses: Vec<Matrix4<f64>>,
}

impl MeshBuffers {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single-submesh mesh from positions and triangles.
    ///
    /// # Example
    /// ```
    /// use quadwire::mesh::MeshBuffers;
    /// use nalgebra::Point3;
    ///
    /// let mesh = MeshBuffers::from_triangles(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///     ],
    ///     &[[0, 1, 2]],
    /// );
    /// assert_eq!(mesh.triangle_count(), 1);
    /// ```
    pub fn from_triangles(positions: Vec<Point3<f64>>, triangles: &[[u32; 3]]) -> Self {
        let indices = triangles.iter().flat_map(|t| t.iter().copied()).collect();
        Self {
            positions,
            submeshes: vec![indices],
            ..Self::default()
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Total number of indices across all submeshes.
    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    /// Total number of triangles across all submeshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Number of submeshes.
    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Iterate over all triangles in submesh order.
    ///
    /// A trailing partial triangle of a malformed index list is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = (SubmeshId, [u32; 3])> + '_ {
        self.submeshes.iter().enumerate().flat_map(|(s, indices)| {
            indices
                .chunks_exact(3)
                .map(move |c| (SubmeshId::new(s), [c[0], c[1], c[2]]))
        })
    }

    /// Whether the given UV channel is present.
    #[inline]
    pub fn has_uv(&self, channel: usize) -> bool {
        !self.uvs[channel].is_empty()
    }

    /// UV of a vertex in a channel, zero when the channel is absent.
    #[inline]
    pub fn uv(&self, channel: usize, vertex: usize) -> Vector4<f64> {
        self.uvs[channel].get(vertex).copied().unwrap_or_else(Vector4::zeros)
    }

    /// Check the mesh is well formed.
    ///
    /// Rejects meshes without triangles, with fewer than three vertices, with
    /// index lists that are not whole triangles, with out-of-range indices, or
    /// with per-vertex attributes whose length differs from the vertex count.
    pub fn validate(&self) -> Result<()> {
        if self.triangle_count() == 0 {
            return Err(WireframeError::EmptyMesh);
        }
        if self.vertex_count() < 3 {
            return Err(WireframeError::TooFewVertices {
                count: self.vertex_count(),
            });
        }

        let n = self.vertex_count();
        for (s, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(WireframeError::MalformedIndexList {
                    submesh: s,
                    len: indices.len(),
                });
            }
            for (i, &vi) in indices.iter().enumerate() {
                if vi as usize >= n {
                    return Err(WireframeError::InvalidVertexIndex {
                        submesh: s,
                        triangle: i / 3,
                        vertex: vi as usize,
                    });
                }
            }
        }

        check_len("normals", self.normals.len(), n)?;
        check_len("tangents", self.tangents.len(), n)?;
        check_len("colors", self.colors.len(), n)?;
        check_len("uv0", self.uvs[0].len(), n)?;
        check_len("uv1", self.uvs[1].len(), n)?;
        check_len("uv2", self.uvs[2].len(), n)?;
        check_len("uv3", self.uvs[3].len(), n)?;
        check_len("bone_weights", self.bone_weights.len(), n)?;

        Ok(())
    }

    /// Compute the axis-aligned bounding box.
    ///
    /// Returns None if the mesh has no vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }

    /// Area of the triangle with the given corner indices.
    pub fn triangle_area(&self, tri: [u32; 3]) -> f64 {
        let p0 = &self.positions[tri[0] as usize];
        let p1 = &self.positions[tri[1] as usize];
        let p2 = &self.positions[tri[2] as usize];
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|(_, t)| self.triangle_area(t)).sum()
    }
}

/// An optional attribute must be absent or exactly one per vertex.
fn check_len(attribute: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != 0 && actual != expected {
        return Err(WireframeError::AttributeLength {
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> MeshBuffers {
        MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_counts() {
        let mesh = two_triangles();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.submesh_count(), 1);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_triangles_iterates_all_submeshes() {
        let mut mesh = two_triangles();
        mesh.submeshes = vec![vec![0, 1, 2], vec![0, 2, 3]];
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0], (SubmeshId::new(0), [0, 1, 2]));
        assert_eq!(tris[1], (SubmeshId::new(1), [0, 2, 3]));
    }

    #[test]
    fn test_validate_empty() {
        let mesh = MeshBuffers::new();
        assert!(matches!(mesh.validate(), Err(WireframeError::EmptyMesh)));
    }

    #[test]
    fn test_validate_too_few_vertices() {
        let mesh = MeshBuffers::from_triangles(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            &[[0, 1, 1]],
        );
        assert!(matches!(
            mesh.validate(),
            Err(WireframeError::TooFewVertices { count: 2 })
        ));
    }

    #[test]
    fn test_validate_index_out_of_range() {
        let mut mesh = two_triangles();
        mesh.submeshes[0][4] = 9;
        match mesh.validate() {
            Err(WireframeError::InvalidVertexIndex {
                submesh,
                triangle,
                vertex,
            }) => {
                assert_eq!(submesh, 0);
                assert_eq!(triangle, 1);
                assert_eq!(vertex, 9);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_malformed_index_list() {
        let mut mesh = two_triangles();
        mesh.submeshes[0].push(1);
        assert!(matches!(
            mesh.validate(),
            Err(WireframeError::MalformedIndexList { submesh: 0, len: 7 })
        ));
    }

    #[test]
    fn test_validate_attribute_length() {
        let mut mesh = two_triangles();
        mesh.normals = vec![Vector3::z(); 3];
        assert!(matches!(
            mesh.validate(),
            Err(WireframeError::AttributeLength {
                attribute: "normals",
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_uv_defaults_to_zero() {
        let mesh = two_triangles();
        assert!(!mesh.has_uv(0));
        assert_eq!(mesh.uv(0, 2), Vector4::zeros());
    }

    #[test]
    fn test_geometry() {
        let mesh = two_triangles();
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }
}
