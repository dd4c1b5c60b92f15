//! Mesh flattening and marker baking.

use nalgebra::Vector4;

use crate::geometry::{encode_uv, BarycentricCoordinate};
use crate::mesh::{AttributeSelection, MeshAssembler, MeshBuffers};

/// Give every triangle corner its own vertex.
///
/// The result has one vertex per source index, in triangle order, so triangle
/// `i` of the output uses vertices `3i`, `3i + 1` and `3i + 2`. Submesh
/// structure is preserved. UV0 holds the source UV0 (zero where absent) and
/// the remaining attributes are copied according to `selection`.
pub fn explode(mesh: &MeshBuffers, selection: AttributeSelection) -> MeshBuffers {
    let mut asm = MeshAssembler::new(mesh, selection);
    asm.reserve(mesh.index_count());

    for (submesh, tri) in mesh.triangles() {
        let corners = tri.map(|v| asm.push_vertex(v, mesh.uv(0, v as usize)));
        asm.push_triangle(submesh, corners);
    }

    asm.finish()
}

/// Plain triangle markers `X, Y, Z` for `count` triangles.
pub fn triangle_markers(count: usize) -> Vec<[BarycentricCoordinate; 3]> {
    vec![
        [
            BarycentricCoordinate::X,
            BarycentricCoordinate::Y,
            BarycentricCoordinate::Z,
        ];
        count
    ]
}

/// Bake one marker per triangle corner into UV0.
///
/// `markers[i]` belongs to the `i`-th triangle in submesh order. Each corner
/// vertex keeps its UV0 `u` and `v`; the marker goes into `z` and `w`. When
/// vertices are shared the last triangle written wins.
pub fn bake_corners(mesh: &mut MeshBuffers, markers: &[[BarycentricCoordinate; 3]]) {
    let n = mesh.vertex_count();
    if mesh.uvs[0].len() != n {
        mesh.uvs[0].resize(n, Vector4::zeros());
    }

    let triangles: Vec<[u32; 3]> = mesh.triangles().map(|(_, tri)| tri).collect();
    for (tri, corners) in triangles.iter().zip(markers) {
        for (&v, &bc) in tri.iter().zip(corners) {
            let uv = &mut mesh.uvs[0][v as usize];
            *uv = encode_uv(*uv, bc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::decode_uv;
    use nalgebra::{Point3, Vector3, Vector4};

    fn two_submeshes() -> MeshBuffers {
        let mut mesh = MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        );
        mesh.submeshes.push(vec![0, 2, 3]);
        mesh.normals = vec![Vector3::z(); 4];
        mesh.uvs[0] = (0..4).map(|i| Vector4::new(i as f64 * 0.25, 0.5, 0.0, 0.0)).collect();
        mesh
    }

    #[test]
    fn test_explode_gives_one_vertex_per_index() {
        let mesh = two_submeshes();
        let flat = explode(&mesh, AttributeSelection::all());

        assert_eq!(flat.vertex_count(), mesh.index_count());
        assert_eq!(flat.submeshes, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(flat.normals.len(), 6);
        assert!(flat.validate().is_ok());

        // Corner 1 of the second triangle is source vertex 2
        assert_eq!(flat.positions[4], mesh.positions[2]);
        assert_eq!(flat.uvs[0][4], mesh.uvs[0][2]);
    }

    #[test]
    fn test_explode_without_uv0_writes_zeros() {
        let mut mesh = two_submeshes();
        mesh.uvs[0].clear();
        let flat = explode(&mesh, AttributeSelection::none());
        assert_eq!(flat.uvs[0], vec![Vector4::zeros(); 6]);
        assert!(flat.normals.is_empty());
    }

    #[test]
    fn test_bake_triangle_markers() {
        let mesh = two_submeshes();
        let mut flat = explode(&mesh, AttributeSelection::all());
        let markers = triangle_markers(flat.triangle_count());
        bake_corners(&mut flat, &markers);

        for (_, tri) in flat.triangles() {
            let sum = tri
                .iter()
                .map(|&v| decode_uv(flat.uvs[0][v as usize]))
                .fold(BarycentricCoordinate::ZERO, |acc, bc| acc + bc);
            assert!(sum.is_unit_sum());
        }
        assert_eq!(decode_uv(flat.uvs[0][1]), BarycentricCoordinate::Y);
        // u and v pass through
        assert_eq!(flat.uvs[0][5].x, 0.75);
        assert_eq!(flat.uvs[0][5].y, 0.5);
    }

    #[test]
    fn test_bake_on_shared_vertices_overwrites() {
        let mut mesh = two_submeshes();
        mesh.uvs[0].clear();
        bake_corners(&mut mesh, &triangle_markers(2));

        // Vertex 0 is corner 0 of both triangles, vertex 2 is corner 2 then corner 1
        assert_eq!(mesh.uvs[0].len(), 4);
        assert_eq!(decode_uv(mesh.uvs[0][0]), BarycentricCoordinate::X);
        assert_eq!(decode_uv(mesh.uvs[0][2]), BarycentricCoordinate::Y);
        assert_eq!(decode_uv(mesh.uvs[0][3]), BarycentricCoordinate::Z);
    }

    #[test]
    fn test_triangle_markers() {
        let markers = triangle_markers(3);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[2][1], BarycentricCoordinate::Y);
    }
}
