//! Mesh construction utilities.
//!
//! This module provides [`MeshAssembler`], which builds an output mesh by
//! pulling vertices out of a source mesh, and [`merge_meshes`], which
//! concatenates meshes that share a submesh layout.

use nalgebra::Vector4;

use super::buffers::{MeshBuffers, UV_CHANNELS};
use super::index::SubmeshId;

/// Which source attributes are carried over to a generated mesh.
///
/// UV channel 0 is always written with the baked barycentric payload and is
/// therefore not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSelection {
    /// Keep UV channel 1.
    pub use_uv2: bool,
    /// Keep UV channel 2.
    pub use_uv3: bool,
    /// Keep UV channel 3.
    pub use_uv4: bool,
    /// Keep normals.
    pub use_normals: bool,
    /// Keep tangents.
    pub use_tangents: bool,
    /// Keep vertex colors.
    pub use_colors: bool,
    /// Keep bone weights and bind poses.
    pub use_skin: bool,
}

impl Default for AttributeSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl AttributeSelection {
    /// Keep every attribute.
    pub fn all() -> Self {
        Self {
            use_uv2: true,
            use_uv3: true,
            use_uv4: true,
            use_normals: true,
            use_tangents: true,
            use_colors: true,
            use_skin: true,
        }
    }

    /// Keep positions and the baked UV channel only.
    pub fn none() -> Self {
        Self {
            use_uv2: false,
            use_uv3: false,
            use_uv4: false,
            use_normals: false,
            use_tangents: false,
            use_colors: false,
            use_skin: false,
        }
    }

    /// Whether UV channel `channel` (1..=3) is kept.
    pub fn keeps_uv(&self, channel: usize) -> bool {
        match channel {
            1 => self.use_uv2,
            2 => self.use_uv3,
            3 => self.use_uv4,
            _ => false,
        }
    }
}

/// Builds a mesh from vertices of a source mesh.
///
/// Each pushed vertex copies the selected attributes of one source vertex and
/// takes an explicit UV0 value. Triangles are appended to submesh slots that
/// mirror the source's submesh layout.
///
/// # Example
/// ```
/// use quadwire::mesh::{AttributeSelection, MeshAssembler, MeshBuffers, SubmeshId};
/// use nalgebra::{Point3, Vector4};
///
/// let source = MeshBuffers::from_triangles(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     &[[0, 1, 2]],
/// );
///
/// let mut asm = MeshAssembler::new(&source, AttributeSelection::all());
/// let a = asm.push_vertex(0, Vector4::zeros());
/// let b = asm.push_vertex(1, Vector4::zeros());
/// let c = asm.push_vertex(2, Vector4::zeros());
/// asm.push_triangle(SubmeshId::new(0), [a, b, c]);
/// let mesh = asm.finish();
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[derive(Debug)]
pub struct MeshAssembler<'a> {
    source: &'a MeshBuffers,
    keep_normals: bool,
    keep_tangents: bool,
    keep_colors: bool,
    keep_skin: bool,
    keep_uv: [bool; UV_CHANNELS],
    out: MeshBuffers,
}

impl<'a> MeshAssembler<'a> {
    /// Create an assembler over `source`, keeping attributes that are both
    /// selected and present in the source.
    pub fn new(source: &'a MeshBuffers, selection: AttributeSelection) -> Self {
        let mut keep_uv = [false; UV_CHANNELS];
        for (channel, keep) in keep_uv.iter_mut().enumerate().skip(1) {
            *keep = selection.keeps_uv(channel) && source.has_uv(channel);
        }
        let keep_skin = selection.use_skin && !source.bone_weights.is_empty();

        let mut out = MeshBuffers {
            submeshes: vec![Vec::new(); source.submesh_count()],
            ..MeshBuffers::default()
        };
        if selection.use_skin {
            out.bind_poses = source.bind_poses.clone();
        }

        Self {
            source,
            keep_normals: selection.use_normals && !source.normals.is_empty(),
            keep_tangents: selection.use_tangents && !source.tangents.is_empty(),
            keep_colors: selection.use_colors && !source.colors.is_empty(),
            keep_skin,
            keep_uv,
            out,
        }
    }

    /// Reserve room for `vertices` more vertices.
    pub fn reserve(&mut self, vertices: usize) {
        self.out.positions.reserve(vertices);
        self.out.uvs[0].reserve(vertices);
    }

    /// Append a copy of source vertex `src` with the given UV0.
    ///
    /// Returns the index of the new vertex.
    pub fn push_vertex(&mut self, src: u32, uv0: Vector4<f64>) -> u32 {
        let s = src as usize;
        let index = self.out.positions.len() as u32;

        self.out.positions.push(self.source.positions[s]);
        self.out.uvs[0].push(uv0);
        if self.keep_normals {
            self.out.normals.push(self.source.normals[s]);
        }
        if self.keep_tangents {
            self.out.tangents.push(self.source.tangents[s]);
        }
        if self.keep_colors {
            self.out.colors.push(self.source.colors[s]);
        }
        if self.keep_skin {
            self.out.bone_weights.push(self.source.bone_weights[s]);
        }
        for channel in 1..UV_CHANNELS {
            if self.keep_uv[channel] {
                self.out.uvs[channel].push(self.source.uvs[channel][s]);
            }
        }

        index
    }

    /// Append a triangle of already pushed vertices to a submesh.
    pub fn push_triangle(&mut self, submesh: SubmeshId, tri: [u32; 3]) {
        self.out.submeshes[submesh.index()].extend_from_slice(&tri);
    }

    /// Finish and return the assembled mesh.
    pub fn finish(self) -> MeshBuffers {
        self.out
    }
}

/// Copy a subset of triangles into a new mesh with only the vertices they use.
///
/// `triangles` holds positions in submesh order; the copied triangles keep
/// their relative order and submesh slot. Vertices are renumbered by first
/// use. UV0 is copied as is; other attributes follow `selection`.
pub fn extract_triangles(
    mesh: &MeshBuffers,
    selection: AttributeSelection,
    triangles: &[usize],
) -> MeshBuffers {
    let mut wanted = vec![false; mesh.triangle_count()];
    for &t in triangles {
        if let Some(w) = wanted.get_mut(t) {
            *w = true;
        }
    }

    let mut asm = MeshAssembler::new(mesh, selection);
    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertex_count()];

    for (i, (submesh, tri)) in mesh.triangles().enumerate() {
        if !wanted[i] {
            continue;
        }
        let local = tri.map(|v| {
            *remap[v as usize].get_or_insert_with(|| asm.push_vertex(v, mesh.uv(0, v as usize)))
        });
        asm.push_triangle(submesh, local);
    }

    asm.finish()
}

/// Concatenate meshes sharing a submesh layout.
///
/// Vertex arrays are appended in order and each part's indices are offset by
/// the number of vertices before it, submesh slot by submesh slot. An
/// attribute survives only if every part carries it, so the result never has
/// attribute arrays shorter than its vertex array.
pub fn merge_meshes(parts: Vec<MeshBuffers>) -> MeshBuffers {
    let submesh_count = parts.iter().map(MeshBuffers::submesh_count).max().unwrap_or(0);
    let total: usize = parts.iter().map(MeshBuffers::vertex_count).sum();

    let keep_normals = every_part(&parts, |p| !p.normals.is_empty());
    let keep_tangents = every_part(&parts, |p| !p.tangents.is_empty());
    let keep_colors = every_part(&parts, |p| !p.colors.is_empty());
    let keep_skin = every_part(&parts, |p| !p.bone_weights.is_empty());
    let mut keep_uv = [false; UV_CHANNELS];
    for (channel, keep) in keep_uv.iter_mut().enumerate() {
        *keep = every_part(&parts, |p| p.has_uv(channel));
    }

    let mut out = MeshBuffers {
        submeshes: vec![Vec::new(); submesh_count],
        bind_poses: parts
            .iter()
            .find(|p| !p.bind_poses.is_empty())
            .map(|p| p.bind_poses.clone())
            .unwrap_or_default(),
        ..MeshBuffers::default()
    };
    out.positions.reserve(total);

    for part in parts {
        let base = out.positions.len() as u32;

        for (slot, indices) in part.submeshes.iter().enumerate() {
            out.submeshes[slot].extend(indices.iter().map(|&i| i + base));
        }

        out.positions.extend(part.positions);
        if keep_normals {
            out.normals.extend(part.normals);
        }
        if keep_tangents {
            out.tangents.extend(part.tangents);
        }
        if keep_colors {
            out.colors.extend(part.colors);
        }
        if keep_skin {
            out.bone_weights.extend(part.bone_weights);
        }
        for (channel, uvs) in part.uvs.into_iter().enumerate() {
            if keep_uv[channel] {
                out.uvs[channel].extend(uvs);
            }
        }
    }

    out
}

/// Whether every part with vertices satisfies `has`.
fn every_part(parts: &[MeshBuffers], has: impl Fn(&MeshBuffers) -> bool) -> bool {
    parts.iter().all(|p| p.vertex_count() == 0 || has(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn source() -> MeshBuffers {
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
        mesh.colors = (0..4).map(|i| Vector4::new(i as f64, 0.0, 0.0, 1.0)).collect();
        mesh.uvs[1] = vec![Vector4::new(0.5, 0.5, 0.0, 0.0); 4];
        mesh
    }

    #[test]
    fn test_assembler_copies_selected_attributes() {
        let src = source();
        let mut asm = MeshAssembler::new(&src, AttributeSelection::all());
        let v = asm.push_vertex(3, Vector4::new(1.0, 2.0, 3.0, 4.0));
        let mesh = asm.finish();

        assert_eq!(v, 0);
        assert_eq!(mesh.positions[0], src.positions[3]);
        assert_eq!(mesh.colors[0], src.colors[3]);
        assert_eq!(mesh.normals.len(), 1);
        assert_eq!(mesh.uvs[0][0], Vector4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(mesh.uvs[1].len(), 1);
        // Absent in the source, so absent in the output
        assert!(mesh.tangents.is_empty());
        assert!(mesh.uvs[2].is_empty());
        assert_eq!(mesh.submesh_count(), 2);
    }

    #[test]
    fn test_assembler_drops_unselected_attributes() {
        let src = source();
        let mut asm = MeshAssembler::new(&src, AttributeSelection::none());
        asm.push_vertex(0, Vector4::zeros());
        let mesh = asm.finish();

        assert!(mesh.normals.is_empty());
        assert!(mesh.colors.is_empty());
        assert!(mesh.uvs[1].is_empty());
        assert_eq!(mesh.uvs[0].len(), 1);
    }

    #[test]
    fn test_merge_remaps_indices_per_submesh() {
        let src = source();

        let mut a = MeshAssembler::new(&src, AttributeSelection::all());
        let v: Vec<u32> = (0..3).map(|i| a.push_vertex(i, Vector4::zeros())).collect();
        a.push_triangle(SubmeshId::new(0), [v[0], v[1], v[2]]);

        let mut b = MeshAssembler::new(&src, AttributeSelection::all());
        let w: Vec<u32> = [0, 2, 3].iter().map(|&i| b.push_vertex(i, Vector4::zeros())).collect();
        b.push_triangle(SubmeshId::new(1), [w[0], w[1], w[2]]);

        let merged = merge_meshes(vec![a.finish(), b.finish()]);
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.submeshes[0], vec![0, 1, 2]);
        assert_eq!(merged.submeshes[1], vec![3, 4, 5]);
        assert_eq!(merged.normals.len(), 6);
        assert_eq!(merged.uvs[0].len(), 6);
        assert_eq!(merged.positions[5], src.positions[3]);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_merge_drops_partial_attributes() {
        let src = source();
        let mut a = MeshAssembler::new(&src, AttributeSelection::all());
        a.push_vertex(0, Vector4::zeros());
        let mut b = MeshAssembler::new(&src, AttributeSelection::none());
        b.push_vertex(1, Vector4::zeros());

        let merged = merge_meshes(vec![a.finish(), b.finish()]);
        assert_eq!(merged.vertex_count(), 2);
        assert!(merged.normals.is_empty());
        assert_eq!(merged.uvs[0].len(), 2);
    }

    #[test]
    fn test_extract_compacts_vertices() {
        let src = source();
        let mesh = extract_triangles(&src, AttributeSelection::all(), &[1]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.submeshes, vec![vec![], vec![0, 1, 2]]);
        assert_eq!(mesh.positions[2], src.positions[3]);
        assert_eq!(mesh.colors[1], src.colors[2]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_extract_shares_vertices_within_subset() {
        let src = source();
        let mesh = extract_triangles(&src, AttributeSelection::none(), &[1, 0, 7]);

        // Vertices 0 and 2 are used by both triangles
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.submeshes[1], vec![0, 2, 3]);
        assert!(mesh.normals.is_empty());
    }
}
