//! glTF format support.
//!
//! Loads every triangle primitive of every mesh in a glTF or GLB file. Each
//! primitive becomes one submesh. Node transforms are not applied.

use std::path::Path;

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use super::load_error;
use crate::error::Result;
use crate::mesh::{BoneWeight, MeshBuffers};

/// Load a mesh from a glTF or GLB file.
///
/// Normals, tangents, colors, the first two texture coordinate sets and
/// skinning data are kept when every loaded primitive provides them. Bind
/// poses come from the first skin in the file.
///
/// # Example
///
/// ```no_run
/// use quadwire::io::gltf;
///
/// let mesh = gltf::load("model.gltf").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshBuffers> {
    let path = path.as_ref();

    let (document, buffers, _images) =
        ::gltf::import(path).map_err(|e| load_error(path, e.to_string()))?;

    let mut out = MeshBuffers::new();
    let mut normals = Attribute::new();
    let mut tangents = Attribute::new();
    let mut colors = Attribute::new();
    let mut uv0 = Attribute::new();
    let mut uv1 = Attribute::new();
    let mut skin = Attribute::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let base = out.positions.len() as u32;
            out.positions.extend(
                positions.map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );
            let count = out.positions.len() as u32 - base;

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..count).collect(),
            };

            let mut triangles: Vec<u32> = Vec::with_capacity(indices.len());
            match primitive.mode() {
                ::gltf::mesh::Mode::Triangles => {
                    for chunk in indices.chunks_exact(3) {
                        triangles.extend_from_slice(chunk);
                    }
                }
                ::gltf::mesh::Mode::TriangleStrip => {
                    for i in 0..indices.len().saturating_sub(2) {
                        if i % 2 == 0 {
                            triangles.extend_from_slice(&[indices[i], indices[i + 1], indices[i + 2]]);
                        } else {
                            // Reverse winding for odd triangles
                            triangles.extend_from_slice(&[indices[i], indices[i + 2], indices[i + 1]]);
                        }
                    }
                }
                ::gltf::mesh::Mode::TriangleFan => {
                    for i in 1..indices.len().saturating_sub(1) {
                        triangles.extend_from_slice(&[indices[0], indices[i], indices[i + 1]]);
                    }
                }
                _ => {
                    // Points and lines have no faces; drop the vertices again
                    out.positions.truncate(base as usize);
                    continue;
                }
            }
            out.submeshes
                .push(triangles.into_iter().map(|i| i + base).collect());

            normals.append(
                reader
                    .read_normals()
                    .map(|it| it.map(|n| Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)).collect()),
            );
            tangents.append(reader.read_tangents().map(|it| it.map(vec4).collect()));
            colors.append(
                reader
                    .read_colors(0)
                    .map(|c| c.into_rgba_f32().map(vec4).collect()),
            );
            uv0.append(reader.read_tex_coords(0).map(|t| t.into_f32().map(uv).collect()));
            uv1.append(reader.read_tex_coords(1).map(|t| t.into_f32().map(uv).collect()));
            skin.append(match (reader.read_joints(0), reader.read_weights(0)) {
                (Some(joints), Some(weights)) => Some(
                    joints
                        .into_u16()
                        .zip(weights.into_f32())
                        .map(|(j, w)| BoneWeight {
                            indices: j.map(u32::from),
                            weights: w.map(f64::from),
                        })
                        .collect(),
                ),
                _ => None,
            });
        }
    }

    if out.triangle_count() == 0 {
        return Err(load_error(path, "glTF file contains no triangle meshes"));
    }

    out.normals = normals.finish();
    out.tangents = tangents.finish();
    out.colors = colors.finish();
    out.uvs[0] = uv0.finish();
    out.uvs[1] = uv1.finish();
    out.bone_weights = skin.finish();

    if !out.bone_weights.is_empty() {
        if let Some(first) = document.skins().next() {
            let reader = first.reader(|buffer| Some(&buffers[buffer.index()]));
            if let Some(matrices) = reader.read_inverse_bind_matrices() {
                out.bind_poses = matrices
                    .map(|m| Matrix4::from_fn(|r, c| m[c][r] as f64))
                    .collect();
            }
        }
    }

    Ok(out)
}

/// A per-vertex attribute gathered over several primitives; dropped as soon
/// as one primitive lacks it.
struct Attribute<T> {
    values: Option<Vec<T>>,
}

impl<T> Attribute<T> {
    fn new() -> Self {
        Self {
            values: Some(Vec::new()),
        }
    }

    fn append(&mut self, part: Option<Vec<T>>) {
        match part {
            Some(part) => {
                if let Some(values) = &mut self.values {
                    values.extend(part);
                }
            }
            None => self.values = None,
        }
    }

    fn finish(self) -> Vec<T> {
        self.values.unwrap_or_default()
    }
}

fn vec4(v: [f32; 4]) -> Vector4<f64> {
    Vector4::new(v[0] as f64, v[1] as f64, v[2] as f64, v[3] as f64)
}

fn uv(t: [f32; 2]) -> Vector4<f64> {
    Vector4::new(t[0] as f64, t[1] as f64, 0.0, 0.0)
}
