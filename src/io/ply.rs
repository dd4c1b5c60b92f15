//! PLY (Stanford polygon) format support.
//!
//! Positions are required. Normals (`nx`, `ny`, `nz`), colors (`red`,
//! `green`, `blue`, optional `alpha`) and texture coordinates (`s`/`t`,
//! `u`/`v` or `texture_u`/`texture_v`) are read when every vertex has them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::{Point3, Vector3, Vector4};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::load_error;
use crate::error::Result;
use crate::mesh::MeshBuffers;

/// Load a mesh from a PLY file.
///
/// Polygons with more than three vertices are fan-triangulated.
///
/// # Example
///
/// ```no_run
/// use quadwire::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(path, e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error(path, "PLY file has no vertex element"))?;

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(path, format!("vertex missing {} coordinate", name)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let normals: Option<Vec<Vector3<f64>>> = vertex_element
        .iter()
        .map(|v| {
            Some(Vector3::new(
                get_float_property(v, "nx")?,
                get_float_property(v, "ny")?,
                get_float_property(v, "nz")?,
            ))
        })
        .collect();

    let colors: Option<Vec<Vector4<f64>>> = vertex_element.iter().map(read_color).collect();

    let uvs: Option<Vec<Vector4<f64>>> = vertex_element
        .iter()
        .map(|v| {
            let (u, t) = ["s", "u", "texture_u"]
                .iter()
                .zip(["t", "v", "texture_v"])
                .find_map(|(u, t)| Some((get_float_property(v, u)?, get_float_property(v, t)?)))?;
            Some(Vector4::new(u, t, 0.0, 0.0))
        })
        .collect();

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error(path, "PLY file has no face element"))?;

    let mut faces: Vec<[u32; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error(path, "face missing vertex_indices property"))?;

        for i in 1..indices.len().saturating_sub(1) {
            faces.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    if faces.is_empty() {
        return Err(load_error(path, "PLY file contains no faces"));
    }

    let mut mesh = MeshBuffers::from_triangles(positions, &faces);
    mesh.normals = normals.unwrap_or_default();
    mesh.colors = colors.unwrap_or_default();
    mesh.uvs[0] = uvs.unwrap_or_default();
    Ok(mesh)
}

/// RGBA in `[0, 1]`; integer channels are scaled from `[0, 255]`.
fn read_color(vertex: &DefaultElement) -> Option<Vector4<f64>> {
    let channel = |name: &str| -> Option<f64> {
        match vertex.get(name)? {
            Property::UChar(v) => Some(*v as f64 / 255.0),
            Property::Float(v) => Some(*v as f64),
            Property::Double(v) => Some(*v),
            _ => None,
        }
    };
    Some(Vector4::new(
        channel("red")?,
        channel("green")?,
        channel("blue")?,
        channel("alpha").unwrap_or(1.0),
    ))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<u32>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as u32).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        File::create(&path)
            .and_then(|mut f| f.write_all(contents.as_bytes()))
            .unwrap();
        path
    }

    #[test]
    fn test_load_quad_with_attributes() {
        let path = write_temp(
            "quadwire_ply_quad.ply",
            "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
property float s
property float t
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0 1 255 0 0 0 0
1 0 0 0 0 1 0 255 0 1 0
1 1 0 0 0 1 0 0 255 1 1
0 1 0 0 0 1 255 255 255 0 1
4 0 1 2 3
",
        );

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.submeshes[0], vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.normals.len(), 4);
        assert_eq!(mesh.colors[1], Vector4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(mesh.uvs[0][2], Vector4::new(1.0, 1.0, 0.0, 0.0));
        assert!(mesh.validate().is_ok());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_positions_only() {
        let path = write_temp(
            "quadwire_ply_tri.ply",
            "ply
format ascii 1.0
element vertex 3
property double x
property double y
property double z
element face 1
property list uchar uint vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
",
        );

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.normals.is_empty());
        assert!(mesh.colors.is_empty());
        assert!(!mesh.has_uv(0));

        std::fs::remove_file(&path).ok();
    }
}
