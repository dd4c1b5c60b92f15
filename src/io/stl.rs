//! STL (stereolithography) format support.
//!
//! STL carries positions only. Both binary and ASCII files are read; vertices
//! shared between facets are merged by the reader.

use std::fs::File;
use std::path::Path;

use nalgebra::Point3;

use super::load_error;
use crate::error::Result;
use crate::mesh::MeshBuffers;

/// Load a mesh from an STL file.
///
/// Facets with a repeated vertex are skipped.
///
/// # Example
///
/// ```no_run
/// use quadwire::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| load_error(path, e.to_string()))?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut faces: Vec<[u32; 3]> = Vec::with_capacity(stl.faces.len());
    for face in &stl.faces {
        let [a, b, c] = face.vertices;
        if a != b && b != c && a != c {
            faces.push([a as u32, b as u32, c as u32]);
        }
    }

    if faces.is_empty() {
        return Err(load_error(path, "STL file contains no valid triangles"));
    }

    Ok(MeshBuffers::from_triangles(positions, &faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ASCII_SQUARE: &str = "solid square
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 1 1 0
  endloop
endfacet
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 1 0
    vertex 0 1 0
  endloop
endfacet
endsolid square
";

    #[test]
    fn test_load_ascii_shares_vertices() {
        let path = std::env::temp_dir().join("quadwire_stl_square.stl");
        File::create(&path)
            .and_then(|mut f| f.write_all(ASCII_SQUARE.as_bytes()))
            .unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.validate().is_ok());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load("/nonexistent/quadwire.stl").unwrap_err();
        assert!(matches!(err, crate::error::WireframeError::Io(_)));
    }
}
