//! Mesh file loading.
//!
//! Meshes handed to the generators usually come from a host application, but
//! for tools and tests they can be read from disk into [`MeshBuffers`].
//! Writing is left to the host.
//!
//! # Supported Formats
//!
//! | Format | Extension | Attributes | Notes |
//! |--------|-----------|------------|-------|
//! | STL | `.stl` | positions | Binary and ASCII |
//! | PLY | `.ply` | positions, normals, colors, UV0 | Polygons are fan-triangulated |
//! | glTF | `.gltf`, `.glb` | positions, normals, tangents, colors, UV0/UV1, skin | One submesh per primitive |
//!
//! # Usage
//!
//! ```no_run
//! use quadwire::io::load;
//!
//! let mesh = load("model.glb").unwrap();
//! println!("{} triangles", mesh.triangle_count());
//! ```
//!
//! Each format also has its own loader:
//!
//! ```no_run
//! let mesh = quadwire::io::ply::load("scan.ply").unwrap();
//! ```

pub mod gltf;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{Result, WireframeError};
use crate::mesh::MeshBuffers;

/// Mesh file formats that can be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Stereolithography, binary or ASCII.
    Stl,
    /// Stanford polygon file.
    Ply,
    /// glTF with JSON and external or embedded buffers.
    Gltf,
    /// Binary glTF container.
    Glb,
}

impl Format {
    /// Look up a format by file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Format> {
        let ext = ext.to_ascii_lowercase();
        [Format::Stl, Format::Ply, Format::Gltf, Format::Glb]
            .into_iter()
            .find(|f| f.extension() == ext)
    }

    /// Look up a format from the extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        extension_of(path.as_ref()).and_then(Format::from_extension)
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Stl => "stl",
            Format::Ply => "ply",
            Format::Gltf => "gltf",
            Format::Glb => "glb",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Format::Stl => "STL",
            Format::Ply => "PLY",
            Format::Gltf => "glTF",
            Format::Glb => "glTF (binary)",
        }
    }
}

/// Load a mesh, picking the loader from the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let Some(format) = Format::from_path(path) else {
        return Err(WireframeError::UnsupportedFormat {
            extension: extension_of(path).unwrap_or("(none)").to_string(),
        });
    };

    match format {
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Build a load error for `path`.
pub(crate) fn load_error(path: &Path, message: impl Into<String>) -> WireframeError {
    WireframeError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
