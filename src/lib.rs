//! # Quadwire
//!
//! Wireframe mesh synthesis for real-time rendering.
//!
//! Quadwire rewrites a triangle mesh so that every corner carries a
//! barycentric marker in UV channel 0. A fragment shader that reads the
//! interpolated marker can then draw the mesh edges as lines without a
//! separate line pass.
//!
//! ## Features
//!
//! - **Triangle wireframes**: every triangle edge drawn, with exclusive or
//!   partially shared vertices
//! - **Quad wireframes**: adjacent triangles paired into quads, hiding the
//!   shared diagonal
//! - **Attribute preservation**: normals, tangents, colors, extra UV channels
//!   and skinning data follow the vertices they belong to
//! - **Submeshes**: every submesh keeps its own index list
//! - **File loading**: STL, PLY and glTF input for tools and tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use quadwire::prelude::*;
//!
//! let mesh = quadwire::io::load("model.glb").unwrap();
//! let result = quad_wireframe(&mesh, &WireframeOptions::default()).unwrap();
//!
//! println!("Quads: {}", result.stats.matched_pairs);
//! println!("Vertices: {}", result.mesh.vertex_count());
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use quadwire::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = MeshBuffers::from_triangles(positions, &[[0, 1, 2]]);
//!
//! let result = triangle_wireframe(&mesh, &WireframeOptions::default()).unwrap();
//! assert_eq!(result.mesh.vertex_count(), 3);
//!
//! // Corner markers are packed into UV channel 0
//! let marker = decode_uv(result.mesh.uvs[0][0]);
//! assert_eq!(marker, BarycentricCoordinate::X);
//! ```
//!
//! ## Marker Encoding
//!
//! A marker `(x, y, z)` is stored as `(u, v, code, z)` where `u`/`v` are the
//! host texture coordinates passed through unchanged and `code` is one of
//! `0.0`, `0.1`, `1.0` or `1.1` for the `x`/`y` pair. See
//! [`geometry::encode_uv`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod wireframe;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use quadwire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, WireframeError};
    pub use crate::geometry::{decode_uv, encode_uv, BarycentricCoordinate};
    pub use crate::mesh::{AttributeSelection, MeshBuffers};
    pub use crate::wireframe::{
        compact_triangle_wireframe, generate, quad_wireframe, triangle_wireframe,
        PairingCoefficients, Progress, WireframeLimits, WireframeMesh, WireframeMode,
        WireframeOptions, WireframeStats,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
