//! Core mesh data structures.
//!
//! This module provides the flat buffer representation used at the boundary
//! between quadwire and its host application.
//!
//! # Overview
//!
//! The primary type is [`MeshBuffers`]: vertex positions, one triangle index
//! list per submesh, and optional per-vertex attributes (normals, tangents,
//! colors, four UV channels, bone weights) plus bind poses.
//!
//! Generated meshes are built with [`MeshAssembler`], which copies the
//! attributes chosen by an [`AttributeSelection`] from a source mesh, and
//! split and joined with [`extract_triangles`] and [`merge_meshes`].
//!
//! # Index Types
//!
//! - [`TriangleId`] - Identifies a triangle within one conversion pass
//! - [`SubmeshId`] - Identifies a submesh index list
//!
//! ```
//! use quadwire::mesh::MeshBuffers;
//! use nalgebra::Point3;
//!
//! let mesh = MeshBuffers::from_triangles(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!     ],
//!     &[[0, 1, 2]],
//! );
//! assert!(mesh.validate().is_ok());
//! ```

mod buffers;
mod builder;
mod index;

pub use buffers::{BoneWeight, MeshBuffers, UV_CHANNELS};
pub use builder::{extract_triangles, merge_meshes, AttributeSelection, MeshAssembler};
pub use index::{SubmeshId, TriangleId};
