//! Error types for quadwire.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`WireframeError`].
pub type Result<T> = std::result::Result<T, WireframeError>;

/// Errors that can occur while validating, loading, or converting a mesh.
#[derive(Error, Debug)]
pub enum WireframeError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// The mesh has fewer than three vertices.
    #[error("mesh has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// The vertex count found.
        count: usize,
    },

    /// A submesh index list is not a whole number of triangles.
    #[error("submesh {submesh} has {len} indices, which is not a multiple of 3")]
    MalformedIndexList {
        /// The submesh index.
        submesh: usize,
        /// Length of the index list.
        len: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("submesh {submesh} triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The submesh index.
        submesh: usize,
        /// The triangle index within the submesh.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A per-vertex attribute has the wrong number of elements.
    #[error("attribute {attribute} has {actual} elements, expected {expected}")]
    AttributeLength {
        /// Name of the attribute.
        attribute: &'static str,
        /// Expected length (the vertex count).
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The mesh exceeds one of the configured size ceilings.
    #[error("{limit} limit exceeded: {actual} > {max}")]
    LimitExceeded {
        /// Which limit was exceeded.
        limit: &'static str,
        /// The configured maximum.
        max: usize,
        /// The actual value.
        actual: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl WireframeError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        WireframeError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a limit error.
    pub fn limit(limit: &'static str, max: usize, actual: usize) -> Self {
        WireframeError::LimitExceeded { limit, max, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_message_reports_counts() {
        let err = WireframeError::limit("quad triangle", 21_000, 21_001);
        let msg = err.to_string();
        assert!(msg.contains("21000"), "{}", msg);
        assert!(msg.contains("21001"), "{}", msg);
        assert!(msg.contains("quad triangle"), "{}", msg);
    }

    #[test]
    fn test_invalid_param_formats_value() {
        let err = WireframeError::invalid_param("angle", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: angle = -1 (must be non-negative)"
        );
    }
}
