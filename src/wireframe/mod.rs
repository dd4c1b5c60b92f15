//! Wireframe mesh synthesis.
//!
//! This module turns a triangle mesh into a mesh whose UV channel 0 carries a
//! barycentric marker per triangle corner, so a fragment shader can draw the
//! original edges as crisp lines.
//!
//! # Generators
//!
//! - [`triangle_wireframe`]: every triangle gets three exclusive vertices
//!   marked `(1,0,0)`, `(0,1,0)`, `(0,0,1)`.
//! - [`compact_triangle_wireframe`]: keeps vertex sharing wherever the markers
//!   stay consistent, and gives the conflicting triangles exclusive
//!   vertices (see [`repair`]).
//! - [`quad_wireframe`]: pairs adjacent triangles into quads with a greedy
//!   mutual-best matching and hides each pair's diagonal.
//!
//! # Quad Reconstruction
//!
//! 1. Triangles are built over quantized positions and related through their
//!    shared edges ([`build_adjacency`]).
//! 2. Each relationship is scored on normal alignment, corner angles, tip
//!    distance versus diagonal length, and area ratio
//!    ([`generate_neighbor_info`]).
//! 3. Triangles are visited in index order; a triangle takes the
//!    highest-weight neighbor whose own best candidate is that triangle
//!    ([`pair_triangles`]). Matches are final.
//!
//! The matching is a heuristic: it never backtracks and can leave triangles
//! unmatched even when a better global pairing exists. Those triangles keep
//! plain triangle markers.
//!
//! # Example
//!
//! ```
//! use quadwire::prelude::*;
//! use nalgebra::Point3;
//!
//! let mesh = MeshBuffers::from_triangles(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     &[[0, 1, 2], [0, 2, 3]],
//! );
//!
//! let result = quad_wireframe(&mesh, &WireframeOptions::default()).unwrap();
//! assert_eq!(result.mesh.vertex_count(), 6);
//! assert_eq!(result.stats.matched_pairs, 1);
//! ```

mod adjacency;
mod flatten;
mod generate;
mod metrics;
mod pairing;
pub mod progress;
pub mod repair;
mod triangle;

pub use adjacency::{build_adjacency, AdjacencyStats};
pub use flatten::{bake_corners, explode, triangle_markers};
pub use generate::{
    compact_triangle_wireframe, compact_triangle_wireframe_with_progress, generate,
    quad_wireframe, quad_wireframe_with_progress, triangle_wireframe,
    triangle_wireframe_with_progress, WireframeMesh, WireframeMode, WireframeStats,
};
pub use metrics::generate_neighbor_info;
pub use pairing::{best_neighbor, pair_triangles, quad_corner_markers};
pub use progress::{Progress, StepProgress};
pub use repair::{
    classify_triangles, repair, repair_with_progress, RepairOutcome, RepairResult,
    TriangleClassification,
};
pub use triangle::{NeighborRelationship, Triangle, TriangleSet, TOP_VERTEX};

use crate::error::{Result, WireframeError};
use crate::mesh::AttributeSelection;

/// Weights of the pairing metrics.
///
/// Passed explicitly to every scoring call; nothing is global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingCoefficients {
    /// Scale of the normal alignment term.
    pub normal: f64,
    /// Scale of the corner angle term.
    pub angle: f64,
    /// Scale of the area ratio term. The parallel term is only evaluated
    /// when this exceeds 0.5.
    pub area: f64,
}

impl Default for PairingCoefficients {
    fn default() -> Self {
        Self {
            normal: 1.0,
            angle: 1.0,
            area: 1.0,
        }
    }
}

impl PairingCoefficients {
    /// Create coefficients.
    pub fn new(normal: f64, angle: f64, area: f64) -> Self {
        Self { normal, angle, area }
    }

    /// Check every coefficient is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("normal_coefficient", self.normal),
            ("angle_coefficient", self.angle),
            ("area_coefficient", self.area),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WireframeError::invalid_param(
                    name,
                    value,
                    "must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// Size ceilings inherited from 16-bit index buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireframeLimits {
    /// Maximum number of vertices in a triangle-path input or output.
    pub max_vertices: usize,
    /// Maximum number of input triangles on the quad path.
    pub max_quad_triangles: usize,
}

impl Default for WireframeLimits {
    fn default() -> Self {
        Self {
            max_vertices: 65_535,
            max_quad_triangles: 21_000,
        }
    }
}

impl WireframeLimits {
    /// No practical limit, for hosts with 32-bit index buffers.
    pub fn unbounded() -> Self {
        Self {
            max_vertices: u32::MAX as usize,
            max_quad_triangles: u32::MAX as usize / 3,
        }
    }
}

/// Options for wireframe generation.
#[derive(Debug, Clone)]
pub struct WireframeOptions {
    /// Source attributes carried into the output.
    pub attributes: AttributeSelection,

    /// Size ceilings.
    pub limits: WireframeLimits,

    /// Pairing metric weights (quad path).
    pub coefficients: PairingCoefficients,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for WireframeOptions {
    fn default() -> Self {
        Self {
            attributes: AttributeSelection::default(),
            limits: WireframeLimits::default(),
            coefficients: PairingCoefficients::default(),
            parallel: true,
        }
    }
}

impl WireframeOptions {
    /// Set the attribute selection.
    pub fn with_attributes(mut self, attributes: AttributeSelection) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the size ceilings.
    pub fn with_limits(mut self, limits: WireframeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the pairing coefficients.
    pub fn with_coefficients(mut self, coefficients: PairingCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = WireframeLimits::default();
        assert_eq!(limits.max_vertices, 65_535);
        assert_eq!(limits.max_quad_triangles, 21_000);
    }

    #[test]
    fn test_coefficient_validation() {
        assert!(PairingCoefficients::default().validate().is_ok());
        assert!(PairingCoefficients::new(0.0, 0.0, 0.0).validate().is_ok());
        assert!(PairingCoefficients::new(-1.0, 1.0, 1.0).validate().is_err());
        assert!(PairingCoefficients::new(1.0, f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_builder() {
        let options = WireframeOptions::default()
            .with_attributes(AttributeSelection::none())
            .sequential();
        assert!(!options.parallel);
        assert!(!options.attributes.use_normals);
    }
}
