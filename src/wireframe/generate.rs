//! Wireframe generator entry points.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{Result, WireframeError};
use crate::mesh::MeshBuffers;

use super::adjacency::build_adjacency;
use super::flatten::{bake_corners, explode, triangle_markers};
use super::metrics::generate_neighbor_info;
use super::pairing::pair_triangles;
use super::progress::Progress;
use super::repair::{repair_internal, RepairOutcome};
use super::triangle::TriangleSet;
use super::WireframeOptions;

/// Which generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireframeMode {
    /// Exclusive vertices, plain triangle markers.
    #[default]
    Triangle,
    /// Plain triangle markers, keeping consistent vertex sharing.
    CompactTriangle,
    /// Adjacent triangles paired into quads.
    Quad,
}

impl fmt::Display for WireframeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireframeMode::Triangle => "triangle",
            WireframeMode::CompactTriangle => "compact",
            WireframeMode::Quad => "quad",
        };
        f.write_str(name)
    }
}

impl FromStr for WireframeMode {
    type Err = WireframeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(WireframeMode::Triangle),
            "compact" => Ok(WireframeMode::CompactTriangle),
            "quad" => Ok(WireframeMode::Quad),
            _ => Err(WireframeError::invalid_param(
                "mode",
                s,
                "expected triangle, compact or quad",
            )),
        }
    }
}

/// Statistics of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireframeStats {
    /// Input triangle count.
    pub triangles: usize,
    /// Output vertex count.
    pub output_vertices: usize,
    /// Quads formed (quad path).
    pub matched_pairs: usize,
    /// Triangles left unpaired (quad path).
    pub unmatched_triangles: usize,
    /// Repair rounds run (compact path).
    pub repair_rounds: usize,
    /// Triangles left out because of a repeated vertex index (compact path).
    pub dropped_triangles: usize,
    /// How the repair loop ended (compact path).
    pub repair_outcome: Option<RepairOutcome>,
}

/// A generated wireframe mesh.
#[derive(Debug, Clone)]
pub struct WireframeMesh {
    /// The mesh, with corner markers baked into UV channel 0.
    pub mesh: MeshBuffers,
    /// What the generator did.
    pub stats: WireframeStats,
}

/// Run the generator selected by `mode`.
pub fn generate(
    mesh: &MeshBuffers,
    mode: WireframeMode,
    options: &WireframeOptions,
) -> Result<WireframeMesh> {
    match mode {
        WireframeMode::Triangle => triangle_wireframe(mesh, options),
        WireframeMode::CompactTriangle => compact_triangle_wireframe(mesh, options),
        WireframeMode::Quad => quad_wireframe(mesh, options),
    }
}

/// Triangle wireframe with exclusive vertices.
///
/// Every triangle gets three new vertices marked `(1,0,0)`, `(0,1,0)` and
/// `(0,0,1)`, so the output has one vertex per input index.
///
/// # Errors
///
/// Fails on an invalid mesh, or when the output would have more than
/// `options.limits.max_vertices` vertices.
pub fn triangle_wireframe(mesh: &MeshBuffers, options: &WireframeOptions) -> Result<WireframeMesh> {
    triangle_wireframe_internal(mesh, options, None)
}

/// Triangle wireframe with progress reporting.
///
/// See [`triangle_wireframe`] for details.
pub fn triangle_wireframe_with_progress(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: &Progress,
) -> Result<WireframeMesh> {
    triangle_wireframe_internal(mesh, options, Some(progress))
}

fn triangle_wireframe_internal(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: Option<&Progress>,
) -> Result<WireframeMesh> {
    const STEPS: usize = 2;
    report(progress, 0, STEPS, "Validating mesh");
    mesh.validate()?;
    check_limit("vertex", options.limits.max_vertices, mesh.index_count())?;

    report(progress, 1, STEPS, "Baking triangle markers");
    let mut out = explode(mesh, options.attributes);
    let markers = triangle_markers(out.triangle_count());
    bake_corners(&mut out, &markers);
    report(progress, STEPS, STEPS, "Done");

    let stats = WireframeStats {
        triangles: mesh.triangle_count(),
        output_vertices: out.vertex_count(),
        ..WireframeStats::default()
    };
    debug!("triangle wireframe: {:?}", stats);

    Ok(WireframeMesh { mesh: out, stats })
}

/// Triangle wireframe that keeps vertex sharing where markers allow.
///
/// Runs [`repair`](crate::wireframe::repair::repair) on the input mesh.
///
/// # Errors
///
/// Fails on an invalid mesh, when the input has more than
/// `options.limits.max_vertices` vertices, or when the repaired output does.
pub fn compact_triangle_wireframe(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
) -> Result<WireframeMesh> {
    compact_triangle_wireframe_internal(mesh, options, None)
}

/// Compact triangle wireframe with progress reporting.
///
/// See [`compact_triangle_wireframe`] for details.
pub fn compact_triangle_wireframe_with_progress(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: &Progress,
) -> Result<WireframeMesh> {
    compact_triangle_wireframe_internal(mesh, options, Some(progress))
}

fn compact_triangle_wireframe_internal(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: Option<&Progress>,
) -> Result<WireframeMesh> {
    const STEPS: usize = 3;
    report(progress, 0, STEPS, "Validating mesh");
    mesh.validate()?;
    let max = options.limits.max_vertices;
    check_limit("vertex", max, mesh.vertex_count())?;

    // Rounds report inside step 1
    let result = repair_internal(mesh, options, progress.map(|p| p.step(1, STEPS)));

    report(progress, 2, STEPS, "Checking output");
    check_limit("output vertex", max, result.mesh.vertex_count())?;
    report(progress, STEPS, STEPS, "Done");

    let stats = WireframeStats {
        triangles: mesh.triangle_count(),
        output_vertices: result.mesh.vertex_count(),
        repair_rounds: result.rounds,
        dropped_triangles: result.dropped_triangles,
        repair_outcome: Some(result.outcome),
        ..WireframeStats::default()
    };
    debug!("compact triangle wireframe: {:?}", stats);

    Ok(WireframeMesh {
        mesh: result.mesh,
        stats,
    })
}

/// Quad wireframe.
///
/// Adjacent triangles are paired (see [`crate::wireframe`]) and each pair
/// gets markers that hide its shared diagonal. Unpaired triangles keep plain
/// triangle markers. The output has one vertex per input index.
///
/// # Errors
///
/// Fails on an invalid mesh, on negative or non-finite coefficients, when
/// the mesh has more than `options.limits.max_quad_triangles` triangles, or
/// when the output would have more than `options.limits.max_vertices`
/// vertices.
pub fn quad_wireframe(mesh: &MeshBuffers, options: &WireframeOptions) -> Result<WireframeMesh> {
    quad_wireframe_internal(mesh, options, None)
}

/// Quad wireframe with progress reporting.
///
/// See [`quad_wireframe`] for details.
pub fn quad_wireframe_with_progress(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: &Progress,
) -> Result<WireframeMesh> {
    quad_wireframe_internal(mesh, options, Some(progress))
}

fn quad_wireframe_internal(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: Option<&Progress>,
) -> Result<WireframeMesh> {
    const STEPS: usize = 5;
    report(progress, 0, STEPS, "Validating mesh");
    mesh.validate()?;
    options.coefficients.validate()?;
    check_limit(
        "quad triangle",
        options.limits.max_quad_triangles,
        mesh.triangle_count(),
    )?;
    check_limit("output vertex", options.limits.max_vertices, mesh.index_count())?;

    report(progress, 1, STEPS, "Building adjacency");
    let mut set = TriangleSet::from_mesh(mesh);
    build_adjacency(&mut set);

    report(progress, 2, STEPS, "Scoring neighbors");
    generate_neighbor_info(&mut set, &options.coefficients, options.parallel);

    report(progress, 3, STEPS, "Pairing triangles");
    let pairs = pair_triangles(&mut set);

    report(progress, 4, STEPS, "Baking quad markers");
    let mut out = explode(mesh, options.attributes);
    bake_corners(&mut out, &set.corner_markers());
    report(progress, STEPS, STEPS, "Done");

    let stats = WireframeStats {
        triangles: set.len(),
        output_vertices: out.vertex_count(),
        matched_pairs: pairs,
        unmatched_triangles: set.len() - 2 * pairs,
        ..WireframeStats::default()
    };
    debug!("quad wireframe: {:?}", stats);

    Ok(WireframeMesh { mesh: out, stats })
}

#[inline]
fn report(progress: Option<&Progress>, current: usize, total: usize, message: &str) {
    if let Some(p) = progress {
        p.report(current, total, message);
    }
}

fn check_limit(limit: &'static str, max: usize, actual: usize) -> Result<()> {
    if actual > max {
        return Err(WireframeError::limit(limit, max, actual));
    }
    Ok(())
}
