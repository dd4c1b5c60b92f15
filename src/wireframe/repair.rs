//! Consistency check and repair of baked corner markers on shared vertices.
//!
//! When triangles share vertices, a vertex can carry only one marker, so the
//! marker written by the last triangle touching it wins. A triangle is
//! *consistent* when its three decoded corner markers still sum to `(1, 1, 1)`,
//! and *conflicting* otherwise.
//!
//! [`repair`] works through a worklist of patches. Each round bakes plain
//! markers into the current patch and keeps its consistent triangles as they
//! are (with whatever vertex sharing they have). The conflicting triangles are
//! flattened into a new patch where every corner has its own vertex, and that
//! patch is checked again. A flattened patch cannot conflict, so the worklist
//! is empty after the second round unless the conflicting triangles are
//! degenerate.

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::geometry::{decode_uv, BarycentricCoordinate};
use crate::mesh::{extract_triangles, merge_meshes, AttributeSelection, MeshBuffers};

use super::flatten::{bake_corners, explode, triangle_markers};
use super::progress::{Progress, StepProgress};
use super::WireframeOptions;

/// Triangle positions (in submesh order) split by marker consistency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleClassification {
    /// Triangles whose corners sum to `(1, 1, 1)`.
    pub consistent: Vec<usize>,
    /// Triangles whose corners do not.
    pub conflicting: Vec<usize>,
}

impl TriangleClassification {
    /// Whether no triangle conflicts.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.conflicting.is_empty()
    }
}

/// How the repair loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// A round found no conflicts.
    Clean,
    /// The conflicting patch had fewer than three vertices or a triangle with
    /// a repeated index.
    Degenerate,
}

/// Result of [`repair`].
#[derive(Debug, Clone)]
pub struct RepairResult {
    /// Merged output mesh.
    pub mesh: MeshBuffers,
    /// Rounds of classification performed.
    pub rounds: usize,
    /// Triangles with a repeated vertex index that were left out.
    pub dropped_triangles: usize,
    /// Why the loop stopped.
    pub outcome: RepairOutcome,
}

/// Decode UV0 of every triangle corner and check the markers sum to one.
pub fn classify_triangles(mesh: &MeshBuffers, parallel: bool) -> TriangleClassification {
    let triangles: Vec<[u32; 3]> = mesh.triangles().map(|(_, tri)| tri).collect();

    let check = |tri: &[u32; 3]| {
        tri.iter()
            .map(|&v| decode_uv(mesh.uv(0, v as usize)))
            .fold(BarycentricCoordinate::ZERO, |acc, bc| acc + bc)
            .is_unit_sum()
    };

    let flags: Vec<bool> = if parallel {
        triangles.par_iter().map(check).collect()
    } else {
        triangles.iter().map(check).collect()
    };

    let mut result = TriangleClassification::default();
    for (i, ok) in flags.into_iter().enumerate() {
        if ok {
            result.consistent.push(i);
        } else {
            result.conflicting.push(i);
        }
    }
    result
}

/// Bake plain triangle markers while keeping as much vertex sharing as the
/// markers allow.
///
/// Every triangle of the result passes [`classify_triangles`]. Triangles with
/// a repeated vertex index can never pass and are dropped; the other
/// conflicting triangles of a degenerate patch get exclusive vertices.
pub fn repair(mesh: &MeshBuffers, options: &WireframeOptions) -> RepairResult {
    repair_internal(mesh, options, None)
}

/// Repair with progress reporting, once per round.
///
/// See [`repair`] for details.
pub fn repair_with_progress(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: &Progress,
) -> RepairResult {
    repair_internal(mesh, options, Some(progress.step(0, 1)))
}

/// Rounds needed when the first one finds conflicts.
const EXPECTED_ROUNDS: usize = 2;

pub(crate) fn repair_internal(
    mesh: &MeshBuffers,
    options: &WireframeOptions,
    progress: Option<StepProgress<'_>>,
) -> RepairResult {
    let all: Vec<usize> = (0..mesh.triangle_count()).collect();

    let mut parts: Vec<MeshBuffers> = Vec::new();
    let mut pending = Some(extract_triangles(mesh, options.attributes, &all));
    let mut rounds = 0;
    let mut dropped_triangles = 0;
    let mut outcome = RepairOutcome::Clean;

    while let Some(mut patch) = pending.take() {
        if let Some(p) = progress {
            p.report(rounds, EXPECTED_ROUNDS, "Repairing shared corners");
        }
        rounds += 1;

        let markers = triangle_markers(patch.triangle_count());
        bake_corners(&mut patch, &markers);
        let split = classify_triangles(&patch, options.parallel);
        debug!(
            "repair round {}: {} consistent, {} conflicting",
            rounds,
            split.consistent.len(),
            split.conflicting.len()
        );

        if split.is_clean() {
            parts.push(patch);
            break;
        }

        if !split.consistent.is_empty() {
            parts.push(extract_triangles(&patch, AttributeSelection::all(), &split.consistent));
        }
        let rest = extract_triangles(&patch, AttributeSelection::all(), &split.conflicting);
        drop(patch);

        if is_degenerate(&rest) {
            let (kept, dropped) = without_repeated_indices(&rest);
            warn!(
                "repair: degenerate patch in round {}, dropping {} triangles with repeated indices",
                rounds, dropped
            );
            dropped_triangles += dropped;
            if let Some(kept) = kept {
                parts.push(isolate(&kept));
            }
            outcome = RepairOutcome::Degenerate;
            break;
        }

        info!(
            "repair: flattening {} conflicting triangles",
            rest.triangle_count()
        );
        pending = Some(explode(&rest, AttributeSelection::all()));
    }

    if let Some(p) = progress {
        p.report(EXPECTED_ROUNDS, EXPECTED_ROUNDS, "Repairing shared corners");
    }

    RepairResult {
        mesh: merge_meshes(parts),
        rounds,
        dropped_triangles,
        outcome,
    }
}

/// Exclusive vertices and plain markers for every triangle.
fn isolate(patch: &MeshBuffers) -> MeshBuffers {
    let mut out = explode(patch, AttributeSelection::all());
    let markers = triangle_markers(out.triangle_count());
    bake_corners(&mut out, &markers);
    out
}

fn has_repeated_index(tri: &[u32; 3]) -> bool {
    tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2]
}

fn is_degenerate(patch: &MeshBuffers) -> bool {
    patch.vertex_count() < 3 || patch.triangles().any(|(_, tri)| has_repeated_index(&tri))
}

/// Split off triangles with repeated indices; returns the rest (if any) and
/// how many were removed.
fn without_repeated_indices(patch: &MeshBuffers) -> (Option<MeshBuffers>, usize) {
    let keep: Vec<usize> = patch
        .triangles()
        .enumerate()
        .filter(|(_, (_, tri))| !has_repeated_index(tri))
        .map(|(i, _)| i)
        .collect();
    let dropped = patch.triangle_count() - keep.len();
    if keep.is_empty() {
        (None, dropped)
    } else {
        (Some(extract_triangles(patch, AttributeSelection::all(), &keep)), dropped)
    }
}
