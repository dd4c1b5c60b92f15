//! Edge-based triangle adjacency.

use std::collections::HashMap;

use log::debug;

use crate::geometry::Edge;
use crate::mesh::TriangleId;

use super::triangle::{NeighborRelationship, Triangle, TriangleSet};

/// Summary of an adjacency pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacencyStats {
    /// Distinct non-degenerate edges.
    pub edges: usize,
    /// Edges with at least two incident triangles.
    pub shared_edges: usize,
    /// Edges with more than two incident triangles.
    pub non_manifold_edges: usize,
    /// Directed relationships recorded.
    pub relationships: usize,
    /// Triangle pairs sharing an edge that could not be related
    /// (coincident or collapsed corners).
    pub skipped_pairs: usize,
}

/// Relate every pair of triangles that share an edge.
///
/// Edges are keyed by quantized endpoints, so triangles that merely touch at
/// coincident positions are related even if their vertex indices differ.
/// Zero-length edges are not used as keys. For an edge shared by more than
/// two triangles every ordered pair is related; which of them end up paired is
/// then decided by the matching order.
///
/// Each ordered pair is recorded once, and neighbor lists are left sorted by
/// id so the result does not depend on hash map iteration order.
pub fn build_adjacency(set: &mut TriangleSet) -> AdjacencyStats {
    let mut stats = AdjacencyStats::default();

    // Map from undirected edge to the triangles using it
    let mut edge_map: HashMap<Edge, Vec<TriangleId>> = HashMap::new();
    for tri in set.iter() {
        for edge in &tri.edges {
            if edge.is_degenerate() {
                continue;
            }
            let incident = edge_map.entry(*edge).or_default();
            if incident.last() != Some(&tri.id) {
                incident.push(tri.id);
            }
        }
    }
    stats.edges = edge_map.len();

    let mut found: Vec<(TriangleId, TriangleId, NeighborRelationship)> = Vec::new();
    for incident in edge_map.values() {
        if incident.len() < 2 {
            continue;
        }
        stats.shared_edges += 1;
        if incident.len() > 2 {
            stats.non_manifold_edges += 1;
        }

        for &a in incident {
            for &b in incident {
                if a == b {
                    continue;
                }
                match relate(set.get(a), set.get(b)) {
                    Some(rel) => found.push((a, b, rel)),
                    None => stats.skipped_pairs += 1,
                }
            }
        }
    }

    // A pair sharing several edges shows up once per edge; keep the first.
    found.sort_by_key(|(a, b, _)| (*a, *b));
    found.dedup_by_key(|(a, b, _)| (*a, *b));

    for (a, b, rel) in found {
        set.get_mut(a).neighbors_mut().push((b, rel));
        stats.relationships += 1;
    }

    if stats.non_manifold_edges > 0 || stats.skipped_pairs > 0 {
        debug!(
            "adjacency: {} non-manifold edges, {} unrelatable pairs",
            stats.non_manifold_edges, stats.skipped_pairs
        );
    }
    debug!(
        "adjacency: {} edges, {} shared, {} relationships",
        stats.edges, stats.shared_edges, stats.relationships
    );

    stats
}

/// Compute `a`'s view of its neighbor `b`.
///
/// The shared edge is the lowest local edge of `a` that also bounds `b`.
/// Corner `k` of `a` connects to the corner of `b` whose outgoing edge starts
/// at the same quantized position. Returns None unless exactly two corners
/// connect to two distinct corners of `b`.
fn relate(a: &Triangle, b: &Triangle) -> Option<NeighborRelationship> {
    let edge_index = (0..3).find(|&i| b.edges.iter().any(|e| *e == a.edges[i]))?;
    let connect = [0, 1, 2].map(|k| (0..3).find(|&j| b.edges[j].v1 == a.edges[k].v1));

    let rel = NeighborRelationship::new(edge_index, connect);
    rel.neighbor_top_corner()?;
    Some(rel)
}
