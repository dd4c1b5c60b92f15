//! Greedy mutual-best triangle pairing.

use log::debug;

use crate::geometry::BarycentricCoordinate;
use crate::mesh::TriangleId;

use super::triangle::{NeighborRelationship, TriangleSet, TOP_VERTEX};

/// The highest-weight unmatched neighbor of a triangle.
///
/// Returns None if the triangle is already matched or has no unmatched
/// neighbor. Equal weights resolve to the lowest id.
pub fn best_neighbor(set: &TriangleSet, id: TriangleId) -> Option<TriangleId> {
    let tri = set.get(id);
    if tri.is_matched() {
        return None;
    }

    let mut best: Option<(TriangleId, f64)> = None;
    for (other, rel) in tri.neighbors() {
        if set.get(*other).is_matched() {
            continue;
        }
        let w = rel.weight();
        if best.map_or(true, |(_, bw)| w > bw) {
            best = Some((*other, w));
        }
    }
    best.map(|(other, _)| other)
}

/// Pair triangles into quads.
///
/// Triangles are visited in ascending id order. A triangle `T` takes the
/// neighbor `N` with the highest weight among those that are unmatched and
/// whose own [`best_neighbor`] is `T`. Both are then marked matched, lose
/// their neighbor lists, and have their corners rewritten with
/// [`quad_corner_markers`]. Matches are never revisited.
///
/// Returns the number of pairs formed.
pub fn pair_triangles(set: &mut TriangleSet) -> usize {
    let mut pairs = 0;

    for id in set.ids() {
        if set.get(id).is_matched() {
            continue;
        }

        let mut chosen: Option<(TriangleId, f64, NeighborRelationship)> = None;
        for (other, rel) in set.get(id).neighbors() {
            if set.get(*other).is_matched() || best_neighbor(set, *other) != Some(id) {
                continue;
            }
            let w = rel.weight();
            if chosen.as_ref().map_or(true, |(_, bw, _)| w > *bw) {
                chosen = Some((*other, w, *rel));
            }
        }

        let Some((other, _, rel)) = chosen else {
            continue;
        };
        let Some((owner_corners, other_corners)) = quad_corner_markers(&rel) else {
            continue;
        };

        let (a, b) = set.pair_mut(id, other);
        a.corners = owner_corners;
        b.corners = other_corners;
        a.set_mate(other);
        b.set_mate(id);
        pairs += 1;
    }

    debug!("pairing: {} pairs from {} triangles", pairs, set.len());
    pairs
}

/// Corner markers of a matched pair, from the owner's view of the neighbor.
///
/// The first endpoint of the shared edge gets [`BarycentricCoordinate::ONE`]
/// in both triangles, the second endpoint gets `XZ` in both, and each
/// triangle's top vertex gets `YZ`. Returns `(owner, neighbor)` markers, or
/// None if the relationship does not identify the shared edge's endpoints in
/// the neighbor.
pub fn quad_corner_markers(
    rel: &NeighborRelationship,
) -> Option<([BarycentricCoordinate; 3], [BarycentricCoordinate; 3])> {
    let e = rel.edge_index;
    if e > 2 {
        return None;
    }
    let start = rel.connect[e]?;
    let end = rel.connect[(e + 1) % 3]?;
    let top = rel.neighbor_top_corner()?;

    let mut owner = [BarycentricCoordinate::ZERO; 3];
    owner[e] = BarycentricCoordinate::ONE;
    owner[(e + 1) % 3] = BarycentricCoordinate::XZ;
    owner[TOP_VERTEX[e]] = BarycentricCoordinate::YZ;

    let mut other = [BarycentricCoordinate::ZERO; 3];
    other[start] = BarycentricCoordinate::ONE;
    other[end] = BarycentricCoordinate::XZ;
    other[top] = BarycentricCoordinate::YZ;

    Some((owner, other))
}
