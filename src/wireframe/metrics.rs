//! Scoring of neighbor relationships for quad pairing.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::TriangleId;

use super::triangle::{NeighborRelationship, Triangle, TriangleSet, TOP_VERTEX};
use super::PairingCoefficients;

/// Metric values of one relationship.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    dot: f64,
    angle: f64,
    parallel: f64,
    area: f64,
}

/// Score every relationship in the set.
///
/// For the pair formed by an owner triangle and its neighbor across the shared
/// edge:
///
/// - **dot**: `sign(d)·d²` of the normal dot product `d`, times `normal`
/// - **angle**: how close to 90° the apex angles at both top vertices are,
///   averaged with how close to 90° the two quad corners at the shared edge
///   endpoints are, times `angle`
/// - **parallel**: the shorter of (distance between the two top vertices,
///   shared edge length) over the longer; only evaluated when `area > 0.5`
/// - **area**: the smaller triangle area over the larger, times `area`
///
/// Every ratio with a zero denominator scores 0.
pub fn generate_neighbor_info(
    set: &mut TriangleSet,
    coefficients: &PairingCoefficients,
    parallel: bool,
) {
    let jobs: Vec<(TriangleId, usize)> = set
        .iter()
        .flat_map(|t| (0..t.neighbors().len()).map(move |slot| (t.id, slot)))
        .collect();

    let score = |&(id, slot): &(TriangleId, usize)| {
        let owner = set.get(id);
        let (other, rel) = owner.neighbors()[slot];
        compute_metrics(owner, set.get(other), &rel, coefficients)
    };

    let results: Vec<Metrics> = if parallel {
        jobs.par_iter().map(score).collect()
    } else {
        jobs.iter().map(score).collect()
    };

    for ((id, slot), m) in jobs.into_iter().zip(results) {
        let rel = &mut set.get_mut(id).neighbors_mut()[slot].1;
        rel.dot = m.dot;
        rel.angle = m.angle;
        rel.parallel = m.parallel;
        rel.area = m.area;
    }
}

fn compute_metrics(
    owner: &Triangle,
    other: &Triangle,
    rel: &NeighborRelationship,
    c: &PairingCoefficients,
) -> Metrics {
    let e = rel.edge_index;
    let p = owner.corner_position(e);
    let q = owner.corner_position((e + 1) % 3);
    let top_a = owner.corner_position(TOP_VERTEX[e]);
    let top_b = match rel.neighbor_top_corner() {
        Some(k) => other.corner_position(k),
        None => {
            return Metrics {
                dot: 0.0,
                angle: 0.0,
                parallel: 0.0,
                area: 0.0,
            }
        }
    };

    let d = owner.normal.dot(&other.normal);
    let dot = d.signum() * d * d * c.normal;

    let apex = (score_90(apex_angle(&top_a, &p, &q)) + score_90(apex_angle(&top_b, &p, &q))) / 2.0;
    let corners = (score_90(apex_angle(&p, &top_a, &top_b)) + score_90(apex_angle(&q, &top_a, &top_b))) / 2.0;
    let angle = (apex + corners) / 2.0 * c.angle;

    let parallel = if c.area > 0.5 {
        ratio((top_a - top_b).norm(), owner.edges[e].length())
    } else {
        0.0
    };

    let area = ratio(owner.area, other.area) * c.area;

    Metrics {
        dot,
        angle,
        parallel,
        area,
    }
}

/// Angle at `apex` between the directions to `a` and `b`, in degrees.
///
/// Zero when either direction is degenerate.
fn apex_angle(apex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    angle_between(&(a - apex), &(b - apex))
}

fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    let nu = u.norm();
    let nv = v.norm();
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// 1 at 90°, falling off linearly below and hyperbolically above.
#[inline]
fn score_90(degrees: f64) -> f64 {
    if degrees <= 90.0 {
        degrees / 90.0
    } else {
        90.0 / degrees
    }
}

/// Smaller over larger, 0 when both are 0.
#[inline]
fn ratio(a: f64, b: f64) -> f64 {
    let hi = a.max(b);
    if hi <= 0.0 {
        0.0
    } else {
        a.min(b) / hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshBuffers;
    use crate::wireframe::build_adjacency;

    fn scored(mesh: &MeshBuffers, c: PairingCoefficients) -> TriangleSet {
        let mut set = TriangleSet::from_mesh(mesh);
        build_adjacency(&mut set);
        generate_neighbor_info(&mut set, &c, false);
        set
    }

    fn square() -> MeshBuffers {
        MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_square_scores_perfectly() {
        let set = scored(&square(), PairingCoefficients::default());
        let rel = set.get(TriangleId::new(0)).neighbor(TriangleId::new(1)).unwrap();
        assert!((rel.dot - 1.0).abs() < 1e-9);
        assert!((rel.angle - 1.0).abs() < 1e-9);
        assert!((rel.parallel - 1.0).abs() < 1e-9);
        assert!((rel.area - 1.0).abs() < 1e-9);
        assert!((rel.weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_are_symmetric() {
        let mesh = MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(1.5, 1.0, 0.3),
                Point3::new(0.0, 1.2, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        );
        let set = scored(&mesh, PairingCoefficients::default());
        let ab = set.get(TriangleId::new(0)).neighbor(TriangleId::new(1)).unwrap();
        let ba = set.get(TriangleId::new(1)).neighbor(TriangleId::new(0)).unwrap();
        assert!((ab.weight() - ba.weight()).abs() < 1e-12);
        assert!(ab.weight() < 1.0);
    }

    #[test]
    fn test_folded_pair_has_negative_dot() {
        // Second triangle folded back over the first
        let mesh = MeshBuffers::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.1, 0.1, 0.1),
            ],
            &[[0, 1, 2], [2, 1, 3]],
        );
        let set = scored(&mesh, PairingCoefficients::default());
        let rel = set.get(TriangleId::new(0)).neighbor(TriangleId::new(1)).unwrap();
        assert!(rel.dot < 0.0, "dot = {}", rel.dot);
    }

    #[test]
    fn test_parallel_gated_by_area_coefficient() {
        let set = scored(&square(), PairingCoefficients::new(1.0, 1.0, 0.5));
        let rel = set.get(TriangleId::new(0)).neighbor(TriangleId::new(1)).unwrap();
        assert_eq!(rel.parallel, 0.0);
        assert!((rel.area - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_coefficients_disable_terms() {
        let set = scored(&square(), PairingCoefficients::new(0.0, 0.0, 0.0));
        let rel = set.get(TriangleId::new(0)).neighbor(TriangleId::new(1)).unwrap();
        assert_eq!(rel.weight(), 0.0);
        assert!(rel.weight().is_finite());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let n = 6u32;
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, ((i * j) % 3) as f64 * 0.1));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        let mesh = MeshBuffers::from_triangles(vertices, &faces);

        let mut seq = TriangleSet::from_mesh(&mesh);
        build_adjacency(&mut seq);
        let mut par = seq.clone();
        generate_neighbor_info(&mut seq, &PairingCoefficients::default(), false);
        generate_neighbor_info(&mut par, &PairingCoefficients::default(), true);

        for id in seq.ids() {
            assert_eq!(seq.get(id).neighbors(), par.get(id).neighbors());
        }
    }

    #[test]
    fn test_score_90() {
        assert_eq!(score_90(90.0), 1.0);
        assert_eq!(score_90(45.0), 0.5);
        assert_eq!(score_90(180.0), 0.5);
        assert_eq!(score_90(0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(2.0, 4.0), 0.5);
    }
}
