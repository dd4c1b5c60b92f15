//! Undirected edges between quantized vertices.

use std::hash::{Hash, Hasher};

use nalgebra::Vector3;

use super::quantize::QuantizedVertex;

/// An edge between two quantized vertices.
///
/// Equality and hashing ignore orientation, so an edge can key an adjacency
/// map regardless of which triangle's winding produced it. The construction
/// order is still kept: `v1` is the corner the edge starts from, and
/// [`direction`](Self::direction) points from `v1` to `v2`.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// Start vertex.
    pub v1: QuantizedVertex,
    /// End vertex.
    pub v2: QuantizedVertex,
    length: f64,
    direction: Vector3<f64>,
}

impl Edge {
    /// Create an edge from `v1` to `v2`.
    pub fn new(v1: QuantizedVertex, v2: QuantizedVertex) -> Self {
        let d = v2.position() - v1.position();
        let length = d.norm();
        let direction = if length > 0.0 { d / length } else { Vector3::zeros() };
        Self {
            v1,
            v2,
            length,
            direction,
        }
    }

    /// Edge length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Unit direction from `v1` to `v2`, zero for a degenerate edge.
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Whether both endpoints coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.v1 == self.v2
    }

    /// Compare with orientation.
    ///
    /// Returns `1` if both edges run the same way, `-1` if they are the same
    /// edge reversed, and `0` if they are different edges.
    pub fn equal_sign(&self, other: &Edge) -> i32 {
        if self.v1 == other.v1 && self.v2 == other.v2 {
            1
        } else if self.v1 == other.v2 && self.v2 == other.v1 {
            -1
        } else {
            0
        }
    }

    /// Whether the two edges have an endpoint in common.
    pub fn shares_vertex(&self, other: &Edge) -> bool {
        self.v1 == other.v1 || self.v1 == other.v2 || self.v2 == other.v1 || self.v2 == other.v2
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.equal_sign(other) != 0
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (self.v1.key(), self.v2.key());
        if a <= b {
            a.hash(state);
            b.hash(state);
        } else {
            b.hash(state);
            a.hash(state);
        }
    }
}
