//! Barycentric corner markers and their UV encoding.
//!
//! Every corner of a wireframe triangle carries a small integer triple that
//! tells the shader which original corner the vertex stands for. The triple
//! is baked into UV channel 0 as `(u, v, xy_code, z)`:
//!
//! | x | y | `xy_code` |
//! |---|---|-----------|
//! | 0 | 0 | 0.0 |
//! | 0 | 1 | 0.1 |
//! | 1 | 0 | 1.0 |
//! | 1 | 1 | 1.1 |
//!
//! The original `u` and `v` pass through unchanged.

use std::fmt;
use std::ops::Add;

use nalgebra::Vector4;

/// Threshold below which an encoded `xy_code` counts as zero.
const ZERO_CODE_EPSILON: f64 = 0.001;

/// Boundary between the `1.0` and `1.1` bands of `xy_code`.
const XY_CODE_SPLIT: f64 = 1.05;

/// An integer corner marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BarycentricCoordinate {
    /// First component.
    pub x: u8,
    /// Second component.
    pub y: u8,
    /// Third component.
    pub z: u8,
}

impl BarycentricCoordinate {
    /// Unassigned marker.
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// Interior marker: no wireframe line runs through this corner's edges.
    pub const ONE: Self = Self::new(1, 1, 1);
    /// Unit marker of corner 0.
    pub const X: Self = Self::new(1, 0, 0);
    /// Unit marker of corner 1.
    pub const Y: Self = Self::new(0, 1, 0);
    /// Unit marker of corner 2.
    pub const Z: Self = Self::new(0, 0, 1);
    /// Quad marker `(1, 0, 1)`.
    pub const XZ: Self = Self::new(1, 0, 1);
    /// Quad marker `(0, 1, 1)`.
    pub const YZ: Self = Self::new(0, 1, 1);

    /// Create a marker.
    #[inline]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The plain triangle marker of local corner `k` (0, 1 or 2).
    ///
    /// # Panics
    /// Panics if `k > 2`.
    #[inline]
    pub fn corner(k: usize) -> Self {
        [Self::X, Self::Y, Self::Z][k]
    }

    /// Whether every component equals 1.
    #[inline]
    pub fn is_unit_sum(&self) -> bool {
        *self == Self::ONE
    }
}

impl Add for BarycentricCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }
}

impl fmt::Debug for BarycentricCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Bake a marker into a UV value, keeping its `u` and `v`.
pub fn encode_uv(uv: Vector4<f64>, bc: BarycentricCoordinate) -> Vector4<f64> {
    let xy_code = match (bc.x == 1, bc.y == 1) {
        (false, false) => 0.0,
        (false, true) => 0.1,
        (true, false) => 1.0,
        (true, true) => 1.1,
    };
    Vector4::new(uv.x, uv.y, xy_code, bc.z as f64)
}

/// Read a marker back from a baked UV value.
///
/// An `xy_code` at or below 0.001 decodes to `x = y = 0`. Otherwise `x` is set
/// when the code exceeds 0.5, and `y` is set in the `0.1` and `1.1` bands. The
/// fourth component is rounded to give `z`.
pub fn decode_uv(uv: Vector4<f64>) -> BarycentricCoordinate {
    let code = uv.z;
    let z = if uv.w.round() >= 1.0 { 1 } else { 0 };

    if code <= ZERO_CODE_EPSILON {
        return BarycentricCoordinate::new(0, 0, z);
    }

    let x = code > 0.5;
    let y = if x { code > XY_CODE_SPLIT } else { true };
    BarycentricCoordinate::new(x as u8, y as u8, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REACHABLE: [BarycentricCoordinate; 7] = [
        BarycentricCoordinate::ZERO,
        BarycentricCoordinate::X,
        BarycentricCoordinate::Y,
        BarycentricCoordinate::Z,
        BarycentricCoordinate::XZ,
        BarycentricCoordinate::YZ,
        BarycentricCoordinate::ONE,
    ];

    #[test]
    fn test_encoding_table() {
        let uv = Vector4::new(0.25, 0.75, 9.0, 9.0);
        assert_eq!(encode_uv(uv, BarycentricCoordinate::X), Vector4::new(0.25, 0.75, 1.0, 0.0));
        assert_eq!(encode_uv(uv, BarycentricCoordinate::Y), Vector4::new(0.25, 0.75, 0.1, 0.0));
        assert_eq!(encode_uv(uv, BarycentricCoordinate::Z), Vector4::new(0.25, 0.75, 0.0, 1.0));
        assert_eq!(encode_uv(uv, BarycentricCoordinate::ONE), Vector4::new(0.25, 0.75, 1.1, 1.0));
        assert_eq!(encode_uv(uv, BarycentricCoordinate::ZERO), Vector4::new(0.25, 0.75, 0.0, 0.0));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let uv = Vector4::new(0.5, 0.5, 0.0, 0.0);
        for bc in REACHABLE {
            assert_eq!(decode_uv(encode_uv(uv, bc)), bc, "marker {:?}", bc);
        }
    }

    #[test]
    fn test_decode_tolerates_noise() {
        assert_eq!(
            decode_uv(Vector4::new(0.0, 0.0, 0.0005, 0.9999)),
            BarycentricCoordinate::Z
        );
        assert_eq!(
            decode_uv(Vector4::new(0.0, 0.0, 1.0999, 0.0001)),
            BarycentricCoordinate::new(1, 1, 0)
        );
        assert_eq!(
            decode_uv(Vector4::new(0.0, 0.0, 0.9999, 0.0)),
            BarycentricCoordinate::X
        );
    }

    #[test]
    fn test_corner_markers_sum_to_one() {
        let sum = BarycentricCoordinate::corner(0)
            + BarycentricCoordinate::corner(1)
            + BarycentricCoordinate::corner(2);
        assert!(sum.is_unit_sum());
        assert!(!(BarycentricCoordinate::X + BarycentricCoordinate::X).is_unit_sum());
    }
}
