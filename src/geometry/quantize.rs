//! Fixed-precision vertex keys.

use std::hash::{Hash, Hasher};

use nalgebra::Point3;

/// Scale applied to coordinates before truncation to integers.
pub const QUANTIZATION_SCALE: f64 = 100_000.0;

/// A vertex position snapped to a fixed grid of `1 / QUANTIZATION_SCALE`.
///
/// Two quantized vertices are equal iff their integer keys are equal; the
/// float position never takes part in comparisons or hashing. Coordinates are
/// scaled and truncated toward zero, and [`position`](Self::position) returns
/// the key projected back to floats, which is what all edge lengths,
/// directions and areas derived from quantized vertices are computed from.
#[derive(Debug, Clone, Copy)]
pub struct QuantizedVertex {
    key: [i64; 3],
    position: Point3<f64>,
}

impl QuantizedVertex {
    /// Quantize a position.
    pub fn new(p: &Point3<f64>) -> Self {
        let key = [quantize(p.x), quantize(p.y), quantize(p.z)];
        let position = Point3::new(
            key[0] as f64 / QUANTIZATION_SCALE,
            key[1] as f64 / QUANTIZATION_SCALE,
            key[2] as f64 / QUANTIZATION_SCALE,
        );
        Self { key, position }
    }

    /// The integer key.
    #[inline]
    pub fn key(&self) -> [i64; 3] {
        self.key
    }

    /// The back-projected position.
    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }
}

#[inline]
fn quantize(v: f64) -> i64 {
    (v * QUANTIZATION_SCALE).trunc() as i64
}

impl PartialEq for QuantizedVertex {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QuantizedVertex {}

impl Hash for QuantizedVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_truncates_toward_zero() {
        let q = QuantizedVertex::new(&Point3::new(1.234567, -1.234567, 0.000009));
        assert_eq!(q.key(), [123456, -123456, 0]);
    }

    #[test]
    fn test_position_is_back_projected() {
        let q = QuantizedVertex::new(&Point3::new(0.123456789, 2.0, -3.5));
        let p = q.position();
        assert!((p.x - 0.12345).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert!((p.z + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_float_noise_compares_equal() {
        let a = QuantizedVertex::new(&Point3::new(0.5, 0.25, 1.0));
        let b = QuantizedVertex::new(&Point3::new(0.5 + 1e-9, 0.25 - 0.0, 1.0 + 2e-9));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_distinct_positions_differ() {
        let a = QuantizedVertex::new(&Point3::new(0.0, 0.0, 0.0));
        let b = QuantizedVertex::new(&Point3::new(0.00002, 0.0, 0.0));
        assert_ne!(a, b);
    }
}
