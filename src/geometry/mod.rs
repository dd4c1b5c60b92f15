//! Geometric primitives used to build triangle adjacency.
//!
//! - [`QuantizedVertex`]: a position key that compares equal for coincident
//!   vertices despite float noise
//! - [`Edge`]: an orientation-insensitive vertex pair, usable as a map key
//! - [`BarycentricCoordinate`]: the per-corner marker baked into UV0, with
//!   [`encode_uv`] / [`decode_uv`]

mod barycentric;
mod edge;
mod quantize;

pub use barycentric::{decode_uv, encode_uv, BarycentricCoordinate};
pub use edge::Edge;
pub use quantize::{QuantizedVertex, QUANTIZATION_SCALE};
