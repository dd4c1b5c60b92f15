//! Index types for mesh elements.
//!
//! Triangles of one conversion pass live in a flat arena and refer to each
//! other by [`TriangleId`] rather than by reference. [`SubmeshId`] names one
//! index list of a [`MeshBuffers`](super::MeshBuffers).

use std::fmt::{self, Debug};

/// Sentinel value for an invalid index.
const INVALID: u32 = u32::MAX;

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

/// A type-safe submesh index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SubmeshId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(TriangleId, "T");
impl_index_type!(SubmeshId, "S");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_id() {
        let t = TriangleId::new(42);
        assert_eq!(t.index(), 42);
        assert!(t.is_valid());

        let invalid = TriangleId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(TriangleId::default(), invalid);
    }

    #[test]
    fn test_ordering_follows_index() {
        let mut ids = vec![TriangleId::new(3), TriangleId::new(1), TriangleId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![TriangleId::new(1), TriangleId::new(2), TriangleId::new(3)]);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", TriangleId::new(7)), "T(7)");
        assert_eq!(format!("{:?}", SubmeshId::new(0)), "S(0)");
        assert_eq!(format!("{:?}", TriangleId::invalid()), "T(INVALID)");
    }
}
