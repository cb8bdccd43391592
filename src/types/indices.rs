//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up different kinds of indices
//! (volume vs boundary slot).

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        // Allow using as array index
        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of a triangular volume in the mesh.
    VolumeIndex,
    "V"
);

define_index!(
    /// Index into the boundary-value side table.
    ///
    /// A boundary slot stands in for a non-existent neighbour volume:
    /// the externally supplied boundary value at this slot plays the
    /// role of the exterior state in the flux computation.
    BoundarySlot,
    "B"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_creation() {
        let v = VolumeIndex::new(5);
        assert_eq!(v.get(), 5);
        assert_eq!(usize::from(v), 5);
        assert_eq!(VolumeIndex::from(5), v);
    }

    #[test]
    fn test_index_display() {
        assert_eq!(VolumeIndex::new(3).to_string(), "V3");
        assert_eq!(BoundarySlot::new(0).to_string(), "B0");
    }

    #[test]
    fn test_index_slice_access() {
        let data = vec![1.0, 2.0, 3.0];
        let v = VolumeIndex::new(1);
        assert_eq!(data[v], 2.0);
    }

    #[test]
    fn test_index_zero_constant() {
        assert_eq!(VolumeIndex::ZERO, VolumeIndex::new(0));
        assert_eq!(BoundarySlot::ZERO, BoundarySlot::new(0));
    }
}
