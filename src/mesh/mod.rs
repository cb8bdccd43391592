//! Triangular mesh topology and geometry.
//!
//! The flux kernel consumes the mesh as read-only per-volume and
//! per-edge arrays; everything here is precomputed at construction.
//! Validation happens once, at the boundary between mesh construction
//! and the kernel; the kernel itself trusts its inputs.

mod tri_mesh;

pub use tri_mesh::{MeshError, Neighbour, TriMesh};
