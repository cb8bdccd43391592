//! Per-quantity storage for the finite-volume update.
//!
//! A [`Quantity`] holds, for one conserved quantity:
//! - `edge_values[k][i]`: the value extrapolated to edge `i` of volume
//!   `k`, produced by an external reconstruction step before each call
//!   to the flux kernel
//! - `boundary_values[m]`: the exterior value supplied by the boundary
//!   condition for boundary slot `m`, populated externally
//! - `explicit_update[k]`: the per-unit-area update rate, owned and
//!   fully overwritten by the flux kernel on each call
//!
//! Systems with several conserved quantities (shallow water: stage and
//! two momenta) hold one `Quantity` per variable and share the mesh
//! traversal.

use thiserror::Error;

use crate::mesh::TriMesh;

/// Error type for quantity construction.
#[derive(Debug, Error)]
pub enum QuantityError {
    /// Edge-value array does not match the mesh volume count.
    #[error("edge_values has length {actual}, expected {expected} (one entry per volume)")]
    EdgeValuesLength { expected: usize, actual: usize },

    /// Boundary-value array does not match the mesh boundary-slot count.
    #[error("boundary_values has length {actual}, expected {expected} (one entry per slot)")]
    BoundaryValuesLength { expected: usize, actual: usize },

    /// Centroid array does not match the mesh volume count.
    #[error("centroid values has length {actual}, expected {expected} (one entry per volume)")]
    CentroidLength { expected: usize, actual: usize },
}

/// Storage for one conserved quantity on a [`TriMesh`].
#[derive(Clone, Debug)]
pub struct Quantity {
    /// Quantity value at each edge of each volume.
    pub edge_values: Vec<[f64; 3]>,

    /// Quantity value for each boundary slot.
    pub boundary_values: Vec<f64>,

    /// Per-unit-area update rate for each volume. Overwritten in full
    /// by every call to the flux kernel; never accumulated across
    /// calls.
    pub explicit_update: Vec<f64>,
}

impl Quantity {
    /// Allocate zeroed storage sized to the given mesh.
    pub fn new(mesh: &TriMesh) -> Self {
        Self {
            edge_values: vec![[0.0; 3]; mesh.n_volumes()],
            boundary_values: vec![0.0; mesh.n_boundary],
            explicit_update: vec![0.0; mesh.n_volumes()],
        }
    }

    /// Build a quantity from externally computed edge and boundary
    /// values, validating shapes against the mesh.
    pub fn from_values(
        edge_values: Vec<[f64; 3]>,
        boundary_values: Vec<f64>,
        mesh: &TriMesh,
    ) -> Result<Self, QuantityError> {
        if edge_values.len() != mesh.n_volumes() {
            return Err(QuantityError::EdgeValuesLength {
                expected: mesh.n_volumes(),
                actual: edge_values.len(),
            });
        }
        if boundary_values.len() != mesh.n_boundary {
            return Err(QuantityError::BoundaryValuesLength {
                expected: mesh.n_boundary,
                actual: boundary_values.len(),
            });
        }
        let n = edge_values.len();
        Ok(Self {
            edge_values,
            boundary_values,
            explicit_update: vec![0.0; n],
        })
    }

    /// First-order extrapolation: set every edge value of a volume to
    /// its centroid value (constant within each element).
    ///
    /// Higher-order reconstructions with limiting belong to an external
    /// reconstruction phase; this is the default used by the advection
    /// solver.
    pub fn set_from_centroids(&mut self, centroid_values: &[f64]) -> Result<(), QuantityError> {
        if centroid_values.len() != self.edge_values.len() {
            return Err(QuantityError::CentroidLength {
                expected: self.edge_values.len(),
                actual: centroid_values.len(),
            });
        }
        for (edges, &c) in self.edge_values.iter_mut().zip(centroid_values) {
            *edges = [c; 3];
        }
        Ok(())
    }

    /// Number of volumes this quantity is sized for.
    #[inline]
    pub fn n_volumes(&self) -> usize {
        self.edge_values.len()
    }
}
