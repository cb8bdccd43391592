//! # fv2d
//!
//! A finite-volume library for conservation-law PDEs on unstructured
//! triangular meshes.
//!
//! This crate provides the solver core executed once per explicit time
//! step:
//! - Mesh topology and geometry bindings ([`TriMesh`], [`Neighbour`])
//! - Per-quantity storage ([`Quantity`]: edge values, boundary values,
//!   explicit update)
//! - Numerical flux rules (upwind, Lax-Friedrichs) behind the
//!   [`FluxRule`] strategy trait
//! - The flux accumulator and timestep reducer ([`compute_fluxes`])
//!
//! Time integration, mesh generation beyond the built-in rectangular
//! test mesh, boundary-condition evaluation and all I/O live in outer
//! layers; the core consumes read-only mesh/quantity arrays and
//! produces an explicit update vector plus one stable timestep.
//!
//! # Example
//!
//! ```
//! use fv2d::{compute_fluxes, Advection2D, Quantity, TriMesh, UpwindAdvectionFlux};
//!
//! let mesh = TriMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 8, 8);
//! let mut stage = Quantity::new(&mesh);
//! let centroids = vec![1.0; mesh.n_volumes()];
//! stage.set_from_centroids(&centroids).unwrap();
//!
//! let rule = UpwindAdvectionFlux::new(Advection2D::new(1.0, 0.0));
//! let dt = compute_fluxes(&mesh, &mut stage, &rule, 1000.0);
//! assert!(dt > 0.0 && dt <= 1000.0);
//! ```

pub mod equations;
pub mod flux;
pub mod mesh;
pub mod solver;
pub mod types;

// Re-export main types for convenience
pub use equations::Advection2D;
pub use flux::{
    create_flux_rule, AdvectionFluxType, BoxedFluxRule, EdgeFlux, FluxRule,
    LaxFriedrichsAdvectionFlux, UpwindAdvectionFlux,
};
pub use mesh::{MeshError, Neighbour, TriMesh};
pub use solver::{compute_fluxes, Quantity, QuantityError};
#[cfg(feature = "parallel")]
pub use solver::compute_fluxes_parallel;
pub use types::{BoundarySlot, VolumeIndex};
