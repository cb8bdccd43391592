//! Finite-volume solver core.
//!
//! [`Quantity`] binds one conserved quantity's edge, boundary and
//! update arrays to a mesh; [`compute_fluxes`] runs the per-volume
//! flux accumulation and timestep reduction over them. The traversal
//! is equation-agnostic: inject a [`FluxRule`](crate::flux::FluxRule)
//! per quantity and share one pass over the mesh.

mod compute_fluxes;
mod quantity;

pub use compute_fluxes::compute_fluxes;
#[cfg(feature = "parallel")]
pub use compute_fluxes::compute_fluxes_parallel;
pub use quantity::{Quantity, QuantityError};
