//! Numerical flux functions.
//!
//! Provides per-edge numerical fluxes for the finite-volume traversal:
//! - Scalar advection fluxes: upwind, Lax-Friedrichs
//! - The [`FluxRule`] trait for injecting other equation systems into
//!   the same mesh loop
//!
//! ## Built-in Rules
//! - [`UpwindAdvectionFlux`]: upwind selection (exact for linear advection)
//! - [`LaxFriedrichsAdvectionFlux`]: dissipative reference rule
//! - [`AdvectionFluxType`]: enum selector for configuration-driven choice

pub mod traits;
mod upwind;

pub use traits::{
    create_flux_rule, AdvectionFluxType, BoxedFluxRule, EdgeFlux, FluxRule,
    LaxFriedrichsAdvectionFlux, UpwindAdvectionFlux,
};
pub use upwind::{lax_friedrichs_edge_flux, upwind_edge_flux};
