//! Conservation-law equation systems.
//!
//! An equation system supplies the physics behind the per-edge flux:
//! the finite-volume traversal in [`crate::solver`] is equation-agnostic
//! and consumes any [`FluxRule`](crate::flux::FluxRule), so systems with
//! more quantities (e.g. shallow water: stage, x-momentum, y-momentum)
//! share the same mesh loop with one flux rule per quantity.

mod advection_2d;

pub use advection_2d::Advection2D;
