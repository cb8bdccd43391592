//! 2D scalar advection equation.
//!
//! The 2D linear advection equation in conservation form:
//!
//! ∂u/∂t + ∇ · (v u) = 0
//!
//! which expands to:
//!
//! ∂u/∂t + v_1 ∂u/∂x + v_2 ∂u/∂y = 0
//!
//! where v = (v_1, v_2) is the constant advection velocity vector.
//! There is a single conserved quantity u.

use crate::flux::{lax_friedrichs_edge_flux, upwind_edge_flux, EdgeFlux};

/// 2D linear advection equation.
///
/// du/dt + v_1 * du/dx + v_2 * du/dy = 0
///
/// This is the simplest 2D hyperbolic equation, useful for exercising
/// the finite-volume traversal before moving to systems like shallow
/// water that plug into the same edge loop via
/// [`FluxRule`](crate::flux::FluxRule).
#[derive(Clone, Debug)]
pub struct Advection2D {
    /// Advection velocity in x-direction
    pub velocity_x: f64,
    /// Advection velocity in y-direction
    pub velocity_y: f64,
}

impl Advection2D {
    /// Create a new 2D advection equation with given velocity components.
    pub fn new(velocity_x: f64, velocity_y: f64) -> Self {
        Self {
            velocity_x,
            velocity_y,
        }
    }

    /// Create advection with velocity specified as (speed, angle).
    ///
    /// angle is in radians, measured counter-clockwise from the positive x-axis.
    pub fn from_polar(speed: f64, angle: f64) -> Self {
        Self {
            velocity_x: speed * angle.cos(),
            velocity_y: speed * angle.sin(),
        }
    }

    /// Get the velocity vector.
    #[inline]
    pub fn velocity(&self) -> (f64, f64) {
        (self.velocity_x, self.velocity_y)
    }

    /// Compute the physical flux components: (F_x, F_y) = (v_1 u, v_2 u)
    #[inline]
    pub fn flux(&self, u: f64) -> (f64, f64) {
        (self.velocity_x * u, self.velocity_y * u)
    }

    /// Compute the normal flux: F · n = (v · n) * u
    ///
    /// This is the flux through an edge with outward normal (nx, ny).
    #[inline]
    pub fn normal_flux(&self, u: f64, normal: (f64, f64)) -> f64 {
        self.normal_velocity(normal) * u
    }

    /// Velocity component along a given normal direction: v · n
    ///
    /// This is the signal speed of the 1D problem projected onto the
    /// normal direction. Its sign decides the upwind side.
    #[inline]
    pub fn normal_velocity(&self, normal: (f64, f64)) -> f64 {
        self.velocity_x * normal.0 + self.velocity_y * normal.1
    }

    /// Maximum wave speed (magnitude of velocity).
    ///
    /// Used for CFL estimates independent of edge orientation.
    #[inline]
    pub fn max_wave_speed(&self) -> f64 {
        (self.velocity_x * self.velocity_x + self.velocity_y * self.velocity_y).sqrt()
    }

    /// Upwind numerical flux across an edge.
    ///
    /// Takes the quantity value from the side the flow originates:
    /// `ql` (interior) when v · n ≥ 0, `qr` (exterior) when v · n < 0.
    /// See [`upwind_edge_flux`] for the sign convention at v · n == 0.
    #[inline]
    pub fn upwind_flux(&self, normal: (f64, f64), ql: f64, qr: f64) -> EdgeFlux {
        upwind_edge_flux(normal, ql, qr, self.velocity())
    }

    /// Lax-Friedrichs numerical flux across an edge.
    ///
    /// More dissipative than upwind but robust for discontinuities.
    #[inline]
    pub fn lax_friedrichs_flux(&self, normal: (f64, f64), ql: f64, qr: f64) -> EdgeFlux {
        lax_friedrichs_edge_flux(normal, ql, qr, self.velocity())
    }
}
