//! Upwind numerical flux for scalar advection on a 2D edge.
//!
//! For the advection equation du/dt + ∇ · (v u) = 0, the flux through an
//! edge with outward unit normal n is determined by the sign of v · n:
//!
//! F · n = (v · n) ql if v · n ≥ 0  (outflow, interior value leaves)
//! F · n = (v · n) qr if v · n < 0  (inflow, exterior value enters)
//!
//! The tie-break at v · n == 0 takes the outward branch (ql). The flux is
//! zero either way, but the convention is part of the kernel's contract
//! and is relied on by bit-compatibility tests.

use super::EdgeFlux;

/// Compute the upwind numerical flux across an edge.
///
/// # Arguments
/// * `normal` - Outward unit normal (nx, ny) of the edge
/// * `ql` - Quantity value on the inside of the edge
/// * `qr` - Quantity value on the outside (neighbour or boundary)
/// * `velocity` - Advection velocity (v_1, v_2)
///
/// # Returns
/// The scalar flux F · n and the signal speed |v · n| for the edge.
///
/// A degenerate normal (0, 0) yields a zero flux and zero speed; this is
/// a legitimate degenerate-edge outcome, not an error.
#[inline]
pub fn upwind_edge_flux(normal: (f64, f64), ql: f64, qr: f64, velocity: (f64, f64)) -> EdgeFlux {
    let normal_velocity = velocity.0 * normal.0 + velocity.1 * normal.1;

    let flux = if normal_velocity < 0.0 {
        // Inflow: exterior fluid is entering
        qr * normal_velocity
    } else {
        // Outflow (or exactly tangential): interior fluid is leaving
        ql * normal_velocity
    };

    EdgeFlux {
        flux,
        max_speed: normal_velocity.abs(),
    }
}

/// Compute the Lax-Friedrichs numerical flux across an edge.
///
/// F · n = 0.5 * (v · n) * (ql + qr) - 0.5 * |v · n| * (qr - ql)
///
/// More dissipative than upwind but robust for discontinuities. For
/// scalar advection the two coincide; the LF form is kept as the
/// reference flux for systems where the upwind split is not exact.
#[inline]
pub fn lax_friedrichs_edge_flux(
    normal: (f64, f64),
    ql: f64,
    qr: f64,
    velocity: (f64, f64),
) -> EdgeFlux {
    let normal_velocity = velocity.0 * normal.0 + velocity.1 * normal.1;

    let flux_l = normal_velocity * ql;
    let flux_r = normal_velocity * qr;
    let lambda = normal_velocity.abs();

    EdgeFlux {
        flux: 0.5 * (flux_l + flux_r) - 0.5 * lambda * (qr - ql),
        max_speed: lambda,
    }
}
