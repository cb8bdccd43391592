//! Flux accumulation and timestep reduction.
//!
//! This is the inner loop of the solver: for every volume, compute the
//! numerical flux across each of its three edges, accumulate the
//! length-weighted fluxes into the volume's explicit update, and reduce
//! the per-edge CFL bounds into one global stable timestep.
//!
//! Per volume `k`:
//!
//! explicit_update[k] = (Σ_i -flux(k, i) * edgelength[k][i]) / area[k]
//!
//! and the timestep bound from edge `i` is `radius[k] / max_speed(k, i)`
//! (skipped when the signal speed is zero, and skipped entirely for
//! ghost volumes). The caller supplies a `max_timestep` ceiling that
//! caps the result when the CFL estimate is very large, e.g. in nearly
//! static early-time dynamics.
//!
//! The kernel trusts its inputs: non-finite edge values or degenerate
//! geometry propagate into the output rather than being repaired here.
//! Well-formedness is enforced upstream, at mesh and quantity
//! construction.

use crate::flux::{EdgeFlux, FluxRule};
use crate::mesh::{Neighbour, TriMesh};
use crate::solver::Quantity;

/// Compute the explicit update and CFL bound for one volume.
///
/// Returns the area-normalized update and the tightest timestep bound
/// among the volume's edges (`f64::MAX` when no edge imposes one).
#[inline]
fn volume_update_and_bound<F: FluxRule + ?Sized>(
    k: usize,
    mesh: &TriMesh,
    edge_values: &[[f64; 3]],
    boundary_values: &[f64],
    flux_rule: &F,
) -> (f64, f64) {
    let mut flux_sum = 0.0;
    let mut optimal_timestep = f64::MAX;

    for i in 0..3 {
        // Quantity inside the volume at this edge.
        let ql = edge_values[k][i];

        // Quantity on the far side: neighbour's matching edge value,
        // or the boundary side table.
        let qr = match mesh.neighbours[k][i] {
            Neighbour::Interior { volume, edge } => edge_values[volume.get()][edge],
            Neighbour::Boundary { slot } => boundary_values[slot.get()],
        };

        let EdgeFlux { flux, max_speed } = flux_rule.edge_flux(mesh.normals[k][i], ql, qr);

        // Outward flux is a loss from the volume's budget.
        flux_sum -= flux * mesh.edgelengths[k][i];

        // Ghost volumes never tighten the global timestep; an edge with
        // zero signal speed imposes no bound.
        if mesh.tri_full_flag[k] && max_speed > 0.0 {
            optimal_timestep = optimal_timestep.min(mesh.radii[k] / max_speed);
        }
    }

    (flux_sum / mesh.areas[k], optimal_timestep)
}

/// Compute all fluxes and the timestep suitable for all volumes.
///
/// Overwrites `quantity.explicit_update` for every volume and returns
/// the largest timestep satisfying the CFL bound of every full volume,
/// capped by `max_timestep`. An empty mesh, or a mesh on which no edge
/// carries a non-zero signal speed, returns `max_timestep`.
///
/// The order of the loop over volumes is irrelevant: each volume's
/// update depends only on read-only mesh geometry and edge/boundary
/// values, never on another volume's update.
pub fn compute_fluxes<F: FluxRule + ?Sized>(
    mesh: &TriMesh,
    quantity: &mut Quantity,
    flux_rule: &F,
    max_timestep: f64,
) -> f64 {
    debug_assert_eq!(quantity.n_volumes(), mesh.n_volumes());
    debug_assert_eq!(quantity.boundary_values.len(), mesh.n_boundary);

    let Quantity {
        ref edge_values,
        ref boundary_values,
        ref mut explicit_update,
    } = *quantity;

    let mut timestep = f64::MAX;
    for k in 0..mesh.n_volumes() {
        let (update, bound) =
            volume_update_and_bound(k, mesh, edge_values, boundary_values, flux_rule);
        explicit_update[k] = update;
        timestep = timestep.min(bound);
    }

    timestep.min(max_timestep)
}

/// Parallel version of [`compute_fluxes`] using Rayon.
///
/// Computes the same `explicit_update` exactly (per-volume writes are
/// disjoint) and the same timestep up to reassociation of the `min`
/// reduction, which is exact for IEEE `min` over finite bounds.
#[cfg(feature = "parallel")]
pub fn compute_fluxes_parallel<F: FluxRule + ?Sized>(
    mesh: &TriMesh,
    quantity: &mut Quantity,
    flux_rule: &F,
    max_timestep: f64,
) -> f64 {
    use rayon::prelude::*;

    debug_assert_eq!(quantity.n_volumes(), mesh.n_volumes());
    debug_assert_eq!(quantity.boundary_values.len(), mesh.n_boundary);

    let Quantity {
        ref edge_values,
        ref boundary_values,
        ref mut explicit_update,
    } = *quantity;

    let timestep = explicit_update
        .par_iter_mut()
        .enumerate()
        .map(|(k, update)| {
            let (u, bound) =
                volume_update_and_bound(k, mesh, edge_values, boundary_values, flux_rule);
            *update = u;
            bound
        })
        .reduce(|| f64::MAX, f64::min);

    timestep.min(max_timestep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::Advection2D;
    use crate::flux::UpwindAdvectionFlux;
    use crate::types::VolumeIndex;

    const MAX_TIMESTEP: f64 = 1000.0;

    /// Single triangle with all three edges on the boundary:
    /// unit edges with normals (1,0), (-1,0), (0,1), area 1, radius 0.5.
    fn single_triangle(full: bool) -> TriMesh {
        TriMesh::from_arrays(
            &[[-1, -2, -3]],
            &[[0, 0, 0]],
            &[[1.0, 0.0, -1.0, 0.0, 0.0, 1.0]],
            &[1.0],
            &[0.5],
            &[[1.0, 1.0, 1.0]],
            &[full],
            3,
        )
        .unwrap()
    }

    fn upwind(vx: f64, vy: f64) -> UpwindAdvectionFlux {
        UpwindAdvectionFlux::new(Advection2D::new(vx, vy))
    }

    #[test]
    fn test_single_triangle_update_and_timestep() {
        // Velocity (1, 0), unit edge values, zero boundary values.
        // Edge 0 (normal (1,0)): outflow, flux = 1. Edge 1 (normal
        // (-1,0)): inflow, flux = 0 from boundary. Edge 2 (normal
        // (0,1)): tangential, flux = 0. Update = -1 / area = -1;
        // timestep = radius / |v·n| = 0.5 from edges 0 and 1.
        let mesh = single_triangle(true);
        let mut q = Quantity::new(&mesh);
        q.edge_values[0] = [1.0, 1.0, 1.0];

        let dt = compute_fluxes(&mesh, &mut q, &upwind(1.0, 0.0), MAX_TIMESTEP);

        assert!((q.explicit_update[0] - (-1.0)).abs() < 1e-14);
        assert!((dt - 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_ghost_volume_excluded_from_timestep() {
        // Same setup, but the volume is a ghost: its update is still
        // computed while the timestep falls back to the ceiling.
        let mesh = single_triangle(false);
        let mut q = Quantity::new(&mesh);
        q.edge_values[0] = [1.0, 1.0, 1.0];

        let dt = compute_fluxes(&mesh, &mut q, &upwind(1.0, 0.0), MAX_TIMESTEP);

        assert!((q.explicit_update[0] - (-1.0)).abs() < 1e-14);
        assert!((dt - MAX_TIMESTEP).abs() < 1e-14);
    }

    #[test]
    fn test_zero_velocity_is_static() {
        let mesh = TriMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 4, 4);
        let mut q = Quantity::new(&mesh);
        let centroids: Vec<f64> = (0..mesh.n_volumes()).map(|k| (k as f64).sin()).collect();
        q.set_from_centroids(&centroids).unwrap();

        let dt = compute_fluxes(&mesh, &mut q, &upwind(0.0, 0.0), MAX_TIMESTEP);

        assert!((dt - MAX_TIMESTEP).abs() < 1e-14);
        assert!(q.explicit_update.iter().all(|&u| u == 0.0));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TriMesh::from_triangulation(&[], &[]);
        let mut q = Quantity::new(&mesh);

        let dt = compute_fluxes(&mesh, &mut q, &upwind(1.0, 0.0), MAX_TIMESTEP);
        assert_eq!(dt, MAX_TIMESTEP);
        assert!(q.explicit_update.is_empty());
    }

    #[test]
    fn test_update_overwritten_not_accumulated() {
        let mesh = single_triangle(true);
        let mut q = Quantity::new(&mesh);
        q.edge_values[0] = [1.0, 1.0, 1.0];

        let rule = upwind(1.0, 0.0);
        compute_fluxes(&mesh, &mut q, &rule, MAX_TIMESTEP);
        let first = q.explicit_update[0];
        compute_fluxes(&mesh, &mut q, &rule, MAX_TIMESTEP);
        assert_eq!(q.explicit_update[0], first);
    }

    #[test]
    fn test_boundary_inflow() {
        // Velocity (-1, 0): edge 0 becomes inflow and draws from the
        // boundary side table.
        let mesh = single_triangle(true);
        let mut q = Quantity::new(&mesh);
        q.edge_values[0] = [1.0, 1.0, 1.0];
        q.boundary_values = vec![4.0, 0.0, 0.0];

        compute_fluxes(&mesh, &mut q, &upwind(-1.0, 0.0), MAX_TIMESTEP);

        // Edge 0: v·n = -1, inflow, flux = 4 * -1 = -4.
        // Edge 1: v·n = 1, outflow, flux = 1.
        // Edge 2: v·n = 0, flux = 0.
        // Update = (4 - 1) / 1 = 3.
        assert!((q.explicit_update[0] - 3.0).abs() < 1e-14);
    }

    #[test]
    fn test_nan_edge_value_propagates() {
        // Precondition violations are not repaired: a NaN edge value
        // flows into the update.
        let mesh = single_triangle(true);
        let mut q = Quantity::new(&mesh);
        q.edge_values[0] = [f64::NAN, 0.0, 0.0];

        compute_fluxes(&mesh, &mut q, &upwind(1.0, 0.0), MAX_TIMESTEP);
        assert!(q.explicit_update[0].is_nan());
    }

    #[test]
    fn test_timestep_capped_by_max() {
        let mesh = single_triangle(true);
        let mut q = Quantity::new(&mesh);

        // radius / max_speed = 0.5, well above the 0.01 ceiling.
        let dt = compute_fluxes(&mesh, &mut q, &upwind(1.0, 0.0), 0.01);
        assert!((dt - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_update_matches_recomputed_sum() {
        // Recompute the update independently from the flux rule and
        // compare against the kernel on a mesh with interior edges.
        let mesh = TriMesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 3, 2);
        let rule = upwind(1.0, 0.5);

        let mut q = Quantity::new(&mesh);
        let centroids: Vec<f64> = (0..mesh.n_volumes())
            .map(|k| 1.0 + (k as f64 * 0.7).cos())
            .collect();
        q.set_from_centroids(&centroids).unwrap();
        for (m, b) in q.boundary_values.iter_mut().enumerate() {
            *b = 0.3 * m as f64;
        }

        let reference = q.clone();
        compute_fluxes(&mesh, &mut q, &rule, MAX_TIMESTEP);

        for k in 0..mesh.n_volumes() {
            let mut expected = 0.0;
            for i in 0..3 {
                let ql = reference.edge_values[k][i];
                let qr = match mesh.neighbours[k][i] {
                    Neighbour::Interior { volume, edge } => {
                        reference.edge_values[volume.get()][edge]
                    }
                    Neighbour::Boundary { slot } => reference.boundary_values[slot.get()],
                };
                let f = rule.edge_flux(mesh.normals[k][i], ql, qr);
                expected -= f.flux * mesh.edgelengths[k][i];
            }
            expected /= mesh.areas[k];
            assert!(
                (q.explicit_update[k] - expected).abs() < 1e-12,
                "update mismatch at volume {k}: {} vs {}",
                q.explicit_update[k],
                expected
            );
        }
    }

    #[test]
    fn test_ghosts_never_tighten_global_timestep() {
        // Mark half the volumes as ghosts; the timestep must equal the
        // minimum over the remaining full volumes alone.
        let mesh_full = TriMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 4, 4);
        let rule = upwind(2.0, -1.0);

        let mut mesh_ghosted = mesh_full.clone();
        for k in 0..mesh_ghosted.n_volumes() / 2 {
            mesh_ghosted.set_ghost(VolumeIndex::new(k));
        }

        let centroids: Vec<f64> = (0..mesh_full.n_volumes()).map(|k| k as f64).collect();

        let mut q = Quantity::new(&mesh_full);
        q.set_from_centroids(&centroids).unwrap();
        let dt_all = compute_fluxes(&mesh_full, &mut q, &rule, MAX_TIMESTEP);

        let mut q = Quantity::new(&mesh_ghosted);
        q.set_from_centroids(&centroids).unwrap();
        let dt_ghosted = compute_fluxes(&mesh_ghosted, &mut q, &rule, MAX_TIMESTEP);

        // Uniform mesh: every volume has the same geometry, so the
        // full-mesh bound equals the ghosted-mesh bound.
        assert!((dt_all - dt_ghosted).abs() < 1e-14);
        assert!(dt_ghosted >= dt_all - 1e-14);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let mesh = TriMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 8, 8);
        let rule = upwind(1.3, -0.7);

        let centroids: Vec<f64> = (0..mesh.n_volumes())
            .map(|k| (k as f64 * 0.11).sin())
            .collect();

        let mut q_serial = Quantity::new(&mesh);
        q_serial.set_from_centroids(&centroids).unwrap();
        let dt_serial = compute_fluxes(&mesh, &mut q_serial, &rule, MAX_TIMESTEP);

        let mut q_parallel = Quantity::new(&mesh);
        q_parallel.set_from_centroids(&centroids).unwrap();
        let dt_parallel = compute_fluxes_parallel(&mesh, &mut q_parallel, &rule, MAX_TIMESTEP);

        assert!((dt_serial - dt_parallel).abs() < 1e-15);
        for k in 0..mesh.n_volumes() {
            assert_eq!(q_serial.explicit_update[k], q_parallel.explicit_update[k]);
        }
    }
}
