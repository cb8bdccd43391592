//! Unstructured triangular mesh for finite-volume computations.
//!
//! The mesh stores, per triangular volume:
//! - three neighbour links (interior volume or boundary slot)
//! - three outward unit normals and edge lengths
//! - area and inradius
//! - a full/ghost flag for partitioned runs
//!
//! Edge convention: local edge `i` of a volume is the side opposite
//! local vertex `i`, i.e. edge 0 runs from vertex 1 to vertex 2.
//! Vertices are ordered counter-clockwise.
//!
//! Boundary edges carry no triangle neighbour; instead they reference a
//! slot in the boundary-value side table owned by
//! [`Quantity`](crate::solver::Quantity). Legacy mesh files encode this
//! as a negative neighbour index `-(slot + 1)`; that encoding exists
//! here only as a conversion in [`TriMesh::from_arrays`].

use thiserror::Error;

use crate::types::{BoundarySlot, VolumeIndex};

/// Tolerance for the unit-normal check during mesh validation.
const NORMAL_UNIT_TOL: f64 = 1e-8;

/// What lies on the far side of one edge of a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighbour {
    /// The edge is shared with another triangle.
    Interior {
        /// The neighbouring volume.
        volume: VolumeIndex,
        /// The local edge index (0..3) of this edge on the neighbour's side.
        edge: usize,
    },
    /// The edge lies on the domain boundary; its exterior value comes
    /// from the boundary-value side table.
    Boundary {
        /// Slot in the boundary-value arrays.
        slot: BoundarySlot,
    },
}

impl Neighbour {
    /// Decode the legacy signed encoding: a non-negative value is a
    /// neighbouring volume index (paired with `neighbour_edge`); a
    /// negative value `-(slot + 1)` is a boundary slot.
    pub fn from_signed(value: i32, neighbour_edge: usize) -> Self {
        if value >= 0 {
            Neighbour::Interior {
                volume: VolumeIndex::new(value as usize),
                edge: neighbour_edge,
            }
        } else {
            Neighbour::Boundary {
                slot: BoundarySlot::new((-value - 1) as usize),
            }
        }
    }

    /// Whether this edge lies on the domain boundary.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Neighbour::Boundary { .. })
    }
}

/// Error type for mesh construction and validation.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A per-volume array has the wrong length.
    #[error("array '{name}' has length {actual}, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A volume has a non-positive area.
    #[error("volume {volume} has non-positive area {area}")]
    NonPositiveArea { volume: usize, area: f64 },

    /// A volume has a non-positive inradius.
    #[error("volume {volume} has non-positive radius {radius}")]
    NonPositiveRadius { volume: usize, radius: f64 },

    /// An edge has a non-positive length.
    #[error("edge {edge} of volume {volume} has non-positive length {length}")]
    NonPositiveEdgeLength {
        volume: usize,
        edge: usize,
        length: f64,
    },

    /// An edge normal is not unit length.
    #[error("edge {edge} of volume {volume} has normal of length {norm}, expected 1")]
    NonUnitNormal {
        volume: usize,
        edge: usize,
        norm: f64,
    },

    /// An interior link references a volume outside the mesh or a
    /// local edge outside 0..3.
    #[error(
        "edge {edge} of volume {volume} links to volume {neighbour} edge {neighbour_edge}, \
         but the mesh has {n_volumes} volumes"
    )]
    InvalidNeighbourLink {
        volume: usize,
        edge: usize,
        neighbour: usize,
        neighbour_edge: usize,
        n_volumes: usize,
    },

    /// An interior link is not reciprocated by the neighbour.
    #[error(
        "edge {edge} of volume {volume} links to volume {neighbour} edge {neighbour_edge}, \
         which does not link back"
    )]
    NonReciprocalLink {
        volume: usize,
        edge: usize,
        neighbour: usize,
        neighbour_edge: usize,
    },

    /// A boundary edge references a slot beyond the side table.
    #[error(
        "edge {edge} of volume {volume} references boundary slot {slot}, \
         but only {n_boundary} slots exist"
    )]
    BoundarySlotOutOfRange {
        volume: usize,
        edge: usize,
        slot: usize,
        n_boundary: usize,
    },
}

/// Unstructured mesh of triangular volumes.
///
/// All geometry is precomputed; the flux kernel only reads these
/// arrays. The mesh is immutable for the lifetime of a run apart from
/// [`set_ghost`](TriMesh::set_ghost), which is applied during partition
/// setup before any flux computation.
#[derive(Clone, Debug)]
pub struct TriMesh {
    /// Neighbour link for each edge of each volume.
    pub neighbours: Vec<[Neighbour; 3]>,

    /// Outward unit normal (nx, ny) for each edge of each volume.
    pub normals: Vec<[(f64, f64); 3]>,

    /// Area of each volume.
    pub areas: Vec<f64>,

    /// Inradius of each volume, used for the CFL stability bound.
    pub radii: Vec<f64>,

    /// Length of each edge of each volume.
    pub edgelengths: Vec<[f64; 3]>,

    /// True for volumes owned by this partition; false for ghost
    /// volumes replicated from a neighbouring partition. Ghost volumes
    /// still receive an explicit update but never tighten the global
    /// timestep.
    pub tri_full_flag: Vec<bool>,

    /// Number of boundary slots in the side table.
    pub n_boundary: usize,
}

impl TriMesh {
    /// Build a mesh from already-tagged neighbour links, validating
    /// shapes, geometry and link consistency.
    pub fn new(
        neighbours: Vec<[Neighbour; 3]>,
        normals: Vec<[(f64, f64); 3]>,
        areas: Vec<f64>,
        radii: Vec<f64>,
        edgelengths: Vec<[f64; 3]>,
        tri_full_flag: Vec<bool>,
        n_boundary: usize,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            neighbours,
            normals,
            areas,
            radii,
            edgelengths,
            tri_full_flag,
            n_boundary,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a mesh from the legacy flat arrays produced by external
    /// mesh generators.
    ///
    /// `neighbours[k][i]` holds either a neighbouring volume index or
    /// the negative sentinel `-(slot + 1)` for a boundary edge;
    /// `neighbour_edges[k][i]` holds the local edge index on the
    /// neighbour's side (ignored for boundary edges). `normals[k]` is
    /// the flat layout `[n0x, n0y, n1x, n1y, n2x, n2y]`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_arrays(
        neighbours: &[[i32; 3]],
        neighbour_edges: &[[usize; 3]],
        normals: &[[f64; 6]],
        areas: &[f64],
        radii: &[f64],
        edgelengths: &[[f64; 3]],
        tri_full_flag: &[bool],
        n_boundary: usize,
    ) -> Result<Self, MeshError> {
        let tagged: Vec<[Neighbour; 3]> = neighbours
            .iter()
            .zip(neighbour_edges)
            .map(|(links, edges)| {
                [
                    Neighbour::from_signed(links[0], edges[0]),
                    Neighbour::from_signed(links[1], edges[1]),
                    Neighbour::from_signed(links[2], edges[2]),
                ]
            })
            .collect();

        let paired: Vec<[(f64, f64); 3]> = normals
            .iter()
            .map(|n| [(n[0], n[1]), (n[2], n[3]), (n[4], n[5])])
            .collect();

        Self::new(
            tagged,
            paired,
            areas.to_vec(),
            radii.to_vec(),
            edgelengths.to_vec(),
            tri_full_flag.to_vec(),
            n_boundary,
        )
    }

    /// Create a triangulated uniform rectangular mesh of
    /// [x0, x1] × [y0, y1].
    ///
    /// Each of the `nx` × `ny` grid cells is split into two triangles
    /// along its south-west/north-east diagonal. Boundary slots are
    /// numbered in order of discovery, scanning volumes and local edges
    /// ascending.
    ///
    /// # Panics
    /// Panics if `nx` or `ny` is zero or the bounds are inverted; these
    /// are programming errors in test/benchmark setup, not runtime
    /// conditions.
    pub fn uniform_rectangle(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Self {
        assert!(
            nx > 0 && ny > 0,
            "Need at least one cell in each direction"
        );
        assert!(x1 > x0 && y1 > y0, "Invalid domain bounds");

        let dx = (x1 - x0) / nx as f64;
        let dy = (y1 - y0) / ny as f64;

        // Vertex grid: (nx+1) × (ny+1)
        let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.push((x0 + i as f64 * dx, y0 + j as f64 * dy));
            }
        }

        // Two counter-clockwise triangles per cell, split along the
        // SW-NE diagonal: lower (bl, br, tr) and upper (bl, tr, tl).
        let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let bl = j * (nx + 1) + i;
                let br = bl + 1;
                let tr = br + (nx + 1);
                let tl = bl + (nx + 1);
                triangles.push([bl, br, tr]);
                triangles.push([bl, tr, tl]);
            }
        }

        Self::from_triangulation(&vertices, &triangles)
    }

    /// Build a mesh from an explicit triangulation.
    ///
    /// Triangles must be counter-clockwise. Edges shared by two
    /// triangles become interior links; unshared edges become boundary
    /// edges with slots numbered in scan order.
    pub fn from_triangulation(vertices: &[(f64, f64)], triangles: &[[usize; 3]]) -> Self {
        use std::collections::HashMap;

        let n = triangles.len();

        // Pair up shared edges via a sorted-endpoints map.
        let mut pending: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        let mut links: Vec<[Option<(usize, usize)>; 3]> = vec![[None; 3]; n];

        for (k, tri) in triangles.iter().enumerate() {
            for i in 0..3 {
                let a = tri[(i + 1) % 3];
                let b = tri[(i + 2) % 3];
                let key = (a.min(b), a.max(b));

                if let Some((k2, i2)) = pending.remove(&key) {
                    links[k][i] = Some((k2, i2));
                    links[k2][i2] = Some((k, i));
                } else {
                    pending.insert(key, (k, i));
                }
            }
        }

        // Assign boundary slots in scan order.
        let mut neighbours = vec![
            [Neighbour::Boundary {
                slot: BoundarySlot::ZERO
            }; 3];
            n
        ];
        let mut n_boundary = 0;
        for k in 0..n {
            for i in 0..3 {
                neighbours[k][i] = match links[k][i] {
                    Some((volume, edge)) => Neighbour::Interior {
                        volume: VolumeIndex::new(volume),
                        edge,
                    },
                    None => {
                        let slot = BoundarySlot::new(n_boundary);
                        n_boundary += 1;
                        Neighbour::Boundary { slot }
                    }
                };
            }
        }

        // Per-triangle geometry.
        let mut normals = Vec::with_capacity(n);
        let mut areas = Vec::with_capacity(n);
        let mut radii = Vec::with_capacity(n);
        let mut edgelengths = Vec::with_capacity(n);

        for tri in triangles {
            let p = [vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]];

            let area = 0.5
                * ((p[1].0 - p[0].0) * (p[2].1 - p[0].1)
                    - (p[2].0 - p[0].0) * (p[1].1 - p[0].1));
            assert!(area > 0.0, "Triangle vertices must be counter-clockwise");

            let mut tri_normals = [(0.0, 0.0); 3];
            let mut tri_lengths = [0.0; 3];
            for i in 0..3 {
                let from = p[(i + 1) % 3];
                let to = p[(i + 2) % 3];
                let (ex, ey) = (to.0 - from.0, to.1 - from.1);
                let len = (ex * ex + ey * ey).sqrt();
                // Clockwise rotation of the edge direction points
                // outward for counter-clockwise vertex ordering.
                tri_normals[i] = (ey / len, -ex / len);
                tri_lengths[i] = len;
            }

            let perimeter: f64 = tri_lengths.iter().sum();

            normals.push(tri_normals);
            areas.push(area);
            radii.push(2.0 * area / perimeter);
            edgelengths.push(tri_lengths);
        }

        Self {
            neighbours,
            normals,
            areas,
            radii,
            edgelengths,
            tri_full_flag: vec![true; n],
            n_boundary,
        }
    }

    /// Number of volumes in the mesh.
    #[inline]
    pub fn n_volumes(&self) -> usize {
        self.neighbours.len()
    }

    /// Whether a volume is owned by this partition (not a ghost).
    #[inline]
    pub fn is_full(&self, volume: usize) -> bool {
        self.tri_full_flag[volume]
    }

    /// Mark a volume as a ghost replicated from another partition.
    ///
    /// Ghost volumes still receive an explicit update (their owner
    /// consumes it elsewhere) but are excluded from the timestep bound.
    pub fn set_ghost(&mut self, volume: VolumeIndex) {
        self.tri_full_flag[volume.get()] = false;
    }

    fn validate(&self) -> Result<(), MeshError> {
        let n = self.neighbours.len();

        let check_len = |name: &'static str, actual: usize| -> Result<(), MeshError> {
            if actual != n {
                Err(MeshError::LengthMismatch {
                    name,
                    expected: n,
                    actual,
                })
            } else {
                Ok(())
            }
        };
        check_len("normals", self.normals.len())?;
        check_len("areas", self.areas.len())?;
        check_len("radii", self.radii.len())?;
        check_len("edgelengths", self.edgelengths.len())?;
        check_len("tri_full_flag", self.tri_full_flag.len())?;

        for k in 0..n {
            if self.areas[k] <= 0.0 {
                return Err(MeshError::NonPositiveArea {
                    volume: k,
                    area: self.areas[k],
                });
            }
            if self.radii[k] <= 0.0 {
                return Err(MeshError::NonPositiveRadius {
                    volume: k,
                    radius: self.radii[k],
                });
            }

            for i in 0..3 {
                let length = self.edgelengths[k][i];
                if length <= 0.0 {
                    return Err(MeshError::NonPositiveEdgeLength {
                        volume: k,
                        edge: i,
                        length,
                    });
                }

                let (nx, ny) = self.normals[k][i];
                let norm = (nx * nx + ny * ny).sqrt();
                if (norm - 1.0).abs() > NORMAL_UNIT_TOL {
                    return Err(MeshError::NonUnitNormal {
                        volume: k,
                        edge: i,
                        norm,
                    });
                }

                match self.neighbours[k][i] {
                    Neighbour::Interior { volume, edge } => {
                        if volume.get() >= n || edge >= 3 {
                            return Err(MeshError::InvalidNeighbourLink {
                                volume: k,
                                edge: i,
                                neighbour: volume.get(),
                                neighbour_edge: edge,
                                n_volumes: n,
                            });
                        }
                        let back = self.neighbours[volume.get()][edge];
                        let expected = Neighbour::Interior {
                            volume: VolumeIndex::new(k),
                            edge: i,
                        };
                        if back != expected {
                            return Err(MeshError::NonReciprocalLink {
                                volume: k,
                                edge: i,
                                neighbour: volume.get(),
                                neighbour_edge: edge,
                            });
                        }
                    }
                    Neighbour::Boundary { slot } => {
                        if slot.get() >= self.n_boundary {
                            return Err(MeshError::BoundarySlotOutOfRange {
                                volume: k,
                                edge: i,
                                slot: slot.get(),
                                n_boundary: self.n_boundary,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
