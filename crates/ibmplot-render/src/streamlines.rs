//! Streamline tracing through a bilinear velocity field.
//!
//! Lines are integrated in the unit square spanned by the mesh bounds,
//! following the direction of the flow (not its speed), so spacing is
//! controlled by an occupancy grid rather than by the time step. Each
//! occupancy cell is owned by at most one streamline, and a streamline
//! never passes through the same cell twice.

use glam::DVec2;
use ibmplot_core::Mesh;

use crate::error::{RenderError, RenderResult};

/// Occupancy cells per axis at density 1.
const BASE_CELLS: f32 = 30.0;
/// Integration steps per occupancy cell.
const STEPS_PER_CELL: f64 = 5.0;
/// Integration steps per direction per line, in multiples of the cell count.
const MAX_LENGTH_CELLS: usize = 8;
/// Lines shorter than this (unit-square length) are discarded.
const MIN_LENGTH: f64 = 0.05;
/// Speeds below this are treated as stagnation points.
const STAGNATION: f64 = 1e-12;

/// A traced streamline in physical coordinates, ordered along the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    pub points: Vec<DVec2>,
}

impl Streamline {
    /// Total polyline length in physical units.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point and unit direction at the arc-length midpoint.
    pub fn midpoint(&self) -> Option<(DVec2, DVec2)> {
        let half = self.length() / 2.0;
        let mut acc = 0.0;
        for w in self.points.windows(2) {
            let seg = w[0].distance(w[1]);
            if seg > 0.0 && acc + seg >= half {
                let t = (half - acc) / seg;
                let dir = (w[1] - w[0]) / seg;
                return Some((w[0].lerp(w[1], t), dir));
            }
            acc += seg;
        }
        None
    }
}

/// Traces evenly spread streamlines over a mesh.
pub struct StreamlineTracer<'a> {
    mesh: &'a Mesh,
    u: &'a [f64],
    v: &'a [f64],
    origin: DVec2,
    extent: DVec2,
    cells: usize,
}

impl<'a> StreamlineTracer<'a> {
    /// `density` scales the number of occupancy cells per axis (30 at 1.0).
    ///
    /// Both velocity components must have one value per mesh node.
    pub fn new(
        mesh: &'a Mesh,
        u: &'a [f64],
        v: &'a [f64],
        density: f32,
    ) -> RenderResult<Self> {
        for component in [u, v] {
            if component.len() != mesh.len() {
                return Err(RenderError::FieldSize {
                    expected: mesh.len(),
                    actual: component.len(),
                });
            }
        }
        let (lo, hi) = mesh.bounds();
        let cells = (BASE_CELLS * density.max(0.1)).round().max(2.0) as usize;
        Ok(Self {
            mesh,
            u,
            v,
            origin: lo,
            extent: hi - lo,
            cells,
        })
    }

    /// Occupancy cells per axis.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Traces streamlines seeded at every free occupancy cell, row by row.
    pub fn trace(&self) -> Vec<Streamline> {
        let mut occupied = vec![false; self.cells * self.cells];
        let mut lines = Vec::new();

        for cj in 0..self.cells {
            for ci in 0..self.cells {
                if occupied[cj * self.cells + ci] {
                    continue;
                }
                let seed = DVec2::new(
                    (ci as f64 + 0.5) / self.cells as f64,
                    (cj as f64 + 0.5) / self.cells as f64,
                );
                if let Some((points, owned)) = self.trace_from(seed, &occupied) {
                    for cell in owned {
                        occupied[cell] = true;
                    }
                    lines.push(Streamline {
                        points: points.into_iter().map(|p| self.to_physical(p)).collect(),
                    });
                }
            }
        }
        log::debug!(
            "traced {} streamlines on a {}x{} grid",
            lines.len(),
            self.cells,
            self.cells
        );
        lines
    }

    /// Integrates backward then forward from `seed`; returns the unit-square
    /// points and the occupancy cells the line claims.
    fn trace_from(&self, seed: DVec2, occupied: &[bool]) -> Option<(Vec<DVec2>, Vec<usize>)> {
        let seed_cell = self.cell_of(seed)?;
        let mut owned = vec![seed_cell];

        let mut backward = self.integrate(seed, -1.0, occupied, &mut owned);
        let forward = self.integrate(seed, 1.0, occupied, &mut owned);

        backward.reverse();
        backward.push(seed);
        backward.extend(forward);

        let length: f64 = backward.windows(2).map(|w| w[0].distance(w[1])).sum();
        if backward.len() < 2 || length < MIN_LENGTH {
            return None;
        }
        Some((backward, owned))
    }

    fn integrate(
        &self,
        seed: DVec2,
        sign: f64,
        occupied: &[bool],
        owned: &mut Vec<usize>,
    ) -> Vec<DVec2> {
        let ds = 1.0 / (STEPS_PER_CELL * self.cells as f64);
        let max_steps = MAX_LENGTH_CELLS * self.cells * STEPS_PER_CELL as usize;
        let mut points = Vec::new();
        let mut p = seed;
        let Some(mut current) = self.cell_of(seed) else {
            return points;
        };

        for _ in 0..max_steps {
            let Some(k1) = self.direction(p) else { break };
            let mid = p + 0.5 * ds * sign * k1;
            let Some(k2) = self.direction(mid) else { break };
            let next = p + ds * sign * k2;

            let Some(cell) = self.cell_of(next) else { break };
            if cell != current {
                // A line may not re-enter a cell it has left, nor one owned by another line.
                if occupied[cell] || owned.contains(&cell) {
                    break;
                }
                owned.push(cell);
                current = cell;
            }
            points.push(next);
            p = next;
        }
        points
    }

    /// Unit flow direction in unit-square coordinates, `None` outside the
    /// domain or at stagnation points.
    fn direction(&self, p: DVec2) -> Option<DVec2> {
        let phys = self.to_physical(p);
        if !self.mesh.contains(phys) {
            return None;
        }
        let vel = DVec2::new(
            self.mesh.interpolate(self.u, phys),
            self.mesh.interpolate(self.v, phys),
        ) / self.extent;
        let speed = vel.length();
        if !speed.is_finite() || speed < STAGNATION {
            return None;
        }
        Some(vel / speed)
    }

    fn cell_of(&self, p: DVec2) -> Option<usize> {
        if !(0.0..1.0).contains(&p.x) || !(0.0..1.0).contains(&p.y) {
            return None;
        }
        let ci = ((p.x * self.cells as f64) as usize).min(self.cells - 1);
        let cj = ((p.y * self.cells as f64) as usize).min(self.cells - 1);
        Some(cj * self.cells + ci)
    }

    fn to_physical(&self, p: DVec2) -> DVec2 {
        self.origin + p * self.extent
    }
}
