//! Cartesian mesh geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{IbmError, Result};

/// Mesh section of `case.json`.
///
/// Explicit coordinate arrays take precedence over the uniform spacing
/// implied by the bounding box, which is how stretched grids are described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Number of nodes in x.
    pub nx: usize,
    /// Number of nodes in y.
    pub ny: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// Explicit x-coordinates (length `nx`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<f64>>,
    /// Explicit y-coordinates (length `ny`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<f64>>,
    /// Whether an immersed body is present.
    #[serde(default)]
    pub is_body: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            nx: 2,
            ny: 2,
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            x: None,
            y: None,
            is_body: false,
        }
    }
}

/// Read-only grid geometry shared by every renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    x: Vec<f64>,
    y: Vec<f64>,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    is_body: bool,
}

impl Mesh {
    /// Builds a uniform mesh over the given bounds.
    pub fn uniform(
        nx: usize,
        ny: usize,
        (xmin, xmax): (f64, f64),
        (ymin, ymax): (f64, f64),
    ) -> Result<Self> {
        Self::from_config(&MeshConfig {
            nx,
            ny,
            xmin,
            xmax,
            ymin,
            ymax,
            ..MeshConfig::default()
        })
    }

    /// Builds the mesh described by a configuration section.
    pub fn from_config(config: &MeshConfig) -> Result<Self> {
        let x = axis_coordinates(
            'x',
            config.nx,
            config.xmin,
            config.xmax,
            config.x.as_deref(),
        )?;
        let y = axis_coordinates(
            'y',
            config.ny,
            config.ymin,
            config.ymax,
            config.y.as_deref(),
        )?;

        if config.xmax <= config.xmin || config.ymax <= config.ymin {
            return Err(IbmError::InvalidConfig(format!(
                "empty mesh bounds [{}, {}] x [{}, {}]",
                config.xmin, config.xmax, config.ymin, config.ymax
            )));
        }

        Ok(Self {
            x,
            y,
            xmin: config.xmin,
            xmax: config.xmax,
            ymin: config.ymin,
            ymax: config.ymax,
            is_body: config.is_body,
        })
    }

    /// Node x-coordinates.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Node y-coordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Number of nodes, i.e. the length of every flattened field.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Always false, a mesh has at least 2x2 nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened index of node `(i, j)`, x running fastest.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx() + i
    }

    /// Lower-left and upper-right corners of the plotting window.
    pub fn bounds(&self) -> (DVec2, DVec2) {
        (
            DVec2::new(self.xmin, self.ymin),
            DVec2::new(self.xmax, self.ymax),
        )
    }

    pub fn is_body(&self) -> bool {
        self.is_body
    }

    /// Bilinear interpolation of a node field at a physical point.
    ///
    /// Points outside the node range are clamped onto the boundary.
    pub fn interpolate(&self, field: &[f64], p: DVec2) -> f64 {
        let (i, tx) = locate(&self.x, p.x);
        let (j, ty) = locate(&self.y, p.y);

        let f00 = field[self.index(i, j)];
        let f10 = field[self.index(i + 1, j)];
        let f01 = field[self.index(i, j + 1)];
        let f11 = field[self.index(i + 1, j + 1)];

        let bottom = f00 + tx * (f10 - f00);
        let top = f01 + tx * (f11 - f01);
        bottom + ty * (top - bottom)
    }

    /// Whether a point lies inside the node range.
    pub fn contains(&self, p: DVec2) -> bool {
        let (x0, x1) = (self.x[0], self.x[self.nx() - 1]);
        let (y0, y1) = (self.y[0], self.y[self.ny() - 1]);
        p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
    }
}

fn axis_coordinates(
    axis: char,
    n: usize,
    lo: f64,
    hi: f64,
    explicit: Option<&[f64]>,
) -> Result<Vec<f64>> {
    let coords = match explicit {
        Some(values) => {
            if values.len() != n {
                return Err(IbmError::InvalidConfig(format!(
                    "{axis}-coordinates have {} entries but n{axis} = {n}",
                    values.len()
                )));
            }
            values.to_vec()
        }
        None => linspace(lo, hi, n),
    };

    if coords.len() < 2 {
        return Err(IbmError::InvalidConfig(format!(
            "mesh needs at least 2 nodes in {axis}, got {}",
            coords.len()
        )));
    }
    if coords.windows(2).any(|w| w[1] <= w[0]) {
        return Err(IbmError::InvalidConfig(format!(
            "{axis}-coordinates must be strictly increasing"
        )));
    }
    Ok(coords)
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Cell index and fractional offset of `v` along a sorted coordinate axis.
fn locate(coords: &[f64], v: f64) -> (usize, f64) {
    let last = coords.len() - 2;
    let i = coords
        .partition_point(|&c| c <= v)
        .saturating_sub(1)
        .min(last);
    let t = (v - coords[i]) / (coords[i + 1] - coords[i]);
    (i, t.clamp(0.0, 1.0))
}
