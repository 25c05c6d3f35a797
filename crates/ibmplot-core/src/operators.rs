//! Finite-difference operators and derived fields.
//!
//! Operators are assembled once per mesh and direction as sparse
//! matrices, then applied to every snapshot that gets read.

use std::fmt;

use crate::error::{IbmError, Result};
use crate::mesh::Mesh;
use crate::variable::Variable;

/// Differentiation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    X,
    Y,
}

impl Direction {
    pub fn as_char(self) -> char {
        match self {
            Direction::X => 'x',
            Direction::Y => 'y',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Sparse gradient operator in compressed-row storage.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientOperator {
    direction: Direction,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl GradientOperator {
    /// Central-difference gradient on a possibly stretched mesh.
    ///
    /// Interior nodes use `(f[i+1] - f[i-1]) / (x[i+1] - x[i-1])`, the two
    /// boundary nodes of each line use one-sided differences.
    pub fn central(mesh: &Mesh, direction: Direction) -> Self {
        let (nx, ny) = (mesh.nx(), mesh.ny());
        let n = mesh.len();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(2 * n);
        let mut values = Vec::with_capacity(2 * n);
        row_ptr.push(0);

        for j in 0..ny {
            for i in 0..nx {
                let (coords, pos, stride) = match direction {
                    Direction::X => (mesh.x(), i, 1),
                    Direction::Y => (mesh.y(), j, nx),
                };
                let row = mesh.index(i, j);
                let (lo, hi) = if pos == 0 {
                    (pos, pos + 1)
                } else if pos == coords.len() - 1 {
                    (pos - 1, pos)
                } else {
                    (pos - 1, pos + 1)
                };
                let inv = 1.0 / (coords[hi] - coords[lo]);
                // Column of node `k` along the line through `row`.
                let col = |k: usize| row + k * stride - pos * stride;
                col_idx.push(col(lo));
                values.push(-inv);
                col_idx.push(col(hi));
                values.push(inv);
                row_ptr.push(col_idx.len());
            }
        }

        Self {
            direction,
            row_ptr,
            col_idx,
            values,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of rows, equal to the number of mesh nodes.
    pub fn size(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of stored non-zeros.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Matrix-vector product.
    pub fn apply(&self, field: &[f64]) -> Result<Vec<f64>> {
        if field.len() != self.size() {
            return Err(IbmError::SizeMismatch {
                expected: self.size(),
                actual: field.len(),
            });
        }
        Ok(self
            .row_ptr
            .windows(2)
            .map(|w| {
                (w[0]..w[1])
                    .map(|k| self.values[k] * field[self.col_idx[k]])
                    .sum()
            })
            .collect())
    }
}

/// Directional derivative of a variable's current snapshot.
pub fn grad(variable: &Variable, direction: Direction) -> Result<Vec<f64>> {
    let op = variable
        .gradient(direction)
        .ok_or_else(|| IbmError::OperatorNotAssembled {
            name: variable.name().to_string(),
            direction: direction.as_char(),
        })?;
    op.apply(variable.field())
}

/// Out-of-plane vorticity `dv/dx - du/dy`.
pub fn vorticity(u: &Variable, v: &Variable) -> Result<Vec<f64>> {
    let dvdx = grad(v, Direction::X)?;
    let dudy = grad(u, Direction::Y)?;
    Ok(dvdx.iter().zip(&dudy).map(|(a, b)| a - b).collect())
}

/// Pointwise speed `sqrt(u^2 + v^2)`.
pub fn magnitude(u: &[f64], v: &[f64]) -> Vec<f64> {
    u.iter().zip(v).map(|(a, b)| a.hypot(*b)).collect()
}
