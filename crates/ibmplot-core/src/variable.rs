//! Field snapshots read from a case directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::case::Case;
use crate::error::{IbmError, Result};
use crate::mesh::Mesh;
use crate::operators::{Direction, GradientOperator};
use crate::solver::IterationContext;

/// On-disk encoding of snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Whitespace separated decimal values.
    #[default]
    Ascii,
    /// Raw native-endian `f64` values.
    Binary,
}

impl SnapshotFormat {
    /// Decodes the contents of a snapshot file.
    pub fn decode(self, bytes: &[u8], path: &Path) -> Result<Vec<f64>> {
        match self {
            SnapshotFormat::Ascii => String::from_utf8_lossy(bytes)
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| IbmError::ParseFloat {
                        token: token.to_string(),
                        path: path.to_path_buf(),
                    })
                })
                .collect(),
            SnapshotFormat::Binary => {
                let width = std::mem::size_of::<f64>();
                if bytes.len() % width != 0 {
                    return Err(IbmError::InvalidConfig(format!(
                        "binary snapshot {} is {} bytes, not a multiple of {width}",
                        path.display(),
                        bytes.len()
                    )));
                }
                Ok(bytemuck::pod_collect_to_vec::<u8, f64>(bytes))
            }
        }
    }

    /// Encodes a field the way [`SnapshotFormat::decode`] expects it.
    pub fn encode(self, field: &[f64]) -> Vec<u8> {
        match self {
            SnapshotFormat::Ascii => {
                let mut text = String::with_capacity(field.len() * 24);
                for v in field {
                    text.push_str(&format!("{v:e}\n"));
                }
                text.into_bytes()
            }
            SnapshotFormat::Binary => bytemuck::cast_slice::<f64, u8>(field).to_vec(),
        }
    }
}

/// A named scalar field (`p`, `u`, `v`) sampled on the mesh nodes.
///
/// The buffer only reflects the iteration passed to the last
/// [`Variable::read`]; nothing is cached across iterations.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    field: Vec<f64>,
    gradient_x: Option<GradientOperator>,
    gradient_y: Option<GradientOperator>,
}

impl Variable {
    /// Creates a zeroed variable of `len` nodes.
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            field: vec![0.0; len],
            gradient_x: None,
            gradient_y: None,
        }
    }

    /// Creates a zeroed variable sized for the mesh.
    pub fn on_mesh(name: impl Into<String>, mesh: &Mesh) -> Self {
        Self::new(name, mesh.len())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &[f64] {
        &self.field
    }

    /// Replaces the buffer, keeping its length.
    pub fn set_field(&mut self, field: Vec<f64>) -> Result<()> {
        if field.len() != self.field.len() {
            return Err(IbmError::SizeMismatch {
                expected: self.field.len(),
                actual: field.len(),
            });
        }
        self.field = field;
        Ok(())
    }

    /// Loads the snapshot saved at the given iteration.
    pub fn read(&mut self, case: &Case, ctx: IterationContext) -> Result<()> {
        let path = case.snapshot_path(&self.name, ctx);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IbmError::SnapshotNotFound {
                    name: self.name.clone(),
                    iteration: ctx.iteration(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };
        let values = case.snapshot_format().decode(&bytes, &path)?;
        self.set_field(values)?;
        log::debug!(
            "read '{}' at iteration {} from {}",
            self.name,
            ctx.iteration(),
            path.display()
        );
        Ok(())
    }

    /// Assembles the central-difference gradient operator in `direction`.
    ///
    /// Assembly only depends on the mesh, so it is done once before the
    /// iteration loop.
    pub fn assemble_gradient(&mut self, mesh: &Mesh, direction: Direction) {
        let op = GradientOperator::central(mesh, direction);
        match direction {
            Direction::X => self.gradient_x = Some(op),
            Direction::Y => self.gradient_y = Some(op),
        }
    }

    /// The assembled gradient operator in `direction`, if any.
    pub fn gradient(&self, direction: Direction) -> Option<&GradientOperator> {
        match direction {
            Direction::X => self.gradient_x.as_ref(),
            Direction::Y => self.gradient_y.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ascii_decode() {
        let values = SnapshotFormat::Ascii
            .decode(b"1.0 -2.5\n3e-1\t4\n", &PathBuf::from("p"))
            .unwrap();
        assert_eq!(values, vec![1.0, -2.5, 0.3, 4.0]);
    }

    #[test]
    fn test_ascii_decode_bad_token() {
        let err = SnapshotFormat::Ascii
            .decode(b"1.0 abc", &PathBuf::from("p"))
            .unwrap_err();
        assert!(matches!(err, IbmError::ParseFloat { ref token, .. } if token == "abc"));
    }

    #[test]
    fn test_binary_codec() {
        let field = vec![0.25, -1.5, 1e-9, 42.0];
        let bytes = SnapshotFormat::Binary.encode(&field);
        assert_eq!(bytes.len(), 32);
        let decoded = SnapshotFormat::Binary
            .decode(&bytes, &PathBuf::from("u"))
            .unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn test_binary_decode_unaligned_bytes() {
        let field = vec![3.5, -0.125];
        let mut buffer = vec![0u8];
        buffer.extend(SnapshotFormat::Binary.encode(&field));
        let decoded = SnapshotFormat::Binary
            .decode(&buffer[1..], &PathBuf::from("v"))
            .unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn test_binary_truncated() {
        assert!(SnapshotFormat::Binary
            .decode(&[0u8; 12], &PathBuf::from("u"))
            .is_err());
    }

    #[test]
    fn test_set_field_checks_length() {
        let mut p = Variable::new("p", 4);
        assert!(p.set_field(vec![1.0; 4]).is_ok());
        assert!(matches!(
            p.set_field(vec![1.0; 5]),
            Err(IbmError::SizeMismatch { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_assemble_gradient_per_direction() {
        let mesh = Mesh::uniform(3, 3, (0.0, 1.0), (0.0, 1.0)).unwrap();
        let mut u = Variable::on_mesh("u", &mesh);
        assert!(u.gradient(Direction::Y).is_none());
        u.assemble_gradient(&mesh, Direction::Y);
        assert!(u.gradient(Direction::Y).is_some());
        assert!(u.gradient(Direction::X).is_none());
    }
}
