//! Case directory layout and configuration.
//!
//! A case directory holds `case.json`, one folder per saved iteration
//! (`00020/p`, `00020/u`, ...) and the `images/` folder that receives the
//! rendered frames.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyConfig};
use crate::error::{IbmError, Result};
use crate::mesh::{Mesh, MeshConfig};
use crate::solver::{IterationContext, RunSchedule, SolverConfig};
use crate::variable::SnapshotFormat;

/// Name of the configuration file inside a case directory.
pub const CASE_FILE: &str = "case.json";

/// Name of the output folder inside a case directory.
pub const IMAGES_DIR: &str = "images";

/// Contents of `case.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    pub mesh: MeshConfig,
    pub solver: SolverConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyConfig>,
    #[serde(default)]
    pub snapshot_format: SnapshotFormat,
}

impl CaseConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An output directory of a solver run.
#[derive(Debug, Clone)]
pub struct Case {
    path: PathBuf,
    config: CaseConfig,
}

impl Case {
    /// Opens a case directory and parses its `case.json`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = path.join(CASE_FILE);
        let text = std::fs::read_to_string(&file).map_err(|e| {
            IbmError::InvalidConfig(format!("cannot read {}: {e}", file.display()))
        })?;
        let config = CaseConfig::from_json(&text)?;
        log::info!("opened case {}", path.display());
        Ok(Self { path, config })
    }

    /// Creates a case directory with the given configuration.
    pub fn create(path: impl AsRef<Path>, config: CaseConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;
        std::fs::write(path.join(CASE_FILE), config.to_json()?)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    pub fn snapshot_format(&self) -> SnapshotFormat {
        self.config.snapshot_format
    }

    /// Builds the mesh described by the case.
    pub fn mesh(&self) -> Result<Mesh> {
        Mesh::from_config(&self.config.mesh)
    }

    /// The immersed body, present exactly when the mesh declares one.
    pub fn body(&self) -> Result<Option<Body>> {
        if !self.config.mesh.is_body {
            if self.config.body.is_some() {
                log::warn!("case has a body section but mesh.is_body is false, ignoring it");
            }
            return Ok(None);
        }
        let config = self.config.body.as_ref().ok_or(IbmError::MissingBody)?;
        Body::from_config(config).map(Some)
    }

    pub fn schedule(&self) -> Result<RunSchedule> {
        RunSchedule::from_config(&self.config.solver)
    }

    /// `<case>/<iteration:05>/<name>`
    pub fn snapshot_path(&self, name: &str, ctx: IterationContext) -> PathBuf {
        self.path.join(ctx.snapshot_tag()).join(name)
    }

    /// `<case>/images`
    pub fn images_dir(&self) -> PathBuf {
        self.path.join(IMAGES_DIR)
    }

    /// `<case>/images/<stem><iteration:04>.png`
    pub fn image_path(&self, stem: &str, ctx: IterationContext) -> PathBuf {
        self.images_dir()
            .join(format!("{stem}{}.png", ctx.image_tag()))
    }

    /// Writes a snapshot in the case's format, creating the iteration folder.
    pub fn write_snapshot(&self, name: &str, ctx: IterationContext, field: &[f64]) -> Result<()> {
        let path = self.snapshot_path(name, ctx);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.snapshot_format().encode(field))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    fn sample_config() -> CaseConfig {
        CaseConfig {
            mesh: MeshConfig {
                nx: 3,
                ny: 2,
                ..MeshConfig::default()
            },
            solver: SolverConfig {
                start: 0,
                nt: 40,
                write_every: 20,
            },
            body: None,
            snapshot_format: SnapshotFormat::Ascii,
        }
    }

    #[test]
    fn test_parse_minimal_json() {
        let config = CaseConfig::from_json(
            r#"{
                "mesh": {"nx": 4, "ny": 3, "xmin": -1, "xmax": 1, "ymin": 0, "ymax": 2},
                "solver": {"start": 10, "nt": 100, "write_every": 10}
            }"#,
        )
        .unwrap();
        assert_eq!(config.mesh.nx, 4);
        assert!(!config.mesh.is_body);
        assert!(config.body.is_none());
        assert_eq!(config.snapshot_format, SnapshotFormat::Ascii);
        assert_eq!(config.solver.write_every, 10);
    }

    #[test]
    fn test_paths() {
        let dir = tempfile::tempdir().unwrap();
        let case = Case::create(dir.path(), sample_config()).unwrap();
        let ctx = IterationContext::new(20);
        assert_eq!(
            case.snapshot_path("p", ctx),
            dir.path().join("00020").join("p")
        );
        assert_eq!(
            case.image_path("pressure", ctx),
            dir.path().join("images").join("pressure0020.png")
        );
    }

    #[test]
    fn test_open_roundtrip_and_read_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        Case::create(dir.path(), sample_config()).unwrap();

        let case = Case::open(dir.path()).unwrap();
        let ctx = IterationContext::new(20);
        case.write_snapshot("p", ctx, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();

        let mesh = case.mesh().unwrap();
        let mut p = Variable::on_mesh("p", &mesh);
        p.read(&case, ctx).unwrap();
        assert_eq!(p.field(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let case = Case::create(dir.path(), sample_config()).unwrap();
        let mut p = Variable::new("p", 6);
        let err = p.read(&case, IterationContext::new(40)).unwrap_err();
        assert!(matches!(err, IbmError::SnapshotNotFound { iteration: 40, .. }));
    }

    #[test]
    fn test_snapshot_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        let case = Case::create(dir.path(), sample_config()).unwrap();
        let ctx = IterationContext::new(20);
        case.write_snapshot("u", ctx, &[1.0, 2.0]).unwrap();
        let mut u = Variable::new("u", 6);
        assert!(matches!(
            u.read(&case, ctx),
            Err(IbmError::SizeMismatch { expected: 6, actual: 2 })
        ));
    }

    #[test]
    fn test_body_requires_section() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.mesh.is_body = true;
        let case = Case::create(dir.path(), config).unwrap();
        assert!(matches!(case.body(), Err(IbmError::MissingBody)));
    }

    #[test]
    fn test_body_loaded_when_declared() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.mesh.is_body = true;
        config.body = Some(BodyConfig {
            x: vec![0.2, 0.8, 0.5],
            y: vec![0.2, 0.2, 0.8],
        });
        let case = Case::create(dir.path(), config).unwrap();
        let body = case.body().unwrap().unwrap();
        assert_eq!(body.markers().len(), 3);
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Case::open(dir.path().join("nope")),
            Err(IbmError::InvalidConfig(_))
        ));
    }
}
