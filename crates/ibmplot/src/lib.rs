//! ibmplot: batch plots of immersed-boundary CFD cases.
//!
//! Every saved iteration of a case is rendered to
//! `<case>/images/<quantity><iteration:04>.png` as a filled contour plot of
//! pressure, velocity magnitude (with streamlines) or vorticity, with the
//! immersed body outlined when the mesh has one.
//!
//! # Quick Start
//!
//! ```no_run
//! use ibmplot::*;
//!
//! fn main() -> Result<()> {
//!     let options = PlotOptions::default();
//!     let mut post = PostProcessor::new("cases/cylinder", QuantitySet::all(), options)?;
//!     for path in post.run()? {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Color scales
//!
//! Scales are fixed per quantity so frames stay comparable: pressure
//! `[-0.5, 0.5]`, velocity `[0, 1]`, vorticity `[-1, 1]`, each split into
//! 100 levels. Values outside the scale take the end colors.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
mod driver;
mod plots;

pub use driver::PostProcessor;
pub use plots::{plot_pressure, plot_velocity, plot_vorticity, Scene};

// Re-export core types
pub use ibmplot_core::{
    grad, magnitude, vorticity, Body, BodyConfig, Case, CaseConfig, ColorRange, Direction,
    GradientOperator, IbmError, IterationContext, Mesh, MeshConfig, PlotOptions, Quantity,
    QuantitySet, Result, RunSchedule, SnapshotFormat, SolverConfig, Variable, CONTOUR_LEVELS,
    DVec2,
};

// Re-export render types
pub use ibmplot_render::{ColorMap, ColorMapRegistry, ContourLevels, Figure, RenderError};
