//! Core abstractions for ibmplot.
//!
//! This crate describes what a solver run left on disk and what is derived
//! from it:
//! - [`Case`] directory layout and `case.json` configuration
//! - [`Mesh`] geometry and optional immersed [`Body`]
//! - [`RunSchedule`] of saved iterations and the per-frame [`IterationContext`]
//! - [`Variable`] field snapshots and the sparse [`GradientOperator`]
//! - [`Quantity`] selection with its fixed [`ColorRange`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Grid sizes comfortably fit in f64 mantissas
#![allow(clippy::cast_precision_loss)]

pub mod body;
pub mod case;
pub mod error;
pub mod mesh;
pub mod operators;
pub mod options;
pub mod quantity;
pub mod solver;
pub mod variable;

pub use body::{Body, BodyConfig};
pub use case::{Case, CaseConfig, CASE_FILE, IMAGES_DIR};
pub use error::{IbmError, Result};
pub use mesh::{Mesh, MeshConfig};
pub use operators::{grad, magnitude, vorticity, Direction, GradientOperator};
pub use options::PlotOptions;
pub use quantity::{ColorRange, Quantity, QuantitySet, CONTOUR_LEVELS};
pub use solver::{IterationContext, RunSchedule, SolverConfig};
pub use variable::{SnapshotFormat, Variable};

// Re-export glam types for convenience
pub use glam::{DVec2, Vec3};
