//! Error types for ibmplot.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for ibmplot operations.
#[derive(Error, Debug)]
pub enum IbmError {
    /// A field snapshot for the requested iteration does not exist.
    #[error("snapshot '{name}' for iteration {iteration} not found at {path}")]
    SnapshotNotFound {
        name: String,
        iteration: usize,
        path: PathBuf,
    },

    /// The case configuration is inconsistent.
    #[error("invalid case configuration: {0}")]
    InvalidConfig(String),

    /// The mesh declares an immersed body but no body geometry was given.
    #[error("mesh declares an immersed body but case has no body section")]
    MissingBody,

    /// A gradient was requested before the operator was assembled.
    #[error("gradient operator in {direction} not assembled for variable '{name}'")]
    OperatorNotAssembled { name: String, direction: char },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A value in an ASCII snapshot could not be parsed.
    #[error("cannot parse value '{token}' in {path}")]
    ParseFloat { token: String, path: PathBuf },

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for ibmplot operations.
pub type Result<T> = std::result::Result<T, IbmError>;
