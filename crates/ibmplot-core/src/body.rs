//! Immersed-body marker geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{IbmError, Result};

/// Body section of `case.json`: marker coordinates, stored open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Immersed-boundary marker polygon.
///
/// The stored points never repeat the first marker; use
/// [`Body::closed_outline`] to obtain the polyline that is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    markers: Vec<DVec2>,
}

impl Body {
    /// Creates a body from its open marker polygon.
    pub fn new(markers: Vec<DVec2>) -> Result<Self> {
        if markers.len() < 2 {
            return Err(IbmError::InvalidConfig(format!(
                "body needs at least 2 markers, got {}",
                markers.len()
            )));
        }
        Ok(Self { markers })
    }

    /// Builds a body from a configuration section.
    pub fn from_config(config: &BodyConfig) -> Result<Self> {
        if config.x.len() != config.y.len() {
            return Err(IbmError::SizeMismatch {
                expected: config.x.len(),
                actual: config.y.len(),
            });
        }
        let markers = config
            .x
            .iter()
            .zip(&config.y)
            .map(|(&x, &y)| DVec2::new(x, y))
            .collect();
        Self::new(markers)
    }

    /// The open marker polygon.
    pub fn markers(&self) -> &[DVec2] {
        &self.markers
    }

    /// Marker polygon with the first point appended.
    pub fn closed_outline(&self) -> Vec<DVec2> {
        let mut outline = Vec::with_capacity(self.markers.len() + 1);
        outline.extend_from_slice(&self.markers);
        outline.push(self.markers[0]);
        outline
    }
}
