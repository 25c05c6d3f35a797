//! Filled-contour level banding.
//!
//! `n` levels delimit `n - 1` bands. Values below the first level or above
//! the last one are not dropped: they take the color at the respective
//! end of the map (matplotlib's `extend='both'`).

use ibmplot_core::mesh::linspace;
use image::Rgba;

use crate::color_maps::ColorMap;
use crate::error::{RenderError, RenderResult};

/// Where a value falls relative to the contour levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Below the first level.
    Under,
    /// Inside band `i`, between `levels[i]` and `levels[i + 1]`.
    Within(usize),
    /// Above the last level.
    Over,
}

/// Strictly increasing contour levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    levels: Vec<f64>,
}

impl ContourLevels {
    pub fn new(levels: Vec<f64>) -> RenderResult<Self> {
        if levels.len() < 2 {
            return Err(RenderError::InvalidLevels(format!(
                "need at least 2 levels, got {}",
                levels.len()
            )));
        }
        if levels.iter().any(|l| !l.is_finite()) || levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RenderError::InvalidLevels(
                "levels must be finite and strictly increasing".to_string(),
            ));
        }
        Ok(Self { levels })
    }

    /// `n` evenly spaced levels from `min` to `max`.
    pub fn linear(min: f64, max: f64, n: usize) -> RenderResult<Self> {
        if n < 2 {
            return Err(RenderError::InvalidLevels(format!(
                "need at least 2 levels, got {n}"
            )));
        }
        Self::new(linspace(min, max, n))
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn min(&self) -> f64 {
        self.levels[0]
    }

    pub fn max(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    pub fn num_bands(&self) -> usize {
        self.levels.len() - 1
    }

    /// Classifies a value. NaN is reported as `None`.
    pub fn band(&self, value: f64) -> Option<Band> {
        if value.is_nan() {
            return None;
        }
        if value < self.min() {
            return Some(Band::Under);
        }
        if value > self.max() {
            return Some(Band::Over);
        }
        let i = self
            .levels
            .partition_point(|&l| l <= value)
            .saturating_sub(1)
            .min(self.num_bands() - 1);
        Some(Band::Within(i))
    }

    /// Normalized color-map coordinate of a band (its midpoint).
    pub fn band_position(&self, band: Band) -> f32 {
        match band {
            Band::Under => 0.0,
            Band::Over => 1.0,
            Band::Within(i) => ((i as f64 + 0.5) / self.num_bands() as f64) as f32,
        }
    }

    /// Pixel color of a value, `None` for NaN.
    pub fn color(&self, value: f64, cmap: &ColorMap) -> Option<Rgba<u8>> {
        self.band(value)
            .map(|band| cmap.sample_rgba(self.band_position(band)))
    }
}
