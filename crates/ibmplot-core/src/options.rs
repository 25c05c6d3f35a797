//! Configuration options for rendering.

use serde::{Deserialize, Serialize};

/// Options shared by the three plot renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    /// Color map used for filled contours.
    pub colormap: String,

    /// Streamline seed density; 1.0 seeds a 30x30 grid.
    pub streamline_density: f32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            colormap: "jet".to_string(),
            streamline_density: 1.0,
        }
    }
}
