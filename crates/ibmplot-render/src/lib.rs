//! Software rasterizer for ibmplot.
//!
//! Figures are drawn straight into an [`image::RgbaImage`]:
//! - [`ContourLevels`] banding of scalar fields through a [`ColorMap`]
//! - [`StreamlineTracer`] for velocity fields
//! - [`Figure`] composition with axes, title and colorbar
//! - PNG/JPEG export

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel math mixes f32/f64/u32/i64 freely; values are bounded by image size
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
// Line drawing takes both endpoints plus color and clip
#![allow(clippy::too_many_arguments)]

pub mod canvas;
pub mod color_maps;
pub mod contour;
pub mod error;
pub mod export;
pub mod figure;
pub mod font;
pub mod streamlines;

pub use canvas::{Canvas, PixelRect, BLACK, WHITE};
pub use color_maps::{ColorMap, ColorMapRegistry};
pub use contour::{Band, ContourLevels};
pub use error::{RenderError, RenderResult};
pub use export::save_image;
pub use figure::Figure;
pub use streamlines::{Streamline, StreamlineTracer};
