//! Writing finished figures to disk.

use std::path::Path;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Saves an RGBA image, choosing the encoder from the file extension.
///
/// # Arguments
/// * `path` - Output file (supports .png, .jpg, .jpeg)
/// * `image` - Pixels to write
///
/// # Errors
/// Returns an error if the file cannot be written or format is unsupported.
pub fn save_image(path: &Path, image: &RgbaImage) -> RenderResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => {
            image.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(RenderError::UnsupportedFormat(extension));
        }
    }

    Ok(())
}
