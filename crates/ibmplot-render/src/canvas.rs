//! Pixel-level drawing on an RGBA image.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::font;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Axis-aligned pixel rectangle, `x0..x1` by `y0..y1` (exclusive ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= i64::from(self.x0)
            && x < i64::from(self.x1)
            && y >= i64::from(self.y0)
            && y < i64::from(self.y1)
    }
}

/// An RGBA image with clipped drawing primitives.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Creates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    /// Sets a pixel; coordinates outside the image are ignored.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            if x < self.image.width() && y < self.image.height() {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        for y in rect.y0..rect.y1.min(self.height()) {
            for x in rect.x0..rect.x1.min(self.width()) {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// One pixel wide rectangle outline.
    pub fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        if rect.is_empty() {
            return;
        }
        let (x0, y0) = (i64::from(rect.x0), i64::from(rect.y0));
        let (x1, y1) = (i64::from(rect.x1) - 1, i64::from(rect.y1) - 1);
        self.line(x0, y0, x1, y0, color, None);
        self.line(x1, y0, x1, y1, color, None);
        self.line(x1, y1, x0, y1, color, None);
        self.line(x0, y1, x0, y0, color, None);
    }

    /// Bresenham line between two pixel centers, optionally clipped to `clip`.
    pub fn line(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Rgba<u8>,
        clip: Option<PixelRect>,
    ) {
        let clip = clip.unwrap_or_else(|| self.bounds());
        let (mut cx, mut cy) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if clip.contains(cx, cy) {
                self.put(cx, cy, color);
            }
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                err += dx;
                cy += sy;
            }
        }
    }

    /// Connected line segments through pixel-space points.
    pub fn polyline(&mut self, points: &[Vec2], color: Rgba<u8>, clip: Option<PixelRect>) {
        for w in points.windows(2) {
            let (a, b) = (w[0].round(), w[1].round());
            if !(a.is_finite() && b.is_finite()) {
                continue;
            }
            self.line(a.x as i64, a.y as i64, b.x as i64, b.y as i64, color, clip);
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)`, each font pixel
    /// blown up to `scale x scale` image pixels. Returns the x position
    /// after the last character.
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgba<u8>) -> i64 {
        let scale_i = i64::from(scale);
        let mut cx = x;
        for &ch in text.as_bytes() {
            let g = font::glyph(ch);
            for row in 0..font::GLYPH_HEIGHT {
                for col in 0..font::GLYPH_WIDTH {
                    if !font::is_set(&g, col, row) {
                        continue;
                    }
                    let px = cx + i64::from(col) * scale_i;
                    let py = y + i64::from(row) * scale_i;
                    for dy in 0..scale_i {
                        for dx in 0..scale_i {
                            self.put(px + dx, py + dy, color);
                        }
                    }
                }
            }
            cx += i64::from(font::GLYPH_ADVANCE) * scale_i;
        }
        cx
    }

    /// Draws `text` horizontally centered on `cx`.
    pub fn text_centered(&mut self, cx: i64, y: i64, text: &str, scale: u32, color: Rgba<u8>) {
        let w = i64::from(font::text_width(text, scale));
        self.text(cx - w / 2, y, text, scale, color);
    }
}
