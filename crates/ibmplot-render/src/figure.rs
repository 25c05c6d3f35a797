//! A single 2D plot: filled contours, overlays, axes and a colorbar.
//!
//! The figure maps the physical rectangle `[lo, hi]` onto a plot area
//! inset from the image borders; the right margin holds the colorbar.
//! Physical `y` grows upward, pixel rows grow downward.

use std::path::Path;

use glam::{DVec2, Vec2};
use ibmplot_core::Mesh;
use image::{Rgba, RgbaImage};

use crate::canvas::{Canvas, PixelRect, BLACK, WHITE};
use crate::color_maps::ColorMap;
use crate::contour::{Band, ContourLevels};
use crate::error::{RenderError, RenderResult};
use crate::export;
use crate::font;
use crate::streamlines::Streamline;

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 110;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 50;

const COLORBAR_GAP: u32 = 16;
const COLORBAR_WIDTH: u32 = 18;
/// Height of the under/over triangles at the colorbar ends.
const COLORBAR_TIP: u32 = 10;

const ARROW_SIZE: f32 = 7.0;
const ARROW_HALF_ANGLE: f32 = 0.45;

const TICK_SCALE: u32 = 1;
const LABEL_SCALE: u32 = 2;
const TITLE_SCALE: u32 = 2;

/// A figure under construction.
pub struct Figure {
    canvas: Canvas,
    plot: PixelRect,
    lo: DVec2,
    hi: DVec2,
}

impl Figure {
    /// Creates a blank white figure showing the physical window `bounds`.
    pub fn new(width: u32, height: u32, bounds: (DVec2, DVec2)) -> RenderResult<Self> {
        if width <= MARGIN_LEFT + MARGIN_RIGHT + 1 || height <= MARGIN_TOP + MARGIN_BOTTOM + 1 {
            return Err(RenderError::EmptyFigure { width, height });
        }
        let (lo, hi) = bounds;
        let plot = PixelRect::new(
            MARGIN_LEFT,
            MARGIN_TOP,
            width - MARGIN_RIGHT,
            height - MARGIN_BOTTOM,
        );
        Ok(Self {
            canvas: Canvas::new(width, height, WHITE),
            plot,
            lo,
            hi,
        })
    }

    /// Pixel rectangle the data is drawn into.
    pub fn plot_area(&self) -> PixelRect {
        self.plot
    }

    pub fn image(&self) -> &RgbaImage {
        self.canvas.image()
    }

    /// Pixel position of a physical point.
    pub fn to_pixel(&self, p: DVec2) -> Vec2 {
        let t = (p - self.lo) / (self.hi - self.lo);
        let w = f64::from(self.plot.width() - 1);
        let h = f64::from(self.plot.height() - 1);
        Vec2::new(
            (f64::from(self.plot.x0) + t.x * w) as f32,
            (f64::from(self.plot.y1 - 1) - t.y * h) as f32,
        )
    }

    /// Physical point at the center of pixel `(x, y)`, clamped to the window.
    pub fn to_world(&self, x: u32, y: u32) -> DVec2 {
        let w = f64::from(self.plot.width() - 1);
        let h = f64::from(self.plot.height() - 1);
        let t = DVec2::new(
            (f64::from(x) - f64::from(self.plot.x0)) / w,
            (f64::from(self.plot.y1 - 1) - f64::from(y)) / h,
        );
        (self.lo + t * (self.hi - self.lo)).clamp(self.lo, self.hi)
    }

    /// Fills the plot area with banded colors of a node field.
    ///
    /// Pixels outside the mesh or sampling NaN stay untouched.
    pub fn contour_fill(
        &mut self,
        mesh: &Mesh,
        field: &[f64],
        levels: &ContourLevels,
        cmap: &ColorMap,
    ) -> RenderResult<()> {
        if field.len() != mesh.len() {
            return Err(RenderError::FieldSize {
                expected: mesh.len(),
                actual: field.len(),
            });
        }
        for y in self.plot.y0..self.plot.y1 {
            for x in self.plot.x0..self.plot.x1 {
                let p = self.to_world(x, y);
                if !mesh.contains(p) {
                    continue;
                }
                if let Some(color) = levels.color(mesh.interpolate(field, p), cmap) {
                    self.canvas.put(i64::from(x), i64::from(y), color);
                }
            }
        }
        Ok(())
    }

    /// Draws a polyline through physical points, clipped to the plot area.
    pub fn polyline(&mut self, points: &[DVec2], color: Rgba<u8>) {
        let pixels: Vec<Vec2> = points.iter().map(|p| self.to_pixel(*p)).collect();
        self.canvas.polyline(&pixels, color, Some(self.plot));
    }

    /// Draws streamlines with an arrowhead at the midpoint of each.
    pub fn streamlines(&mut self, lines: &[Streamline], color: Rgba<u8>) {
        for line in lines {
            self.polyline(&line.points, color);
            if let Some((mid, dir)) = line.midpoint() {
                self.arrowhead(mid, dir, color);
            }
        }
    }

    fn arrowhead(&mut self, at: DVec2, dir: DVec2, color: Rgba<u8>) {
        let tip = self.to_pixel(at);
        let ahead = self.to_pixel(at + dir * (self.hi - self.lo).min_element() * 1e-3);
        let d = (ahead - tip).normalize_or_zero();
        if d == Vec2::ZERO {
            return;
        }
        let (sin, cos) = ARROW_HALF_ANGLE.sin_cos();
        let perp = d.perp();
        for side in [-1.0, 1.0] {
            let wing = tip - ARROW_SIZE * (d * cos + side * perp * sin);
            self.canvas.polyline(&[tip, wing], color, Some(self.plot));
        }
    }

    /// Vertical colorbar right of the plot with under/over triangles and
    /// range labels.
    pub fn colorbar(&mut self, levels: &ContourLevels, cmap: &ColorMap, label: &str) {
        let x0 = self.plot.x1 + COLORBAR_GAP;
        let bar = PixelRect::new(
            x0,
            self.plot.y0 + COLORBAR_TIP,
            x0 + COLORBAR_WIDTH,
            self.plot.y1 - COLORBAR_TIP,
        );
        if bar.is_empty() {
            return;
        }

        let bands = levels.num_bands();
        let span = f64::from(bar.height().max(2) - 1);
        for y in bar.y0..bar.y1 {
            let t = f64::from(bar.y1 - 1 - y) / span;
            let band = ((t * bands as f64) as usize).min(bands - 1);
            let color = cmap.sample_rgba(levels.band_position(Band::Within(band)));
            self.canvas
                .fill_rect(PixelRect::new(bar.x0, y, bar.x1, y + 1), color);
        }

        let over = cmap.sample_rgba(levels.band_position(Band::Over));
        let under = cmap.sample_rgba(levels.band_position(Band::Under));
        let half = f64::from(COLORBAR_WIDTH) / 2.0;
        let cx = f64::from(bar.x0) + half;
        for k in 0..COLORBAR_TIP {
            // Row k counted away from the bar; width shrinks to a point.
            let w = half * f64::from(COLORBAR_TIP - k) / f64::from(COLORBAR_TIP);
            let (a, b) = ((cx - w).round() as u32, (cx + w).round() as u32);
            self.canvas
                .fill_rect(PixelRect::new(a, bar.y0 - 1 - k, b, bar.y0 - k), over);
            self.canvas
                .fill_rect(PixelRect::new(a, bar.y1 + k, b, bar.y1 + k + 1), under);
        }
        self.canvas.stroke_rect(bar, BLACK);

        let tx = i64::from(bar.x1) + 4;
        let th = i64::from(font::text_height(TICK_SCALE));
        let mid = 0.5 * (levels.min() + levels.max());
        self.canvas.text(
            tx,
            i64::from(bar.y0) - th / 2,
            &font::format_value(levels.max()),
            TICK_SCALE,
            BLACK,
        );
        self.canvas.text(
            tx,
            i64::from(bar.y0 + bar.y1) / 2 - th / 2,
            &font::format_value(mid),
            TICK_SCALE,
            BLACK,
        );
        self.canvas.text(
            tx,
            i64::from(bar.y1) - 1 - th / 2,
            &font::format_value(levels.min()),
            TICK_SCALE,
            BLACK,
        );

        let label_y = i64::from(bar.y1 + COLORBAR_TIP) + 6;
        self.canvas
            .text_centered(cx as i64, label_y, label, LABEL_SCALE, BLACK);
    }

    /// Frame around the plot area, min/max tick values and axis labels.
    pub fn axes(&mut self, xlabel: &str, ylabel: &str) {
        let frame = PixelRect::new(
            self.plot.x0 - 1,
            self.plot.y0 - 1,
            self.plot.x1 + 1,
            self.plot.y1 + 1,
        );
        self.canvas.stroke_rect(frame, BLACK);

        let th = i64::from(font::text_height(TICK_SCALE));
        let below = i64::from(frame.y1) + 4;
        for (value, column) in [(self.lo.x, self.plot.x0), (self.hi.x, self.plot.x1 - 1)] {
            let text = font::format_value(value);
            self.canvas
                .text_centered(i64::from(column), below, &text, TICK_SCALE, BLACK);
        }

        for (value, row) in [(self.lo.y, self.plot.y1 - 1), (self.hi.y, self.plot.y0)] {
            let text = font::format_value(value);
            let w = i64::from(font::text_width(&text, TICK_SCALE));
            self.canvas.text(
                i64::from(frame.x0) - 4 - w,
                i64::from(row) - th / 2,
                &text,
                TICK_SCALE,
                BLACK,
            );
        }

        let cx = i64::from(self.plot.x0 + self.plot.x1) / 2;
        self.canvas
            .text_centered(cx, below + th + 6, xlabel, LABEL_SCALE, BLACK);

        let lh = i64::from(font::text_height(LABEL_SCALE));
        let cy = i64::from(self.plot.y0 + self.plot.y1) / 2;
        let lw = i64::from(font::text_width(ylabel, LABEL_SCALE));
        self.canvas.text(
            i64::from(frame.x0) - 34 - lw / 2,
            cy - lh / 2,
            ylabel,
            LABEL_SCALE,
            BLACK,
        );
    }

    /// Title centered above the plot area.
    pub fn title(&mut self, text: &str) {
        let cx = i64::from(self.plot.x0 + self.plot.x1) / 2;
        let y = (i64::from(MARGIN_TOP) - i64::from(font::text_height(TITLE_SCALE))) / 2;
        self.canvas.text_centered(cx, y, text, TITLE_SCALE, BLACK);
    }

    /// Writes the figure; the format follows the file extension.
    pub fn save(&self, path: &Path) -> RenderResult<()> {
        export::save_image(path, self.canvas.image())
    }
}
