//! The three plot renderers.
//!
//! Each renderer re-reads the snapshots it needs for the given iteration,
//! draws one figure and writes it to `<case>/images/<quantity><ite>.png`.

use std::path::PathBuf;

use ibmplot_core::{
    magnitude, vorticity, Body, Case, ColorRange, IbmError, IterationContext, Mesh, PlotOptions,
    Quantity, Result, Variable, CONTOUR_LEVELS,
};
use ibmplot_render::{
    ColorMap, ColorMapRegistry, ContourLevels, Figure, RenderError, StreamlineTracer, BLACK,
};
use image::Rgba;

/// Matplotlib's first cycle color, used by `streamplot` by default.
const STREAMLINE_COLOR: Rgba<u8> = Rgba([31, 119, 180, 255]);

pub(crate) fn render_error(e: RenderError) -> IbmError {
    IbmError::RenderError(e.to_string())
}

/// Everything a renderer needs besides the fields themselves.
pub struct Scene<'a> {
    case: &'a Case,
    mesh: &'a Mesh,
    body: Option<&'a Body>,
    options: &'a PlotOptions,
    colormap: ColorMap,
}

impl<'a> Scene<'a> {
    /// Resolves the color map named in `options`.
    pub fn new(
        case: &'a Case,
        mesh: &'a Mesh,
        body: Option<&'a Body>,
        options: &'a PlotOptions,
    ) -> Result<Self> {
        let registry = ColorMapRegistry::new();
        let colormap = registry
            .get(&options.colormap)
            .cloned()
            .ok_or_else(|| render_error(RenderError::UnknownColorMap(options.colormap.clone())))?;
        Ok(Self {
            case,
            mesh,
            body,
            options,
            colormap,
        })
    }

    /// Contour fill, optional overlays, labels and export of one field.
    fn render(
        &self,
        quantity: Quantity,
        field: &[f64],
        flow: Option<(&[f64], &[f64])>,
        ctx: IterationContext,
    ) -> Result<PathBuf> {
        let range = quantity.color_range();
        match ColorRange::of_data(field) {
            Some(data) => log::debug!(
                "{quantity} data range [{:.4}, {:.4}] at iteration {}, plotted on [{}, {}]",
                data.min,
                data.max,
                ctx.iteration(),
                range.min,
                range.max
            ),
            None => log::warn!(
                "{quantity} has no finite values at iteration {}",
                ctx.iteration()
            ),
        }

        let levels = ContourLevels::linear(range.min, range.max, CONTOUR_LEVELS)
            .map_err(render_error)?;
        let (width, height) = (self.options.width, self.options.height);
        let mut figure = Figure::new(width, height, self.mesh.bounds()).map_err(render_error)?;

        figure
            .contour_fill(self.mesh, field, &levels, &self.colormap)
            .map_err(render_error)?;

        if let Some((u, v)) = flow {
            let tracer = StreamlineTracer::new(self.mesh, u, v, self.options.streamline_density)
                .map_err(render_error)?;
            let lines = tracer.trace();
            figure.streamlines(&lines, STREAMLINE_COLOR);
        }

        if let Some(body) = self.body {
            figure.polyline(&body.closed_outline(), BLACK);
        }

        figure.colorbar(&levels, &self.colormap, quantity.name());
        figure.axes("x", "y");
        figure.title(&format!("{quantity} - {}", ctx.iteration()));

        let path = self.case.image_path(quantity.name(), ctx);
        figure.save(&path).map_err(render_error)?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Plots the pressure field `p` at iteration `ctx`.
pub fn plot_pressure(
    scene: &Scene<'_>,
    p: &mut Variable,
    ctx: IterationContext,
) -> Result<PathBuf> {
    p.read(scene.case, ctx)?;
    scene.render(Quantity::Pressure, p.field(), None, ctx)
}

/// Plots the velocity magnitude with streamlines at iteration `ctx`.
pub fn plot_velocity(
    scene: &Scene<'_>,
    u: &mut Variable,
    v: &mut Variable,
    ctx: IterationContext,
) -> Result<PathBuf> {
    u.read(scene.case, ctx)?;
    v.read(scene.case, ctx)?;
    let speed = magnitude(u.field(), v.field());
    scene.render(Quantity::Velocity, &speed, Some((u.field(), v.field())), ctx)
}

/// Plots `dv/dx - du/dy` at iteration `ctx`.
///
/// `u` needs its y-gradient and `v` its x-gradient assembled.
pub fn plot_vorticity(
    scene: &Scene<'_>,
    u: &mut Variable,
    v: &mut Variable,
    ctx: IterationContext,
) -> Result<PathBuf> {
    u.read(scene.case, ctx)?;
    v.read(scene.case, ctx)?;
    let w = vorticity(u, v)?;
    scene.render(Quantity::Vorticity, &w, None, ctx)
}
