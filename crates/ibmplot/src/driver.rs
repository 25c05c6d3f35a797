//! Post-processing driver: one pass over the saved iterations.

use std::path::{Path, PathBuf};

use ibmplot_core::{
    Body, Case, Direction, Mesh, PlotOptions, Quantity, QuantitySet, Result, RunSchedule, Variable,
};

use crate::plots::{plot_pressure, plot_velocity, plot_vorticity, Scene};

/// Renders the selected quantities at every saved iteration of a case.
pub struct PostProcessor {
    case: Case,
    mesh: Mesh,
    body: Option<Body>,
    schedule: RunSchedule,
    quantities: QuantitySet,
    options: PlotOptions,
    pressure: Option<Variable>,
    velocity: Option<(Variable, Variable)>,
}

impl PostProcessor {
    /// Loads the case and prepares the field handles the selection needs.
    ///
    /// Gradient operators are only assembled when vorticity is requested.
    pub fn new(
        case_path: impl AsRef<Path>,
        quantities: QuantitySet,
        options: PlotOptions,
    ) -> Result<Self> {
        let case = Case::open(case_path)?;
        let mesh = case.mesh()?;
        let body = case.body()?;
        let schedule = case.schedule()?;
        let quantities = if quantities.is_empty() {
            QuantitySet::all()
        } else {
            quantities
        };

        log::info!(
            "mesh {}x{}, {} frame(s), quantities: {}",
            mesh.nx(),
            mesh.ny(),
            schedule.num_frames(),
            quantities
                .iter()
                .map(Quantity::name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let pressure = quantities
            .contains(Quantity::Pressure)
            .then(|| Variable::on_mesh("p", &mesh));

        let needs_velocity =
            quantities.contains(Quantity::Velocity) || quantities.contains(Quantity::Vorticity);
        let velocity = needs_velocity.then(|| {
            let mut u = Variable::on_mesh("u", &mesh);
            let mut v = Variable::on_mesh("v", &mesh);
            if quantities.contains(Quantity::Vorticity) {
                u.assemble_gradient(&mesh, Direction::Y);
                v.assemble_gradient(&mesh, Direction::X);
                log::debug!("assembled central gradient operators");
            }
            (u, v)
        });

        Ok(Self {
            case,
            mesh,
            body,
            schedule,
            quantities,
            options,
            pressure,
            velocity,
        })
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn schedule(&self) -> &RunSchedule {
        &self.schedule
    }

    pub fn quantities(&self) -> QuantitySet {
        self.quantities
    }

    /// Paths that [`run`](Self::run) writes, in order.
    pub fn planned_outputs(&self) -> Vec<PathBuf> {
        self.schedule
            .frames()
            .flat_map(|ctx| {
                self.quantities
                    .iter()
                    .map(move |q| self.case.image_path(q.name(), ctx))
            })
            .collect()
    }

    /// Renders every frame; the first missing or malformed snapshot aborts
    /// the run. Returns the written image paths in order.
    pub fn run(&mut self) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(self.case.images_dir())?;

        let scene = Scene::new(&self.case, &self.mesh, self.body.as_ref(), &self.options)?;
        let mut written = Vec::new();

        for ctx in self.schedule.frames() {
            log::info!("iteration {}", ctx.iteration());

            if let Some(p) = self.pressure.as_mut() {
                written.push(plot_pressure(&scene, p, ctx)?);
            }
            if let Some((u, v)) = self.velocity.as_mut() {
                if self.quantities.contains(Quantity::Velocity) {
                    written.push(plot_velocity(&scene, u, v, ctx)?);
                }
                if self.quantities.contains(Quantity::Vorticity) {
                    written.push(plot_vorticity(&scene, u, v, ctx)?);
                }
            }
        }
        Ok(written)
    }
}
