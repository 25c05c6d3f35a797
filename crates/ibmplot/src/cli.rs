//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ibmplot_core::{PlotOptions, Quantity, QuantitySet};

/// Render pressure, velocity and vorticity snapshots of a case to PNG images
#[derive(Parser, Debug)]
#[command(name = "ibmplot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plot every saved iteration of an immersed-boundary case", long_about = None)]
pub struct Cli {
    /// Case directory containing case.json and the snapshot folders
    pub case_path: PathBuf,

    /// Quantities to plot; none or `all` plots all three
    #[arg(value_enum)]
    pub quantities: Vec<QuantityArg>,

    /// Image width in pixels
    #[arg(long, default_value_t = PlotOptions::default().width)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = PlotOptions::default().height)]
    pub height: u32,

    /// Color map for the filled contours (jet, viridis, coolwarm, bwr, greys)
    #[arg(long, default_value_t = PlotOptions::default().colormap)]
    pub colormap: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuantityArg {
    Pressure,
    Velocity,
    Vorticity,
    All,
}

impl Cli {
    /// The requested selection, with `all` or no arguments meaning everything.
    pub fn selection(&self) -> QuantitySet {
        if self.quantities.is_empty() || self.quantities.contains(&QuantityArg::All) {
            return QuantitySet::all();
        }
        self.quantities
            .iter()
            .filter_map(|q| match q {
                QuantityArg::Pressure => Some(Quantity::Pressure),
                QuantityArg::Velocity => Some(Quantity::Velocity),
                QuantityArg::Vorticity => Some(Quantity::Vorticity),
                QuantityArg::All => None,
            })
            .collect()
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            width: self.width,
            height: self.height,
            colormap: self.colormap.clone(),
            ..PlotOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quantities_means_all() {
        let cli = Cli::try_parse_from(["ibmplot", "cases/cylinder"]).unwrap();
        assert_eq!(cli.case_path, PathBuf::from("cases/cylinder"));
        assert_eq!(cli.selection(), QuantitySet::all());
    }

    #[test]
    fn test_subset() {
        let cli = Cli::try_parse_from(["ibmplot", "c", "vorticity", "pressure"]).unwrap();
        let got: Vec<_> = cli.selection().iter().collect();
        assert_eq!(got, vec![Quantity::Pressure, Quantity::Vorticity]);
    }

    #[test]
    fn test_all_token() {
        let cli = Cli::try_parse_from(["ibmplot", "c", "velocity", "all"]).unwrap();
        assert_eq!(cli.selection(), QuantitySet::all());
    }

    #[test]
    fn test_unknown_quantity_is_usage_error() {
        let err = Cli::try_parse_from(["ibmplot", "c", "temperature"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_missing_case_path() {
        assert!(Cli::try_parse_from(["ibmplot"]).is_err());
    }

    #[test]
    fn test_plot_options() {
        let cli =
            Cli::try_parse_from(["ibmplot", "c", "--width", "640", "--colormap", "viridis"])
                .unwrap();
        let opts = cli.plot_options();
        assert_eq!((opts.width, opts.height), (640, 600));
        assert_eq!(opts.colormap, "viridis");
    }
}
