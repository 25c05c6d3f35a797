//! End-to-end tests: scratch case directories rendered through the driver.

use std::path::{Path, PathBuf};

use ibmplot::*;
use ibmplot_render::PixelRect;
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const STREAMLINE_BLUE: Rgba<u8> = Rgba([31, 119, 180, 255]);

fn config(start: usize, nt: usize, write_every: usize) -> CaseConfig {
    CaseConfig {
        mesh: MeshConfig {
            nx: 9,
            ny: 7,
            xmin: -1.0,
            xmax: 1.0,
            ymin: -1.0,
            ymax: 1.0,
            ..MeshConfig::default()
        },
        solver: SolverConfig {
            start,
            nt,
            write_every,
        },
        body: None,
        snapshot_format: SnapshotFormat::Ascii,
    }
}

/// Writes `p`, `u` and `v` at every iteration the schedule renders.
fn write_fields(case: &Case, fill: impl Fn(f64, f64) -> (f64, f64, f64)) {
    let mesh = case.mesh().unwrap();
    let mut p = vec![0.0; mesh.len()];
    let mut u = vec![0.0; mesh.len()];
    let mut v = vec![0.0; mesh.len()];
    for j in 0..mesh.ny() {
        for i in 0..mesh.nx() {
            let k = mesh.index(i, j);
            (p[k], u[k], v[k]) = fill(mesh.x()[i], mesh.y()[j]);
        }
    }
    for ctx in case.schedule().unwrap().frames() {
        case.write_snapshot("p", ctx, &p).unwrap();
        case.write_snapshot("u", ctx, &u).unwrap();
        case.write_snapshot("v", ctx, &v).unwrap();
    }
}

fn image_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.join("images"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn selection(names: &[&str]) -> QuantitySet {
    QuantitySet::from_names(names).unwrap()
}

fn jet() -> ColorMap {
    ColorMapRegistry::new().get("jet").cloned().unwrap()
}

/// Plot area of a default-sized figure of the case.
fn plot_area(case: &Case) -> PixelRect {
    let bounds = case.mesh().unwrap().bounds();
    Figure::new(800, 600, bounds).unwrap().plot_area()
}

fn plot_pixels(img: &RgbaImage, plot: PixelRect) -> impl Iterator<Item = Rgba<u8>> + '_ {
    (plot.y0..plot.y1).flat_map(move |y| {
        (plot.x0..plot.x1).map(move |x| *img.get_pixel(x, y))
    })
}

#[test]
fn test_pressure_only_two_frames() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 40, 20)).unwrap();
    write_fields(&case, |x, y| (x * y, -y, x));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["pressure"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();

    let images = dir.path().join("images");
    assert_eq!(
        written,
        vec![images.join("pressure0020.png"), images.join("pressure0040.png")]
    );
    assert_eq!(
        image_names(dir.path()),
        vec!["pressure0020.png", "pressure0040.png"]
    );
}

#[test]
fn test_all_quantities_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(100, 10, 10)).unwrap();
    write_fields(&case, |x, y| (0.0, -y, x));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["all"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec!["pressure0110.png", "velocity0110.png", "vorticity0110.png"]
    );
}

#[test]
fn test_subset_writes_nothing_else() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 30, 10)).unwrap();
    write_fields(&case, |_, _| (0.0, 1.0, 0.0));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["vorticity"]), PlotOptions::default()).unwrap();
    post.run().unwrap();

    assert_eq!(
        image_names(dir.path()),
        vec!["vorticity0010.png", "vorticity0020.png", "vorticity0030.png"]
    );
}

#[test]
fn test_partial_last_frame() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 25, 10)).unwrap();
    write_fields(&case, |_, _| (0.0, 0.0, 0.0));

    let post =
        PostProcessor::new(dir.path(), selection(&["pressure"]), PlotOptions::default()).unwrap();
    let stems: Vec<PathBuf> = post
        .planned_outputs()
        .iter()
        .map(|p| PathBuf::from(p.file_name().unwrap()))
        .collect();
    assert_eq!(
        stems,
        vec![
            PathBuf::from("pressure0010.png"),
            PathBuf::from("pressure0020.png"),
            PathBuf::from("pressure0030.png"),
        ]
    );
}

#[test]
fn test_missing_snapshot_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 40, 20)).unwrap();
    let mesh = case.mesh().unwrap();
    let zeros = vec![0.0; mesh.len()];
    case.write_snapshot("p", IterationContext::new(20), &zeros)
        .unwrap();

    let mut post =
        PostProcessor::new(dir.path(), selection(&["pressure"]), PlotOptions::default()).unwrap();
    let err = post.run().unwrap_err();
    assert!(matches!(
        err,
        IbmError::SnapshotNotFound { iteration: 40, ref name, .. } if name == "p"
    ));
    // frames written before the failure are kept
    assert_eq!(image_names(dir.path()), vec!["pressure0020.png"]);
}

#[test]
fn test_outputs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 20, 10)).unwrap();
    write_fields(&case, |x, y| (x, y, -x));

    let first = PostProcessor::new(dir.path(), QuantitySet::all(), PlotOptions::default())
        .unwrap()
        .run()
        .unwrap();
    let second = PostProcessor::new(dir.path(), QuantitySet::all(), PlotOptions::default())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn test_fixed_scale_ignores_data_range() {
    // Pressure far above +0.5 everywhere: every plotted pixel takes the top color.
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 10, 10)).unwrap();
    write_fields(&case, |x, _| (40.0 + x, 0.0, 0.0));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["pressure"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (800, 600));

    let top = jet().sample_rgba(1.0);
    let plot = plot_area(&case);
    let center = ((plot.x0 + plot.x1) / 2, (plot.y0 + plot.y1) / 2);
    for (x, y) in [(plot.x0 + 3, plot.y0 + 3), (plot.x1 - 4, plot.y1 - 4), center] {
        assert_eq!(*img.get_pixel(x, y), top);
    }

    // Same figure with data far below the range takes the bottom color.
    write_fields(&case, |_, y| (-40.0 + y, 0.0, 0.0));
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(*img.get_pixel(plot.x0 + 3, plot.y0 + 3), jet().sample_rgba(0.0));
    assert_ne!(*img.get_pixel(plot.x0 + 3, plot.y0 + 3), WHITE);
}

#[test]
fn test_fixed_scale_vorticity_both_ends() {
    // Solid-body rotation u = -50y, v = 50x has vorticity 100, far above +1.
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 10, 10)).unwrap();
    write_fields(&case, |x, y| (0.0, -50.0 * y, 50.0 * x));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["vorticity"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();
    let plot = plot_area(&case);
    let top = jet().sample_rgba(1.0);
    assert!(plot_pixels(&img, plot).all(|c| c == top));

    // Reversed rotation: vorticity -100, far below -1.
    write_fields(&case, |x, y| (0.0, 50.0 * y, -50.0 * x));
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();
    let bottom = jet().sample_rgba(0.0);
    assert!(plot_pixels(&img, plot).all(|c| c == bottom));
}

#[test]
fn test_fixed_scale_velocity_above_range() {
    // Uniform speed 50 against a [0, 1] scale: the fill is the top color
    // everywhere the streamlines leave uncovered.
    let dir = tempfile::tempdir().unwrap();
    let case = Case::create(dir.path(), config(0, 10, 10)).unwrap();
    write_fields(&case, |_, _| (0.0, 50.0, 0.0));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["velocity"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();
    let plot = plot_area(&case);
    let top = jet().sample_rgba(1.0);

    let total = plot_pixels(&img, plot).count();
    let filled = plot_pixels(&img, plot).filter(|c| *c == top).count();
    let traced = plot_pixels(&img, plot)
        .filter(|c| *c == STREAMLINE_BLUE)
        .count();
    assert_eq!(filled + traced, total);
    assert!(traced > 0);
    assert!(filled > total / 2);
}

#[test]
fn test_body_outline_is_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(0, 10, 10);
    cfg.mesh.is_body = true;
    cfg.body = Some(BodyConfig {
        x: vec![-0.5, 0.5, 0.5, -0.5],
        y: vec![-0.5, -0.5, 0.5, 0.5],
    });
    let case = Case::create(dir.path(), cfg).unwrap();
    write_fields(&case, |_, _| (0.0, 0.0, 0.0));

    let mut post =
        PostProcessor::new(dir.path(), selection(&["pressure"]), PlotOptions::default()).unwrap();
    let written = post.run().unwrap();
    let img = image::open(&written[0]).unwrap().to_rgba8();

    let figure = Figure::new(800, 600, case.mesh().unwrap().bounds()).unwrap();
    // closing edge runs from (-0.5, 0.5) back to (-0.5, -0.5)
    let p = figure.to_pixel(DVec2::new(-0.5, 0.0)).round();
    assert_eq!(*img.get_pixel(p.x as u32, p.y as u32), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_body_flag_without_markers_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(0, 10, 10);
    cfg.mesh.is_body = true;
    Case::create(dir.path(), cfg).unwrap();

    let result = PostProcessor::new(dir.path(), QuantitySet::all(), PlotOptions::default());
    assert!(matches!(result, Err(IbmError::MissingBody)));
}

#[test]
fn test_missing_case_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = PostProcessor::new(dir.path(), QuantitySet::all(), PlotOptions::default());
    assert!(matches!(result, Err(IbmError::InvalidConfig(_))));
}

#[test]
fn test_binary_snapshots_and_custom_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(0, 10, 10);
    cfg.snapshot_format = SnapshotFormat::Binary;
    let case = Case::create(dir.path(), cfg).unwrap();
    write_fields(&case, |x, y| (x - y, -y, x));

    let options = PlotOptions {
        width: 400,
        height: 300,
        colormap: "viridis".to_string(),
        ..PlotOptions::default()
    };
    let mut post = PostProcessor::new(dir.path(), QuantitySet::all(), options).unwrap();
    let written = post.run().unwrap();
    assert_eq!(written.len(), 3);
    for path in &written {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));
    }
}
