mod common;

use common::fixtures::{
    config_for, plot, write_coords_csv, write_profiles_json, write_raster_csv,
};
use canopy_structure::error::Error;
use canopy_structure::pipeline::{prepare_panels, run};
use std::fs;

/// Three-point survey of a plot rotated by `deg` about the origin: local
/// corners paired with their rotated georeferenced positions.
fn rotated_survey(plot: &str, deg: f64) -> Vec<(String, [f64; 2], [f64; 2])> {
    let (s, c) = deg.to_radians().sin_cos();
    [[0.0, 0.0], [100.0, 0.0], [0.0, 100.0]]
        .iter()
        .map(|&local: &[f64; 2]| {
            let geo = [
                c * local[0] - s * local[1] + 500.0,
                s * local[0] + c * local[1] + 900.0,
            ];
            (plot.to_string(), local, geo)
        })
        .collect()
}

fn coords_rows(surveys: &[Vec<(String, [f64; 2], [f64; 2])>]) -> Vec<(&str, [f64; 2], [f64; 2])> {
    surveys
        .iter()
        .flatten()
        .map(|(p, l, g)| (p.as_str(), *l, *g))
        .collect()
}

fn ridge_raster(x: usize, y: usize) -> f32 {
    let d = (x as f32 - 5.0).abs() + (y as f32 - 5.0).abs();
    (60.0 - 5.0 * d).max(0.0)
}

fn two_replicates() -> Vec<Vec<f64>> {
    vec![
        vec![0.05, 0.12, 0.30, 0.22, 0.10],
        vec![0.07, 0.10, 0.26, 0.28, 0.08],
    ]
}

#[test]
fn end_to_end_renders_figure_and_geometry_report() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let dir = dir.path();

    let plots = ["A", "B", "C", "D"];
    let mut plot_cfgs = Vec::new();
    let mut profiles = Vec::new();
    for id in plots {
        let chm = write_raster_csv(dir, &format!("chm_{id}.csv"), 10, 10, ridge_raster);
        plot_cfgs.push(plot(id, &format!("plot {id}"), chm));
        profiles.push((id, two_replicates()));
    }
    let profile_file = write_profiles_json(dir, "profiles.json", &profiles);

    // Only A and C are present in the coordinate table.
    let surveys = [rotated_survey("A", 25.0), rotated_survey("C", -40.0)];
    let coords = write_coords_csv(dir, &coords_rows(&surveys));

    let cfg = config_for(dir, plot_cfgs, vec![profile_file], coords);
    run(&cfg).expect("figure synthesis");

    let figure = fs::metadata(&cfg.output.figure_out).expect("figure file");
    assert!(figure.len() > 0, "figure should not be empty");

    let geometry_path = cfg.output.geometry_out.as_ref().expect("geometry path");
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(geometry_path).expect("read report"))
            .expect("parse report");
    let panels = report["panels"].as_array().expect("panels array");
    assert_eq!(panels.len(), 4);

    for (panel, id) in panels.iter().zip(plots) {
        assert_eq!(panel["plot"], id);
        let expected = matches!(id, "A" | "C");
        assert_eq!(
            panel["co_registered"].as_bool(),
            Some(expected),
            "co-registration flag for plot {id}"
        );
    }

    // Plots absent from the table carry the default pinned compass.
    let arrow = panels[1]["overlay"]["arrow"].as_array().expect("arrow");
    let tail = arrow[0].as_array().unwrap();
    let head = arrow[1].as_array().unwrap();
    assert!((tail[0].as_f64().unwrap() - 90.0).abs() < 1e-9);
    assert!((tail[1].as_f64().unwrap() - 75.0).abs() < 1e-9);
    assert!((head[0].as_f64().unwrap() - 90.0).abs() < 1e-9);
    assert!((head[1].as_f64().unwrap() - 90.0).abs() < 1e-9);
}

#[test]
fn fitted_overlays_stay_pinned_to_the_panel_corner() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let dir = dir.path();

    let chm = write_raster_csv(dir, "chm_a.csv", 8, 8, ridge_raster);
    let profile_file = write_profiles_json(dir, "profiles.json", &[("A", two_replicates())]);
    let surveys = [rotated_survey("A", 135.0)];
    let coords = write_coords_csv(dir, &coords_rows(&surveys));

    let cfg = config_for(dir, vec![plot("A", "plot A", chm)], vec![profile_file], coords);
    let panels = prepare_panels(&cfg).expect("panels");
    assert_eq!(panels.len(), 1);
    let overlay = &panels[0].overlay;
    assert!(panels[0].transform.is_some(), "plot A should co-register");

    let max_x = overlay.arrow[0][0].max(overlay.arrow[1][0]);
    let max_y = overlay.arrow[0][1].max(overlay.arrow[1][1]);
    assert!(
        (max_x - 90.0).abs() < 1e-9 && (max_y - 90.0).abs() < 1e-9,
        "arrow extent ({max_x}, {max_y}) not pinned to (90, 90)"
    );
}

#[test]
fn missing_raster_aborts_without_partial_figure() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let dir = dir.path();

    let profile_file = write_profiles_json(dir, "profiles.json", &[("A", two_replicates())]);
    let coords = write_coords_csv(dir, &[]);
    let cfg = config_for(
        dir,
        vec![plot("A", "plot A", dir.join("no_such_raster.csv"))],
        vec![profile_file],
        coords,
    );

    let err = run(&cfg).expect_err("missing raster must fail");
    assert!(matches!(err, Error::MissingInput { .. }), "got {err:?}");
    assert!(
        !cfg.output.figure_out.exists(),
        "no partial figure may be written"
    );
}

#[test]
fn ragged_profiles_abort_with_shape_mismatch() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let dir = dir.path();

    let chm = write_raster_csv(dir, "chm_a.csv", 6, 6, ridge_raster);
    let profile_file = write_profiles_json(
        dir,
        "profiles.json",
        &[("A", vec![vec![0.1, 0.2, 0.3], vec![0.1, 0.2]])],
    );
    let coords = write_coords_csv(dir, &[]);
    let cfg = config_for(dir, vec![plot("A", "plot A", chm)], vec![profile_file], coords);

    let err = run(&cfg).expect_err("ragged profiles must fail");
    assert!(matches!(err, Error::ShapeMismatch(_)), "got {err:?}");
}

#[test]
fn degenerate_survey_aborts_the_run() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let dir = dir.path();

    let chm = write_raster_csv(dir, "chm_a.csv", 6, 6, ridge_raster);
    let profile_file = write_profiles_json(dir, "profiles.json", &[("A", two_replicates())]);
    // Two collinear pairs: under-determined co-registration.
    let coords = write_coords_csv(
        dir,
        &[
            ("A", [0.0, 0.0], [500.0, 900.0]),
            ("A", [50.0, 50.0], [550.0, 950.0]),
        ],
    );
    let cfg = config_for(dir, vec![plot("A", "plot A", chm)], vec![profile_file], coords);

    let err = run(&cfg).expect_err("degenerate survey must fail");
    assert!(matches!(err, Error::DegenerateFit(_)), "got {err:?}");
}
