//! Synthetic run inputs written to a scratch directory.

use canopy_structure::config::{OutputConfig, PanelConfig, PlotConfig, RuntimeConfig};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a `w × h` raster CSV where cell (x, y) takes `value(x, y)`.
pub fn write_raster_csv(
    dir: &Path,
    name: &str,
    w: usize,
    h: usize,
    value: impl Fn(usize, usize) -> f32,
) -> PathBuf {
    let mut out = String::new();
    for y in 0..h {
        for x in 0..w {
            if x > 0 {
                out.push(',');
            }
            write!(out, "{}", value(x, y)).unwrap();
        }
        out.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, out).expect("write raster");
    path
}

/// Writes a profile archive mapping plot ids to replicate profiles.
pub fn write_profiles_json(
    dir: &Path,
    name: &str,
    entries: &[(&str, Vec<Vec<f64>>)],
) -> PathBuf {
    let map: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(id, replicates)| ((*id).to_string(), serde_json::json!(replicates)))
        .collect();
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&map).unwrap()).expect("write profiles");
    path
}

/// Writes the headerless coordinate CSV; rows are (plot, local, geo).
pub fn write_coords_csv(dir: &Path, rows: &[(&str, [f64; 2], [f64; 2])]) -> PathBuf {
    let mut out = String::new();
    for (plot, local, geo) in rows {
        writeln!(
            out,
            "{plot},{},{},{},{}",
            local[0], local[1], geo[0], geo[1]
        )
        .unwrap();
    }
    let path = dir.join("gps_points.csv");
    fs::write(&path, out).expect("write coords");
    path
}

/// Assembles a run configuration over the given plot list.
pub fn config_for(
    dir: &Path,
    plots: Vec<PlotConfig>,
    profile_files: Vec<PathBuf>,
    coordinates_file: PathBuf,
) -> RuntimeConfig {
    RuntimeConfig {
        plots,
        profile_files,
        coordinates_file,
        output: OutputConfig {
            figure_out: dir.join("figure.png"),
            geometry_out: Some(dir.join("geometry.json")),
        },
        panel: PanelConfig::default(),
    }
}

pub fn plot(id: &str, label: &str, chm: PathBuf) -> PlotConfig {
    PlotConfig {
        id: id.to_string(),
        label: label.to_string(),
        chm,
    }
}
