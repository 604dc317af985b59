//! Run configuration loaded from a JSON file.
//!
//! Panel constants are optional per-field overrides resolved onto the
//! built-in defaults, so a config only states what deviates from the
//! standard 100 m plot layout.

use crate::error::Error;
use crate::overlay::OverlayParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One figure panel: a plot id, its display title and its raster.
#[derive(Clone, Debug, Deserialize)]
pub struct PlotConfig {
    /// Plot id as used by the profile archives and coordinate table.
    pub id: String,
    /// Panel title, e.g. `OGF (MLA-01)`.
    pub label: String,
    /// Canopy-height raster CSV.
    pub chm: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Rendered figure path (PNG).
    pub figure_out: PathBuf,
    /// Optional JSON dump of the per-panel overlay geometry.
    #[serde(default)]
    pub geometry_out: Option<PathBuf>,
}

/// Optional overrides for the panel-frame constants.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub extent: Option<f64>,
    pub pin: Option<[f64; 2]>,
    pub north_arrow: Option<[[f64; 2]; 2]>,
    pub north_label: Option<[[f64; 2]; 2]>,
    pub height_max: Option<f64>,
    /// Expected raster size in cells (width, height); unchecked when absent.
    pub grid_cells: Option<(usize, usize)>,
}

/// Fully-resolved panel constants consumed by the overlay builder and the
/// renderer.
#[derive(Clone, Copy, Debug)]
pub struct PanelParams {
    pub overlay: OverlayParams,
    /// Upper bound of the height colour scale, metres.
    pub height_max: f64,
    pub grid_cells: Option<(usize, usize)>,
}

impl PanelConfig {
    pub fn resolve(&self) -> PanelParams {
        let mut overlay = OverlayParams::default();
        if let Some(v) = self.extent {
            overlay.panel_extent = v;
        }
        if let Some(v) = self.pin {
            overlay.pin = v;
        }
        if let Some(v) = self.north_arrow {
            overlay.arrow_local = v;
        }
        if let Some(v) = self.north_label {
            overlay.label_local = v;
        }
        PanelParams {
            overlay,
            height_max: self.height_max.unwrap_or(80.0),
            grid_cells: self.grid_cells,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub plots: Vec<PlotConfig>,
    pub profile_files: Vec<PathBuf>,
    pub coordinates_file: PathBuf,
    pub output: OutputConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|e| Error::missing(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::parse(path, e))
}
