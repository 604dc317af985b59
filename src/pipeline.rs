//! End-to-end run: load the fixed inputs, derive per-panel geometry, render.
//!
//! Panels are independent, so preparation (raster load, profile reduction,
//! co-registration) fans out across a rayon pool; rendering stays on the
//! calling thread.

use crate::affine::AffineTransform;
use crate::config::RuntimeConfig;
use crate::coords::CoordinateTable;
use crate::error::Error;
use crate::figure::render_figure;
use crate::overlay::{build_overlay, OrientationOverlay};
use crate::profile::{ProfileSet, ProfileStats};
use crate::raster::HeightGrid;
use crate::report::{write_json_file, FigureReport, PanelGeometry};
use log::{debug, info};
use rayon::prelude::*;

/// Everything the renderer needs for one panel.
#[derive(Clone, Debug)]
pub struct PanelInput {
    pub id: String,
    pub label: String,
    pub grid: HeightGrid,
    pub stats: ProfileStats,
    /// Co-registration transform, absent for plots without survey points.
    pub transform: Option<AffineTransform>,
    pub overlay: OrientationOverlay,
}

/// Loads all inputs and derives the panel geometry, one entry per configured
/// plot, in configuration order.
pub fn prepare_panels(cfg: &RuntimeConfig) -> Result<Vec<PanelInput>, Error> {
    let params = cfg.panel.resolve();
    let coords = CoordinateTable::load(&cfg.coordinates_file)?;
    let profiles = ProfileSet::load(&cfg.profile_files)?;

    cfg.plots
        .par_iter()
        .map(|plot| {
            let grid = HeightGrid::load_csv(&plot.chm, params.grid_cells)?;
            let stats = profiles.stats_for(&plot.id)?;
            let transform = coords.registration_for(&plot.id)?;
            if transform.is_none() {
                debug!(
                    "plot '{}' absent from coordinate table, using default compass",
                    plot.id
                );
            }
            let overlay = build_overlay(transform.as_ref(), &params.overlay)?;
            Ok(PanelInput {
                id: plot.id.clone(),
                label: plot.label.clone(),
                grid,
                stats,
                transform,
                overlay,
            })
        })
        .collect()
}

/// Runs the whole figure synthesis described by `cfg`.
pub fn run(cfg: &RuntimeConfig) -> Result<(), Error> {
    let params = cfg.panel.resolve();
    let panels = prepare_panels(cfg)?;
    info!("prepared {} panel(s)", panels.len());

    render_figure(&panels, &params, &cfg.output.figure_out)?;

    if let Some(path) = &cfg.output.geometry_out {
        let report = FigureReport {
            panels: panels
                .iter()
                .map(|p| PanelGeometry {
                    plot: p.id.clone(),
                    label: p.label.clone(),
                    co_registered: p.transform.is_some(),
                    transform: p.transform,
                    overlay: p.overlay,
                    profile_bins: p.stats.mean.len(),
                })
                .collect(),
        };
        write_json_file(path, &report)?;
        info!("wrote geometry report to {}", path.display());
    }
    Ok(())
}
