//! Figure assembly: one row of canopy panels over a shared colorbar.
//!
//! The renderer consumes the numeric geometry prepared by
//! [`crate::pipeline`] as plot instructions; all coordinate work happens
//! before this module.

mod annotations;
mod colorbar;
mod panel;

use crate::config::PanelParams;
use crate::error::Error;
use crate::pipeline::PanelInput;
use log::info;
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

/// Pixel height of a panel cell (panels are square plus the caption strip).
const PANEL_PX: u32 = 450;
/// Pixel height of the colorbar strip beneath the panels.
const COLORBAR_PX: u32 = 110;

pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

/// Square data-space chart shared by the per-panel drawing helpers.
type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Renders the composite figure to a PNG at `path`.
pub fn render_figure(
    panels: &[PanelInput],
    params: &PanelParams,
    path: &Path,
) -> Result<(), Error> {
    if panels.is_empty() {
        return Err(Error::Render("no panels to draw".into()));
    }

    let width = PANEL_PX * panels.len() as u32;
    let height = PANEL_PX + COLORBAR_PX;
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (panel_row, colorbar_row) = root.split_vertically(PANEL_PX);
    let areas = panel_row.split_evenly((1, panels.len()));
    for (input, area) in panels.iter().zip(areas.iter()) {
        panel::draw_panel(area, input, params)?;
    }
    colorbar::draw_colorbar(&colorbar_row, params)?;

    root.present().map_err(render_err)?;
    info!("wrote figure to {}", path.display());
    Ok(())
}
