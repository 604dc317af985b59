//! One figure panel: height heatmap, profile curve with envelope, compass
//! and scale bar.

use super::{annotations, render_err, PanelChart};
use crate::config::PanelParams;
use crate::error::Error;
use crate::pipeline::PanelInput;
use crate::profile::bin_heights;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

/// Profile densities are fractions; the drawn curve spans the panel width in
/// metres, so densities are scaled into panel units.
const DENSITY_SCALE: f64 = 100.0;

pub(super) fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    input: &PanelInput,
    params: &PanelParams,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    let extent = params.overlay.panel_extent;
    let mut chart = ChartBuilder::on(area)
        .caption(&input.label, ("sans-serif", 26))
        .margin(10)
        .build_cartesian_2d(0.0..extent, 0.0..extent)
        .map_err(render_err)?;

    draw_heatmap(&mut chart, input, params)?;
    draw_profile(&mut chart, input)?;
    annotations::north_arrow(&mut chart, &input.overlay)?;
    annotations::scale_bar(&mut chart, extent)?;
    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    input: &PanelInput,
    params: &PanelParams,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    let grid = &input.grid;
    let extent = params.overlay.panel_extent;
    let dx = extent / grid.w as f64;
    let dy = extent / grid.h as f64;
    let height_max = params.height_max.max(f64::MIN_POSITIVE);

    chart
        .draw_series((0..grid.h).flat_map(|row| {
            (0..grid.w).map(move |col| {
                let v = grid.get(col, row) as f64;
                let t = if v.is_finite() {
                    (v / height_max).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let x0 = col as f64 * dx;
                let y0 = row as f64 * dy;
                Rectangle::new(
                    [(x0, y0), (x0 + dx, y0 + dy)],
                    ViridisRGB.get_color(t).filled(),
                )
            })
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_profile<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    input: &PanelInput,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    let stats = &input.stats;
    let heights = bin_heights(stats.mean.len());

    // ±2·SEM envelope, drawn as a closed polygon up the low edge and back
    // down the high edge.
    let mut band: Vec<(f64, f64)> = heights
        .iter()
        .zip(stats.mean.iter().zip(&stats.sem))
        .map(|(&h, (m, s))| ((m - 2.0 * s) * DENSITY_SCALE, h))
        .collect();
    band.extend(
        heights
            .iter()
            .zip(stats.mean.iter().zip(&stats.sem))
            .rev()
            .map(|(&h, (m, s))| ((m + 2.0 * s) * DENSITY_SCALE, h)),
    );
    chart
        .draw_series(std::iter::once(Polygon::new(band, WHITE.mix(0.5).filled())))
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            heights
                .iter()
                .zip(&stats.mean)
                .map(|(&h, &m)| (m * DENSITY_SCALE, h)),
            &WHITE,
        ))
        .map_err(render_err)?;
    Ok(())
}
