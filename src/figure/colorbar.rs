//! Horizontal height colorbar centred beneath the panel row.

use super::render_err;
use crate::config::PanelParams;
use crate::error::Error;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

const STEPS: usize = 100;

pub(super) fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    params: &PanelParams,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    // Centre third of the strip, as wide as the two middle panels' gap.
    let thirds = area.split_evenly((1, 3));
    let bar_area = &thirds[1];

    let height_max = params.height_max.max(f64::MIN_POSITIVE);
    let mut chart = ChartBuilder::on(bar_area)
        .margin_top(12)
        .margin_bottom(4)
        .x_label_area_size(46)
        .build_cartesian_2d(0.0..height_max, 0.0..1.0)
        .map_err(render_err)?;

    let dv = height_max / STEPS as f64;
    chart
        .draw_series((0..STEPS).map(|i| {
            let v = i as f64 * dv;
            let t = (v / height_max).clamp(0.0, 1.0);
            Rectangle::new([(v, 0.0), (v + dv, 1.0)], ViridisRGB.get_color(t).filled())
        }))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .x_labels(5)
        .x_desc("canopy height / m")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(render_err)?;
    Ok(())
}
