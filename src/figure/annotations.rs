//! Compass arrow, `N` glyph and scale bar drawn in panel data space.

use super::{render_err, PanelChart};
use crate::error::Error;
use crate::overlay::OrientationOverlay;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Head length as a fraction of the arrow length.
const HEAD_FRACTION: f64 = 0.25;
/// Head half-width as a fraction of the head length.
const HEAD_ASPECT: f64 = 0.45;

pub(super) fn north_arrow<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    overlay: &OrientationOverlay,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    let [tail, head] = overlay.arrow;
    let vx = head[0] - tail[0];
    let vy = head[1] - tail[1];
    let len = (vx * vx + vy * vy).sqrt();
    if len <= f64::EPSILON {
        // Collapsed arrow, nothing sensible to draw.
        return Ok(());
    }
    let (ux, uy) = (vx / len, vy / len);
    let head_len = len * HEAD_FRACTION;
    let half_w = head_len * HEAD_ASPECT;
    let base = [head[0] - ux * head_len, head[1] - uy * head_len];

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(tail[0], tail[1]), (base[0], base[1])],
            WHITE.stroke_width(2),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Polygon::new(
            vec![
                (head[0], head[1]),
                (base[0] - uy * half_w, base[1] + ux * half_w),
                (base[0] + uy * half_w, base[1] - ux * half_w),
            ],
            WHITE.filled(),
        )))
        .map_err(render_err)?;

    let anchor = overlay.label[1];
    let style = TextStyle::from(("sans-serif", 20).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(std::iter::once(Text::new(
            "N",
            (anchor[0], anchor[1]),
            style,
        )))
        .map_err(render_err)?;
    Ok(())
}

/// Vertical scale bar near the lower-right corner, one fifth of the panel
/// extent long.
pub(super) fn scale_bar<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    extent: f64,
) -> Result<(), Error>
where
    DB::ErrorType: 'static,
{
    let x = 0.95 * extent;
    let (y0, y1) = (0.05 * extent, 0.25 * extent);
    let (tick0, tick1) = (0.925 * extent, 0.975 * extent);

    for segment in [
        vec![(x, y0), (x, y1)],
        vec![(tick0, y1), (tick1, y1)],
        vec![(tick0, y0), (tick1, y0)],
    ] {
        chart
            .draw_series(std::iter::once(PathElement::new(
                segment,
                WHITE.stroke_width(1),
            )))
            .map_err(render_err)?;
    }

    let style = TextStyle::from(("sans-serif", 20).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Right, VPos::Center));
    chart
        .draw_series(std::iter::once(Text::new(
            format!("{:.0}m", 0.2 * extent),
            (tick0, 0.15 * extent),
            style,
        )))
        .map_err(render_err)?;
    Ok(())
}
