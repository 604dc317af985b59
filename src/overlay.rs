//! North-arrow overlay geometry for a figure panel.
//!
//! Each panel carries a compass arrow and its `N` label. For co-registered
//! plots the arrow is a fixed north vector projected through the plot's
//! affine transform, so the compass rotates with the plot; plots without
//! survey coordinates fall back to an unrotated default. In both cases the
//! geometry is then pinned to a corner of the panel so it never overlaps the
//! profile curve drawn near the panel centre.

use crate::affine::AffineTransform;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Panel-frame constants for the overlay geometry.
///
/// Defaults reproduce the survey convention used by the field campaign: a
/// 15 m north vector with its label 3 m further out, pinned to the (90, 90)
/// corner of a 100 m × 100 m panel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OverlayParams {
    /// Arrow (tail, head) in the source frame, metres.
    pub arrow_local: [[f64; 2]; 2],
    /// Label (tail, anchor) in the source frame, metres.
    pub label_local: [[f64; 2]; 2],
    /// Corner the arrow's furthest extent is pinned to, panel units.
    pub pin: [f64; 2],
    /// Panel side length, panel units.
    pub panel_extent: f64,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            arrow_local: [[0.0, 0.0], [0.0, 15.0]],
            label_local: [[0.0, 0.0], [0.0, 18.0]],
            pin: [90.0, 90.0],
            panel_extent: 100.0,
        }
    }
}

/// Compass geometry in display space: two point pairs consumed by the
/// renderer as plot instructions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrientationOverlay {
    /// Arrow (tail, head).
    pub arrow: [[f64; 2]; 2],
    /// Label (tail, anchor); the `N` glyph is centred on the anchor.
    pub label: [[f64; 2]; 2],
}

/// Builds the overlay for one panel.
///
/// `transform`, when present, is the plot's co-registration transform (see
/// [`crate::coords`]); absent plots get the default unrotated geometry. The
/// result is deterministic for identical inputs, and errors only propagate
/// from the transform application.
pub fn build_overlay(
    transform: Option<&AffineTransform>,
    params: &OverlayParams,
) -> Result<OrientationOverlay, Error> {
    let (mut arrow, mut label) = match transform {
        Some(t) => {
            let arrow = [t.apply(params.arrow_local[0])?, t.apply(params.arrow_local[1])?];
            let label = [t.apply(params.label_local[0])?, t.apply(params.label_local[1])?];
            (arrow, label)
        }
        None => (params.arrow_local, params.label_local),
    };

    // Pin the arrow's furthest extent to the configured corner.
    let shift = [
        arrow[0][0].max(arrow[1][0]) - params.pin[0],
        arrow[0][1].max(arrow[1][1]) - params.pin[1],
    ];
    for p in arrow.iter_mut().chain(label.iter_mut()) {
        p[0] -= shift[0];
        p[1] -= shift[1];
    }

    Ok(OrientationOverlay { arrow, label })
}

#[cfg(test)]
mod tests {
    use super::{build_overlay, OrientationOverlay, OverlayParams};
    use crate::affine::AffineTransform;
    use nalgebra::Matrix3;

    fn approx(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    fn rotation(deg: f64) -> AffineTransform {
        let (s, c) = deg.to_radians().sin_cos();
        AffineTransform {
            matrix: Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
        }
    }

    fn arrow_max(o: &OrientationOverlay) -> [f64; 2] {
        [
            o.arrow[0][0].max(o.arrow[1][0]),
            o.arrow[0][1].max(o.arrow[1][1]),
        ]
    }

    #[test]
    fn default_fallback_geometry() {
        let overlay = build_overlay(None, &OverlayParams::default()).expect("overlay");
        assert!(approx(overlay.arrow[0], [90.0, 75.0]));
        assert!(approx(overlay.arrow[1], [90.0, 90.0]));
        assert!(approx(overlay.label[0], [90.0, 75.0]));
        assert!(approx(overlay.label[1], [90.0, 93.0]));
    }

    #[test]
    fn arrow_extent_pinned_under_rotation() {
        let params = OverlayParams::default();
        for deg in [0.0, 17.0, 45.0, 90.0, 133.0, 180.0, 241.0, 305.0] {
            let t = rotation(deg);
            let overlay = build_overlay(Some(&t), &params).expect("overlay");
            let max = arrow_max(&overlay);
            assert!(
                approx(max, params.pin),
                "rotation {deg}°: arrow max ({}, {}) not pinned",
                max[0],
                max[1]
            );
        }
    }

    #[test]
    fn pinning_applies_to_scaled_transforms() {
        let t = AffineTransform {
            matrix: Matrix3::new(3.0, 0.0, 250.0, 0.0, 3.0, -80.0, 0.0, 0.0, 1.0),
        };
        let overlay = build_overlay(Some(&t), &OverlayParams::default()).expect("overlay");
        assert!(approx(arrow_max(&overlay), [90.0, 90.0]));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let t = rotation(73.0);
        let params = OverlayParams::default();
        let a = build_overlay(Some(&t), &params).expect("overlay");
        let b = build_overlay(Some(&t), &params).expect("overlay");
        assert_eq!(a, b);
    }

    #[test]
    fn custom_pin_corner_respected() {
        let params = OverlayParams {
            pin: [45.0, 45.0],
            panel_extent: 50.0,
            ..Default::default()
        };
        let overlay = build_overlay(None, &params).expect("overlay");
        assert!(approx(arrow_max(&overlay), [45.0, 45.0]));
    }
}
