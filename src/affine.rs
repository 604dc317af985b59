//! Least-squares affine co-registration between two 2D point sets.
//!
//! A field plot is surveyed twice: once in plot-local metres and once in a
//! georeferenced frame. [`fit_affine`] recovers the 2D affine transform that
//! best maps one frame onto the other in the ordinary least-squares sense;
//! [`AffineTransform::apply`] projects individual points through it.

use crate::error::Error;
use log::debug;
use nalgebra::{Matrix2, Matrix3, Vector3};
use serde::Serialize;

const EPS: f64 = 1e-12;

/// Homogeneous 3×3 affine transform (last row `0 0 1`) acting on 2D points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineTransform {
    pub matrix: Matrix3<f64>,
}

impl AffineTransform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Applies the transform to a single point.
    ///
    /// Fails with [`Error::InvalidTransform`] when the matrix carries
    /// non-finite entries or the homogeneous scale collapses.
    pub fn apply(&self, p: [f64; 2]) -> Result<[f64; 2], Error> {
        if !self.matrix.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidTransform(
                "matrix contains non-finite entries".into(),
            ));
        }
        let v = self.matrix * Vector3::new(p[0], p[1], 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
            return Err(Error::InvalidTransform(format!(
                "point ({}, {}) maps to a degenerate homogeneous coordinate",
                p[0], p[1]
            )));
        }
        Ok([v[0] / w, v[1] / w])
    }

    /// Applies the transform to a batch of points, stopping at the first
    /// failure.
    pub fn apply_points(&self, pts: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, Error> {
        pts.iter().map(|&p| self.apply(p)).collect()
    }
}

/// Free-function form of [`AffineTransform::apply`].
pub fn apply_affine(t: &AffineTransform, p: [f64; 2]) -> Result<[f64; 2], Error> {
    t.apply(p)
}

/// Fits the affine transform mapping `src[i]` onto `dst[i]` by ordinary
/// least squares.
///
/// Both point sets are centred on their means first, so the linear part
/// reduces to a 2×2 normal system that stays well-conditioned even for
/// large georeferenced offsets; the translation falls out of the means.
/// At least three non-collinear pairs are required; anything less leaves the
/// normal matrix rank-deficient and fails with [`Error::DegenerateFit`]
/// rather than returning an ill-conditioned transform.
pub fn fit_affine(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<AffineTransform, Error> {
    if src.len() != dst.len() {
        return Err(Error::ShapeMismatch(format!(
            "point sets differ in length ({} vs {})",
            src.len(),
            dst.len()
        )));
    }
    if src.len() < 3 {
        return Err(Error::DegenerateFit(format!(
            "{} point pair(s), need at least 3",
            src.len()
        )));
    }

    let n = src.len() as f64;
    let mut mean_s = [0.0f64; 2];
    let mut mean_d = [0.0f64; 2];
    for (s, d) in src.iter().zip(dst.iter()) {
        mean_s[0] += s[0];
        mean_s[1] += s[1];
        mean_d[0] += d[0];
        mean_d[1] += d[1];
    }
    for v in mean_s.iter_mut().chain(mean_d.iter_mut()) {
        *v /= n;
    }

    // 2×2 normal matrix of the centred source points and the cross moments
    // against the centred targets.
    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    let mut syy = 0.0f64;
    let mut cross = Matrix2::<f64>::zeros();
    for (s, d) in src.iter().zip(dst.iter()) {
        let sx = s[0] - mean_s[0];
        let sy = s[1] - mean_s[1];
        let dx = d[0] - mean_d[0];
        let dy = d[1] - mean_d[1];
        sxx += sx * sx;
        sxy += sx * sy;
        syy += sy * sy;
        cross[(0, 0)] += dx * sx;
        cross[(0, 1)] += dx * sy;
        cross[(1, 0)] += dy * sx;
        cross[(1, 1)] += dy * sy;
    }

    let det = sxx * syy - sxy * sxy;
    let trace = sxx + syy;
    if det.abs() <= EPS.max(EPS * trace * trace) {
        debug!("affine fit: normal matrix near-singular (det={det:.3e}, trace={trace:.3e})");
        return Err(Error::DegenerateFit(
            "normal matrix is near-singular (collinear input points)".into(),
        ));
    }

    let inv = Matrix2::new(syy / det, -sxy / det, -sxy / det, sxx / det);
    let linear = cross * inv;
    let tx = mean_d[0] - linear[(0, 0)] * mean_s[0] - linear[(0, 1)] * mean_s[1];
    let ty = mean_d[1] - linear[(1, 0)] * mean_s[0] - linear[(1, 1)] * mean_s[1];

    let matrix = Matrix3::new(
        linear[(0, 0)],
        linear[(0, 1)],
        tx,
        linear[(1, 0)],
        linear[(1, 1)],
        ty,
        0.0,
        0.0,
        1.0,
    );
    Ok(AffineTransform { matrix })
}
