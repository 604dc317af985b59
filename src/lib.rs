#![doc = include_str!("../README.md")]

pub mod affine;
pub mod config;
pub mod coords;
pub mod error;
pub mod figure;
pub mod overlay;
pub mod pipeline;
pub mod profile;
pub mod raster;
pub mod report;

// --- High-level re-exports -------------------------------------------------

pub use crate::affine::{apply_affine, fit_affine, AffineTransform};
pub use crate::config::{load_config, PanelParams, RuntimeConfig};
pub use crate::error::Error;
pub use crate::overlay::{build_overlay, OrientationOverlay, OverlayParams};
pub use crate::pipeline::{prepare_panels, run, PanelInput};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use canopy_structure::prelude::*;
///
/// # fn main() -> Result<(), canopy_structure::Error> {
/// let src = [[0.0, 0.0], [0.0, 15.0], [10.0, 0.0]];
/// let dst = [[2.0, 1.0], [2.0, 16.0], [12.0, 1.0]];
/// let t = fit_affine(&src, &dst)?;
/// let overlay = build_overlay(Some(&t), &OverlayParams::default())?;
/// println!("arrow head at ({}, {})", overlay.arrow[1][0], overlay.arrow[1][1]);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::affine::{fit_affine, AffineTransform};
    pub use crate::overlay::{build_overlay, OrientationOverlay, OverlayParams};
    pub use crate::pipeline::{prepare_panels, run};
}
