//! Optional JSON report of the geometry handed to the renderer.
//!
//! Written when `output.geometry_out` is configured; useful for checking the
//! co-registration of a plot without re-opening the rendered figure.

use crate::affine::AffineTransform;
use crate::error::Error;
use crate::overlay::OrientationOverlay;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Plot instructions of one panel.
#[derive(Clone, Debug, Serialize)]
pub struct PanelGeometry {
    pub plot: String,
    pub label: String,
    /// Whether the overlay was fitted from survey coordinates (false means
    /// the default unrotated compass).
    pub co_registered: bool,
    pub transform: Option<AffineTransform>,
    pub overlay: OrientationOverlay,
    /// Height bins of the profile drawn in this panel.
    pub profile_bins: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct FigureReport {
    pub panels: Vec<PanelGeometry>,
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::parse(path, e))?;
    fs::write(path, json).map_err(|e| Error::missing(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::missing(parent, e))?;
        }
    }
    Ok(())
}
