//! Survey coordinate table linking plot-local and georeferenced frames.
//!
//! The table is a headerless CSV of `(plot, x, y, x_prime, y_prime)` rows:
//! `(x, y)` in plot-local metres, `(x_prime, y_prime)` in the georeferenced
//! frame. Loaded once per run and immutable afterwards.

use crate::affine::{fit_affine, AffineTransform};
use crate::error::Error;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One surveyed point of one field plot.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotCoordinateSample {
    pub plot_id: String,
    /// Plot-local position, metres.
    pub local_xy: [f64; 2],
    /// Georeferenced position.
    pub geo_xy: [f64; 2],
}

/// All coordinate samples of the run, indexed by plot on demand.
#[derive(Clone, Debug, Default)]
pub struct CoordinateTable {
    samples: Vec<PlotCoordinateSample>,
}

type Row = (String, f64, f64, f64, f64);

impl CoordinateTable {
    pub fn from_samples(samples: Vec<PlotCoordinateSample>) -> Self {
        Self { samples }
    }

    /// Reads the coordinate CSV from disk.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::missing(path, e))?;
        let table = Self::parse(file, path)?;
        debug!(
            "loaded {} coordinate sample(s) from {}",
            table.samples.len(),
            path.display()
        );
        Ok(table)
    }

    fn parse<R: Read>(reader: R, path: &Path) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut samples = Vec::new();
        for row in rdr.deserialize::<Row>() {
            let (plot_id, x, y, xp, yp) = row.map_err(|e| Error::parse(path, e))?;
            samples.push(PlotCoordinateSample {
                plot_id,
                local_xy: [x, y],
                geo_xy: [xp, yp],
            });
        }
        Ok(Self { samples })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PlotCoordinateSample] {
        &self.samples
    }

    /// Whether any sample belongs to `plot_id`.
    pub fn contains(&self, plot_id: &str) -> bool {
        self.samples.iter().any(|s| s.plot_id == plot_id)
    }

    /// Fits the co-registration transform for one plot, mapping the
    /// georeferenced frame into the plot-local display frame (the direction
    /// the overlay builder consumes: a north vector surveyed in the
    /// georeferenced frame lands rotated in the panel).
    ///
    /// Returns `Ok(None)` when the plot has no samples at all; with samples
    /// present the fit itself enforces the three-pair minimum.
    pub fn registration_for(&self, plot_id: &str) -> Result<Option<AffineTransform>, Error> {
        let (geo, local): (Vec<_>, Vec<_>) = self
            .samples
            .iter()
            .filter(|s| s.plot_id == plot_id)
            .map(|s| (s.geo_xy, s.local_xy))
            .unzip();
        if geo.is_empty() {
            return Ok(None);
        }
        debug!("fitting co-registration for '{plot_id}' over {} pair(s)", geo.len());
        fit_affine(&geo, &local).map(Some)
    }
}
