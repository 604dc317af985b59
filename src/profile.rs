//! Vertical canopy-density profiles and their summary statistics.
//!
//! Profiles are pre-aggregated elsewhere in the survey pipeline; this module
//! only loads them and reduces the replicates of a plot to a mean curve with
//! a standard-error envelope. The archive format is a JSON object mapping
//! plot id to an array of replicate profiles, each indexed by height bin.
//! Several archives may be loaded in order; later files extend or override
//! earlier entries (the oil-palm plot ships in its own archive).

use crate::error::Error;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Replicate profiles per plot.
#[derive(Clone, Debug, Default)]
pub struct ProfileSet {
    profiles: BTreeMap<String, Vec<Vec<f64>>>,
}

/// Per-bin mean and standard error of a plot's replicates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProfileStats {
    pub mean: Vec<f64>,
    pub sem: Vec<f64>,
}

impl ProfileSet {
    /// Loads and merges the configured profile archives.
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self, Error> {
        let mut merged = Self::default();
        for path in paths {
            let path = path.as_ref();
            let file = File::open(path).map_err(|e| Error::missing(path, e))?;
            let archive: BTreeMap<String, Vec<Vec<f64>>> =
                serde_json::from_reader(file).map_err(|e| Error::parse(path, e))?;
            debug!(
                "loaded profiles for {} plot(s) from {}",
                archive.len(),
                path.display()
            );
            merged.profiles.extend(archive);
        }
        Ok(merged)
    }

    pub fn insert(&mut self, plot_id: impl Into<String>, replicates: Vec<Vec<f64>>) {
        self.profiles.insert(plot_id.into(), replicates);
    }

    pub fn contains(&self, plot_id: &str) -> bool {
        self.profiles.contains_key(plot_id)
    }

    /// Reduces one plot's replicates to per-bin mean and standard error.
    ///
    /// The standard error uses the n−1 sample standard deviation. A single
    /// replicate yields a zero-width envelope. Replicates of unequal length
    /// fail with [`Error::ShapeMismatch`], an absent plot with
    /// [`Error::MissingProfiles`].
    pub fn stats_for(&self, plot_id: &str) -> Result<ProfileStats, Error> {
        let replicates = self
            .profiles
            .get(plot_id)
            .ok_or_else(|| Error::MissingProfiles(plot_id.to_string()))?;
        if replicates.is_empty() {
            return Err(Error::MissingProfiles(plot_id.to_string()));
        }
        let bins = replicates[0].len();
        if bins == 0 {
            return Err(Error::ShapeMismatch(format!(
                "plot '{plot_id}' has zero-length profiles"
            )));
        }
        for (i, r) in replicates.iter().enumerate() {
            if r.len() != bins {
                return Err(Error::ShapeMismatch(format!(
                    "plot '{plot_id}' replicate {i} has {} bin(s), expected {bins}",
                    r.len()
                )));
            }
        }

        let n = replicates.len() as f64;
        let mut mean = vec![0.0; bins];
        for r in replicates {
            for (m, v) in mean.iter_mut().zip(r) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut sem = vec![0.0; bins];
        if replicates.len() > 1 {
            for r in replicates {
                for (s, (v, m)) in sem.iter_mut().zip(r.iter().zip(&mean)) {
                    let d = v - m;
                    *s += d * d;
                }
            }
            for s in &mut sem {
                *s = (*s / (n - 1.0)).sqrt() / n.sqrt();
            }
        }

        Ok(ProfileStats { mean, sem })
    }
}

/// Bin-centre heights in metres: bin `i` spans `[i, i+1)` and is plotted at
/// its upper edge, matching the survey convention.
pub fn bin_heights(bins: usize) -> Vec<f64> {
    (0..bins).map(|i| i as f64 + 1.0).collect()
}
