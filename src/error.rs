//! Error types shared across the loading, fitting and rendering stages.
//!
//! Every variant is fatal for a batch run: inputs are static files, so there
//! is nothing sensible to retry. The binary reports the failing plot or file
//! and exits without writing a partial figure.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required raster, profile archive or coordinate file is absent or
    /// unreadable.
    #[error("missing input {path}: {source}")]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A plot id named by the run configuration has no profile samples in
    /// any loaded archive.
    #[error("no canopy profiles for plot '{0}'")]
    MissingProfiles(String),

    /// Raster or profile dimensions disagree with the expected extents.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The co-registration system is under-determined (fewer than three
    /// point pairs, or collinear input).
    #[error("degenerate affine fit: {0}")]
    DegenerateFit(String),

    /// A transform with non-finite entries was applied to a point.
    #[error("invalid affine transform: {0}")]
    InvalidTransform(String),

    #[error("failed to parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("render: {0}")]
    Render(String),
}

impl Error {
    /// Convenience constructor used by the loaders.
    pub(crate) fn parse(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Error::Parse {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::MissingInput {
            path: path.into(),
            source,
        }
    }
}
