//! Owned canopy-height raster in row-major layout.
//!
//! One grid per field plot, loaded from a headerless CSV of numeric rows.
//! Row 0 is the southern edge of the plot (y = 0 in panel coordinates) so
//! the grid draws without flipping.

use crate::error::Error;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Single-channel f32 grid with `stride == width`.
#[derive(Clone, Debug)]
pub struct HeightGrid {
    /// Grid width in cells
    pub w: usize,
    /// Grid height in cells
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl HeightGrid {
    /// Construct a zero-initialized grid of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Builds a grid from row vectors, enforcing a rectangular shape.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, Error> {
        let h = rows.len();
        let w = rows.first().map_or(0, Vec::len);
        if w == 0 || h == 0 {
            return Err(Error::ShapeMismatch("empty raster".into()));
        }
        let mut data = Vec::with_capacity(w * h);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != w {
                return Err(Error::ShapeMismatch(format!(
                    "raster row {i} has {} cell(s), expected {w}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    /// Get the cell value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }

    /// Loads a raster CSV; `expected` optionally pins the (width, height) in
    /// cells, failing with [`Error::ShapeMismatch`] on disagreement.
    pub fn load_csv(path: &Path, expected: Option<(usize, usize)>) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::missing(path, e))?;
        let grid = Self::parse_csv(file, path)?;
        if let Some((w, h)) = expected {
            if grid.w != w || grid.h != h {
                return Err(Error::ShapeMismatch(format!(
                    "raster {} is {}×{} cells, expected {w}×{h}",
                    path.display(),
                    grid.w,
                    grid.h
                )));
            }
        }
        debug!("loaded {}×{} raster from {}", grid.w, grid.h, path.display());
        Ok(grid)
    }

    fn parse_csv<R: Read>(reader: R, path: &Path) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows: Vec<Vec<f32>> = Vec::new();
        for row in rdr.deserialize::<Vec<f32>>() {
            let row = row.map_err(|e| match e.kind() {
                csv::ErrorKind::UnequalLengths { .. } => {
                    Error::ShapeMismatch(format!("ragged raster rows in {}", path.display()))
                }
                _ => Error::parse(path, e),
            })?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::HeightGrid;
    use crate::error::Error;
    use std::path::Path;

    #[test]
    fn from_rows_round_trips_cells() {
        let grid =
            HeightGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!((grid.w, grid.h), (2, 3));
        assert_eq!(grid.get(1, 2), 6.0);
        assert_eq!(grid.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn ragged_rows_are_shape_mismatch() {
        let err = HeightGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn parses_csv_grid() {
        let csv = "0.0,10.5,20.0\n1.0,11.5,21.0\n";
        let grid = HeightGrid::parse_csv(csv.as_bytes(), Path::new("chm.csv")).unwrap();
        assert_eq!((grid.w, grid.h), (3, 2));
        assert!((grid.get(1, 0) - 10.5).abs() < f32::EPSILON);
    }

    #[test]
    fn ragged_csv_is_shape_mismatch() {
        let csv = "0.0,1.0\n2.0\n";
        let err = HeightGrid::parse_csv(csv.as_bytes(), Path::new("chm.csv")).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }
}
