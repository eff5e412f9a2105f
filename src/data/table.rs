//! Timing Table Module
//! One benchmark run's measurements, one row per thread count.

use std::path::{Path, PathBuf};

/// Minimum number of columns every row must carry:
/// threads; elapsed A; elapsed B; user CPU; system CPU.
pub const MIN_COLUMNS: usize = 5;

/// Row-major numeric table loaded from one input file.
///
/// Rows keep their order from the source file and all have the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingTable {
    source: PathBuf,
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl TimingTable {
    /// Build a table from already validated rows.
    ///
    /// Callers must guarantee that every row has exactly `width` fields.
    pub(crate) fn from_rows(source: impl Into<PathBuf>, width: usize, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            source: source.into(),
            width,
            rows,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of columns per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values of one column, in row order.
    ///
    /// Returns `None` when the column is beyond the table width.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.width).then(|| self.rows.iter().map(|row| row[index]).collect())
    }

    /// Largest value in a column, ignoring NaN.
    pub fn column_max(&self, index: usize) -> Option<f64> {
        self.column(index)?
            .into_iter()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    /// Element-wise sum of two columns.
    pub fn column_sum(&self, a: usize, b: usize) -> Option<Vec<f64>> {
        let (a, b) = (self.column(a)?, self.column(b)?);
        Some(a.iter().zip(&b).map(|(x, y)| x + y).collect())
    }

    /// Short name used for default labels: the file stem.
    pub fn stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}
