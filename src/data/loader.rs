//! Timing Table Loader Module
//! Reads semicolon-delimited benchmark results into `TimingTable`s using Polars.

use super::table::{TimingTable, MIN_COLUMNS};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("'{}' has {width} column(s) per row; at least {} are required", path.display(), MIN_COLUMNS)]
    Shape { path: PathBuf, width: usize },
    /// `row` is the 1-based line in the file, `column` 0-based.
    #[error("'{}' line {row}, column {column}: missing or non-numeric value", path.display())]
    NotNumeric {
        path: PathBuf,
        row: usize,
        column: usize,
    },
    #[error("'{}' contains no data rows", path.display())]
    Empty { path: PathBuf },
}

/// Loads timing tables: no header, `;` separated, every field a number.
pub struct TableLoader;

impl TableLoader {
    /// Load every file in order, stopping at the first failure.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<TimingTable>, LoaderError> {
        paths.iter().map(|p| Self::load(p.as_ref())).collect()
    }

    /// Load one file into a table.
    pub fn load(path: &Path) -> Result<TimingTable, LoaderError> {
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (cleaned, lines) = Self::clean(&text);
        if lines.is_empty() {
            return Err(LoaderError::Empty {
                path: path.to_path_buf(),
            });
        }

        let csv_err = |source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };

        // Full-file schema inference so a stray token turns the column into
        // strings instead of failing halfway through
        let df = CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_separator(b';'))
            .into_reader_with_file_handle(Cursor::new(cleaned.into_bytes()))
            .finish()
            .map_err(csv_err)?;

        let height = df.height();
        let width = df.width();
        if height == 0 {
            return Err(LoaderError::Empty {
                path: path.to_path_buf(),
            });
        }
        if width < MIN_COLUMNS {
            return Err(LoaderError::Shape {
                path: path.to_path_buf(),
                width,
            });
        }

        let mut rows = vec![Vec::with_capacity(width); height];
        for (column, values) in df.get_columns().iter().enumerate() {
            let values = values.cast(&DataType::Float64).map_err(csv_err)?;
            let values = values.f64().map_err(csv_err)?;

            for (row, out) in rows.iter_mut().enumerate() {
                match values.get(row) {
                    Some(v) => out.push(v),
                    None => {
                        return Err(LoaderError::NotNumeric {
                            path: path.to_path_buf(),
                            row: lines.get(row).copied().unwrap_or(row + 1),
                            column,
                        })
                    }
                }
            }
        }

        let table = TimingTable::from_rows(path, width, rows);
        log::info!(
            "loaded '{}': {} row(s), {} column(s)",
            path.display(),
            table.row_count(),
            table.width()
        );
        Ok(table)
    }

    /// Drop blank lines and `#` comments, trim every field. Returns the text
    /// handed to the CSV reader and, per kept row, its 1-based line number.
    fn clean(text: &str) -> (String, Vec<usize>) {
        let mut cleaned = String::with_capacity(text.len());
        let mut lines = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let data = line.split('#').next().unwrap_or_default().trim();
            if data.is_empty() {
                continue;
            }
            let fields: Vec<&str> = data.split(';').map(str::trim).collect();
            cleaned.push_str(&fields.join(";"));
            cleaned.push('\n');
            lines.push(idx + 1);
        }
        (cleaned, lines)
    }
}
