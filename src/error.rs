//! Error types shared across modules.
//!
//! Loading failures live next to the loader (`data::loader::LoaderError`); this
//! module holds the checks that span several inputs and the output side.

use std::path::PathBuf;
use thiserror::Error;

/// Inputs that load fine on their own but cannot be plotted together.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("no input files given; at least one timing table is required")]
    NoInputs,
    #[error("got {labels} label(s) for {tables} input file(s); pass one label per file")]
    LabelCountMismatch { tables: usize, labels: usize },
    #[error("breakdown '{label}' uses column {column}, but '{table}' has only {width} column(s)")]
    BreakdownColumnOutOfRange {
        label: String,
        column: usize,
        table: String,
        width: usize,
    },
    #[error("invalid breakdown '{0}': expected COLUMN:NAME, e.g. 4:system")]
    InvalidBreakdown(String),
    #[error("cannot write '{}': unsupported or missing extension (use png, jpg, bmp or svg)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("dpi {0} is out of range for the 12x6 canvas")]
    InvalidDpi(u32),
}

/// Failures while drawing or writing the output image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error on output: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("could not move rendered image into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}
