//! Plot configuration.
//!
//! Everything the renderer needs besides the data itself, built once from
//! the command line and never mutated afterwards.

use crate::data::DatasetCollection;
use crate::error::ValidationError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_OUTPUT: &str = "falsesharing.png";
pub const DEFAULT_TITLE: &str = "False sharing demo";
pub const DEFAULT_LABELS: &str = "before;after";
pub const DEFAULT_BREAKDOWN: &str = "4:system";
pub const DEFAULT_DPI: u32 = 100;

/// Canvas size in inches, matching a 12x6 figure.
pub const CANVAS_INCHES: (u32, u32) = (12, 6);

/// Image encodings the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl OutputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let unsupported = || ValidationError::UnsupportedFormat(path.to_path_buf());
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(unsupported)?;

        if ext.eq_ignore_ascii_case("svg") {
            return Ok(Self::Svg);
        }
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Png) => Ok(Self::Png),
            Ok(ImageFormat::Jpeg) => Ok(Self::Jpeg),
            Ok(ImageFormat::Bmp) => Ok(Self::Bmp),
            _ => Err(unsupported()),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
            Self::Svg => "svg",
        }
    }
}

/// Which table columns feed which series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub threads: usize,
    pub elapsed: usize,
    /// The two CPU components summed into the "total" series.
    pub cpu_total: (usize, usize),
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            threads: 0,
            elapsed: 2,
            cpu_total: (3, 4),
        }
    }
}

/// Extra CPU-time column drawn on the log-log panel, one series per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub column: usize,
    pub label: String,
}

impl FromStr for Breakdown {
    type Err = ValidationError;

    /// Parses `COLUMN:NAME`, e.g. `4:system`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidBreakdown(s.to_string());
        let (column, label) = s.split_once(':').ok_or_else(invalid)?;
        let column = column.trim().parse().map_err(|_| invalid())?;
        let label = label.trim();
        if label.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            column,
            label: label.to_string(),
        })
    }
}

/// Output surface: pixel size and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl RenderOptions {
    pub fn new(format: OutputFormat, dpi: u32) -> Result<Self, ValidationError> {
        let scale = |inches: u32| inches.checked_mul(dpi).filter(|px| *px > 0);
        match (scale(CANVAS_INCHES.0), scale(CANVAS_INCHES.1)) {
            (Some(width), Some(height)) => Ok(Self {
                width,
                height,
                format,
            }),
            _ => Err(ValidationError::InvalidDpi(dpi)),
        }
    }
}

/// Immutable rendering parameters for one run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub output: PathBuf,
    pub title: Option<String>,
    pub columns: ColumnLayout,
    pub breakdowns: Vec<Breakdown>,
    pub render: RenderOptions,
}

impl PlotConfig {
    pub fn new(
        output: impl Into<PathBuf>,
        title: Option<String>,
        breakdowns: Vec<Breakdown>,
        dpi: u32,
    ) -> Result<Self, ValidationError> {
        let output = output.into();
        let format = OutputFormat::from_path(&output)?;
        Ok(Self {
            render: RenderOptions::new(format, dpi)?,
            output,
            title: title.filter(|t| !t.is_empty()),
            columns: ColumnLayout::default(),
            breakdowns,
        })
    }

    /// Check every referenced column exists in every table.
    pub fn validate(&self, datasets: &DatasetCollection) -> Result<(), ValidationError> {
        let table = datasets.narrowest();
        let layout = [
            ("threads", self.columns.threads),
            ("elapsed", self.columns.elapsed),
            ("total", self.columns.cpu_total.0),
            ("total", self.columns.cpu_total.1),
        ];
        let breakdowns = self
            .breakdowns
            .iter()
            .map(|b| (b.label.as_str(), b.column));

        for (label, column) in layout.into_iter().chain(breakdowns) {
            if column >= table.width() {
                return Err(ValidationError::BreakdownColumnOutOfRange {
                    label: label.to_string(),
                    column,
                    table: table.source().display().to_string(),
                    width: table.width(),
                });
            }
        }
        Ok(())
    }
}
