//! Dataset Collection Module
//! Pairs loaded tables with their series labels.

use super::table::TimingTable;
use crate::error::ValidationError;

/// One table together with the label its series carry.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: TimingTable,
    pub label: String,
}

/// Non-empty, ordered list of labelled tables.
///
/// Built only through [`DatasetCollection::pair`], which rejects a table and
/// label count mismatch instead of truncating to the shorter list.
#[derive(Debug, Clone)]
pub struct DatasetCollection {
    datasets: Vec<Dataset>,
}

impl DatasetCollection {
    pub fn pair(tables: Vec<TimingTable>, labels: Vec<String>) -> Result<Self, ValidationError> {
        if tables.is_empty() {
            return Err(ValidationError::NoInputs);
        }
        if tables.len() != labels.len() {
            return Err(ValidationError::LabelCountMismatch {
                tables: tables.len(),
                labels: labels.len(),
            });
        }

        let datasets = tables
            .into_iter()
            .zip(labels)
            .map(|(table, label)| Dataset { table, label })
            .collect();
        Ok(Self { datasets })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// The first dataset; always present.
    pub fn first(&self) -> &Dataset {
        &self.datasets[0]
    }

    /// Largest value of `column` across all tables.
    pub fn column_max(&self, column: usize) -> Option<f64> {
        self.iter()
            .filter_map(|d| d.table.column_max(column))
            .reduce(f64::max)
    }

    /// Narrowest table, used to check configured column indices.
    pub fn narrowest(&self) -> &TimingTable {
        self.iter()
            .map(|d| &d.table)
            .min_by_key(|t| t.width())
            .unwrap_or(&self.first().table)
    }
}

/// Resolve the series labels for `tables`.
///
/// Explicit labels are used as given and must match the table count when
/// paired. Without them the defaults apply when their count fits, and each
/// table is otherwise named after its file stem.
pub fn resolve_labels(
    explicit: Option<&str>,
    defaults: &str,
    tables: &[TimingTable],
) -> Vec<String> {
    match explicit {
        Some(labels) => split_labels(labels),
        None => {
            let defaults = split_labels(defaults);
            if defaults.len() == tables.len() {
                defaults
            } else {
                tables.iter().map(TimingTable::stem).collect()
            }
        }
    }
}

fn split_labels(labels: &str) -> Vec<String> {
    labels.split(';').map(str::to_string).collect()
}
