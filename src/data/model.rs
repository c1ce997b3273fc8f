use std::collections::BTreeSet;

use crate::error::{OutlierError, Result};

// ---------------------------------------------------------------------------
// Series – one column of the table
// ---------------------------------------------------------------------------

/// A single named time series (one column of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Full column identifier, e.g. `site.scope_aws.cpustats{clustertag=c1}`.
    pub name: String,
    /// One value per index row. Missing values are `NaN`.
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Series {
            name: name.into(),
            values,
        }
    }

    /// Whether any value in the series is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }
}

// ---------------------------------------------------------------------------
// MetricTable – the complete wide table
// ---------------------------------------------------------------------------

/// A time-indexed numeric table: rows are timestamps, columns are series.
///
/// Tables are never mutated once built; every selection returns a new
/// table that shares the source's index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricTable {
    index: Vec<String>,
    columns: Vec<Series>,
}

impl MetricTable {
    /// Build a table, checking that every column matches the index length
    /// and that column names are unique.
    pub fn new(index: Vec<String>, columns: Vec<Series>) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for col in &columns {
            if col.values.len() != index.len() {
                return Err(OutlierError::ColumnLength {
                    column: col.name.clone(),
                    expected: index.len(),
                    got: col.values.len(),
                });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(OutlierError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(MetricTable { index, columns })
    }

    /// An empty table over the given index, ready to receive columns.
    pub fn with_index(index: Vec<String>) -> Self {
        MetricTable {
            index,
            columns: Vec::new(),
        }
    }

    /// Append a column taken from another table over the same index.
    ///
    /// Crate-internal: callers guarantee matching length and unique names.
    pub(crate) fn push_column(&mut self, series: Series) {
        debug_assert_eq!(series.values.len(), self.index.len());
        self.columns.push(series);
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by its full name.
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows (timestamps).
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// New table holding only the columns accepted by `keep`, in order.
    pub fn select<F>(&self, mut keep: F) -> MetricTable
    where
        F: FnMut(&Series) -> bool,
    {
        MetricTable {
            index: self.index.clone(),
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// New table without any column that has at least one missing value.
    pub fn drop_incomplete(&self) -> MetricTable {
        self.select(|c| !c.has_missing())
    }

    /// New table of the same shape with every column transformed by `f`.
    pub fn map_columns<F>(&self, mut f: F) -> MetricTable
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        MetricTable {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Series::new(c.name.clone(), f(&c.values)))
                .collect(),
        }
    }
}
