use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{MetricTable, Series};

/// Column names recognised as the row index of a Parquet table, in priority
/// order. `__index_level_0__` is what Pandas writes for an unnamed index.
const INDEX_COLUMNS: &[&str] = &["timestamp", "time", "index", "__index_level_0__"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide metric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one index column (see [`INDEX_COLUMNS`]) plus numeric metric columns
/// * `.csv`     – first column is the index, the rest are metric columns
/// * `.json`    – split orientation: `{ "index": [...], "columns": [...], "data": [[...]] }`
pub fn load_file(path: &Path) -> Result<MetricTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "loaded {} columns x {} rows from {}",
        table.n_cols(),
        table.n_rows(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// `df.to_json(orient='split')` layout; `null` cells are missing values.
#[derive(Debug, Deserialize)]
struct SplitTable {
    index: Vec<serde_json::Value>,
    columns: Vec<String>,
    data: Vec<Vec<Option<f64>>>,
}

fn load_json(path: &Path) -> Result<MetricTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let split: SplitTable = serde_json::from_str(&text).context("parsing JSON")?;

    if split.index.len() != split.data.len() {
        bail!(
            "JSON index has {} entries but data has {} rows",
            split.index.len(),
            split.data.len()
        );
    }

    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(split.data.len()); split.columns.len()];
    for (i, row) in split.data.iter().enumerate() {
        if row.len() != split.columns.len() {
            bail!(
                "Row {i}: expected {} values, got {}",
                split.columns.len(),
                row.len()
            );
        }
        for (col, cell) in values.iter_mut().zip(row) {
            col.push(cell.unwrap_or(f64::NAN));
        }
    }

    let index = split
        .index
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let columns = split
        .columns
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Series::new(name, vals))
        .collect();

    MetricTable::new(index, columns).context("building metric table from JSON")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, first column is the row index (its header may
/// be empty, as Pandas writes it). Empty, `nan` and `null` cells are missing.
fn load_csv(path: &Path) -> Result<MetricTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }
    let metric_names = &headers[1..];

    let mut index = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); metric_names.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        index.push(record.get(0).unwrap_or("").to_string());

        for (col_idx, col) in values.iter_mut().enumerate() {
            let cell = record.get(col_idx + 1).unwrap_or("");
            let value = parse_cell(cell).with_context(|| {
                format!("Row {row_no}, column '{}'", metric_names[col_idx])
            })?;
            col.push(value);
        }
    }

    let columns = metric_names
        .iter()
        .cloned()
        .zip(values)
        .map(|(name, vals)| Series::new(name, vals))
        .collect();

    MetricTable::new(index, columns).context("building metric table from CSV")
}

fn parse_cell(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a wide Parquet table.
///
/// Expected schema:
/// - an optional index column named one of [`INDEX_COLUMNS`] (any type,
///   rendered as text; row numbers are used when absent)
/// - every other column numeric (ints and floats are cast to `f64`, nulls
///   become `NaN`); non-numeric columns are skipped with a warning
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<MetricTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut index: Vec<String> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();

    for (batch_no, batch_result) in reader.enumerate() {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let index_idx = INDEX_COLUMNS
            .iter()
            .find_map(|name| schema.index_of(name).ok());

        match index_idx {
            Some(i) => {
                let col = batch.column(i);
                for row in 0..n_rows {
                    let label = array_value_to_string(col, row)
                        .with_context(|| format!("Row {row}: failed to read index"))?;
                    index.push(label);
                }
            }
            None => {
                let start = index.len();
                index.extend((start..start + n_rows).map(|r| r.to_string()));
            }
        }

        let mut slot = 0;
        for (col_idx, field) in schema.fields().iter().enumerate() {
            if Some(col_idx) == index_idx {
                continue;
            }
            if !field.data_type().is_numeric() {
                if batch_no == 0 {
                    log::warn!(
                        "skipping non-numeric column '{}' ({:?})",
                        field.name(),
                        field.data_type()
                    );
                }
                continue;
            }
            if batch_no == 0 {
                names.push(field.name().clone());
                values.push(Vec::with_capacity(n_rows));
            }
            let Some(target) = values.get_mut(slot) else {
                bail!("Batch {batch_no}: column '{}' not present in first batch", field.name());
            };
            target.extend(column_as_f64(batch.column(col_idx))
                .with_context(|| format!("column '{}'", field.name()))?);
            slot += 1;
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Series::new(name, vals))
        .collect();

    MetricTable::new(index, columns).context("building metric table from parquet")
}

// -- Parquet / Arrow helpers --

/// Cast a numeric Arrow column to `f64`, mapping nulls to `NaN`.
fn column_as_f64(col: &ArrayRef) -> Result<Vec<f64>> {
    let casted = cast(col, &DataType::Float64).context("casting to Float64")?;
    let arr = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("expected Float64Array after cast")?;
    Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_missing_markers() {
        assert!(parse_cell("").unwrap().is_nan());
        assert!(parse_cell(" NaN ").unwrap().is_nan());
        assert!(parse_cell("null").unwrap().is_nan());
        assert_eq!(parse_cell("2.5").unwrap(), 2.5);
        assert!(parse_cell("abc").is_err());
    }

    #[test]
    fn test_unknown_extension_is_error() {
        let err = load_file(Path::new("metrics.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
