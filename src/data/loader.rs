use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{RawRow, RawValue, TimeSeries};
use super::schema::normalize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("parse error: {0}")]
    Parse(String),
}

impl LoadError {
    /// True for failures to obtain the resource, false for failures to read it.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, LoadError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Sources and formats
// ---------------------------------------------------------------------------

/// Where a series is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }

    /// Format by extension. Anything unknown is read as CSV.
    pub fn format(&self) -> SourceFormat {
        let ext = match self {
            DataSource::File(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
            DataSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_string)
            }
        };

        match ext.unwrap_or_default().to_ascii_lowercase().as_str() {
            "json" => SourceFormat::Json,
            "parquet" | "pq" => SourceFormat::Parquet,
            _ => SourceFormat::Csv,
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Parquet,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch, parse and normalize one series. The whole fetch is bounded by `timeout`.
pub async fn load_series(client: &Client, source: &DataSource, timeout: Duration) -> Result<TimeSeries> {
    let bytes = fetch(client, source, timeout).await?;
    let rows = parse_rows(source.format(), bytes)?;
    let series = normalize(&rows);

    log::info!(
        "loaded {} rows from {source}, {} with a usable year",
        rows.len(),
        series.len()
    );
    Ok(series)
}

pub async fn fetch(client: &Client, source: &DataSource, timeout: Duration) -> Result<Bytes> {
    tokio::time::timeout(timeout, fetch_unbounded(client, source))
        .await
        .map_err(|_| LoadError::Timeout(timeout))?
}

async fn fetch_unbounded(client: &Client, source: &DataSource) -> Result<Bytes> {
    match source {
        DataSource::File(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        DataSource::Url(url) => {
            let response = client.get(url.as_str()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status(status));
            }
            Ok(response.bytes().await?)
        }
    }
}

/// Split a raw resource into loosely typed rows.
pub fn parse_rows(format: SourceFormat, bytes: Bytes) -> Result<Vec<RawRow>> {
    match format {
        SourceFormat::Csv => parse_csv(&bytes),
        SourceFormat::Json => parse_json(&bytes),
        SourceFormat::Parquet => parse_parquet(bytes),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row required. Malformed records are skipped with a warning.
fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping CSV row {row_no}: {e}");
                continue;
            }
        };

        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            if !value.is_empty() {
                row.entry(header.clone())
                    .or_insert_with(|| RawValue::Text(value.to_string()));
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected layout (records-oriented):
///
/// ```json
/// [ { "Year": 2018, "Water (%)": 41.2, "Built-up (%)": "12.9", ... }, ... ]
/// ```
fn parse_json(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let root: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| LoadError::Parse(format!("parsing JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Parse("expected top-level JSON array".to_string()))?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("skipping JSON record {i}: not an object");
            continue;
        };

        let row: RawRow = obj
            .iter()
            .filter_map(|(key, val)| json_to_raw(val).map(|v| (key.trim().to_string(), v)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn json_to_raw(val: &JsonValue) -> Option<RawValue> {
    match val {
        JsonValue::String(s) if !s.is_empty() => Some(RawValue::Text(s.clone())),
        JsonValue::Number(n) => n.as_f64().map(RawValue::Number),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Flat Parquet table. String, dictionary-encoded string and numeric columns
/// become cells; other column types are skipped with one warning each.
fn parse_parquet(bytes: Bytes) -> Result<Vec<RawRow>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
        .and_then(|builder| builder.build())
        .map_err(|e| LoadError::Parse(format!("reading parquet metadata: {e}")))?;

    let mut rows = Vec::new();
    let mut skipped: BTreeSet<String> = BTreeSet::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::Parse(format!("reading parquet record batch: {e}")))?;
        let schema = batch.schema();

        let mut columns: Vec<(&str, ArrayRef)> = Vec::with_capacity(batch.num_columns());
        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            match cell_column(col) {
                Some(col) => columns.push((field.name().as_str(), col)),
                None => {
                    if skipped.insert(field.name().clone()) {
                        log::warn!(
                            "ignoring parquet column '{}' of type {:?}",
                            field.name(),
                            col.data_type()
                        );
                    }
                }
            }
        }

        for row_idx in 0..batch.num_rows() {
            let row: RawRow = columns
                .iter()
                .filter_map(|(name, col)| cell_value(col, row_idx).map(|v| (name.to_string(), v)))
                .collect();
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Bring a column into one of the layouts [`cell_value`] reads: Utf8,
/// LargeUtf8, Int64 or Float64. `None` for columns that hold no scalars.
fn cell_column(col: &ArrayRef) -> Option<ArrayRef> {
    let target = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Int64 | DataType::Float64 => {
            return Some(col.clone())
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Float32 => DataType::Float64,
        DataType::Dictionary(_, values) => match values.as_ref() {
            DataType::Utf8 | DataType::LargeUtf8 => DataType::Utf8,
            v if v.is_integer() => DataType::Int64,
            v if v.is_floating() => DataType::Float64,
            _ => return None,
        },
        _ => return None,
    };
    cast(col.as_ref(), &target).ok()
}

/// Extract a single cell from a column prepared by [`cell_column`].
fn cell_value(col: &ArrayRef, row: usize) -> Option<RawValue> {
    if col.is_null(row) {
        return None;
    }
    let value = match col.data_type() {
        DataType::Utf8 => RawValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int64 => RawValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float64 => RawValue::Number(col.as_primitive::<Float64Type>().value(row)),
        _ => return None,
    };
    Some(value)
}
