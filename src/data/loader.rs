use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, RawValue};

pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER_CATEGORY];

const UNKNOWN_BOOSTER: &str = "Unknown";

/// Structural problems with an otherwise readable file.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per row
/// * `.json`    – `[{ "Launch Site": "...", "class": 1, ... }, ...]`
/// * `.parquet` – one launch per row, string or numeric columns
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} launches from {} ({} sites, payload {:?}..{:?} kg)",
        dataset.len(),
        path.display(),
        dataset.sites.len(),
        dataset.min_payload,
        dataset.max_payload,
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Raw cells of one row, addressed by column.
struct RawRow {
    site: RawValue,
    payload: RawValue,
    class: RawValue,
    booster_category: RawValue,
    flight_number: RawValue,
    booster_version: RawValue,
}

impl RawRow {
    /// Coerce into a typed record. Rows without a site are dropped.
    fn into_record(self, row_no: usize) -> Option<LaunchRecord> {
        let Some(site) = self.site.to_label() else {
            log::warn!("row {row_no}: no launch site, skipping");
            return None;
        };
        let payload_mass_kg = self.payload.to_payload();
        if payload_mass_kg.is_none() && self.payload != RawValue::Missing {
            log::debug!("row {row_no}: payload {:?} is not a number", self.payload);
        }
        Some(LaunchRecord {
            site,
            payload_mass_kg,
            outcome: self.class.to_outcome(),
            booster_category: self
                .booster_category
                .to_label()
                .unwrap_or_else(|| UNKNOWN_BOOSTER.to_string()),
            flight_number: self
                .flight_number
                .to_payload()
                .filter(|n| *n >= 0.0)
                .map(|n| n as u32),
            booster_version: self.booster_version.to_label(),
        })
    }
}

/// Fail with every required column absent from `present`.
fn check_required(present: impl Fn(&str) -> bool) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present(c))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Extra columns (the unnamed pandas index, `Mission Outcome`, ...) are ignored.
/// Short rows are allowed; their absent trailing cells are missing values.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| headers.iter().position(|h| h == name);
    check_required(|c| idx(c).is_some())?;

    let site_idx = idx(COL_SITE);
    let payload_idx = idx(COL_PAYLOAD);
    let class_idx = idx(COL_CLASS);
    let booster_idx = idx(COL_BOOSTER_CATEGORY);
    let flight_idx = idx(COL_FLIGHT_NUMBER);
    let version_idx = idx(COL_BOOSTER_VERSION);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .map(RawValue::from_field)
                .unwrap_or(RawValue::Missing)
        };
        let raw = RawRow {
            site: cell(site_idx),
            payload: cell(payload_idx),
            class: cell(class_idx),
            booster_category: cell(booster_idx),
            flight_number: cell(flight_idx),
            booster_version: cell(version_idx),
        };
        records.extend(raw.into_record(row_no));
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let objects = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    // A column counts as present when any row carries the key.
    check_required(|c| objects.iter().any(|o| o.contains_key(c)))?;

    let mut records = Vec::with_capacity(objects.len());
    for (row_no, obj) in objects.into_iter().enumerate() {
        let cell = |name: &str| obj.get(name).map(json_to_raw).unwrap_or(RawValue::Missing);
        let raw = RawRow {
            site: cell(COL_SITE),
            payload: cell(COL_PAYLOAD),
            class: cell(COL_CLASS),
            booster_category: cell(COL_BOOSTER_CATEGORY),
            flight_number: cell(COL_FLIGHT_NUMBER),
            booster_version: cell(COL_BOOSTER_VERSION),
        };
        records.extend(raw.into_record(row_no));
    }

    Ok(LaunchDataset::from_records(records))
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::Null => RawValue::Missing,
        JsonValue::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
        JsonValue::String(s) => RawValue::from_field(s),
        JsonValue::Bool(b) => RawValue::Number(if *b { 1.0 } else { 0.0 }),
        other => RawValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Every column may be a string (plain, view or dictionary encoded), an
/// integer or a float type; values go through the same coercion as CSV cells.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema: Arc<Schema> = builder.schema().clone();
    check_required(|c| schema.index_of(c).is_ok())?;
    let idx = |name: &str| schema.index_of(name).ok();
    let site_idx = idx(COL_SITE);
    let payload_idx = idx(COL_PAYLOAD);
    let class_idx = idx(COL_CLASS);
    let booster_idx = idx(COL_BOOSTER_CATEGORY);
    let flight_idx = idx(COL_FLIGHT_NUMBER);
    let version_idx = idx(COL_BOOSTER_VERSION);

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_no = 0;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(decode_strings)
            .collect::<Result<Vec<_>>>()?;
        let cell = |i: Option<usize>, row: usize| {
            i.map(|i| extract_raw_value(&columns[i], row))
                .unwrap_or(RawValue::Missing)
        };

        for row in 0..batch.num_rows() {
            let raw = RawRow {
                site: cell(site_idx, row),
                payload: cell(payload_idx, row),
                class: cell(class_idx, row),
                booster_category: cell(booster_idx, row),
                flight_number: cell(flight_idx, row),
                booster_version: cell(version_idx, row),
            };
            records.extend(raw.into_record(row_no));
            row_no += 1;
        }
    }

    Ok(LaunchDataset::from_records(records))
}

/// Dictionary (pandas categorical) and view columns are cast to plain Utf8.
fn decode_strings(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Dictionary(_, _) | DataType::Utf8View => cast(col, &DataType::Utf8)
            .with_context(|| format!("decoding {} column", col.data_type())),
        _ => Ok(col.clone()),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_raw_value(col: &ArrayRef, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => RawValue::from_field(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => RawValue::from_field(col.as_string::<i64>().value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| RawValue::Number(a.value(row) as f64))
            .unwrap_or(RawValue::Missing),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| RawValue::Number(a.value(row) as f64))
            .unwrap_or(RawValue::Missing),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| RawValue::Number(a.value(row) as f64))
            .unwrap_or(RawValue::Missing),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| RawValue::Number(a.value(row)))
            .unwrap_or(RawValue::Missing),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| RawValue::Number(if a.value(row) { 1.0 } else { 0.0 }))
            .unwrap_or(RawValue::Missing),
        other => {
            log::debug!("unsupported parquet column type {other:?}, treating as missing");
            RawValue::Missing
        }
    }
}
