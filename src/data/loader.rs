use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;

use super::model::{Column, Dataset, Record};
use crate::config::DataSource;
use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Tabular layouts the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Delimited(u8),
    Json,
    Parquet,
}

impl Format {
    /// Pick a format from a lower-cased file extension.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext {
            "csv" => Ok(Format::Delimited(b',')),
            "tsv" | "tab" => Ok(Format::Delimited(b'\t')),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load the survey from a file or URL in a single attempt.
///
/// Supported formats (by extension):
/// * `.csv` / `.tsv` – header row with the source column names
/// * `.json`         – `[{ "ano": 2024, "cargo": "...", ... }, ...]`
/// * `.parquet`      – flat columns with the source column names
///
/// URLs without a recognisable extension are read as CSV.
pub fn load(source: &DataSource) -> Result<Dataset> {
    match source {
        DataSource::Path(path) => load_file(path),
        DataSource::Url(url) => {
            let format = match source.extension() {
                Some(ext) => Format::from_extension(&ext).unwrap_or(Format::Delimited(b',')),
                None => Format::Delimited(b','),
            };
            load_url(url, format)
        }
    }
}

/// Load a local file, dispatching on its extension.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let format = Format::from_extension(&ext)?;
    let file = std::fs::File::open(path)?;
    match format {
        Format::Delimited(delimiter) => load_delimited(file, delimiter),
        Format::Json => load_json(file),
        Format::Parquet => load_parquet(file),
    }
}

fn load_url(url: &str, format: Format) -> Result<Dataset> {
    let http_err = |message: String| LoadError::Http {
        url: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("salary-dash/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| http_err(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| http_err(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(http_err(format!("server returned {status}")));
    }

    match format {
        Format::Delimited(delimiter) => load_delimited(response, delimiter),
        Format::Json => load_json(response),
        // Parquet needs random access, so buffer the whole body.
        Format::Parquet => {
            let body = response
                .bytes()
                .map_err(|e| http_err(format!("reading body: {e}")))?;
            load_parquet(body)
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsing shared by all formats
// ---------------------------------------------------------------------------

/// Build one record from textual cells; `cell` returns "" for nulls.
fn build_record(row: usize, mut cell: impl FnMut(Column) -> String) -> Result<Record> {
    Ok(Record {
        year: parse_year(&cell(Column::Year), row)?,
        seniority: cell(Column::Seniority),
        contract_type: cell(Column::ContractType),
        company_size: cell(Column::CompanySize),
        role: cell(Column::Role),
        remote_type: cell(Column::RemoteType),
        residence_country_code: cell(Column::ResidenceIso3),
        salary_usd: parse_salary(&cell(Column::SalaryUsd), row)?,
    })
}

fn invalid(row: usize, column: Column, value: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Accepts `2024` as well as float-typed exports such as `2024.0`.
fn parse_year(s: &str, row: usize) -> Result<i32> {
    let t = s.trim();
    if let Ok(y) = t.parse::<i32>() {
        return Ok(y);
    }
    match t.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(f as i32),
        _ => Err(invalid(row, Column::Year, s)),
    }
}

fn parse_salary(s: &str, row: usize) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(row, Column::SalaryUsd, s)),
    }
}

/// Locate every required column, reporting all absent ones at once.
fn locate_columns<F>(mut position: F) -> Result<BTreeMap<Column, usize>>
where
    F: FnMut(&str) -> Option<usize>,
{
    let mut found = BTreeMap::new();
    let mut missing = Vec::new();
    for col in Column::ALL {
        match position(col.source_name()) {
            Some(idx) => {
                found.insert(col, idx);
            }
            None => missing.push(col.source_name().to_string()),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// Delimited (CSV / TSV) loader
// ---------------------------------------------------------------------------

/// Header row with column names; extra columns are ignored.
fn load_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = locate_columns(|name| headers.iter().position(|h| h.trim() == name))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let record = build_record(row_no, |col| {
            row.get(columns[&col]).unwrap_or("").to_string()
        })?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records orientation, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "ano": 2024, "senioridade": "senior", "cargo": "data scientist", "usd": 150000, ... },
///   ...
/// ]
/// ```
///
/// Rows carry their own keys, so an empty array has no schema to check and
/// loads as an empty dataset.
fn load_json<R: Read>(reader: R) -> Result<Dataset> {
    let rows: Vec<serde_json::Map<String, JsonValue>> = serde_json::from_reader(reader)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, obj) in rows.iter().enumerate() {
        locate_columns(|name| obj.contains_key(name).then_some(0))?;
        let record = build_record(row_no, |col| {
            obj.get(col.source_name()).map(json_to_text).unwrap_or_default()
        })?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat columns named like the CSV headers. Integer or float numeric
/// columns and utf8 string columns all work, as written by both Pandas
/// (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet<T: ChunkReader + 'static>(input: T) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)?;
    // Checked against the file schema so a file with no rows still fails.
    let columns = locate_columns(|name| builder.schema().index_of(name).ok())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let mut display_err = None;
            let record = build_record(row_no, |col| {
                let array = batch.column(columns[&col]);
                match array_value_to_string(array.as_ref(), row) {
                    Ok(text) => text,
                    Err(e) => {
                        display_err.get_or_insert(e);
                        String::new()
                    }
                }
            });
            if let Some(e) = display_err {
                return Err(e.into());
            }
            records.push(record?);
        }
    }

    Ok(Dataset::from_records(records))
}
