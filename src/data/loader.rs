use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::{DecodeError, Result, SweepError};
use super::model::{CellValue, Column, ColumnType, Table, UploadedFile};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Raw strings read as missing unless configured otherwise.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Input formats
// ---------------------------------------------------------------------------

/// The two formats files can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    /// Match a dotted extension (`.csv`, `.XLSX`, …) case-insensitively.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            ".csv" => Ok(InputFormat::Csv),
            ".xlsx" => Ok(InputFormat::Xlsx),
            other => Err(SweepError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Lower-cased extension of a file name, with its leading dot.
///
/// Follows path-splitting rules: `data.tar.CSV` → `.csv`, `data` → `""`,
/// and a dot-file such as `.csv` has no extension.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Knobs for turning raw text into cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Exact strings that decode to [`CellValue::Missing`].
    pub na_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReadOptions {
    fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|na| na == raw)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Decode `content` as the format named by `extension`, with default options.
///
/// `file_name` only labels errors.
pub fn decode(file_name: &str, content: &[u8], extension: &str) -> Result<Table> {
    decode_with(file_name, content, extension, &ReadOptions::default())
}

/// Decode `content` as the format named by `extension`.
///
/// Supported formats:
/// * `.csv`  – first record is the header
/// * `.xlsx` – first worksheet only, first row is the header
pub fn decode_with(
    file_name: &str,
    content: &[u8],
    extension: &str,
    options: &ReadOptions,
) -> Result<Table> {
    let format = InputFormat::from_extension(extension)?;
    let decoded = match format {
        InputFormat::Csv => read_csv(content, options),
        InputFormat::Xlsx => read_xlsx(content, options),
    };
    let table = decoded.map_err(|cause| SweepError::DecodeFailure {
        file_name: file_name.to_string(),
        cause,
    })?;
    log::debug!(
        "Decoded {file_name}: {} rows x {} columns",
        table.n_rows(),
        table.n_cols()
    );
    Ok(table)
}

/// Decode an uploaded file using the extension of its own name.
pub fn decode_file(file: &UploadedFile, options: &ReadOptions) -> Result<Table> {
    decode_with(&file.name, &file.content, &extension_of(&file.name), options)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row, then data rows. Short rows are padded with missing cells and
/// long rows are cut to the header width.
fn read_csv(content: &[u8], options: &ReadOptions) -> std::result::Result<Table, DecodeError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = unique_headers(reader.headers()?.iter().map(str::to_string));
    let width = headers.len();

    let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut truncated_rows = 0usize;

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            truncated_rows += 1;
        }
        for (col_idx, column) in raw_columns.iter_mut().enumerate() {
            let cell = record
                .get(col_idx)
                .filter(|raw| !options.is_na(raw))
                .map(str::to_string);
            column.push(cell);
        }
    }

    if truncated_rows > 0 {
        log::warn!("Dropped extra fields from {truncated_rows} CSV rows wider than the header");
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| Column::new(name, infer_cells(raw)))
        .collect();
    Ok(Table::from_columns(columns))
}

/// Guess the type of a single raw field.
fn guess_cell_type(s: &str) -> CellValue {
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "True" | "true" | "TRUE" => CellValue::Bool(true),
        "False" | "false" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

/// Turn one column of raw fields into cells of a single consistent type:
/// a text column keeps every field verbatim, and a numeric column with any
/// float promotes its integers.
fn infer_cells(raw: Vec<Option<String>>) -> Vec<CellValue> {
    let guessed = Column::new(
        "",
        raw.iter()
            .map(|cell| cell.as_deref().map_or(CellValue::Missing, guess_cell_type))
            .collect(),
    );
    match guessed.column_type() {
        ColumnType::Text => raw
            .into_iter()
            .map(|cell| cell.map_or(CellValue::Missing, CellValue::Text))
            .collect(),
        ColumnType::Float => guessed
            .cells
            .into_iter()
            .map(|cell| match cell {
                CellValue::Integer(i) => CellValue::Float(i as f64),
                other => other,
            })
            .collect(),
        _ => guessed.cells,
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// First worksheet, first row as header. Columns left of the used range are
/// kept as blank columns so positions match the sheet.
fn read_xlsx(content: &[u8], options: &ReadOptions) -> std::result::Result<Table, DecodeError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoWorksheet)??;
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };
    let headers = unique_headers(
        std::iter::repeat(String::new())
            .take(col_offset)
            .chain(header_row.iter().map(|cell| cell.to_string())),
    );

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            let cell = col_idx
                .checked_sub(col_offset)
                .and_then(|idx| row.get(idx))
                .map_or(CellValue::Missing, |c| xlsx_cell(c, options));
            column.push(cell);
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, integral_floats_to_ints(non_finite_floats(cells))))
        .collect();
    Ok(Table::from_columns(columns))
}

fn xlsx_cell(cell: &Data, options: &ReadOptions) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if options.is_na(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Empty => CellValue::Missing,
        Data::Error(e) => {
            log::debug!("Excel cell error {e:?} read as missing");
            CellValue::Missing
        }
        Data::DateTime(dt) if dt.is_duration() => CellValue::Text(cell.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Text(format_timestamp(dt)),
            None => CellValue::Text(cell.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}

/// `2024-03-15` at midnight, `2024-03-15 14:30:00` otherwise.
fn format_timestamp(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Worksheets cannot hold infinities, so they are written as `inf` / `-inf`
/// text. A column that is numeric apart from those strings gets them back
/// as floats.
fn non_finite_floats(cells: Vec<CellValue>) -> Vec<CellValue> {
    fn parse(cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Text(s) if s == "inf" => Some(f64::INFINITY),
            CellValue::Text(s) if s == "-inf" => Some(f64::NEG_INFINITY),
            _ => None,
        }
    }
    let has_non_finite = cells.iter().any(|c| parse(c).is_some());
    let otherwise_numeric = cells.iter().all(|c| {
        parse(c).is_some()
            || matches!(c, CellValue::Integer(_) | CellValue::Float(_) | CellValue::Missing)
    });
    if !(has_non_finite && otherwise_numeric) {
        return cells;
    }
    cells
        .into_iter()
        .map(|c| match parse(&c) {
            Some(f) => CellValue::Float(f),
            None => c,
        })
        .collect()
}

/// Workbooks store every number as a float; a purely numeric column whose
/// values are all whole is read back as integers.
fn integral_floats_to_ints(cells: Vec<CellValue>) -> Vec<CellValue> {
    let numeric_only = cells
        .iter()
        .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_) | CellValue::Missing));
    let all_whole = cells.iter().all(|c| match c {
        CellValue::Float(f) => f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15,
        _ => true,
    });
    if !(numeric_only && all_whole) {
        return cells;
    }
    cells
        .into_iter()
        .map(|c| match c {
            CellValue::Float(f) => CellValue::Integer(f as i64),
            other => other,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Header names
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: {index}` and repeats get `.1`, `.2`, …
/// suffixes so every column stays addressable by name.
fn unique_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();
    for (idx, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        while seen.contains_key(&candidate) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{base}.{counter}");
        }
        seen.insert(candidate.clone(), 0);
        names.push(candidate);
    }
    names
}
