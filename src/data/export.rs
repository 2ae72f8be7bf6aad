use std::fmt;
use std::io::Cursor;

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use super::error::{EncodeError, Result, SweepError};
use super::loader::extension_of;
use super::model::{CellValue, Table};

/// Worksheet limits, header row included.
const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLS: usize = 16_384;

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    Spreadsheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Spreadsheet];

    /// Canonical extension, with its dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Spreadsheet => ".xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Spreadsheet => "Excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Exported file
// ---------------------------------------------------------------------------

/// An encoded table ready to hand to a download / save routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

impl ExportedFile {
    /// A reader over the whole content, positioned at the first byte.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.content.as_slice())
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Swap the extension of `source_name` for the format's canonical one.
/// Names without an extension get it appended.
pub fn export_file_name(source_name: &str, format: ExportFormat) -> String {
    let ext = extension_of(source_name);
    let stem = &source_name[..source_name.len() - ext.len()];
    format!("{stem}{}", format.extension())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `table` as `format`. No row-index column is written.
pub fn encode(table: &Table, source_name: &str, format: ExportFormat) -> Result<ExportedFile> {
    let file_name = export_file_name(source_name, format);
    let encoded = match format {
        ExportFormat::Csv => write_csv(table),
        ExportFormat::Spreadsheet => write_xlsx(table),
    };
    let content = encoded.map_err(|cause| SweepError::EncodeFailure {
        file_name: file_name.clone(),
        cause,
    })?;
    log::info!("Encoded {file_name} ({} bytes)", content.len());
    Ok(ExportedFile {
        file_name,
        mime_type: format.mime_type(),
        content,
    })
}

fn line_terminator() -> csv::Terminator {
    if cfg!(windows) {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    }
}

/// Header then rows; missing cells are empty fields.
fn write_csv(table: &Table) -> std::result::Result<Vec<u8>, EncodeError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(line_terminator())
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        writer.write_record(table.row(row).iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| EncodeError::Csv(csv::Error::from(e.into_error())))
}

/// Single worksheet, header in the first row.
fn write_xlsx(table: &Table) -> std::result::Result<Vec<u8>, EncodeError> {
    let (rows, cols) = (table.n_rows(), table.n_cols());
    if rows + 1 > MAX_SHEET_ROWS || cols > MAX_SHEET_COLS {
        return Err(EncodeError::TooLarge { rows, cols });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string(0, col, column.name.as_str())?;

        for (row_idx, cell) in column.cells.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match cell {
                CellValue::Integer(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) if f.is_finite() => {
                    worksheet.write_number(row, col, *f)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::Missing => {}
                // Text, plus floats a worksheet cannot store as numbers.
                other => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::decode;
    use crate::data::model::Column;
    use std::io::Read;

    fn table() -> Table {
        Table::from_columns(vec![
            Column::new("id", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            Column::new(
                "name",
                vec![CellValue::Text("plain".into()), CellValue::Text("has, comma".into())],
            ),
            Column::new("score", vec![CellValue::Float(4.0), CellValue::Missing]),
        ])
    }

    fn nl() -> &'static str {
        if cfg!(windows) { "\r\n" } else { "\n" }
    }

    #[test]
    fn file_name_swaps_extension() {
        assert_eq!(export_file_name("data.xlsx", ExportFormat::Csv), "data.csv");
        assert_eq!(export_file_name("data.csv", ExportFormat::Spreadsheet), "data.xlsx");
        assert_eq!(export_file_name("DATA.CSV", ExportFormat::Csv), "DATA.csv");
        assert_eq!(export_file_name("a.csv.csv", ExportFormat::Spreadsheet), "a.csv.xlsx");
        assert_eq!(export_file_name("noext", ExportFormat::Csv), "noext.csv");
    }

    #[test]
    fn mime_types() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(
            ExportFormat::Spreadsheet.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn csv_output_has_no_index_and_minimal_quoting() {
        let exported = encode(&table(), "people.xlsx", ExportFormat::Csv).unwrap();
        assert_eq!(exported.file_name, "people.csv");
        assert_eq!(exported.mime_type, "text/csv");
        let expected = ["id,name,score", "1,plain,4.0", "2,\"has, comma\","]
            .iter()
            .map(|line| format!("{line}{}", nl()))
            .collect::<String>();
        assert_eq!(String::from_utf8(exported.content).unwrap(), expected);
    }

    #[test]
    fn reader_starts_at_first_byte() {
        let exported = encode(&table(), "people.csv", ExportFormat::Csv).unwrap();
        let mut buf = Vec::new();
        exported.reader().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, exported.content);
    }

    #[test]
    fn xlsx_output_reads_back() {
        let exported = encode(&table(), "people.csv", ExportFormat::Spreadsheet).unwrap();
        assert_eq!(exported.file_name, "people.xlsx");
        assert!(!exported.is_empty());

        let back = decode(&exported.file_name, &exported.content, ".xlsx").unwrap();
        assert_eq!(back.column_names(), vec!["id", "name", "score"]);
        assert_eq!(back.column("id").unwrap().cells, table().column("id").unwrap().cells);
        assert_eq!(back.column("name").unwrap().cells, table().column("name").unwrap().cells);
        // A whole-valued float comes back as an integer: same value, no type tag.
        assert_eq!(
            back.column("score").unwrap().cells,
            vec![CellValue::Integer(4), CellValue::Missing]
        );
    }

    #[test]
    fn infinite_floats_survive_xlsx() {
        let original = decode("v.csv", b"v\ninf\n1.5\n-inf\n", ".csv").unwrap();
        let exported = encode(&original, "v.csv", ExportFormat::Spreadsheet).unwrap();
        let back = decode(&exported.file_name, &exported.content, ".xlsx").unwrap();
        assert_eq!(back, original);
        assert_eq!(
            back.column("v").unwrap().cells,
            vec![
                CellValue::Float(f64::INFINITY),
                CellValue::Float(1.5),
                CellValue::Float(f64::NEG_INFINITY),
            ]
        );
    }

    #[test]
    fn zero_column_table_still_encodes() {
        let exported = encode(&Table::with_rows(2), "x.csv", ExportFormat::Spreadsheet).unwrap();
        assert!(!exported.is_empty());
    }
}
