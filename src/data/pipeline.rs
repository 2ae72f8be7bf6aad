use super::clean::{apply_cleaning, CleaningOptions};
use super::error::Result;
use super::export::{encode, ExportFormat, ExportedFile};
use super::loader::{decode_file, ReadOptions};
use super::model::{Table, UploadedFile};
use super::projection::{project_columns, ColumnSelection};

// ---------------------------------------------------------------------------
// Per-file request
// ---------------------------------------------------------------------------

/// Everything the user asked for one file, passed in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRequest {
    pub cleaning: CleaningOptions,
    /// `None` keeps every column.
    pub selection: Option<ColumnSelection>,
    /// `None` stops after projection.
    pub export: Option<ExportFormat>,
}

/// Result of running one file through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub name: String,
    pub table: Table,
    pub export: Option<ExportedFile>,
}

/// Clean then project an already decoded table.
pub fn transform(table: &Table, request: &FileRequest) -> Result<Table> {
    let cleaned = apply_cleaning(table.clone(), &request.cleaning);
    match &request.selection {
        Some(selection) => project_columns(&cleaned, selection),
        None => Ok(cleaned),
    }
}

/// decode → clean → project → encode, for a single file.
pub fn process_file(
    file: &UploadedFile,
    request: &FileRequest,
    options: &ReadOptions,
) -> Result<ProcessedFile> {
    log::info!("Processing {} ({:.1} KiB)", file.name, file.size_kib());
    let decoded = decode_file(file, options)?;
    if request.cleaning.any() {
        log::debug!("Cleaning {} with {:?}", file.name, request.cleaning);
    }
    let table = transform(&decoded, request)?;
    let export = request
        .export
        .map(|format| encode(&table, &file.name, format))
        .transpose()?;
    Ok(ProcessedFile {
        name: file.name.clone(),
        table,
        export,
    })
}

/// Run every file independently; a failing file is logged and reported in
/// its slot without stopping the others.
pub fn process_batch<F>(
    files: &[UploadedFile],
    options: &ReadOptions,
    mut request_for: F,
) -> Vec<Result<ProcessedFile>>
where
    F: FnMut(&UploadedFile) -> FileRequest,
{
    let results: Vec<Result<ProcessedFile>> = files
        .iter()
        .map(|file| {
            let request = request_for(file);
            let result = process_file(file, &request, options);
            if let Err(e) = &result {
                log::error!("{}: {e}", file.name);
            }
            result
        })
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    log::info!("Processed {} files, {failed} failed", files.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::SweepError;
    use crate::data::model::CellValue;

    #[test]
    fn request_without_options_passes_table_through() {
        let file = UploadedFile::new("plain.csv", b"a,b\n1,2\n".to_vec());
        let processed = process_file(&file, &FileRequest::default(), &ReadOptions::default()).unwrap();
        assert_eq!(processed.name, "plain.csv");
        assert_eq!(processed.table.n_rows(), 1);
        assert!(processed.export.is_none());
    }

    #[test]
    fn stale_selection_surfaces_unknown_column() {
        let file = UploadedFile::new("plain.csv", b"a,b\n1,2\n".to_vec());
        let request = FileRequest {
            selection: Some(ColumnSelection::new(["a", "dropped"])),
            ..FileRequest::default()
        };
        let err = process_file(&file, &request, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, SweepError::UnknownColumn(ref c) if c == "dropped"));
    }

    #[test]
    fn transform_cleans_before_projecting() {
        let table = crate::data::loader::decode("t.csv", b"k,v\n1,\n1,\n2,6\n", ".csv").unwrap();
        let request = FileRequest {
            cleaning: CleaningOptions {
                remove_duplicates: true,
                fill_missing_numeric: true,
            },
            selection: Some(ColumnSelection::new(["v"])),
            export: None,
        };
        let out = transform(&table, &request).unwrap();
        assert_eq!(out.column_names(), vec!["v"]);
        assert_eq!(out.column("v").unwrap().cells, vec![CellValue::Float(6.0), CellValue::Integer(6)]);
    }
}
