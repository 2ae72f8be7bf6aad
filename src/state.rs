use std::path::PathBuf;

use data_sweeper::config::SweeperConfig;
use data_sweeper::data::{
    encode, process_batch, transform, CleaningOptions, ColumnSelection, ExportFormat,
    ExportedFile, FileRequest, ProcessedFile, SweepError, Table, UploadedFile,
};

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// Widget state for one uploaded file, plus its decoded table.
pub struct FileSession {
    pub file: UploadedFile,

    /// Decoded table (None when decoding failed).
    pub source: Option<Table>,

    /// Cleaned + projected table shown in the chart and exported (cached).
    pub view: Option<Table>,

    /// Whether the cleaning options are active at all.
    pub clean_enabled: bool,

    /// Cleaning flags and column selection for this file.
    pub request: FileRequest,

    /// Target of the "Convert" button.
    pub export_format: ExportFormat,

    pub show_chart: bool,

    /// Error shown on this file's card.
    pub error: Option<String>,

    /// Outcome of the last conversion.
    pub export_message: Option<String>,
}

impl FileSession {
    /// Build the session from the pipeline's result for `file`; a failure is
    /// kept on the session, not returned.
    pub fn from_result(file: UploadedFile, result: Result<ProcessedFile, SweepError>) -> Self {
        let mut session = Self {
            file,
            source: None,
            view: None,
            clean_enabled: false,
            request: FileRequest::default(),
            export_format: ExportFormat::default(),
            show_chart: false,
            error: None,
            export_message: None,
        };

        match result {
            Ok(processed) => {
                let table = processed.table;
                log::info!(
                    "Loaded {} with {} rows and columns {:?}",
                    session.file.name,
                    table.n_rows(),
                    table.column_names()
                );
                session.request.selection = Some(ColumnSelection::all(&table));
                session.source = Some(table);
                session.refresh();
            }
            Err(e) => session.error = Some(e.to_string()),
        }
        session
    }

    /// Cleaning flags that actually apply, given the "Clean data" toggle.
    pub fn effective_request(&self) -> FileRequest {
        FileRequest {
            cleaning: if self.clean_enabled {
                self.request.cleaning
            } else {
                CleaningOptions::default()
            },
            selection: self.request.selection.clone(),
            export: None,
        }
    }

    /// Recompute `view` after any option change.
    pub fn refresh(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        match transform(source, &self.effective_request()) {
            Ok(view) => {
                self.view = Some(view);
                self.error = None;
            }
            Err(e) => {
                log::error!("{}: {e}", self.file.name);
                self.view = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Toggle one column in the selection and refresh.
    pub fn toggle_column(&mut self, column: &str) {
        self.request
            .selection
            .get_or_insert_with(ColumnSelection::default)
            .toggle(column);
        self.refresh();
    }

    /// Encode the current view in the chosen format (None without a view).
    pub fn convert(&self) -> Option<Result<ExportedFile, SweepError>> {
        self.view
            .as_ref()
            .map(|view| encode(view, &self.file.name, self.export_format))
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: SweeperConfig,

    /// One session per uploaded file, in upload order.
    pub files: Vec<FileSession>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            status_message: None,
        }
    }

    /// Read and decode each picked path. A file that cannot be read or
    /// decoded never stops the others.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match UploadedFile::from_path(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    log::error!("{e:#}");
                    self.status_message = Some(format!("Error: {e:#}"));
                }
            }
        }
        self.add_uploads(files);
    }

    /// Decode a batch of uploads, one session per file in upload order.
    /// Options are chosen per file afterwards, so every file is decoded as is.
    pub fn add_uploads(&mut self, files: Vec<UploadedFile>) {
        let results = process_batch(&files, &self.config.read_options(), |_| {
            FileRequest::default()
        });
        self.files.extend(
            files
                .into_iter()
                .zip(results)
                .map(|(file, result)| FileSession::from_result(file, result)),
        );
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_upload_does_not_stop_the_batch() {
        let mut state = AppState::new(SweeperConfig::default());
        state.add_uploads(vec![
            UploadedFile::new("data.txt", b"a,b\n1,2\n".to_vec()),
            UploadedFile::new("good.csv", b"a,b\n1,\n2,4\n1,\n".to_vec()),
        ]);

        assert_eq!(state.files.len(), 2);
        let bad = &state.files[0];
        assert!(bad.source.is_none());
        assert_eq!(bad.error.as_deref(), Some("Unsupported File Type: .txt"));

        let good = &state.files[1];
        assert!(good.error.is_none());
        assert_eq!(good.source.as_ref().map(Table::n_rows), Some(3));
        assert_eq!(
            good.request.selection,
            Some(ColumnSelection::new(["a", "b"]))
        );
        assert_eq!(good.view, good.source);
    }

    #[test]
    fn cleaning_applies_only_when_enabled() {
        let mut state = AppState::new(SweeperConfig::default());
        state.add_uploads(vec![UploadedFile::new("good.csv", b"a\n1\n1\n".to_vec())]);
        let session = &mut state.files[0];
        session.request.cleaning.remove_duplicates = true;
        session.refresh();
        assert_eq!(session.view.as_ref().map(Table::n_rows), Some(2));

        session.clean_enabled = true;
        session.refresh();
        assert_eq!(session.view.as_ref().map(Table::n_rows), Some(1));

        session.toggle_column("a");
        let exported = session.convert().unwrap().unwrap();
        assert_eq!(exported.file_name, "good.csv");
    }
}
