use thiserror::Error;

/// Why a file's content could not be read as its declared format.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no worksheets")]
    NoWorksheet,
}

/// Why a table could not be written in the requested format.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("table does not fit in a worksheet: {rows} rows x {cols} columns")]
    TooLarge { rows: usize, cols: usize },
}

/// Per-file pipeline failure. None of these abort a batch.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Unsupported File Type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read {file_name}: {cause}")]
    DecodeFailure {
        file_name: String,
        #[source]
        cause: DecodeError,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Failed to convert {file_name}: {cause}")]
    EncodeFailure {
        file_name: String,
        #[source]
        cause: EncodeError,
    },
}

pub type Result<T> = std::result::Result<T, SweepError>;
