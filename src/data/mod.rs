/// Data layer: table model and the per-file transform pipeline.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicate rows, fill numeric gaps (optional)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection │  keep selected columns ──► chart (numeric series)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  encode → named bytes + MIME
///   └──────────┘
/// ```
pub mod chart;
pub mod clean;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod projection;

pub use clean::{apply_cleaning, fill_missing_numeric, remove_duplicate_rows, CleaningOptions};
pub use error::{DecodeError, EncodeError, SweepError};
pub use export::{encode, export_file_name, ExportFormat, ExportedFile};
pub use loader::{decode, decode_file, decode_with, extension_of, InputFormat, ReadOptions};
pub use model::{CellValue, Column, ColumnType, Table, UploadedFile};
pub use pipeline::{process_batch, process_file, transform, FileRequest, ProcessedFile};
pub use projection::{project_columns, ColumnSelection};
