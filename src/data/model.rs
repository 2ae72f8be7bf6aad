use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Rows are hashed and compared during deduplication, so `CellValue` must be
/// `Eq + Hash + Ord` even though it carries floats.
#[derive(Debug, Clone)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Blank / NA cell. Distinct from `0` and from empty text.
    Missing,
}

// -- Manual Eq/Ord so rows can be deduplicated and sorted --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Missing => {}
        }
    }
}

/// Canonical text form, used for CSV export and the preview table.
/// Missing cells render as the empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Whole floats keep a trailing `.0` so they stay distinguishable from
/// integers once written out as text.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        (if v > 0.0 { "inf" } else { "-inf" }).to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl CellValue {
    /// Numeric view of the cell; booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Column type inferred from the cells it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is missing.
    Empty,
}

impl ColumnType {
    /// An all-missing column counts as numeric, like a NaN-only float column.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float | ColumnType::Empty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Text => "text",
            ColumnType::Empty => "empty",
        };
        f.write_str(label)
    }
}

/// A named column holding one value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Infer the column type from the non-missing cells.
    ///
    /// * any text, or booleans mixed with numbers → `Text`
    /// * integers mixed with floats → `Float`
    pub fn column_type(&self) -> ColumnType {
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;
        for cell in &self.cells {
            match cell {
                CellValue::Text(_) => return ColumnType::Text,
                CellValue::Integer(_) => has_int = true,
                CellValue::Float(_) => has_float = true,
                CellValue::Bool(_) => has_bool = true,
                CellValue::Missing => {}
            }
        }
        match (has_bool, has_int || has_float) {
            (true, true) => ColumnType::Text,
            (true, false) => ColumnType::Bool,
            (false, true) if has_float => ColumnType::Float,
            (false, true) => ColumnType::Integer,
            (false, false) => ColumnType::Empty,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

// ---------------------------------------------------------------------------
// Table – the pipeline's working value
// ---------------------------------------------------------------------------

/// Ordered named columns plus an explicit row count, so a projection onto
/// zero columns still remembers how many rows it has.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    ///
    /// Panics if the columns disagree on length; loaders pad rows before
    /// building columns.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map_or(0, |c| c.cells.len());
        assert!(
            columns.iter().all(|c| c.cells.len() == n_rows),
            "all columns of a table must have the same length"
        );
        Self { columns, n_rows }
    }

    /// A table with rows but no columns.
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            n_rows,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// Keep only the rows whose index is listed, in the listed order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), indices.iter().map(|&i| c.cells[i].clone()).collect()))
            .collect();
        Table {
            columns,
            n_rows: indices.len(),
        }
    }

    /// First `n` rows (the whole table if it is shorter).
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.take_rows(&indices)
    }
}

// ---------------------------------------------------------------------------
// UploadedFile – raw input handed to the pipeline
// ---------------------------------------------------------------------------

/// An uploaded file: its name (with extension) and full byte content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    /// Size in KiB, for display.
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}
