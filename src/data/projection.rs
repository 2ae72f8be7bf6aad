use serde::{Deserialize, Serialize};

use super::error::{Result, SweepError};
use super::model::Table;

// ---------------------------------------------------------------------------
// Column selection: which columns to keep, in which order
// ---------------------------------------------------------------------------

/// Ordered list of column names to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection(Vec<String>);

impl ColumnSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Select every column of `table`, in table order.
    pub fn all(table: &Table) -> Self {
        Self(table.column_names())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `name` if absent, remove it if present.
    pub fn toggle(&mut self, name: &str) {
        if let Some(pos) = self.0.iter().position(|n| n == name) {
            self.0.remove(pos);
        } else {
            self.0.push(name.to_string());
        }
    }
}

/// Keep only the selected columns, in selection order, with every row.
///
/// An empty selection gives a table with no columns but the same row count.
pub fn project_columns(table: &Table, selection: &ColumnSelection) -> Result<Table> {
    if selection.is_empty() {
        return Ok(Table::with_rows(table.n_rows()));
    }
    let columns = selection
        .names()
        .iter()
        .map(|name| {
            table
                .column(name)
                .cloned()
                .ok_or_else(|| SweepError::UnknownColumn(name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn table() -> Table {
        Table::from_columns(vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            Column::new("b", vec![CellValue::Text("x".into()), CellValue::Missing]),
            Column::new("c", vec![CellValue::Float(0.5), CellValue::Float(1.5)]),
        ])
    }

    #[test]
    fn selecting_everything_is_identity() {
        let t = table();
        assert_eq!(project_columns(&t, &ColumnSelection::all(&t)).unwrap(), t);
    }

    #[test]
    fn subset_follows_selection_order() {
        let t = table();
        let projected = project_columns(&t, &ColumnSelection::new(["c", "a"])).unwrap();
        assert_eq!(projected.column_names(), vec!["c", "a"]);
        assert_eq!(projected.n_rows(), 2);
        assert_eq!(projected.column("a"), t.column("a"));
        assert_eq!(projected.column("c"), t.column("c"));
    }

    #[test]
    fn empty_selection_keeps_row_count() {
        let projected = project_columns(&table(), &ColumnSelection::default()).unwrap();
        assert_eq!(projected.n_cols(), 0);
        assert_eq!(projected.n_rows(), 2);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = project_columns(&table(), &ColumnSelection::new(["a", "zzz"])).unwrap_err();
        assert!(matches!(err, SweepError::UnknownColumn(ref name) if name == "zzz"));
    }

    #[test]
    fn toggle_adds_and_removes() {
        let t = table();
        let mut selection = ColumnSelection::all(&t);
        selection.toggle("b");
        assert_eq!(selection.names(), ["a", "c"]);
        selection.toggle("b");
        assert!(selection.contains("b"));
        assert_eq!(selection.names(), ["a", "c", "b"]);
    }
}
