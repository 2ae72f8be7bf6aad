use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Cleaning options
// ---------------------------------------------------------------------------

/// Which cleaning steps to run on a file. Both are idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing_numeric: bool,
}

impl CleaningOptions {
    pub fn any(&self) -> bool {
        self.remove_duplicates || self.fill_missing_numeric
    }
}

/// Run the enabled steps: duplicates first, so means are taken over the
/// deduplicated rows.
pub fn apply_cleaning(table: Table, options: &CleaningOptions) -> Table {
    let mut table = table;
    if options.remove_duplicates {
        table = remove_duplicate_rows(&table);
    }
    if options.fill_missing_numeric {
        table = fill_missing_numeric(&table);
    }
    table
}

// ---------------------------------------------------------------------------
// Duplicate rows
// ---------------------------------------------------------------------------

/// Drop rows equal in every column to an earlier row, keeping first
/// occurrences in their original order. A table without columns has nothing
/// to compare and is returned as is.
pub fn remove_duplicate_rows(table: &Table) -> Table {
    if table.n_cols() == 0 {
        return table.clone();
    }
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(table.n_rows());
    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&i| seen.insert(table.row(i)))
        .collect();

    let removed = table.n_rows() - keep.len();
    if removed == 0 {
        return table.clone();
    }
    log::info!("Removed {removed} duplicate rows");
    table.take_rows(&keep)
}

// ---------------------------------------------------------------------------
// Missing numeric values
// ---------------------------------------------------------------------------

/// Replace missing cells of every numeric column with the mean of that
/// column's present values. Columns with no present values are left alone.
pub fn fill_missing_numeric(table: &Table) -> Table {
    let mut filled = table.clone();
    for column in filled.columns_mut() {
        if !column.column_type().is_numeric() {
            continue;
        }
        let values: Vec<f64> = column.cells.iter().filter_map(CellValue::as_f64).collect();
        if values.is_empty() {
            log::debug!("Column {:?} has no values, nothing to average", column.name);
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let mut replaced = 0usize;
        for cell in column.cells.iter_mut().filter(|c| c.is_missing()) {
            *cell = CellValue::Float(mean);
            replaced += 1;
        }
        if replaced > 0 {
            log::info!(
                "Filled {replaced} missing values in {:?} with mean {mean}",
                column.name
            );
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnType};

    fn int(i: i64) -> CellValue {
        CellValue::Integer(i)
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("a", vec![int(1), int(2), int(1)]),
            Column::new("b", vec![CellValue::Missing, int(4), CellValue::Missing]),
        ])
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let deduped = remove_duplicate_rows(&sample());
        assert_eq!(deduped.n_rows(), 2);
        assert_eq!(deduped.row(0), vec![&int(1), &CellValue::Missing]);
        assert_eq!(deduped.row(1), vec![&int(2), &int(4)]);
    }

    #[test]
    fn duplicate_removal_is_idempotent() {
        let once = remove_duplicate_rows(&sample());
        let twice = remove_duplicate_rows(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_duplicates_is_a_no_op() {
        let table = Table::from_columns(vec![Column::new("a", vec![int(1), int(2), int(3)])]);
        assert_eq!(remove_duplicate_rows(&table), table);
    }

    #[test]
    fn duplicates_need_every_column_equal() {
        let table = Table::from_columns(vec![
            Column::new("a", vec![int(1), int(1)]),
            Column::new("b", vec![CellValue::Text("x".into()), CellValue::Text("y".into())]),
        ]);
        assert_eq!(remove_duplicate_rows(&table).n_rows(), 2);
    }

    #[test]
    fn zero_column_table_keeps_its_rows() {
        let table = Table::with_rows(3);
        assert_eq!(remove_duplicate_rows(&table).n_rows(), 3);
    }

    #[test]
    fn fill_uses_mean_of_present_values() {
        let table = Table::from_columns(vec![Column::new(
            "v",
            vec![int(1), CellValue::Missing, int(2), CellValue::Missing, int(6)],
        )]);
        let filled = fill_missing_numeric(&table);
        let v = filled.column("v").unwrap();
        assert_eq!(v.missing_count(), 0);
        assert_eq!(v.cells[1], CellValue::Float(3.0));
        assert_eq!(v.cells[3], CellValue::Float(3.0));
        assert_eq!(v.cells[0], int(1));
    }

    #[test]
    fn fill_leaves_all_missing_column_alone() {
        let table = Table::from_columns(vec![Column::new(
            "empty",
            vec![CellValue::Missing, CellValue::Missing],
        )]);
        let filled = fill_missing_numeric(&table);
        assert_eq!(filled, table);
        assert_eq!(filled.column("empty").unwrap().column_type(), ColumnType::Empty);
    }

    #[test]
    fn fill_skips_text_and_bool_columns() {
        let table = Table::from_columns(vec![
            Column::new("t", vec![CellValue::Text("x".into()), CellValue::Missing]),
            Column::new("f", vec![CellValue::Bool(true), CellValue::Missing]),
        ]);
        assert_eq!(fill_missing_numeric(&table), table);
    }

    #[test]
    fn fill_is_idempotent() {
        let once = fill_missing_numeric(&sample());
        assert_eq!(fill_missing_numeric(&once), once);
    }

    #[test]
    fn apply_cleaning_dedups_before_filling() {
        let table = Table::from_columns(vec![
            Column::new("k", vec![int(1), int(1), int(2)]),
            Column::new("v", vec![int(10), int(10), CellValue::Missing]),
        ]);
        let options = CleaningOptions {
            remove_duplicates: true,
            fill_missing_numeric: true,
        };
        let cleaned = apply_cleaning(table, &options);
        assert_eq!(cleaned.n_rows(), 2);
        assert_eq!(cleaned.column("v").unwrap().cells[1], CellValue::Float(10.0));
    }

    #[test]
    fn default_options_change_nothing() {
        assert!(!CleaningOptions::default().any());
        assert_eq!(apply_cleaning(sample(), &CleaningOptions::default()), sample());
    }
}
