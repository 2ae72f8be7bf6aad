use super::model::{CellValue, Table};

/// One numeric column laid out for a bar chart: a value per row position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    /// `(row, value)` pairs for the rows that have a value.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| v.map(|v| (row, v)))
    }
}

/// The first `max_columns` numeric columns, in table order. Boolean columns
/// are not numeric here.
pub fn numeric_series(table: &Table, max_columns: usize) -> Vec<ChartSeries> {
    table
        .columns()
        .iter()
        .filter(|c| c.column_type().is_numeric())
        .take(max_columns)
        .map(|c| ChartSeries {
            name: c.name.clone(),
            values: c.cells.iter().map(CellValue::as_f64).collect(),
        })
        .collect()
}
