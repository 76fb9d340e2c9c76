use crate::table::Value;
use std::ops::Range;

/// An untyped table straight from the data source: ordered named columns
/// over a row-major body. Short rows are padded with missing values so that
/// every row spans the full table width.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    /// Creates a table from column names and rows, padding short rows.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), Value::Missing);
        }
        RawTable { columns, rows }
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Ordered data rows, each exactly `width()` cells wide.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Copies out the contiguous column range `[range.start, range.end)`
    /// as an independent table. Out-of-bounds indexes are clamped.
    pub fn slice_columns(&self, range: Range<usize>) -> RawTable {
        let lower = range.start.min(self.columns.len());
        let upper = range.end.min(self.columns.len()).max(lower);
        RawTable {
            columns: self.columns[lower..upper].to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| row[lower..upper].to_vec())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    #[test]
    fn pads_short_rows() {
        let table = RawTable::new(
            vec!["A".to_owned(), "B".to_owned()],
            vec![vec![Value::Number(1.0)]],
        );
        assert_eq!(table.rows()[0], vec![Value::Number(1.0), Value::Missing]);
    }

    #[test]
    fn slices_columns_with_rows() {
        let table = RawTable::new(
            vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
            vec![
                vec![text("a"), text("b"), text("c")],
                vec![text("d"), text("e"), text("f")],
            ],
        );
        let slice = table.slice_columns(1..3);
        assert_eq!(slice.columns(), &["B".to_owned(), "C".to_owned()]);
        assert_eq!(slice.rows()[0], vec![text("b"), text("c")]);
        assert_eq!(slice.rows()[1], vec![text("e"), text("f")]);
    }

    #[test]
    fn slice_clamps_out_of_bounds() {
        let table = RawTable::new(vec!["A".to_owned()], vec![vec![text("a")]]);
        let slice = table.slice_columns(0..5);
        assert_eq!(slice.width(), 1);
    }
}
