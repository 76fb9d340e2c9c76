/// A numerically typed table: ordered named columns with column-major `f64`
/// storage and no missing values. Only group cleaning constructs these, so
/// the invariants hold by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanTable {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CleanTable {
    /// Builds a table from parallel column names and column-major values.
    /// All value vectors must share one length.
    pub(crate) fn new(columns: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        debug_assert!(values.windows(2).all(|pair| pair[0].len() == pair[1].len()));
        CleanTable { columns, values }
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of a named column, or None if the column does not exist.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|index| self.values[index].as_slice())
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.values.first().map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_by_name() {
        let table = CleanTable::new(
            vec!["Area".to_owned(), "Intensity".to_owned()],
            vec![vec![1.0, 2.0], vec![0.5, 0.7]],
        );
        assert_eq!(table.column("Intensity"), Some([0.5, 0.7].as_slice()));
        assert_eq!(table.column("Count"), None);
        assert_eq!(table.height(), 2);
    }
}
