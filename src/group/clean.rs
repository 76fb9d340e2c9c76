use crate::table::{CleanTable, RawTable, TableError, Value};

/// Turns one raw group slice into a numeric, gap-free table.
///
/// The group's own headers are the merged-cell artifacts ("A", "Unnamed: 1",
/// ...); the true per-feature names live in the first data row. That row is
/// promoted to column names and dropped, every row still containing a
/// missing value is dropped whole (no imputation), and the remaining cells
/// are coerced to `f64`.
///
/// Coercion is atomic: the first cell that will not coerce aborts the whole
/// clean with [`TableError::TypeCoercion`] naming the offending column, and
/// no partial table is produced. Sibling groups may legitimately end up with
/// different heights after row dropping.
pub fn clean_group(raw: &RawTable) -> Result<CleanTable, TableError> {
    let header = raw.rows().first().ok_or(TableError::MissingHeaderRow)?;
    let columns: Vec<String> = header.iter().map(Value::to_string).collect();

    let body: Vec<&Vec<Value>> = raw
        .rows()
        .iter()
        .skip(1)
        .filter(|row| !row.iter().any(Value::is_missing))
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(body.len()); columns.len()];
    for row in body {
        for (index, cell) in row.iter().enumerate() {
            let number = cell.as_number().ok_or_else(|| TableError::TypeCoercion {
                column: columns[index].to_owned(),
                value: cell.to_string(),
            })?;
            values[index].push(number);
        }
    }
    Ok(CleanTable::new(columns, values))
}

/// Simplified cleaning variant: promotes the first data row to column names
/// and drops it, nothing more. Rows with missing values survive and no
/// numeric coercion happens. Kept as a distinct contract from
/// [`clean_group`]; pick one per call site, never both.
pub fn promote_headers(raw: &RawTable) -> Result<RawTable, TableError> {
    let header = raw.rows().first().ok_or(TableError::MissingHeaderRow)?;
    let columns: Vec<String> = header.iter().map(Value::to_string).collect();
    Ok(RawTable::new(columns, raw.rows()[1..].to_vec()))
}
