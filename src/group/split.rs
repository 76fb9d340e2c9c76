use crate::table::RawTable;

/// Result of cutting a wide table at its group boundaries.
///
/// `tables` and `names` are parallel; concatenating the tables' column
/// ranges in order reconstructs the input columns exactly.
#[derive(Clone, Debug)]
pub struct GroupSplit {
    /// One sub-table per group, in left-to-right sheet order
    pub tables: Vec<RawTable>,
    /// Header text of each group's boundary column
    pub names: Vec<String>,
    degenerate: bool,
}

impl GroupSplit {
    /// True when no named header column existed and the whole table was
    /// returned as a single anonymous group. Set only on that path; a real
    /// group whose boundary header happens to be empty text is not
    /// degenerate.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// True when a header marks the start of a group.
///
/// Merged header cells read back as one named cell followed by placeholder
/// columns containing "unnamed", so any header without that substring is a
/// boundary.
pub(crate) fn is_group_header(name: &str) -> bool {
    !name.to_lowercase().contains("unnamed")
}

/// Splits a wide table into per-group sub-tables at its named header columns.
///
/// Each group spans from its named column up to (not including) the next
/// named column, or the table end. A table without any named column comes
/// back as a single group with the empty string for a name; callers that
/// require groups must treat that case as an error themselves. Header text
/// is the only thing inspected; cell content is never validated here.
pub fn split_groups(table: &RawTable) -> GroupSplit {
    let starts: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| is_group_header(name))
        .map(|(index, _)| index)
        .collect();
    if starts.is_empty() {
        return GroupSplit {
            tables: vec![table.clone()],
            names: vec![String::new()],
            degenerate: true,
        };
    }

    let mut tables = Vec::with_capacity(starts.len());
    let mut names = Vec::with_capacity(starts.len());
    for (position, &lower) in starts.iter().enumerate() {
        let upper = starts
            .get(position + 1)
            .copied()
            .unwrap_or_else(|| table.width());
        tables.push(table.slice_columns(lower..upper));
        names.push(table.columns()[lower].to_owned());
    }
    GroupSplit {
        tables,
        names,
        degenerate: false,
    }
}
