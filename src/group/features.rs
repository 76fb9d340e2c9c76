use crate::group::GroupError;
use crate::table::CleanTable;

/// Number of features plotted: one per chart axis.
pub const MAX_FEATURES: usize = 2;

/// Resolves which columns become the plot axes.
///
/// With an empty request the first [`MAX_FEATURES`] column names of the
/// first table are taken in their existing order; an explicit request is
/// used as given (not truncated here — range reconciliation applies the
/// budget). Either way, every resolved name must exist in every table.
///
/// # Errors
/// * [`GroupError::TooFewColumns`] when defaulting and the first table has
///   fewer than [`MAX_FEATURES`] columns (or there are no tables at all).
/// * [`GroupError::FeatureNotFound`] when a resolved name is absent from
///   any table; the message carries that table's available columns.
pub fn resolve_features(
    tables: &[CleanTable],
    requested: &[String],
) -> Result<Vec<String>, GroupError> {
    let features = if requested.is_empty() {
        let first = tables.first().ok_or(GroupError::TooFewColumns {
            needed: MAX_FEATURES,
            available: Vec::new(),
        })?;
        if first.columns().len() < MAX_FEATURES {
            return Err(GroupError::TooFewColumns {
                needed: MAX_FEATURES,
                available: first.columns().to_vec(),
            });
        }
        first.columns()[..MAX_FEATURES].to_vec()
    } else {
        requested.to_vec()
    };

    for table in tables {
        for feature in &features {
            if table.column(feature).is_none() {
                return Err(GroupError::FeatureNotFound {
                    feature: feature.to_owned(),
                    available: table.columns().to_vec(),
                });
            }
        }
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> CleanTable {
        CleanTable::new(
            columns.iter().map(|name| (*name).to_owned()).collect(),
            vec![vec![1.0]; columns.len()],
        )
    }

    #[test]
    fn defaults_to_first_two_columns_of_first_table() {
        let tables = [table(&["A", "B", "C"]), table(&["A", "B"])];
        let features = resolve_features(&tables, &[]).unwrap();
        assert_eq!(features, vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    fn explicit_request_is_not_truncated() {
        let tables = [table(&["A", "B", "C"])];
        let requested = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
        let features = resolve_features(&tables, &requested).unwrap();
        assert_eq!(features.len(), 3);
    }

    #[test]
    fn missing_feature_reports_offending_columns() {
        let tables = [table(&["A", "B", "C"]), table(&["A", "B"])];
        let requested = vec!["A".to_owned(), "D".to_owned()];
        match resolve_features(&tables, &requested) {
            Err(GroupError::FeatureNotFound { feature, available }) => {
                assert_eq!(feature, "D");
                assert_eq!(available, vec!["A".to_owned(), "B".to_owned(), "C".to_owned()]);
            }
            other => panic!("expected FeatureNotFound, got {other:?}"),
        }
    }

    #[test]
    fn narrow_first_table_cannot_supply_defaults() {
        let tables = [table(&["A"])];
        assert!(matches!(
            resolve_features(&tables, &[]),
            Err(GroupError::TooFewColumns { needed: 2, .. })
        ));
    }

    #[test]
    fn no_tables_cannot_supply_defaults() {
        assert!(matches!(
            resolve_features(&[], &[]),
            Err(GroupError::TooFewColumns { .. })
        ));
    }
}
