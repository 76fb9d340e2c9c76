use crate::group::{GroupError, MAX_FEATURES};
use crate::table::CleanTable;

/// Aggregated bounds of one feature across every group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureRange {
    /// Max-of-maxes across all tables
    pub max: f64,
    /// Min-of-mins across all tables
    pub min: f64,
}

/// How the min/max accumulators are seeded before folding.
///
/// Every historical variant of this pipeline seeded both accumulators at
/// zero, so a column whose true range lies entirely above or below zero gets
/// its interval silently widened to include zero. That behavior drives the
/// existing plots, so it stays the default until a product owner signs off
/// on changing it; `DataBounds` is the corrected alternative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RangeSeed {
    /// Seed accumulators at 0; reported ranges always include zero
    #[default]
    ZeroAnchored,
    /// Seed from the first observed value; reported ranges are tight
    DataBounds,
}

/// Folds the global min/max of `column` across all tables.
///
/// Fails with [`GroupError::ColumnLookup`] (enumerating the offending
/// table's columns) if any table lacks the column. With no observed values
/// the seed alone decides the result: `(0, 0)` for both seeds.
pub fn feature_range(
    tables: &[CleanTable],
    column: &str,
    seed: RangeSeed,
) -> Result<FeatureRange, GroupError> {
    let mut bounds = match seed {
        RangeSeed::ZeroAnchored => Some((0.0f64, 0.0f64)),
        RangeSeed::DataBounds => None,
    };
    for table in tables {
        let values = table.column(column).ok_or_else(|| GroupError::ColumnLookup {
            column: column.to_owned(),
            available: table.columns().to_vec(),
        })?;
        for &value in values {
            bounds = Some(match bounds {
                Some((max, min)) => (max.max(value), min.min(value)),
                None => (value, value),
            });
        }
    }
    let (max, min) = bounds.unwrap_or((0.0, 0.0));
    Ok(FeatureRange { max, min })
}

/// Reconciles ranges for the first [`MAX_FEATURES`] requested features.
///
/// Truncation to the feature budget happens here, not during feature
/// resolution; extra requested names are simply never ranged.
pub fn feature_ranges(
    tables: &[CleanTable],
    features: &[String],
    seed: RangeSeed,
) -> Result<Vec<(String, FeatureRange)>, GroupError> {
    let mut ranges = Vec::new();
    for feature in features.iter().take(MAX_FEATURES) {
        let range = feature_range(tables, feature, seed)?;
        log::debug!(
            "feature '{}' ranges from {} to {}",
            feature,
            range.min,
            range.max
        );
        ranges.push((feature.to_owned(), range));
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, values: &[f64]) -> CleanTable {
        CleanTable::new(vec![name.to_owned()], vec![values.to_vec()])
    }

    #[test]
    fn folds_max_of_maxes_and_min_of_mins() {
        let first = table("A", &[1.0, 1.0, 1.0, 0.0, 1.0]);
        let second = table("A", &[2.0, 2.0, 3.0, 4.0, 5.0]);

        let range = feature_range(&[first, second], "A", RangeSeed::ZeroAnchored).unwrap();
        assert_eq!(range, FeatureRange { max: 5.0, min: 0.0 });
    }

    #[test]
    fn zero_anchored_widens_all_negative_columns() {
        // Historical behavior: the interval is clamped to include zero.
        let negatives = table("A", &[-5.0, -3.0, -1.0]);

        let range = feature_range(&[negatives], "A", RangeSeed::ZeroAnchored).unwrap();
        assert_eq!(range, FeatureRange { max: 0.0, min: -5.0 });
    }

    #[test]
    fn data_bounds_reports_the_true_interval() {
        let negatives = table("A", &[-5.0, -3.0, -1.0]);

        let range = feature_range(&[negatives], "A", RangeSeed::DataBounds).unwrap();
        assert_eq!(range, FeatureRange { max: -1.0, min: -5.0 });
    }

    #[test]
    fn missing_column_names_available_columns() {
        let only_a = table("A", &[1.0]);

        match feature_range(&[only_a], "B", RangeSeed::ZeroAnchored) {
            Err(GroupError::ColumnLookup { column, available }) => {
                assert_eq!(column, "B");
                assert_eq!(available, vec!["A".to_owned()]);
            }
            other => panic!("expected ColumnLookup, got {other:?}"),
        }
    }

    #[test]
    fn ranges_stop_at_the_feature_budget() {
        let wide = CleanTable::new(
            vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
            vec![vec![1.0], vec![2.0], vec![3.0]],
        );
        let features = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];

        let ranges = feature_ranges(&[wide], &features, RangeSeed::ZeroAnchored).unwrap();
        assert_eq!(ranges.len(), MAX_FEATURES);
        assert_eq!(ranges[1].0, "B");
    }
}
